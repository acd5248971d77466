pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::extraction::handlers as extraction;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(health::index_handler))
        .route("/health", get(health::health_handler))
        // Extraction
        .route(
            "/api/v1/resumes/extract",
            post(extraction::handle_extract),
        )
        .route(
            "/api/v1/resumes/extract/analyze",
            post(extraction::handle_extract_and_analyze),
        )
        // Analytics over an already-extracted record
        .route("/api/v1/resumes/analyze", post(analysis::handle_analyze))
        .route("/api/v1/resumes/compare", post(analysis::handle_compare))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
