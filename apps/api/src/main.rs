mod analysis;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod pdf;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::extractor::{ExtractionSettings, ResumeExtractor};
use crate::llm_client::LlmClient;
use crate::pdf::{OcrEngine, PdfSettings, PdfTextExtractor, TesseractOcr};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Extractor v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.ollama_url.clone(), config.ollama_model.clone());
    info!("LLM client initialized (model: {})", llm.model());
    if config.ollama_pull_on_start {
        if let Err(e) = llm.ensure_model_available().await {
            warn!("Could not verify model {}: {e}", llm.model());
        }
    }

    // Initialize OCR fallback
    let ocr = build_ocr(&config).await;

    let pdf = PdfTextExtractor::new(
        PdfSettings {
            min_page_text_chars: config.min_page_text_chars,
        },
        ocr,
    );
    let extractor = ResumeExtractor::new(
        pdf,
        llm,
        ExtractionSettings {
            max_retries: config.llm_max_retries,
            min_document_text_chars: config.min_document_text_chars,
        },
    );

    // Build app state
    let state = AppState {
        extractor: Arc::new(extractor),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Tesseract-backed OCR when enabled and both executables are installed.
async fn build_ocr(config: &Config) -> Option<Arc<dyn OcrEngine>> {
    if !config.ocr_enabled {
        info!("OCR fallback disabled");
        return None;
    }
    if !TesseractOcr::is_available().await {
        warn!("OCR fallback unavailable; scanned pages will yield no text");
        return None;
    }

    info!(
        "OCR fallback enabled (dpi: {}, lang: {})",
        config.ocr_dpi, config.ocr_lang
    );
    Some(Arc::new(TesseractOcr::new(config.ocr_dpi, config.ocr_lang.clone())))
}
