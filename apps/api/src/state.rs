use std::sync::Arc;

use crate::config::Config;
use crate::extraction::extractor::ResumeExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// PDF → text → LLM pipeline. Holds the Ollama client and the OCR engine, if any.
    pub extractor: Arc<ResumeExtractor>,
    pub config: Config,
}
