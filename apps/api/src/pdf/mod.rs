//! PDF text extraction with a per-page OCR fallback.
//!
//! The embedded text layer is read with `pdf-extract`. Pages whose text layer
//! is shorter than `min_page_text_chars` are treated as scanned and sent
//! through the configured `OcrEngine`.

pub mod clean;
pub mod ocr;

use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use clean::clean_text;
pub use ocr::{OcrEngine, OcrError, TesseractOcr};

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Could not parse PDF: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct PdfSettings {
    /// Pages with fewer trimmed characters than this are OCR'd.
    pub min_page_text_chars: usize,
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self {
            min_page_text_chars: 50,
        }
    }
}

/// Cleaned document text plus what it took to get it.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub page_count: usize,
    /// 1-based numbers of pages whose text came (at least partly) from OCR.
    pub ocr_pages: Vec<u32>,
}

#[derive(Clone)]
pub struct PdfTextExtractor {
    settings: PdfSettings,
    ocr: Option<Arc<dyn OcrEngine>>,
}

impl PdfTextExtractor {
    pub fn new(settings: PdfSettings, ocr: Option<Arc<dyn OcrEngine>>) -> Self {
        Self { settings, ocr }
    }

    pub async fn extract_text(&self, bytes: Bytes) -> Result<ExtractedText, PdfError> {
        let mut pages = match read_text_layer(bytes.clone()).await {
            Ok(pages) => pages,
            Err(e) if self.ocr.is_some() => {
                warn!("Text layer unreadable ({e}), falling back to OCR for every page");
                let count = count_pages(bytes.clone()).await.map_err(|_| e)?;
                vec![String::new(); count]
            }
            Err(e) => return Err(e),
        };

        let sparse: Vec<usize> = pages
            .iter()
            .enumerate()
            .filter(|(_, text)| text.trim().chars().count() < self.settings.min_page_text_chars)
            .map(|(i, _)| i)
            .collect();

        let mut ocr_pages = Vec::new();
        match &self.ocr {
            Some(ocr) if !sparse.is_empty() => {
                info!("Running OCR on {} of {} pages", sparse.len(), pages.len());
                let file = tempfile::Builder::new().suffix(".pdf").tempfile()?;
                tokio::fs::write(file.path(), &bytes).await?;

                for index in sparse {
                    let page_number = (index + 1) as u32;
                    match ocr.recognize_page(file.path(), page_number).await {
                        Ok(text) => {
                            let page = &mut pages[index];
                            if !page.trim().is_empty() {
                                page.push('\n');
                            }
                            page.push_str(&text);
                            ocr_pages.push(page_number);
                        }
                        Err(e) => warn!("OCR failed on page {page_number}, keeping text layer: {e}"),
                    }
                }
            }
            None if !sparse.is_empty() => {
                debug!("{} sparse pages left as-is (OCR disabled)", sparse.len());
            }
            _ => {}
        }

        let page_count = pages.len();
        let text = clean_text(&pages.join("\n"));
        debug!(
            "Extracted {} chars from {} pages ({} via OCR)",
            text.len(),
            page_count,
            ocr_pages.len()
        );

        Ok(ExtractedText {
            text,
            page_count,
            ocr_pages,
        })
    }
}

/// Reads the embedded text layer page by page on a blocking thread.
/// A panic inside the parser surfaces as `PdfError::Parse`.
async fn read_text_layer(bytes: Bytes) -> Result<Vec<String>, PdfError> {
    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem_by_pages(&bytes))
        .await
        .map_err(|e| PdfError::Parse(format!("text extraction aborted: {e}")))?
        .map_err(|e| PdfError::Parse(e.to_string()))
}

async fn count_pages(bytes: Bytes) -> Result<usize, PdfError> {
    tokio::task::spawn_blocking(move || {
        pdf_extract::Document::load_mem(&bytes).map(|doc| doc.get_pages().len())
    })
    .await
    .map_err(|e| PdfError::Parse(format!("page count aborted: {e}")))?
    .map_err(|e| PdfError::Parse(e.to_string()))
}
