//! OCR fallback for scanned pages.
//!
//! Rendering and recognition are delegated to the poppler `pdftoppm` and
//! `tesseract` executables. `PdfTextExtractor` only sees the `OcrEngine` trait.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{tool} failed on page {page}: {stderr}")]
    Tool {
        tool: &'static str,
        page: u32,
        stderr: String,
    },

    #[error("{0} produced no output image")]
    MissingImage(&'static str),
}

/// Recognizes the text of a single PDF page.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// `page_number` is 1-based.
    async fn recognize_page(&self, pdf_path: &Path, page_number: u32) -> Result<String, OcrError>;
}

/// `pdftoppm` + `tesseract` subprocess pipeline.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    pub dpi: u32,
    pub lang: String,
}

impl TesseractOcr {
    pub fn new(dpi: u32, lang: impl Into<String>) -> Self {
        Self {
            dpi,
            lang: lang.into(),
        }
    }

    /// Checks that both executables can be spawned.
    pub async fn is_available() -> bool {
        let pdftoppm = Command::new("pdftoppm").arg("-v").output().await.is_ok();
        let tesseract = Command::new("tesseract")
            .arg("--version")
            .output()
            .await
            .is_ok();

        if !pdftoppm {
            warn!("pdftoppm not found - install poppler-utils for OCR support");
        }
        if !tesseract {
            warn!("tesseract not found - install tesseract-ocr for OCR support");
        }

        pdftoppm && tesseract
    }

    async fn render_page(
        &self,
        pdf_path: &Path,
        page_number: u32,
        out_dir: &Path,
    ) -> Result<PathBuf, OcrError> {
        let prefix = out_dir.join(format!("page-{page_number}"));
        let page = page_number.to_string();

        let output = Command::new("pdftoppm")
            .args(["-f", &page, "-l", &page])
            .arg("-r")
            .arg(self.dpi.to_string())
            .args(["-png", "-singlefile"])
            .arg(pdf_path)
            .arg(&prefix)
            .output()
            .await?;

        if !output.status.success() {
            return Err(OcrError::Tool {
                tool: "pdftoppm",
                page: page_number,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let image = prefix.with_extension("png");
        if !tokio::fs::try_exists(&image).await.unwrap_or(false) {
            return Err(OcrError::MissingImage("pdftoppm"));
        }
        Ok(image)
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn recognize_page(&self, pdf_path: &Path, page_number: u32) -> Result<String, OcrError> {
        let work_dir = tempfile::tempdir()?;
        let image = self.render_page(pdf_path, page_number, work_dir.path()).await?;

        let output = Command::new("tesseract")
            .arg(&image)
            .arg("stdout")
            .args(["-l", &self.lang])
            .output()
            .await?;

        if !output.status.success() {
            return Err(OcrError::Tool {
                tool: "tesseract",
                page: page_number,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).to_string();
        debug!("OCR page {}: {} chars", page_number, text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sets_fields() {
        let ocr = TesseractOcr::new(300, "deu");
        assert_eq!(ocr.dpi, 300);
        assert_eq!(ocr.lang, "deu");
    }

    #[tokio::test]
    async fn test_missing_pdf_is_an_error() {
        let ocr = TesseractOcr::new(72, "eng");
        let result = ocr
            .recognize_page(Path::new("/nonexistent/resume.pdf"), 1)
            .await;
        // Either the tools are missing (Io) or pdftoppm rejects the path (Tool).
        assert!(result.is_err());
    }

    #[test]
    fn test_tool_error_message_names_page() {
        let err = OcrError::Tool {
            tool: "tesseract",
            page: 3,
            stderr: "bad image".into(),
        };
        assert_eq!(err.to_string(), "tesseract failed on page 3: bad image");
    }
}
