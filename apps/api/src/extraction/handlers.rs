use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::analysis::{analyze, AnalysisOptions, AnalysisReport};
use crate::errors::AppError;
use crate::models::resume::ResumeData;
use crate::state::AppState;

/// Parts of an upload form we care about.
#[derive(Debug, Default)]
struct Upload {
    file: Option<Bytes>,
    job_description: Option<String>,
    job_requirements: Vec<String>,
}

#[derive(Serialize)]
pub struct ExtractAndAnalyzeResponse {
    pub resume: ResumeData,
    pub analysis: AnalysisReport,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Uploaded file exceeds the size limit".to_string())
    } else {
        AppError::Validation(format!("Malformed upload: {}", e.body_text()))
    }
}

/// Requirements arrive as one text field, separated by commas or newlines.
fn split_requirements(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_pdf_filename(name: &str) -> bool {
    name.to_lowercase().ends_with(".pdf")
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, AppError> {
    let mut upload = Upload::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                if !is_pdf_filename(&filename) {
                    return Err(AppError::Validation(
                        "Only PDF files are supported".to_string(),
                    ));
                }
                upload.file = Some(field.bytes().await.map_err(multipart_error)?);
            }
            Some("job_description") => {
                let text = field.text().await.map_err(multipart_error)?;
                upload.job_description = Some(text).filter(|t| !t.trim().is_empty());
            }
            Some("job_requirements") => {
                let text = field.text().await.map_err(multipart_error)?;
                upload.job_requirements = split_requirements(&text);
            }
            _ => {}
        }
    }

    Ok(upload)
}

async fn extract_upload(state: &AppState, file: Option<Bytes>) -> Result<ResumeData, AppError> {
    let file = file.ok_or_else(|| {
        AppError::Validation("Missing 'file' field with the PDF resume".to_string())
    })?;

    let request_id = Uuid::new_v4();
    let span = info_span!("extract", %request_id);
    async move {
        let resume = state.extractor.extract_resume(file).await?;
        info!(
            "Extracted resume: {} positions, {} education entries, {} skills",
            resume.experience.len(),
            resume.education.len(),
            resume.skills.total()
        );
        Ok::<_, AppError>(resume)
    }
    .instrument(span)
    .await
}

/// POST /api/v1/resumes/extract
pub async fn handle_extract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ResumeData>, AppError> {
    let upload = read_upload(multipart).await?;
    let resume = extract_upload(&state, upload.file).await?;
    Ok(Json(resume))
}

/// POST /api/v1/resumes/extract/analyze
pub async fn handle_extract_and_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractAndAnalyzeResponse>, AppError> {
    let upload = read_upload(multipart).await?;
    let resume = extract_upload(&state, upload.file).await?;

    let options = AnalysisOptions {
        job_requirements: upload.job_requirements,
        job_description: upload.job_description,
        top_skills: None,
    };
    let analysis = analyze(&resume, &options, Utc::now().date_naive());

    Ok(Json(ExtractAndAnalyzeResponse { resume, analysis }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_requirements() {
        assert_eq!(
            split_requirements("Rust, Tokio\nPostgreSQL,, \n"),
            vec!["Rust", "Tokio", "PostgreSQL"]
        );
        assert!(split_requirements(" ").is_empty());
    }

    #[test]
    fn test_pdf_filename_is_case_insensitive() {
        assert!(is_pdf_filename("resume.pdf"));
        assert!(is_pdf_filename("Resume.PDF"));
        assert!(!is_pdf_filename("resume.docx"));
        assert!(!is_pdf_filename("pdf"));
    }
}
