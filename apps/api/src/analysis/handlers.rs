use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::analysis::{analyze, compare_resumes, AnalysisOptions, AnalysisReport, ResumeComparison};
use crate::models::resume::ResumeData;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub resume: ResumeData,
    #[serde(flatten)]
    pub options: AnalysisOptions,
}

#[derive(Deserialize)]
pub struct CompareRequest {
    pub first: ResumeData,
    pub second: ResumeData,
}

/// POST /api/v1/resumes/analyze
pub async fn handle_analyze(Json(req): Json<AnalyzeRequest>) -> Json<AnalysisReport> {
    Json(analyze(&req.resume, &req.options, Utc::now().date_naive()))
}

/// POST /api/v1/resumes/compare
pub async fn handle_compare(Json(req): Json<CompareRequest>) -> Json<ResumeComparison> {
    Json(compare_resumes(&req.first, &req.second, Utc::now().date_naive()))
}
