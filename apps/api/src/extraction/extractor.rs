//! Resume extraction pipeline: PDF text → LLM → validated `ResumeData`.

use bytes::Bytes;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::json_repair::{clean_json_response, parse_object, repair_json};
use crate::extraction::prompts::build_extraction_prompt;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{ChatMessage, ChatOptions, LlmClient};
use crate::models::lenient::{is_present_marker, normalize_date};
use crate::models::resume::ResumeData;
use crate::pdf::{PdfError, PdfTextExtractor};

#[derive(Debug, Clone)]
pub struct ExtractionSettings {
    /// Attempts at getting parseable JSON out of the model.
    pub max_retries: u32,
    /// Uploads whose cleaned text is shorter than this are rejected.
    pub min_document_text_chars: usize,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            max_retries: 3,
            min_document_text_chars: 100,
        }
    }
}

pub struct ResumeExtractor {
    pdf: PdfTextExtractor,
    llm: LlmClient,
    settings: ExtractionSettings,
}

impl ResumeExtractor {
    pub fn new(pdf: PdfTextExtractor, llm: LlmClient, settings: ExtractionSettings) -> Self {
        Self { pdf, llm, settings }
    }

    /// Full pipeline for one uploaded PDF.
    pub async fn extract_resume(&self, pdf_bytes: Bytes) -> Result<ResumeData, AppError> {
        info!("Extracting text from PDF ({} bytes)", pdf_bytes.len());
        let extracted = self.pdf.extract_text(pdf_bytes).await.map_err(|e| match e {
            PdfError::Parse(msg) => AppError::UnprocessableEntity(format!("Invalid PDF: {msg}")),
            PdfError::Io(e) => AppError::Internal(e.into()),
        })?;

        if extracted.text.trim().chars().count() < self.settings.min_document_text_chars {
            return Err(AppError::UnprocessableEntity(
                "Could not extract sufficient text from PDF".to_string(),
            ));
        }
        info!(
            "Extracted {} chars from {} pages (OCR pages: {:?})",
            extracted.text.len(),
            extracted.page_count,
            extracted.ocr_pages
        );

        self.extract_from_text(&extracted.text).await
    }

    /// LLM extraction and normalization for already-extracted text.
    pub async fn extract_from_text(&self, text: &str) -> Result<ResumeData, AppError> {
        info!("Analyzing with model {}", self.llm.model());
        let raw = self.extract_with_llm(text).await?;
        info!("Validating and structuring data");
        Ok(validate_and_normalize(raw))
    }

    /// Asks the model for the résumé JSON, retrying malformed output.
    ///
    /// On the final attempt malformed output is repaired when possible and
    /// otherwise replaced with the placeholder record. LLM failures on the
    /// final attempt are returned as errors.
    pub async fn extract_with_llm(&self, text: &str) -> Result<Value, AppError> {
        let messages = [
            ChatMessage::system(JSON_ONLY_SYSTEM),
            ChatMessage::user(build_extraction_prompt(text)),
        ];
        let options = ChatOptions::default();
        let max_retries = self.settings.max_retries.max(1);

        for attempt in 1..=max_retries {
            let last = attempt == max_retries;

            let response = match self.llm.chat(&messages, &options).await {
                Ok(r) => r,
                Err(e) => {
                    warn!("Attempt {attempt} failed: {e}");
                    if last {
                        return Err(AppError::Llm(format!("Resume extraction failed: {e}")));
                    }
                    continue;
                }
            };

            let content = match response.content() {
                Ok(c) => c,
                Err(e) => {
                    warn!("Attempt {attempt} failed: {e}");
                    if last {
                        return Ok(placeholder_value());
                    }
                    continue;
                }
            };

            let json_text = clean_json_response(content);
            match parse_object(json_text) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!("Attempt {attempt} failed: JSON parsing error - {e}");
                    if last {
                        return Ok(repair_json(json_text).unwrap_or_else(|| {
                            warn!("JSON repair failed, returning placeholder record");
                            placeholder_value()
                        }));
                    }
                }
            }
        }

        Ok(placeholder_value())
    }
}

fn placeholder_value() -> Value {
    serde_json::to_value(ResumeData::placeholder()).unwrap_or_default()
}

/// Normalizes raw model output into a `ResumeData`.
///
/// - `personal_info` always exists
/// - an email without `@` is dropped
/// - experience dates meaning "current" become `"Present"`
/// - current roles sort first (stable otherwise); a role without an
///   `end_date` key is treated as current
pub fn validate_and_normalize(mut data: Value) -> ResumeData {
    if !data.is_object() {
        data = Value::Object(Map::new());
    }

    let personal = data
        .as_object_mut()
        .map(|obj| {
            obj.entry("personal_info")
                .or_insert_with(|| Value::Object(Map::new()))
        });
    if let Some(personal) = personal {
        if !personal.is_object() {
            *personal = Value::Object(Map::new());
        }
        let email_ok = personal
            .get("email")
            .and_then(Value::as_str)
            .map(|e| e.contains('@'))
            .unwrap_or(true);
        if !email_ok {
            personal["email"] = Value::Null;
        }
    }

    if let Some(Value::Array(roles)) = data.get_mut("experience") {
        // sort_by_key is stable, so non-current roles keep the model's order
        roles.sort_by_key(|role| !is_current_role(role));
    }

    let mut resume: ResumeData = serde_json::from_value(data).unwrap_or_else(|e| {
        warn!("Extracted data did not match the resume schema: {e}");
        ResumeData::placeholder()
    });

    for exp in &mut resume.experience {
        exp.start_date = normalize_date(exp.start_date.take());
        exp.end_date = normalize_date(exp.end_date.take());
    }

    resume
}

/// A role object with no `end_date` key counts as current. An explicit
/// `null` or a concrete date does not.
fn is_current_role(role: &Value) -> bool {
    match role.get("end_date") {
        None => role.is_object(),
        Some(Value::String(end)) => is_present_marker(end),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::PLACEHOLDER_NAME;
    use crate::pdf::PdfSettings;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    fn extractor(base_url: String, max_retries: u32) -> ResumeExtractor {
        ResumeExtractor::new(
            PdfTextExtractor::new(PdfSettings::default(), None),
            LlmClient::new(base_url, "mistral:7b-instruct")
                .with_retry_base(Duration::from_millis(1)),
            ExtractionSettings {
                max_retries,
                min_document_text_chars: 100,
            },
        )
    }

    fn chat_reply(content: &str) -> Value {
        json!({
            "model": "mistral:7b-instruct",
            "message": {"role": "assistant", "content": content},
            "done": true
        })
    }

    #[tokio::test]
    async fn test_extract_from_text_parses_fenced_reply() {
        let server = MockServer::start_async().await;
        let reply = "```json\n{\"personal_info\": {\"name\": \"Jane Doe\", \"email\": \"jane@x.io\"}, \
                     \"experience\": [{\"company\": \"A\", \"position\": \"Dev\", \"end_date\": \"2019\"}, \
                     {\"company\": \"B\", \"position\": \"Lead\", \"end_date\": \"now\"}]}\n```";
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/chat")
                    .body_contains("Jane Doe resume text");
                then.status(200).json_body(chat_reply(reply));
            })
            .await;

        let resume = extractor(server.base_url(), 3)
            .extract_from_text("Jane Doe resume text")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(resume.personal_info.name, "Jane Doe");
        assert_eq!(resume.experience[0].company, "B");
        assert_eq!(resume.experience[0].end_date.as_deref(), Some("Present"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_retried_then_repaired() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/chat");
                then.status(200)
                    .json_body(chat_reply("{'personal_info': {'name': 'Jane'},}"));
            })
            .await;

        let value = extractor(server.base_url(), 3)
            .extract_with_llm("text")
            .await
            .unwrap();

        mock.assert_hits_async(3).await;
        assert_eq!(value["personal_info"]["name"], "Jane");
    }

    #[tokio::test]
    async fn test_unrepairable_json_falls_back_to_placeholder() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/chat");
                then.status(200)
                    .json_body(chat_reply("{\"personal_info\": {\"name\": "));
            })
            .await;

        let resume = extractor(server.base_url(), 2)
            .extract_from_text("text")
            .await
            .unwrap();
        assert_eq!(resume.personal_info.name, PLACEHOLDER_NAME);
    }

    #[tokio::test]
    async fn test_llm_client_error_surfaces_after_last_attempt() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/chat");
                then.status(404).json_body(json!({"error": "model not found"}));
            })
            .await;

        let err = extractor(server.base_url(), 2)
            .extract_with_llm("text")
            .await
            .unwrap_err();

        mock.assert_hits_async(2).await;
        assert!(matches!(err, AppError::Llm(msg) if msg.contains("model not found")));
    }

    #[tokio::test]
    async fn test_short_document_is_rejected_before_llm() {
        let extractor = extractor("http://127.0.0.1:9".to_string(), 1);
        let err = extractor
            .extract_resume(Bytes::from_static(b"not a pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[test]
    fn test_validate_drops_invalid_email() {
        let resume = validate_and_normalize(json!({
            "personal_info": {"name": "Jane", "email": "jane at example.com"}
        }));
        assert_eq!(resume.personal_info.email, None);

        let resume = validate_and_normalize(json!({
            "personal_info": {"name": "Jane", "email": "jane@example.com"}
        }));
        assert_eq!(resume.personal_info.email.as_deref(), Some("jane@example.com"));
    }

    #[test]
    fn test_validate_creates_missing_personal_info() {
        let resume = validate_and_normalize(json!({"summary": "hi"}));
        assert_eq!(resume.personal_info.name, "");
        assert_eq!(resume.summary.as_deref(), Some("hi"));
    }

    #[test]
    fn test_validate_non_object_personal_info() {
        let resume = validate_and_normalize(json!({"personal_info": "Jane"}));
        assert_eq!(resume.personal_info.name, "");
    }

    #[test]
    fn test_validate_keeps_record_when_skills_is_a_string() {
        let resume = validate_and_normalize(json!({
            "personal_info": {"name": "Jane Doe", "email": "jane@example.com"},
            "experience": [{"company": "Acme", "position": "Engineer", "end_date": "2021"}],
            "skills": "Rust, Go, Python"
        }));
        assert_eq!(resume.personal_info.name, "Jane Doe");
        assert_eq!(resume.experience.len(), 1);
        assert_eq!(resume.skills.total(), 0);
    }

    #[test]
    fn test_validate_sorts_current_roles_first_stably() {
        let resume = validate_and_normalize(json!({
            "experience": [
                {"company": "Old", "position": "Dev", "end_date": "2018"},
                {"company": "Now", "position": "Lead", "end_date": "Current"},
                {"company": "Mid", "position": "Dev", "end_date": "2021"},
                {"company": "Open", "position": "Dev"}
            ]
        }));
        let order: Vec<_> = resume.experience.iter().map(|e| e.company.as_str()).collect();
        assert_eq!(order, vec!["Now", "Open", "Old", "Mid"]);
    }

    #[test]
    fn test_validate_missing_end_date_is_current_but_null_is_not() {
        let resume = validate_and_normalize(json!({
            "experience": [
                {"company": "Old", "position": "Dev", "end_date": "2018"},
                {"company": "Null", "position": "Dev", "end_date": null},
                {"company": "Open", "position": "Dev"}
            ]
        }));
        let order: Vec<_> = resume.experience.iter().map(|e| e.company.as_str()).collect();
        assert_eq!(order, vec!["Open", "Old", "Null"]);
        assert_eq!(resume.experience[0].end_date, None);
    }

    #[test]
    fn test_validate_non_object_input() {
        assert_eq!(validate_and_normalize(json!([1, 2])), ResumeData::default());
    }
}
