use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub ollama_pull_on_start: bool,
    pub llm_max_retries: u32,
    pub ocr_enabled: bool,
    pub ocr_dpi: u32,
    pub ocr_lang: String,
    pub min_page_text_chars: usize,
    pub min_document_text_chars: usize,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
            ollama_url: env_or("OLLAMA_URL", "http://localhost:11434"),
            ollama_model: env_or("OLLAMA_MODEL", "mistral:7b-instruct"),
            ollama_pull_on_start: parse_env("OLLAMA_PULL_ON_START", true)?,
            llm_max_retries: parse_env("LLM_MAX_RETRIES", 3)?,
            ocr_enabled: parse_env("OCR_ENABLED", true)?,
            ocr_dpi: parse_env("OCR_DPI", 144)?,
            ocr_lang: env_or("OCR_LANG", "eng"),
            min_page_text_chars: parse_env("MIN_PAGE_TEXT_CHARS", 50)?,
            min_document_text_chars: parse_env("MIN_DOCUMENT_TEXT_CHARS", 100)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "mistral:7b-instruct".to_string(),
            ollama_pull_on_start: true,
            llm_max_retries: 3,
            ocr_enabled: true,
            ocr_dpi: 144,
            ocr_lang: "eng".to_string(),
            min_page_text_chars: 50,
            min_document_text_chars: 100,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("Environment variable '{key}' has an invalid value: '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_accepts_numbers_and_bools() {
        assert_eq!(parse_value::<u16>("PORT", "9000").unwrap(), 9000);
        assert!(parse_value::<bool>("OCR_ENABLED", " true ").unwrap());
    }

    #[test]
    fn test_parse_value_rejects_garbage_with_key_in_message() {
        let err = parse_value::<u16>("PORT", "eighty").unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_default_matches_documented_values() {
        let config = Config::default();
        assert_eq!(config.ollama_model, "mistral:7b-instruct");
        assert_eq!(config.llm_max_retries, 3);
        assert_eq!(config.min_page_text_chars, 50);
        assert_eq!(config.min_document_text_chars, 100);
    }
}
