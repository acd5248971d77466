/// LLM Client — the single point of entry for all language-model calls.
///
/// Talks to a locally hosted Ollama server over its HTTP API. No other module
/// may call the model directly.
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod prompts;

const MAX_TRANSPORT_RETRIES: u32 = 3;
const DEFAULT_RETRY_BASE: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model '{0}' is not available on the server")]
    ModelUnavailable(String),

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Sampling options sent with every chat call.
#[derive(Debug, Clone, Serialize)]
pub struct ChatOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub num_predict: u32,
}

impl Default for ChatOptions {
    /// Low temperature for consistent structured output; enough tokens for a full résumé.
    fn default() -> Self {
        Self {
            temperature: 0.1,
            top_p: 0.9,
            num_predict: 4096,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    format: &'a str,
    options: &'a ChatOptions,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub model: String,
    pub message: ChatMessage,
    #[serde(default)]
    pub prompt_eval_count: u32,
    #[serde(default)]
    pub eval_count: u32,
}

impl ChatResponse {
    /// The assistant's text, or `EmptyContent` when blank.
    pub fn content(&self) -> Result<&str, LlmError> {
        let text = self.message.content.trim();
        if text.is_empty() {
            Err(LlmError::EmptyContent)
        } else {
            Ok(text)
        }
    }
}

#[derive(Debug, Serialize)]
struct ModelRequest<'a> {
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct OllamaError {
    error: String,
}

/// Ollama chat client with transport-level retries.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
    model: String,
    retry_base: Duration,
}

impl LlmClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(300))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            retry_base: DEFAULT_RETRY_BASE,
        }
    }

    /// Sets the first backoff delay; later retries double it.
    pub fn with_retry_base(mut self, retry_base: Duration) -> Self {
        self.retry_base = retry_base;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a non-streaming chat request in JSON mode.
    /// Retries on transport errors, 429 and 5xx with exponential backoff.
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
            format: "json",
            options,
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_TRANSPORT_RETRIES {
            if attempt > 0 {
                // Exponential backoff: base, 2 * base
                let delay = self.retry_base * (1u32 << (attempt - 1));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(self.url("/api/chat"))
                .json(&request_body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(api_error(status, body));
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(api_error(status, body));
            }

            let chat: ChatResponse = response.json().await?;

            debug!(
                "LLM call succeeded: model={}, prompt_tokens={}, output_tokens={}",
                chat.model, chat.prompt_eval_count, chat.eval_count
            );

            return Ok(chat);
        }

        Err(last_error.unwrap_or(LlmError::Api {
            status: 0,
            message: format!("no response after {MAX_TRANSPORT_RETRIES} attempts"),
        }))
    }

    /// Confirms the model exists on the server, pulling it when it does not.
    pub async fn ensure_model_available(&self) -> Result<(), LlmError> {
        let show = self
            .client
            .post(self.url("/api/show"))
            .json(&ModelRequest {
                model: &self.model,
                stream: None,
            })
            .send()
            .await?;

        if show.status().is_success() {
            debug!("Model {} is available", self.model);
            return Ok(());
        }
        if show.status() != StatusCode::NOT_FOUND {
            let status = show.status();
            let body = show.text().await.unwrap_or_default();
            return Err(api_error(status, body));
        }

        info!("Pulling model {}... This may take a few minutes.", self.model);
        let pull = self
            .client
            .post(self.url("/api/pull"))
            .timeout(Duration::from_secs(3600))
            .json(&ModelRequest {
                model: &self.model,
                stream: Some(false),
            })
            .send()
            .await?;

        if pull.status().is_success() {
            info!("Model {} pulled", self.model);
            Ok(())
        } else {
            let body = pull.text().await.unwrap_or_default();
            warn!("Pulling model {} failed: {}", self.model, body);
            Err(LlmError::ModelUnavailable(self.model.clone()))
        }
    }
}

fn api_error(status: StatusCode, body: String) -> LlmError {
    let message = serde_json::from_str::<OllamaError>(&body)
        .map(|e| e.error)
        .unwrap_or(body);
    LlmError::Api {
        status: status.as_u16(),
        message,
    }
}
