//! LLM completion abstraction.
//!
//! Handlers build a prompt (optionally with image URLs and a JSON response
//! schema) and hand it to whichever provider was constructed at startup.

pub mod gemini;
pub mod mock;

pub use gemini::{GeminiConfig, GeminiProvider};
pub use mock::MockLlmProvider;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use service_core::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Unexpected response shape: {0}")]
    MalformedResponse(String),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    pub prompt: String,
    /// Publicly reachable images to attach (meal photos).
    pub image_urls: Vec<String>,
    /// JSON schema constraining the response; `None` means free text.
    pub response_schema: Option<serde_json::Value>,
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn structured(prompt: impl Into<String>, schema: serde_json::Value) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: Some(schema),
            ..Self::default()
        }
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_urls.push(url.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub input_tokens: i32,
    pub output_tokens: i32,
}

impl Completion {
    /// Parse the completion as JSON, tolerating a surrounding markdown fence.
    pub fn parse_json<T: DeserializeOwned>(&self) -> Result<T, LlmError> {
        serde_json::from_str(strip_code_fence(&self.text))
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an info string such as `json` on the opening fence.
    let body = body.split_once('\n').map(|(_, rest)| rest).unwrap_or(body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError>;

    async fn health_check(&self) -> Result<(), LlmError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completion(text: &str) -> Completion {
        Completion {
            text: text.to_string(),
            input_tokens: 0,
            output_tokens: 0,
        }
    }

    #[test]
    fn parses_bare_json() {
        let ids: Vec<String> = completion(r#"["a","b"]"#).parse_json().unwrap();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn parses_fenced_json() {
        let ids: Vec<String> = completion("```json\n[\"a\"]\n```").parse_json().unwrap();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn prose_is_a_malformed_response() {
        let result: Result<Vec<String>, _> = completion("I found two documents").parse_json();
        assert!(matches!(result, Err(LlmError::MalformedResponse(_))));
    }
}
