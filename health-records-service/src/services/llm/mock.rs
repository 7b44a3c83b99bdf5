//! Mock provider for tests and offline development.

use super::{Completion, CompletionRequest, LlmError, LlmProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

enum Reply {
    Fixed(String),
    Failing(String),
    /// Empty value of whatever shape the request's schema asks for.
    Shaped,
}

/// Returns a canned reply and records every request it receives.
pub struct MockLlmProvider {
    reply: Reply,
    call_count: AtomicU64,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockLlmProvider {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: Reply::Fixed(reply.into()),
            call_count: AtomicU64::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every completion fails with an API error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Reply::Failing(message.into()),
            call_count: AtomicU64::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Offline development: structured requests get an empty array or object
    /// matching their schema, free-text requests a fixed sentence.
    pub fn offline() -> Self {
        Self {
            reply: Reply::Shaped,
            call_count: AtomicU64::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl Default for MockLlmProvider {
    fn default() -> Self {
        Self::new("Mock response")
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        tracing::debug!(
            prompt_len = request.prompt.len(),
            "[MOCK] Completion requested"
        );

        let text = match &self.reply {
            Reply::Fixed(text) => text.clone(),
            Reply::Failing(message) => return Err(LlmError::ApiError(message.clone())),
            Reply::Shaped => shaped_reply(request).to_string(),
        };

        Ok(Completion {
            input_tokens: request.prompt.len() as i32 / 4,
            output_tokens: text.len() as i32 / 4,
            text,
        })
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        Ok(())
    }
}

fn shaped_reply(request: &CompletionRequest) -> &'static str {
    let schema_type = request
        .response_schema
        .as_ref()
        .and_then(|schema| schema.get("type"))
        .and_then(|t| t.as_str());

    match schema_type {
        Some("ARRAY") => "[]",
        Some(_) => "{}",
        None => "Mock response",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn records_requests_and_counts_calls() {
        let provider = MockLlmProvider::new("[]");

        let completion = provider
            .complete(&CompletionRequest::text("find my labs"))
            .await
            .unwrap();

        assert_eq!(completion.text, "[]");
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.requests()[0].prompt, "find my labs");
    }

    #[tokio::test]
    async fn failing_provider_still_counts_calls() {
        let provider = MockLlmProvider::failing("upstream down");

        let result = provider.complete(&CompletionRequest::text("q")).await;

        assert!(matches!(result, Err(LlmError::ApiError(_))));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn offline_replies_match_the_requested_shape() {
        let provider = MockLlmProvider::offline();

        let meal = provider
            .complete(&CompletionRequest::structured(
                "meal",
                crate::dtos::MealAnalysis::response_schema(),
            ))
            .await
            .unwrap();
        let search = provider
            .complete(&CompletionRequest::structured("search", json!({ "type": "ARRAY" })))
            .await
            .unwrap();
        let answer = provider
            .complete(&CompletionRequest::text("question"))
            .await
            .unwrap();

        assert_eq!(
            meal.parse_json::<crate::dtos::MealAnalysis>().unwrap(),
            crate::dtos::MealAnalysis::default()
        );
        assert!(search.parse_json::<Vec<String>>().unwrap().is_empty());
        assert_eq!(answer.text, "Mock response");
    }
}
