// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock LLM provider adapter for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with scripted replies,
//! enabling fast, CI-runnable tests without external API calls. Every
//! request it receives is recorded for later assertions.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tripmate_core::traits::adapter::PluginAdapter;
use tripmate_core::traits::provider::ProviderAdapter;
use tripmate_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage,
};
use tripmate_core::TripmateError;

/// One scripted outcome of a `complete` call.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Reply with this text.
    Text(String),
    /// Fail with a provider error carrying this message.
    Fail(String),
    /// Reply with this text after sleeping.
    Delayed(Duration, String),
}

/// A mock LLM provider that returns scripted replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty,
/// a default "mock response" text is returned.
pub struct MockProvider {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with an empty reply queue.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock provider pre-loaded with the given text replies.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(
                responses.into_iter().map(MockReply::Text).collect(),
            )),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a text reply to the end of the queue.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.push(MockReply::Text(text.into())).await;
    }

    /// Make a later call fail with a provider error.
    pub async fn add_failure(&self, message: impl Into<String>) {
        self.push(MockReply::Fail(message.into())).await;
    }

    /// Add a scripted outcome to the end of the queue.
    pub async fn push(&self, reply: MockReply) {
        self.replies.lock().await.push_back(reply);
    }

    /// All requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }

    /// The most recent request, if any.
    pub async fn last_request(&self) -> Option<ProviderRequest> {
        self.requests.lock().await.last().cloned()
    }

    async fn next_reply(&self) -> MockReply {
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| MockReply::Text("mock response".to_string()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, TripmateError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TripmateError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, TripmateError> {
        let model = request.model.clone();
        self.requests.lock().await.push(request);

        let text = match self.next_reply().await {
            MockReply::Text(text) => text,
            MockReply::Fail(message) => {
                return Err(TripmateError::Provider {
                    message,
                    source: None,
                });
            }
            MockReply::Delayed(delay, text) => {
                tokio::time::sleep(delay).await;
                text
            }
        };

        Ok(ProviderResponse {
            id: format!("mock-resp-{}", uuid::Uuid::new_v4()),
            content: text,
            model,
            usage: TokenUsage {
                input_tokens: 10,
                output_tokens: 20,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req() -> ProviderRequest {
        ProviderRequest {
            model: "test-model".to_string(),
            system_prompt: "You are a test assistant.".to_string(),
            messages: vec![],
            max_tokens: 100,
            temperature: 0.7,
        }
    }

    #[tokio::test]
    async fn default_response_when_queue_empty() {
        let provider = MockProvider::new();
        let resp = provider.complete(req()).await.unwrap();
        assert_eq!(resp.content, "mock response");
    }

    #[tokio::test]
    async fn queued_responses_returned_in_order() {
        let provider = MockProvider::with_responses(vec![
            "first".to_string(),
            "second".to_string(),
            "third".to_string(),
        ]);

        assert_eq!(provider.complete(req()).await.unwrap().content, "first");
        assert_eq!(provider.complete(req()).await.unwrap().content, "second");
        assert_eq!(provider.complete(req()).await.unwrap().content, "third");
        // Queue exhausted, falls back to default
        assert_eq!(
            provider.complete(req()).await.unwrap().content,
            "mock response"
        );
    }

    #[tokio::test]
    async fn failure_is_a_provider_error() {
        let provider = MockProvider::new();
        provider.add_failure("upstream 500").await;
        let err = provider.complete(req()).await.unwrap_err();
        assert!(matches!(err, TripmateError::Provider { .. }));
        assert!(err.to_string().contains("upstream 500"));
        // The next call succeeds again.
        assert!(provider.complete(req()).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_reply_waits() {
        let provider = MockProvider::new();
        provider
            .push(MockReply::Delayed(Duration::from_secs(30), "late".into()))
            .await;
        let started = tokio::time::Instant::now();
        let resp = provider.complete(req()).await.unwrap();
        assert_eq!(resp.content, "late");
        assert!(started.elapsed() >= Duration::from_secs(30));
    }

    #[tokio::test]
    async fn requests_are_recorded() {
        let provider = MockProvider::new();
        provider.add_response("dynamic response").await;
        provider.complete(req()).await.unwrap();

        let seen = provider.requests().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].system_prompt, "You are a test assistant.");
        assert_eq!(provider.last_request().await.unwrap().model, "test-model");
    }
}
