// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a complete chat stack with the mock provider and
//! a temp SQLite database. `chat()` drives the full pipeline
//! (storage -> context -> provider -> extraction) in tests.

use std::sync::Arc;
use std::time::Duration;

use tripmate_agent::{ChatPipeline, ChatReply};
use tripmate_config::model::{StorageConfig, TripmateConfig};
use tripmate_core::{ProviderAdapter, StorageAdapter, TripmateError, Turn};
use tripmate_storage::SqliteStorage;

use crate::mock_provider::MockProvider;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    responses: Vec<String>,
    config: TripmateConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            config: TripmateConfig::default(),
        }
    }

    /// Set mock provider responses.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    /// Set a custom base system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.prompt.system_prompt = Some(prompt.into());
        self
    }

    /// Bound provider calls to `timeout`.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.config.openai.timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Adjust any other config value before the stack is built.
    pub fn with_config(mut self, edit: impl FnOnce(&mut TripmateConfig)) -> Self {
        edit(&mut self.config);
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(mut self) -> Result<TestHarness, TripmateError> {
        // Create temp directory for SQLite
        let temp_dir = tempfile::TempDir::new()
            .map_err(|e| TripmateError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        self.config.storage = StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
            wal_mode: true,
        };

        let storage = SqliteStorage::new(self.config.storage.clone());
        storage.initialize().await?;
        let storage: Arc<dyn StorageAdapter + Send + Sync> = Arc::new(storage);

        let mock_provider = Arc::new(MockProvider::with_responses(self.responses));
        let provider: Arc<dyn ProviderAdapter + Send + Sync> = mock_provider.clone();

        let pipeline =
            Arc::new(ChatPipeline::from_config(&self.config, storage.clone(), provider).await);

        Ok(TestHarness {
            mock_provider,
            storage,
            pipeline,
            config: self.config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with the mock provider and temp storage.
pub struct TestHarness {
    /// The mock LLM provider.
    pub mock_provider: Arc<MockProvider>,
    /// SQLite storage adapter (temp DB, cleaned up on drop).
    pub storage: Arc<dyn StorageAdapter + Send + Sync>,
    /// The chat pipeline wired to the adapters above.
    pub pipeline: Arc<ChatPipeline>,
    /// Configuration the stack was built from.
    pub config: TripmateConfig,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Send a message through the full chat pipeline.
    pub async fn chat(&self, session_id: &str, message: &str) -> Result<ChatReply, TripmateError> {
        self.pipeline.handle(session_id, message).await
    }

    /// A session's stored turns, oldest first.
    pub async fn turns(&self, session_id: &str) -> Result<Vec<Turn>, TripmateError> {
        self.storage.list_turns(session_id, None).await
    }

    /// Add a response to the mock provider's queue.
    pub async fn add_provider_response(&self, text: impl Into<String>) {
        self.mock_provider.add_response(text).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builder_creates_working_environment() {
        let harness = TestHarness::builder().build().await.unwrap();
        assert!(harness.turns("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn chat_returns_mock_response() {
        let harness = TestHarness::builder()
            .with_mock_responses(vec!["custom response".to_string()])
            .build()
            .await
            .unwrap();

        let reply = harness.chat("sess", "hello").await.unwrap();
        assert_eq!(reply.message, "custom response");
        assert_eq!(reply.session_id, "sess");
    }

    #[tokio::test]
    async fn chat_persists_both_turns() {
        let harness = TestHarness::builder()
            .with_mock_responses(vec!["stored response".to_string()])
            .build()
            .await
            .unwrap();

        harness.chat("sess", "hello world").await.unwrap();
        let turns = harness.turns("sess").await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].content, "hello world");
        assert_eq!(turns[1].content, "stored response");
    }

    #[tokio::test]
    async fn custom_system_prompt_reaches_the_provider() {
        let harness = TestHarness::builder()
            .with_system_prompt("You are a test assistant.")
            .build()
            .await
            .unwrap();

        harness.chat("sess", "hi").await.unwrap();
        let request = harness.mock_provider.last_request().await.unwrap();
        assert_eq!(request.system_prompt, "You are a test assistant.");
    }
}
