// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The chat pipeline: one user message in, one assistant reply out.
//!
//! Order of effects for a request:
//! 1. append the user turn
//! 2. read the recent history back (ascending)
//! 3. recover the trip context from every turn but the new one
//! 4. compose the system instruction
//! 5. call the provider, bounded by a timeout
//! 6. append the assistant turn (success only)
//! 7. extract trip data from the reply
//!
//! A failed provider call leaves exactly the user turn stored.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};
use tripmate_config::model::TripmateConfig;
use tripmate_context::{extract, ContextTracker, PromptComposer, PromptSet};
use tripmate_core::types::{NewTurn, ProviderMessage, ProviderRequest, TripPayload, Turn};
use tripmate_core::{ProviderAdapter, StorageAdapter, TripmateError};

/// Maximum turns returned when reading a session's history back.
pub const HISTORY_READ_LIMIT: i64 = 1000;

/// Outcome of one chat request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub session_id: String,
    /// Raw assistant reply text.
    pub message: String,
    /// Trip payload extracted from the reply, `null` when none was found.
    pub trip_data: Option<TripPayload>,
}

/// Provider call parameters and history bounds for the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Newest turns loaded per request.
    pub history_limit: i64,
    /// Upper bound on one provider call.
    pub call_timeout: Duration,
}

impl ChatSettings {
    pub fn from_config(config: &TripmateConfig) -> Self {
        Self {
            model: config.openai.default_model.clone(),
            max_tokens: config.openai.max_tokens,
            temperature: config.openai.temperature,
            history_limit: config.chat.history_limit,
            call_timeout: Duration::from_secs(config.openai.timeout_secs),
        }
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self::from_config(&TripmateConfig::default())
    }
}

/// Orchestrates storage, context recovery, prompt composition and the
/// provider for chat requests. Cheap to share behind an `Arc`; holds no
/// per-session state.
pub struct ChatPipeline {
    storage: Arc<dyn StorageAdapter + Send + Sync>,
    provider: Arc<dyn ProviderAdapter + Send + Sync>,
    composer: PromptComposer,
    tracker: ContextTracker,
    settings: ChatSettings,
}

impl ChatPipeline {
    pub fn new(
        storage: Arc<dyn StorageAdapter + Send + Sync>,
        provider: Arc<dyn ProviderAdapter + Send + Sync>,
        composer: PromptComposer,
        tracker: ContextTracker,
        settings: ChatSettings,
    ) -> Self {
        Self {
            storage,
            provider,
            composer,
            tracker,
            settings,
        }
    }

    /// Builds a pipeline from config, loading prompt templates from disk
    /// where configured.
    pub async fn from_config(
        config: &TripmateConfig,
        storage: Arc<dyn StorageAdapter + Send + Sync>,
        provider: Arc<dyn ProviderAdapter + Send + Sync>,
    ) -> Self {
        let prompts = PromptSet::load(&config.prompt).await;
        Self::new(
            storage,
            provider,
            PromptComposer::new(prompts, config.chat.recent_history_turns),
            ContextTracker::new(config.chat.follow_up_window),
            ChatSettings::from_config(config),
        )
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Handles one chat message for `session_id`.
    pub async fn handle(
        &self,
        session_id: &str,
        message: &str,
    ) -> Result<ChatReply, TripmateError> {
        if session_id.trim().is_empty() {
            return Err(TripmateError::InvalidInput(
                "session_id must not be empty".into(),
            ));
        }
        if message.trim().is_empty() {
            return Err(TripmateError::InvalidInput("message must not be empty".into()));
        }

        let user_turn = self
            .storage
            .append_turn(NewTurn::user(session_id, message))
            .await?;

        let mut turns = self
            .storage
            .list_recent_turns(session_id, self.settings.history_limit)
            .await?;
        // A concurrent append on the same session can land after ours; the
        // new message must still close the conversation sent upstream.
        if turns.last().map(|t| t.id.as_str()) != Some(user_turn.id.as_str()) {
            warn!(session_id, "history read did not end with the new user turn");
            turns.retain(|t| t.id != user_turn.id);
            turns.push(user_turn.clone());
        }

        let prior = &turns[..turns.len() - 1];
        let context = self.tracker.recover(&turns, true);
        debug!(
            session_id,
            origin = context.origin.as_deref().unwrap_or("-"),
            destination = context.destination.as_deref().unwrap_or("-"),
            follow_up = context.is_follow_up,
            "trip context recovered"
        );

        let base = self.composer.prompts().system_prompt(today());
        let system_prompt = self.composer.compose(&base, &context, prior, message);

        let request = ProviderRequest {
            model: self.settings.model.clone(),
            system_prompt,
            messages: turns.iter().map(ProviderMessage::from).collect(),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        let timeout = self.settings.call_timeout;
        let response = match tokio::time::timeout(timeout, self.provider.complete(request)).await
        {
            Ok(result) => result?,
            Err(_) => {
                warn!(session_id, timeout_secs = timeout.as_secs(), "provider call timed out");
                return Err(TripmateError::Timeout { duration: timeout });
            }
        };

        self.storage
            .append_turn(NewTurn::assistant(session_id, response.content.clone()))
            .await?;

        let trip_data = extract(&response.content);
        info!(
            session_id,
            model = response.model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            trip_data = trip_data.is_some(),
            "chat reply produced"
        );

        Ok(ChatReply {
            session_id: session_id.to_string(),
            message: response.content,
            trip_data,
        })
    }

    /// Returns a session's stored turns in conversation order.
    pub async fn history(&self, session_id: &str) -> Result<Vec<Turn>, TripmateError> {
        self.storage
            .list_turns(session_id, Some(HISTORY_READ_LIMIT))
            .await
    }
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
