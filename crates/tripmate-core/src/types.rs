// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the TripMate backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

impl HealthStatus {
    /// Short label used in health endpoint bodies.
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded(_) => "degraded",
            HealthStatus::Unhealthy(_) => "unhealthy",
        }
    }
}

/// Identifies the kind of an adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
}

// --- Conversation types ---

/// Author of a conversation turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One stored message of a conversation. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Store-assigned identifier (UUID v4).
    pub id: String,
    /// Conversation this turn belongs to.
    pub session_id: String,
    /// Who wrote the turn.
    pub role: Role,
    /// Raw message text, opaque to the store.
    pub content: String,
    /// Store-assigned RFC 3339 UTC timestamp with millisecond precision.
    pub timestamp: String,
}

/// A turn that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTurn {
    pub session_id: String,
    pub role: Role,
    pub content: String,
}

impl NewTurn {
    pub fn user(session_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(session_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Structured trip data carried by an assistant reply.
///
/// The map is open-ended; only `from`, `to` and `duration` have meaning to the
/// backend. Serializes transparently as the underlying JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripPayload(Map<String, Value>);

impl TripPayload {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// The trip origin, when present as a non-blank string.
    pub fn origin(&self) -> Option<&str> {
        self.text_field("from")
    }

    /// The trip destination, when present as a non-blank string.
    pub fn destination(&self) -> Option<&str> {
        self.text_field("to")
    }

    /// The trip duration, when present as a non-blank string.
    pub fn duration(&self) -> Option<&str> {
        self.text_field("duration")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    fn text_field(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }
}

impl From<Map<String, Value>> for TripPayload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Format of every stored timestamp: RFC 3339 UTC with milliseconds.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Current UTC time as a record timestamp.
pub fn now_timestamp() -> String {
    chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

// --- Persisted trip records ---

/// A trip plan saved against a chat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub id: String,
    pub session_id: String,
    pub from_location: String,
    pub to_location: String,
    pub duration: String,
    pub routes: Vec<Value>,
    pub trip_data: TripPayload,
    pub created_at: String,
}

/// A trip published under a short share code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedTrip {
    pub share_id: String,
    pub trip_data: TripPayload,
    pub created_at: String,
}

/// A trip saved to a signed-in user's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTrip {
    pub trip_id: String,
    pub user_id: String,
    pub trip_data: TripPayload,
    pub from_location: String,
    pub to_location: String,
    pub duration: String,
    pub created_at: String,
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    /// Always stored lower-cased.
    pub email: String,
    pub name: String,
    /// PHC-format password hash; `None` for accounts created by another provider.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub picture: Option<String>,
    pub auth_provider: String,
    pub created_at: String,
}

// --- Provider types ---

/// A single role/content message sent to an LLM provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMessage {
    pub role: String,
    pub content: String,
}

impl From<&Turn> for ProviderMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role.to_string(),
            content: turn.content.clone(),
        }
    }
}

/// A request to an LLM provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub model: String,
    /// Composed system instruction.
    pub system_prompt: String,
    /// Conversation so far, oldest first, ending with the newest user turn.
    pub messages: Vec<ProviderMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Token usage reported by a provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A single text completion from an LLM provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub id: String,
    pub content: String,
    pub model: String,
    pub usage: TokenUsage,
}
