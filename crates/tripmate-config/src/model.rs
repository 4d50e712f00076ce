// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the TripMate backend.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Every config section with the keys it accepts, in declaration order.
///
/// Drives env-var mapping and the section-aware hints in config diagnostics.
pub const SECTION_KEYS: &[(&str, &[&str])] = &[
    ("agent", &["name", "log_level"]),
    (
        "openai",
        &[
            "api_key",
            "base_url",
            "default_model",
            "max_tokens",
            "temperature",
            "timeout_secs",
        ],
    ),
    ("storage", &["database_path", "wal_mode"]),
    ("gateway", &["host", "port", "cors_origins"]),
    (
        "auth",
        &["token_secret", "token_ttl_days", "cookie_name", "secure_cookie"],
    ),
    (
        "chat",
        &["history_limit", "follow_up_window", "recent_history_turns"],
    ),
    (
        "prompt",
        &[
            "system_prompt",
            "system_prompt_file",
            "follow_up_template_file",
            "plain_template_file",
        ],
    ),
];

/// The section that declares `key`, if any.
pub fn owning_section(key: &str) -> Option<&'static str> {
    SECTION_KEYS
        .iter()
        .find(|(_, keys)| keys.contains(&key))
        .map(|(section, _)| *section)
}

/// Top-level TripMate configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TripmateConfig {
    /// Service identity and log level.
    #[serde(default)]
    pub agent: AgentConfig,

    /// OpenAI chat-completions settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP listener settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Session token settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Chat pipeline tuning.
    #[serde(default)]
    pub chat: ChatConfig,

    /// Prompt template overrides.
    #[serde(default)]
    pub prompt: PromptConfig,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name used in the API banner and logs.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "TripMate".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// OpenAI API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// OpenAI API key. `None` falls back to the `OPENAI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the chat-completions API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for every chat request.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound on a single provider call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            default_model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_max_tokens() -> u32 {
    4000
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    60
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("tripmate").join("tripmate.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("tripmate.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Address to bind the HTTP listener to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind the HTTP listener to.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins. A `*` entry allows any origin.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8001
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

/// Session token configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// HMAC secret for signing session tokens. `None` generates a
    /// per-process secret, so tokens do not survive a restart.
    #[serde(default)]
    pub token_secret: Option<String>,

    /// Lifetime of an issued session token, in days.
    #[serde(default = "default_token_ttl_days")]
    pub token_ttl_days: i64,

    /// Name of the session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Mark the session cookie `Secure; SameSite=None`.
    #[serde(default = "default_secure_cookie")]
    pub secure_cookie: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: None,
            token_ttl_days: default_token_ttl_days(),
            cookie_name: default_cookie_name(),
            secure_cookie: default_secure_cookie(),
        }
    }
}

fn default_token_ttl_days() -> i64 {
    7
}

fn default_cookie_name() -> String {
    "session_token".to_string()
}

fn default_secure_cookie() -> bool {
    true
}

/// Chat pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Maximum number of stored turns loaded per chat request.
    #[serde(default = "default_history_limit")]
    pub history_limit: i64,

    /// Number of trailing turns scanned for follow-up keywords.
    #[serde(default = "default_follow_up_window")]
    pub follow_up_window: usize,

    /// Number of trailing turns rendered into the composed prompt.
    #[serde(default = "default_recent_history_turns")]
    pub recent_history_turns: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            follow_up_window: default_follow_up_window(),
            recent_history_turns: default_recent_history_turns(),
        }
    }
}

fn default_history_limit() -> i64 {
    100
}

fn default_follow_up_window() -> usize {
    5
}

fn default_recent_history_turns() -> usize {
    6
}

/// Prompt template configuration.
///
/// Every template has a compiled-in default; these settings only override it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PromptConfig {
    /// Inline base system prompt. Overridden by `system_prompt_file` if both set.
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Path to a markdown file containing the base system prompt.
    #[serde(default)]
    pub system_prompt_file: Option<String>,

    /// Path to the follow-up template (`{origin}`, `{destination}`, `{history}`, `{message}`).
    #[serde(default)]
    pub follow_up_template_file: Option<String>,

    /// Path to the plain template (`{history}`, `{message}`).
    #[serde(default)]
    pub plain_template_file: Option<String>,
}
