// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as valid bind addresses, non-empty paths, and positive limits.

use crate::diagnostic::ConfigError;
use crate::model::TripmateConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Upper bound on session token lifetime (ten years).
pub const MAX_TOKEN_TTL_DAYS: i64 = 3650;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TripmateConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        fail(format!(
            "agent.log_level `{}` must be one of: {}",
            config.agent.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    // Host must look like an IP address or hostname
    let host = config.gateway.host.trim();
    if host.is_empty() {
        fail("gateway.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "gateway.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.gateway.port == 0 {
        fail("gateway.port must not be 0".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if !config.openai.base_url.starts_with("http://")
        && !config.openai.base_url.starts_with("https://")
    {
        fail(format!(
            "openai.base_url `{}` must start with http:// or https://",
            config.openai.base_url
        ));
    }

    if config.openai.timeout_secs == 0 {
        fail("openai.timeout_secs must be at least 1".to_string());
    }

    if !(0.0..=2.0).contains(&config.openai.temperature) {
        fail(format!(
            "openai.temperature must be between 0.0 and 2.0, got {}",
            config.openai.temperature
        ));
    }

    if !(1..=MAX_TOKEN_TTL_DAYS).contains(&config.auth.token_ttl_days) {
        fail(format!(
            "auth.token_ttl_days must be between 1 and {MAX_TOKEN_TTL_DAYS}, got {}",
            config.auth.token_ttl_days
        ));
    }

    if let Some(secret) = &config.auth.token_secret
        && secret.len() < 16
    {
        fail("auth.token_secret must be at least 16 characters".to_string());
    }

    if config.chat.history_limit < 1 {
        fail(format!(
            "chat.history_limit must be at least 1, got {}",
            config.chat.history_limit
        ));
    }

    if config.chat.follow_up_window == 0 {
        fail("chat.follow_up_window must be at least 1".to_string());
    }

    let prompt = &config.prompt;
    let templates = [
        ("system_prompt_file", &prompt.system_prompt_file),
        ("follow_up_template_file", &prompt.follow_up_template_file),
        ("plain_template_file", &prompt.plain_template_file),
    ];
    for (key, path) in templates {
        if let Some(path) = path
            && let Some(reason) = template_problem(path)
        {
            errors.push(ConfigError::PromptTemplate {
                key: key.to_string(),
                path: path.clone(),
                reason,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Why a configured template path is unusable, if it is.
fn template_problem(path: &str) -> Option<String> {
    if path.trim().is_empty() {
        return Some("path is empty".to_string());
    }
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => None,
        Ok(_) => Some("not a regular file".to_string()),
        Err(e) => Some(e.to_string()),
    }
}
