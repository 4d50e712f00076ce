// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tripmate config` command implementation.

use tripmate_config::TripmateConfig;
use tripmate_core::TripmateError;

const REDACTED: &str = "[redacted]";

/// Secrets replaced before printing, as `(section, key)`.
const SECRET_KEYS: &[(&str, &str)] = &[("openai", "api_key"), ("auth", "token_secret")];

/// Renders the effective configuration as TOML with secrets masked.
pub fn render(config: &TripmateConfig) -> Result<String, TripmateError> {
    let mut value = toml::Value::try_from(config)
        .map_err(|e| TripmateError::Internal(format!("failed to serialize config: {e}")))?;

    for (section, key) in SECRET_KEYS {
        if let Some(table) = value.get_mut(*section).and_then(|s| s.as_table_mut())
            && table.contains_key(*key)
        {
            table.insert((*key).to_string(), toml::Value::String(REDACTED.to_string()));
        }
    }

    toml::to_string_pretty(&value)
        .map_err(|e| TripmateError::Internal(format!("failed to render config: {e}")))
}
