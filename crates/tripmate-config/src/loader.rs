// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./tripmate.toml` > `~/.config/tripmate/tripmate.toml` > `/etc/tripmate/tripmate.toml`
//! with environment variable overrides via `TRIPMATE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::{SECTION_KEYS, TripmateConfig};

const ENV_PREFIX: &str = "TRIPMATE_";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tripmate/tripmate.toml` (system-wide)
/// 3. `~/.config/tripmate/tripmate.toml` (user XDG config)
/// 4. `./tripmate.toml` (local directory)
/// 5. `TRIPMATE_*` environment variables
pub fn load_config() -> Result<TripmateConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from an in-memory TOML string (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<TripmateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TripmateConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TripmateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TripmateConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Config files in merge order, lowest precedence first.
pub fn config_file_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/tripmate/tripmate.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("tripmate/tripmate.toml"));
    }
    paths.push(PathBuf::from("tripmate.toml"));
    paths
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    let figment = Figment::new().merge(Serialized::defaults(TripmateConfig::default()));
    config_file_paths()
        .into_iter()
        .fold(figment, |figment, path| figment.merge(Toml::file(path)))
        .merge(env_provider())
}

/// The environment variable that overrides a dotted config path,
/// e.g. `openai.api_key` -> `TRIPMATE_OPENAI_API_KEY`.
pub fn env_var_for(path: &str) -> String {
    format!("{ENV_PREFIX}{}", path.replace('.', "_").to_ascii_uppercase())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// CRITICAL: Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `TRIPMATE_OPENAI_API_KEY` must
/// map to `openai.api_key`, not `openai.api.key`.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: TRIPMATE_GATEWAY_PORT -> "gateway_port"
        map_env_key(key.as_str()).into()
    })
}

/// Map a prefix-stripped env key onto its dotted config path.
///
/// Only the first underscore after a known section name becomes a dot; keys
/// outside a known section pass through unchanged (and are rejected later by
/// `deny_unknown_fields`).
fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for (section, _) in SECTION_KEYS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key
}
