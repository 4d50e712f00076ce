// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the TripMate backend.
//!
//! Seven sections (`agent`, `openai`, `storage`, `gateway`, `auth`, `chat`,
//! `prompt`) are layered from compiled defaults, the system, user and local
//! `tripmate.toml` files, then `TRIPMATE_*` variables. Unknown keys are
//! rejected and reported against the section that should hold them.
//!
//! # Usage
//!
//! ```no_run
//! use tripmate_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Listening on {}:{}", config.gateway.host, config.gateway.port);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{SECTION_KEYS, TripmateConfig};

/// Load configuration from the XDG hierarchy and validate it.
///
/// This is the high-level entry point that:
/// 1. Loads config from TOML files + env vars via Figment
/// 2. On success: runs post-deserialization validation
/// 3. On Figment error: converts to rich miette diagnostics with typo suggestions
///
/// Returns either a valid `TripmateConfig` or a list of diagnostic errors.
pub fn load_and_validate() -> Result<TripmateConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            // Read TOML source files for error source span information
            let toml_sources = collect_toml_sources();
            Err(diagnostic::figment_to_config_errors(err, &toml_sources))
        }
    }
}

/// Load configuration from a specific TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<TripmateConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Read every config file that exists, keyed by the path figment reports
/// for it, so diagnostics can point into the offending file.
fn collect_toml_sources() -> Vec<(String, String)> {
    let cwd = std::env::current_dir().ok();
    loader::config_file_paths()
        .into_iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(&path).ok()?;
            let shown = match &cwd {
                Some(cwd) if path.is_relative() => cwd.join(&path),
                _ => path,
            };
            Some((shown.display().to_string(), content))
        })
        .collect()
}
