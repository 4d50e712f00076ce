// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt templates: the base system prompt and the two history templates.
//!
//! Defaults are compiled in from `prompts/*.md`; config may point at files
//! that replace them. Placeholders use `{name}` syntax and are substituted in
//! a single pass, so text inserted for one placeholder is never rescanned.

use chrono::{Days, NaiveDate};
use tracing::{info, warn};
use tripmate_config::model::PromptConfig;

const DEFAULT_SYSTEM_PROMPT: &str = include_str!("../prompts/system.md");
const DEFAULT_FOLLOW_UP_TEMPLATE: &str = include_str!("../prompts/follow_up.md");
const DEFAULT_PLAIN_TEMPLATE: &str = include_str!("../prompts/plain.md");

/// Loaded prompt templates.
#[derive(Debug, Clone)]
pub struct PromptSet {
    system: String,
    follow_up: String,
    plain: String,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            system: DEFAULT_SYSTEM_PROMPT.trim().to_string(),
            follow_up: DEFAULT_FOLLOW_UP_TEMPLATE.trim().to_string(),
            plain: DEFAULT_PLAIN_TEMPLATE.trim().to_string(),
        }
    }
}

impl PromptSet {
    /// Load templates from config.
    ///
    /// # Priority
    /// 1. `*_file` paths -- read from disk
    /// 2. `system_prompt` inline string (base prompt only)
    /// 3. compiled-in defaults
    ///
    /// Unreadable or empty files fall back with a warning.
    pub async fn load(config: &PromptConfig) -> Self {
        let defaults = Self::default();

        let system = match read_template(config.system_prompt_file.as_deref()).await {
            Some(text) => text,
            None => match &config.system_prompt {
                Some(inline) if !inline.trim().is_empty() => inline.trim().to_string(),
                _ => defaults.system,
            },
        };
        let follow_up = read_template(config.follow_up_template_file.as_deref())
            .await
            .unwrap_or(defaults.follow_up);
        let plain = read_template(config.plain_template_file.as_deref())
            .await
            .unwrap_or(defaults.plain);

        for (name, template, required) in [
            ("follow_up", &follow_up, &["{destination}", "{message}"][..]),
            ("plain", &plain, &["{message}"][..]),
        ] {
            for placeholder in required {
                if !template.contains(placeholder) {
                    warn!(template = name, placeholder, "prompt template lacks placeholder");
                }
            }
        }

        Self {
            system,
            follow_up,
            plain,
        }
    }

    /// The base system prompt with dates filled in for `today`.
    pub fn system_prompt(&self, today: NaiveDate) -> String {
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
        let today_long = today.format("%B %d, %Y").to_string();
        let tomorrow_long = tomorrow.format("%B %d, %Y").to_string();
        let tomorrow_dmy = tomorrow.format("%d/%m/%Y").to_string();
        render(
            &self.system,
            &[
                ("today", &today_long),
                ("tomorrow", &tomorrow_long),
                ("tomorrow_dmy", &tomorrow_dmy),
            ],
        )
    }

    pub fn follow_up_template(&self) -> &str {
        &self.follow_up
    }

    pub fn plain_template(&self) -> &str {
        &self.plain
    }
}

async fn read_template(path: Option<&str>) -> Option<String> {
    let path = path?;
    match tokio::fs::read_to_string(path).await {
        Ok(content) => {
            let trimmed = content.trim();
            if trimmed.is_empty() {
                warn!(path, "prompt file is empty, using default");
                None
            } else {
                info!(path, "loaded prompt template from file");
                Some(trimmed.to_string())
            }
        }
        Err(e) => {
            warn!(path, error = %e, "failed to read prompt file, using default");
            None
        }
    }
}

/// Substitute `{key}` placeholders in one left-to-right pass.
///
/// Unknown `{...}` sequences (such as JSON examples) are copied verbatim.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let substituted = tail[1..].find('}').and_then(|close| {
            let key = &tail[1..=close];
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close + 2))
        });
        match substituted {
            Some((value, consumed)) => {
                out.push_str(value);
                rest = &tail[consumed..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_known_keys_once() {
        let out = render(
            "{a} and {b} but not {c} or {\"json\": 1}",
            &[("a", "{b}"), ("b", "two")],
        );
        assert_eq!(out, "{b} and two but not {c} or {\"json\": 1}");
    }

    #[test]
    fn render_handles_unclosed_brace() {
        assert_eq!(render("tail {open", &[("open", "x")]), "tail {open");
    }

    #[test]
    fn default_system_prompt_renders_dates() {
        let prompts = PromptSet::default();
        let today = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
        let system = prompts.system_prompt(today);
        assert!(system.contains("March 31, 2026"));
        assert!(system.contains("April 01, 2026"));
        assert!(system.contains("01/04/2026"));
        assert!(!system.contains("{today}"));
        assert!(system.contains("\"from\""), "JSON example braces survive");
    }

    #[tokio::test]
    async fn load_prefers_file_then_inline() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("system.md");
        std::fs::write(&file_path, "File prompt for {today}.").unwrap();

        let config = PromptConfig {
            system_prompt: Some("Inline.".into()),
            system_prompt_file: Some(file_path.to_string_lossy().into_owned()),
            ..Default::default()
        };
        let prompts = PromptSet::load(&config).await;
        let today = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        assert_eq!(prompts.system_prompt(today), "File prompt for January 02, 2026.");

        let config = PromptConfig {
            system_prompt: Some("Inline.".into()),
            ..Default::default()
        };
        assert_eq!(PromptSet::load(&config).await.system_prompt(today), "Inline.");
    }

    #[tokio::test]
    async fn missing_template_file_falls_back_to_default() {
        let config = PromptConfig {
            plain_template_file: Some("/nonexistent/plain.md".into()),
            ..Default::default()
        };
        let prompts = PromptSet::load(&config).await;
        assert_eq!(prompts.plain_template(), PromptSet::default().plain_template());
    }
}
