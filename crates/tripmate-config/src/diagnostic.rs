// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config error diagnostics.
//!
//! Figment errors are mapped onto TripMate's section layout. A misspelled
//! section gets a section suggestion, a key written under the wrong section
//! is pointed at the section that owns it, and type errors name the
//! `TRIPMATE_*` variable that overrides the key.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::loader::env_var_for;
use crate::model::owning_section;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with rich diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A top-level name that is not one of the config sections.
    #[error("unknown configuration section `{name}`")]
    #[diagnostic(
        code(tripmate::config::unknown_section),
        help("{}", unknown_section_help(name, suggestion.as_deref(), sections))
    )]
    UnknownSection {
        name: String,
        suggestion: Option<String>,
        /// Comma-separated section names.
        sections: String,
        #[label("not a config section")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A key the section does not declare.
    #[error("unknown key `{key}` in [{section}]")]
    #[diagnostic(
        code(tripmate::config::unknown_key),
        help("{}", unknown_key_help(section, key, suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        section: String,
        key: String,
        /// Closest key of the same section, if any.
        suggestion: Option<String>,
        /// Comma-separated keys of the section.
        valid_keys: String,
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value of the wrong type. `key` is the dotted path.
    #[error("invalid type for `{key}`: {detail}")]
    #[diagnostic(
        code(tripmate::config::invalid_type),
        help("expected {expected}; `{}` can also set this key", env_var_for(key))
    )]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
        #[label("wrong type here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A `[prompt]` template path that cannot be used.
    #[error("prompt.{key} points at `{path}`: {reason}")]
    #[diagnostic(
        code(tripmate::config::prompt_template),
        help("fix the path, or remove `prompt.{key}` to use the built-in template")
    )]
    PromptTemplate {
        key: String,
        path: String,
        reason: String,
    },

    /// A value outside its allowed range.
    #[error("validation error: {message}")]
    #[diagnostic(code(tripmate::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(tripmate::config::other))]
    Other(String),
}

fn unknown_section_help(name: &str, suggestion: Option<&str>, sections: &str) -> String {
    if let Some(owner) = owning_section(name) {
        return format!("`{name}` is a key of [{owner}]; move it below the [{owner}] header");
    }
    match suggestion {
        Some(s) => format!("did you mean [{s}]? Sections: {sections}"),
        None => format!("sections: {sections}"),
    }
}

fn unknown_key_help(section: &str, key: &str, suggestion: Option<&str>, valid_keys: &str) -> String {
    match (suggestion, owning_section(key)) {
        (None, Some(owner)) if owner != section => {
            format!("`{key}` belongs in the [{owner}] section")
        }
        (Some(s), _) => format!("did you mean `{s}`? Valid keys in [{section}]: {valid_keys}"),
        (None, _) => format!("valid keys in [{section}]: {valid_keys}"),
    }
}

/// Convert a `figment::Error` into a list of `ConfigError` diagnostics.
///
/// `toml_sources` holds `(path, content)` pairs used to attach source spans
/// when figment can name the file an error came from.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| {
            let path: Vec<String> = error.path.iter().map(|s| s.to_string()).collect();
            match &error.kind {
                Kind::UnknownField(field, expected) if path.is_empty() => {
                    let (span, src) = locate(&error, toml_sources, |content| {
                        find_section_offset(content, field).map(|o| (o, field.len() + 2))
                    });
                    ConfigError::UnknownSection {
                        name: field.clone(),
                        suggestion: suggest_key(field, expected),
                        sections: expected.join(", "),
                        span,
                        src,
                    }
                }
                Kind::UnknownField(field, expected) => {
                    let (span, src) = locate(&error, toml_sources, |content| {
                        find_key_offset(content, &path, field).map(|o| (o, field.len()))
                    });
                    ConfigError::UnknownKey {
                        section: path.join("."),
                        key: field.clone(),
                        suggestion: suggest_key(field, expected),
                        valid_keys: expected.join(", "),
                        span,
                        src,
                    }
                }
                Kind::InvalidType(actual, expected) => {
                    let (span, src) = match path.split_last() {
                        Some((field, section)) => locate(&error, toml_sources, |content| {
                            find_key_offset(content, section, field).map(|o| (o, field.len()))
                        }),
                        None => (None, None),
                    };
                    ConfigError::InvalidType {
                        key: path.join("."),
                        detail: format!("found {actual}, expected {expected}"),
                        expected: expected.to_string(),
                        span,
                        src,
                    }
                }
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

/// Resolves a span in the file the error came from. `find` returns
/// `(offset, length)` within that file's content.
fn locate(
    error: &figment::error::Error,
    toml_sources: &[(String, String)],
    find: impl FnOnce(&str) -> Option<(usize, usize)>,
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let file = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    let Some((path, content)) = file
        .and_then(|file| toml_sources.iter().find(|(p, _)| *p == file))
    else {
        return (None, None);
    };

    match find(content) {
        Some((offset, len)) => (
            Some(SourceSpan::new(offset.into(), len)),
            Some(NamedSource::new(path, content.clone())),
        ),
        None => (None, None),
    }
}

/// Byte offset of the `[section]` header.
pub fn find_section_offset(content: &str, section: &str) -> Option<usize> {
    let header = format!("[{section}]");
    let mut offset = 0;
    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with(&header) {
            return Some(offset + line.len() - trimmed.len());
        }
        offset += line.len() + 1;
    }
    None
}

/// Byte offset of `field` as a key below the `[path[0]]` header, or from the
/// top of the file when `path` is empty.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let start = match path.first() {
        Some(section) => {
            let header = find_section_offset(content, section)?;
            header + content[header..].find('\n').unwrap_or(content.len() - header)
        }
        None => 0,
    };

    let mut offset = start;
    for line in content[start..].lines() {
        let trimmed = line.trim_start();
        // Stop at the next section header.
        if !path.is_empty() && trimmed.starts_with('[') {
            return None;
        }
        if let Some(after) = trimmed.strip_prefix(field)
            && (after.starts_with([' ', '\t', '=']))
        {
            return Some(offset + line.len() - trimmed.len());
        }
        offset += line.len() + 1;
    }
    None
}

/// Suggest a similar key name using Jaro-Winkler string similarity.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Render a list of `ConfigError`s to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        if handler.render_report(&mut buf, error).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn help(error: &ConfigError) -> String {
        error.help().map(|h| h.to_string()).unwrap_or_default()
    }

    #[test]
    fn suggest_histroy_limit_for_history_limit() {
        let valid = &["history_limit", "follow_up_window", "recent_history_turns"];
        assert_eq!(
            suggest_key("histroy_limit", valid),
            Some("history_limit".to_string())
        );
    }

    #[test]
    fn misplaced_key_points_at_its_section() {
        let error = ConfigError::UnknownKey {
            section: "agent".into(),
            key: "api_key".into(),
            suggestion: None,
            valid_keys: "name, log_level".into(),
            span: None,
            src: None,
        };
        assert_eq!(help(&error), "`api_key` belongs in the [openai] section");
    }

    #[test]
    fn top_level_key_is_sent_to_its_section() {
        let error = ConfigError::UnknownSection {
            name: "port".into(),
            suggestion: None,
            sections: "agent, gateway".into(),
            span: None,
            src: None,
        };
        assert!(help(&error).contains("below the [gateway] header"));
    }

    #[test]
    fn invalid_type_names_env_override() {
        let error = ConfigError::InvalidType {
            key: "gateway.port".into(),
            detail: "found string, expected u16".into(),
            expected: "u16".into(),
            span: None,
            src: None,
        };
        assert!(help(&error).contains("TRIPMATE_GATEWAY_PORT"));
    }

    #[test]
    fn prompt_template_error_offers_builtin_fallback() {
        let error = ConfigError::PromptTemplate {
            key: "plain_template_file".into(),
            path: "/missing/plain.md".into(),
            reason: "not found".into(),
        };
        assert_eq!(
            error.to_string(),
            "prompt.plain_template_file points at `/missing/plain.md`: not found"
        );
        assert!(help(&error).contains("remove `prompt.plain_template_file`"));
    }

    #[test]
    fn key_offset_stays_inside_its_section() {
        let content = "[agent]\nname = \"x\"\n\n[openai]\nmodle = \"gpt-4o\"\n";
        let openai = vec!["openai".to_string()];
        let o = find_key_offset(content, &openai, "modle").unwrap();
        assert_eq!(&content[o..o + 5], "modle");

        let agent = vec!["agent".to_string()];
        assert_eq!(find_key_offset(content, &agent, "modle"), None);
    }

    #[test]
    fn section_offset_points_at_header() {
        let content = "[agent]\nname = \"x\"\n  [opneai]\n";
        let o = find_section_offset(content, "opneai").unwrap();
        assert_eq!(&content[o..o + 8], "[opneai]");
        assert_eq!(find_section_offset(content, "gateway"), None);
    }
}
