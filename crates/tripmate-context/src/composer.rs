// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt composer: merges the base prompt, the recovered trip context and a
//! short history excerpt into the system instruction for one request.

use tripmate_core::Turn;

use crate::prompts::{render, PromptSet};
use crate::tracker::TripContext;

/// Default number of trailing turns (three exchanges) in the history excerpt.
pub const DEFAULT_RECENT_TURNS: usize = 6;

/// Origin shown in the continuity block when none was recovered.
const UNKNOWN_ORIGIN: &str = "Unknown";

/// Builds the system instruction sent with each chat request.
#[derive(Debug, Clone)]
pub struct PromptComposer {
    prompts: PromptSet,
    recent_turns: usize,
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new(PromptSet::default(), DEFAULT_RECENT_TURNS)
    }
}

impl PromptComposer {
    pub fn new(prompts: PromptSet, recent_turns: usize) -> Self {
        Self {
            prompts,
            recent_turns,
        }
    }

    pub fn prompts(&self) -> &PromptSet {
        &self.prompts
    }

    /// Compose the system instruction.
    ///
    /// `recent_history` holds the turns before the current message, oldest
    /// first. With no history the base prompt is returned unchanged. A
    /// follow-up with a known destination gets the continuity block; anything
    /// else gets only the history excerpt and the message.
    pub fn compose(
        &self,
        base_prompt: &str,
        context: &TripContext,
        recent_history: &[Turn],
        user_message: &str,
    ) -> String {
        if recent_history.is_empty() {
            return base_prompt.to_string();
        }

        let history = self.render_history(recent_history);
        let tail = match (&context.destination, context.is_follow_up) {
            (Some(destination), true) => render(
                self.prompts.follow_up_template(),
                &[
                    (
                        "origin",
                        context.origin.as_deref().unwrap_or(UNKNOWN_ORIGIN),
                    ),
                    ("destination", destination),
                    ("history", &history),
                    ("message", user_message),
                ],
            ),
            _ => render(
                self.prompts.plain_template(),
                &[("history", &history), ("message", user_message)],
            ),
        };

        format!("{base_prompt}\n\n{tail}")
    }

    /// The last `recent_turns` turns, one `role: content` line each.
    fn render_history(&self, turns: &[Turn]) -> String {
        let start = turns.len().saturating_sub(self.recent_turns);
        turns[start..]
            .iter()
            .map(|t| format!("{}: {}", t.role, t.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Compose with the default templates and history length.
pub fn compose(
    base_prompt: &str,
    context: &TripContext,
    recent_history: &[Turn],
    user_message: &str,
) -> String {
    PromptComposer::default().compose(base_prompt, context, recent_history, user_message)
}
