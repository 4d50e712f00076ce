// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Context tracker: recovers the active trip from a session's turns.
//!
//! Nothing about the trip is persisted. Every request replays the stored
//! conversation, so the result is a pure function of the turn sequence.

use tracing::debug;
use tripmate_core::{Role, TripPayload, Turn};

use crate::extractor::extract;

/// Default number of trailing turns scanned for follow-up keywords.
pub const DEFAULT_FOLLOW_UP_WINDOW: usize = 5;

/// Case-insensitive keywords that mark an ongoing trip discussion.
const FOLLOW_UP_KEYWORDS: &[&str] = &["trip", "route"];

/// Trip state recovered for one chat request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripContext {
    pub origin: Option<String>,
    pub destination: Option<String>,
    /// Payload of the last assistant turn that set a destination.
    pub last_payload: Option<TripPayload>,
    pub is_follow_up: bool,
}

/// Replays turns into a [`TripContext`].
#[derive(Debug, Clone, Copy)]
pub struct ContextTracker {
    follow_up_window: usize,
}

impl Default for ContextTracker {
    fn default() -> Self {
        Self::new(DEFAULT_FOLLOW_UP_WINDOW)
    }
}

impl ContextTracker {
    pub fn new(follow_up_window: usize) -> Self {
        Self { follow_up_window }
    }

    /// Recover the trip context from `turns` (oldest first).
    ///
    /// When `excluding_last` is set the final turn (the request being
    /// answered) is not replayed for origin/destination, but it still counts
    /// toward the follow-up window.
    pub fn recover(&self, turns: &[Turn], excluding_last: bool) -> TripContext {
        let replayed = if excluding_last {
            &turns[..turns.len().saturating_sub(1)]
        } else {
            turns
        };

        let mut ctx = TripContext::default();
        for turn in replayed.iter().filter(|t| t.role == Role::Assistant) {
            let Some(payload) = extract(&turn.content) else {
                continue;
            };
            // Each field overrides independently; a payload without `from`
            // keeps the origin already known.
            if let Some(origin) = payload.origin() {
                ctx.origin = Some(origin.to_string());
            }
            if let Some(destination) = payload.destination() {
                ctx.destination = Some(destination.to_string());
                ctx.last_payload = Some(payload);
            }
        }

        let window_start = turns.len().saturating_sub(self.follow_up_window);
        ctx.is_follow_up = turns[window_start..]
            .iter()
            .any(|t| mentions_trip(&t.content));

        debug!(
            turns = turns.len(),
            origin = ?ctx.origin,
            destination = ?ctx.destination,
            is_follow_up = ctx.is_follow_up,
            "recovered trip context"
        );
        ctx
    }
}

/// Recover the trip context using the default follow-up window.
pub fn recover_context(turns: &[Turn], excluding_last: bool) -> TripContext {
    ContextTracker::default().recover(turns, excluding_last)
}

fn mentions_trip(content: &str) -> bool {
    let lower = content.to_lowercase();
    FOLLOW_UP_KEYWORDS.iter().any(|k| lower.contains(k))
}
