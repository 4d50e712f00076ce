// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trip continuity engine for TripMate prompt assembly.
//!
//! Three synchronous stages run on every chat request:
//! - **Extractor**: pulls the structured trip payload out of a reply
//! - **Tracker**: replays a session's turns to recover origin and destination
//! - **Composer**: merges base prompt, recovered trip and recent history
//!
//! None of these touch storage or the network; the agent pipeline feeds them
//! the turns it has already loaded.

pub mod composer;
pub mod extractor;
pub mod prompts;
pub mod tracker;

pub use composer::{compose, PromptComposer, DEFAULT_RECENT_TURNS};
pub use extractor::extract;
pub use prompts::PromptSet;
pub use tracker::{recover_context, ContextTracker, TripContext, DEFAULT_FOLLOW_UP_WINDOW};
