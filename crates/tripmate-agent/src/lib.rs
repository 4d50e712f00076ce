// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat orchestration for the TripMate backend.
//!
//! The [`ChatPipeline`] is the central coordinator that:
//! - Persists each user message before anything else happens
//! - Recovers the active trip from the session's earlier turns
//! - Composes the system instruction and calls the LLM provider
//! - Persists the reply and extracts its trip payload
//!
//! [`shutdown`] holds the signal handling used by the server binary.

pub mod pipeline;
pub mod shutdown;

pub use pipeline::{ChatPipeline, ChatReply, ChatSettings, HISTORY_READ_LIMIT};
pub use shutdown::{install_signal_handler, shutdown_adapters};
