// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the TripMate travel-planning backend.
//!
//! This crate provides the foundational trait definitions, error types, and
//! domain types used throughout the TripMate workspace. The storage and LLM
//! provider adapters implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TripmateError;
pub use types::{
    AdapterType, HealthStatus, NewTurn, ProviderMessage, ProviderRequest, ProviderResponse, Role,
    SharedTrip, TokenUsage, TripPayload, TripRecord, Turn, User, UserTrip, now_timestamp,
};

pub use traits::{PluginAdapter, ProviderAdapter, StorageAdapter};
