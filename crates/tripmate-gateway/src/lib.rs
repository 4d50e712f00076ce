// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the TripMate backend.
//!
//! Exposes the chat pipeline, trip records, share links and user accounts
//! as a JSON API under `/api`, plus an unauthenticated `/health`.
//! Account routes sit behind [`auth::auth_middleware`].

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use auth::{AuthState, AuthenticatedUser, TokenSigner};
pub use error::ApiError;
pub use server::{build_router, start_server, GatewayState, ServerConfig};
