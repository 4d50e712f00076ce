// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tripmate_agent::ChatPipeline;
use tripmate_config::model::TripmateConfig;
use tripmate_core::{ProviderAdapter, StorageAdapter, TripmateError};

use crate::auth::{auth_middleware, AuthState};
use crate::handlers;

/// Health state for the unauthenticated health endpoint.
#[derive(Debug, Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Chat pipeline for `/api/chat`.
    pub pipeline: Arc<ChatPipeline>,
    /// Storage for trips and accounts.
    pub storage: Arc<dyn StorageAdapter + Send + Sync>,
    /// Provider, reported by `/health`.
    pub provider: Arc<dyn ProviderAdapter + Send + Sync>,
    /// Token signing and cookie settings.
    pub auth: AuthState,
    /// Health state for unauthenticated endpoints.
    pub health: HealthState,
}

impl GatewayState {
    pub fn new(
        config: &TripmateConfig,
        pipeline: Arc<ChatPipeline>,
        storage: Arc<dyn StorageAdapter + Send + Sync>,
        provider: Arc<dyn ProviderAdapter + Send + Sync>,
    ) -> Self {
        Self {
            pipeline,
            storage,
            provider,
            auth: AuthState::from_config(&config.auth),
            health: HealthState {
                start_time: std::time::Instant::now(),
            },
        }
    }
}

/// Gateway server configuration (mirrors the `[gateway]` config section).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Allowed CORS origins; `*` allows any origin without credentials.
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    pub fn from_config(config: &TripmateConfig) -> Self {
        Self {
            host: config.gateway.host.clone(),
            port: config.gateway.port,
            cors_origins: config.gateway.cors_origins.clone(),
        }
    }
}

/// Builds the full router.
///
/// Public routes:
/// - GET /health
/// - GET /api/, POST /api/chat, GET /api/chat/{session_id}
/// - POST|GET /api/trips, POST /api/trips/share, GET /api/trips/shared/{share_id}
/// - POST /api/auth/register, POST /api/auth/login, POST /api/auth/logout
///
/// Routes behind [`auth_middleware`]:
/// - GET /api/auth/me
/// - POST|GET /api/user/trips, DELETE /api/user/trips/{trip_id}
pub fn build_router(state: GatewayState, cors_origins: &[String]) -> Router {
    let public_api = Router::new()
        .route("/", get(handlers::get_root))
        .route("/chat", post(handlers::post_chat))
        .route("/chat/{session_id}", get(handlers::get_chat_history))
        .route("/trips", post(handlers::post_trip).get(handlers::get_trips))
        .route("/trips/share", post(handlers::post_share_trip))
        .route("/trips/shared/{share_id}", get(handlers::get_shared_trip))
        .route("/auth/register", post(handlers::post_register))
        .route("/auth/login", post(handlers::post_login))
        .route("/auth/logout", post(handlers::post_logout));

    let protected_api = Router::new()
        .route("/auth/me", get(handlers::get_me))
        .route(
            "/user/trips",
            post(handlers::post_user_trip).get(handlers::get_user_trips),
        )
        .route("/user/trips/{trip_id}", delete(handlers::delete_user_trip))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::get_health))
        .nest("/api", public_api.merge(protected_api))
        .with_state(state)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// CORS policy: permissive for `*`, otherwise the listed origins with
/// credentials so the session cookie is sent cross-site.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Start the gateway HTTP server and serve until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), TripmateError> {
    let app = build_router(state, &config.cors_origins);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TripmateError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| TripmateError::Internal(format!("gateway server error: {e}")))?;

    info!("Gateway server stopped");
    Ok(())
}
