// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;
use tripmate_agent::ChatReply;
use tripmate_core::{
    now_timestamp, HealthStatus, PluginAdapter, SharedTrip, TripPayload, TripRecord, TripmateError,
    Turn, User, UserTrip,
};

use crate::auth::{hash_password, verify_password, AuthenticatedUser};
use crate::error::ApiError;
use crate::server::GatewayState;

/// Maximum trips returned by `GET /api/trips`.
pub const TRIP_LIST_LIMIT: i64 = 1000;

/// Maximum trips returned by `GET /api/user/trips`.
pub const USER_TRIP_LIST_LIMIT: i64 = 100;

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Plain `{"message": ...}` acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when every adapter is healthy, `degraded` otherwise.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Seconds since the gateway started.
    pub uptime_secs: u64,
    pub storage: String,
    pub provider: String,
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let storage = adapter_status(state.storage.health_check().await);
    let provider = adapter_status(state.provider.health_check().await);
    let status = if storage == "healthy" && provider == "healthy" {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
        storage,
        provider,
    })
}

fn adapter_status(result: Result<HealthStatus, TripmateError>) -> String {
    match result {
        Ok(status) => status.label().to_string(),
        Err(_) => "unhealthy".to_string(),
    }
}

/// GET /api/
pub async fn get_root() -> Json<MessageResponse> {
    MessageResponse::new("TripMate API is running")
}

// --- Chat ---

/// Request body for POST /api/chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

/// POST /api/chat
pub async fn post_chat(
    State(state): State<GatewayState>,
    Json(body): Json<ChatRequest>,
) -> ApiResult<ChatReply> {
    let reply = state.pipeline.handle(&body.session_id, &body.message).await?;
    Ok(Json(reply))
}

/// GET /api/chat/{session_id}
pub async fn get_chat_history(
    State(state): State<GatewayState>,
    Path(session_id): Path<String>,
) -> ApiResult<Vec<Turn>> {
    Ok(Json(state.pipeline.history(&session_id).await?))
}

// --- Trips ---

/// Request body for POST /api/trips. `id` and `created_at` are filled in
/// when absent.
#[derive(Debug, Deserialize)]
pub struct NewTripRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub session_id: String,
    pub from_location: String,
    pub to_location: String,
    pub duration: String,
    #[serde(default)]
    pub routes: Vec<Value>,
    pub trip_data: Map<String, Value>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// POST /api/trips
pub async fn post_trip(
    State(state): State<GatewayState>,
    Json(body): Json<NewTripRecord>,
) -> ApiResult<TripRecord> {
    let record = TripRecord {
        id: body.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        session_id: body.session_id,
        from_location: body.from_location,
        to_location: body.to_location,
        duration: body.duration,
        routes: body.routes,
        trip_data: TripPayload::new(body.trip_data),
        created_at: body.created_at.unwrap_or_else(now_timestamp),
    };
    state.storage.save_trip(&record).await?;
    Ok(Json(record))
}

/// GET /api/trips
pub async fn get_trips(State(state): State<GatewayState>) -> ApiResult<Vec<TripRecord>> {
    Ok(Json(state.storage.list_trips(TRIP_LIST_LIMIT).await?))
}

/// Request body carrying just a trip payload.
#[derive(Debug, Deserialize)]
pub struct TripDataRequest {
    pub trip_data: Map<String, Value>,
}

/// Response body for POST /api/trips/share.
#[derive(Debug, Serialize)]
pub struct ShareTripResponse {
    pub share_id: String,
    pub share_url: String,
}

/// POST /api/trips/share
pub async fn post_share_trip(
    State(state): State<GatewayState>,
    Json(body): Json<TripDataRequest>,
) -> ApiResult<ShareTripResponse> {
    let shared = state
        .storage
        .share_trip(&TripPayload::new(body.trip_data))
        .await?;
    Ok(Json(ShareTripResponse {
        share_url: format!("/shared/{}", shared.share_id),
        share_id: shared.share_id,
    }))
}

/// GET /api/trips/shared/{share_id}
pub async fn get_shared_trip(
    State(state): State<GatewayState>,
    Path(share_id): Path<String>,
) -> ApiResult<SharedTrip> {
    let trip = state
        .storage
        .get_shared_trip(&share_id)
        .await?
        .ok_or_else(|| TripmateError::not_found("Trip", share_id))?;
    Ok(Json(trip))
}

// --- Accounts ---

/// Request body for POST /api/auth/register.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Request body for POST /api/auth/login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            picture: user.picture.clone(),
        }
    }
}

/// Response body for register and login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserResponse,
}

/// POST /api/auth/register
pub async fn post_register(
    State(state): State<GatewayState>,
    jar: CookieJar,
    Json(body): Json<RegisterRequest>,
) -> Result<(CookieJar, Json<TokenResponse>), ApiError> {
    let email = body.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(TripmateError::InvalidInput("A valid email is required".into()).into());
    }
    if body.password.is_empty() {
        return Err(TripmateError::InvalidInput("Password must not be empty".into()).into());
    }
    if state.storage.get_user_by_email(&email).await?.is_some() {
        return Err(TripmateError::InvalidInput("Email already registered".into()).into());
    }

    let password = body.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| TripmateError::Internal(format!("password hashing task failed: {e}")))??;

    let user = User {
        user_id: format!("user_{}", short_hex_id()),
        email,
        name: body.name,
        password_hash: Some(password_hash),
        picture: None,
        auth_provider: "email".to_string(),
        created_at: now_timestamp(),
    };
    // A concurrent registration can still win the race; the store reports it.
    state.storage.create_user(&user).await?;
    info!(user_id = user.user_id, "user registered");

    issue_session(&state, jar, &user)
}

/// POST /api/auth/login
pub async fn post_login(
    State(state): State<GatewayState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, Json<TokenResponse>), ApiError> {
    let invalid = || TripmateError::Unauthorized("Invalid email or password".into());

    let user = state
        .storage
        .get_user_by_email(&body.email.trim().to_lowercase())
        .await?
        .ok_or_else(invalid)?;
    let stored_hash = user.password_hash.clone().ok_or_else(invalid)?;

    let password = body.password;
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| TripmateError::Internal(format!("password check task failed: {e}")))?;
    if !matches {
        return Err(invalid().into());
    }

    info!(user_id = user.user_id, "user logged in");
    issue_session(&state, jar, &user)
}

fn issue_session(
    state: &GatewayState,
    jar: CookieJar,
    user: &User,
) -> Result<(CookieJar, Json<TokenResponse>), ApiError> {
    let token = state.auth.signer.issue(&user.user_id, &user.email)?;
    let jar = jar.add(state.auth.cookies.session_cookie(token.clone()));
    Ok((
        jar,
        Json(TokenResponse {
            access_token: token,
            token_type: "bearer".to_string(),
            user: UserResponse::from(user),
        }),
    ))
}

/// GET /api/auth/me
pub async fn get_me(
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}

/// POST /api/auth/logout
pub async fn post_logout(
    State(state): State<GatewayState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.remove(state.auth.cookies.removal_cookie());
    (jar, MessageResponse::new("Logged out successfully"))
}

// --- Saved trips ---

/// Response body for POST /api/user/trips.
#[derive(Debug, Serialize)]
pub struct SaveTripResponse {
    pub trip_id: String,
    pub message: String,
}

/// POST /api/user/trips
pub async fn post_user_trip(
    State(state): State<GatewayState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Json(body): Json<TripDataRequest>,
) -> ApiResult<SaveTripResponse> {
    let trip_data = TripPayload::new(body.trip_data);
    let trip = UserTrip {
        trip_id: format!("trip_{}", short_hex_id()),
        user_id: user.user_id,
        from_location: trip_data.origin().unwrap_or_default().to_string(),
        to_location: trip_data.destination().unwrap_or_default().to_string(),
        duration: trip_data.duration().unwrap_or_default().to_string(),
        trip_data,
        created_at: now_timestamp(),
    };
    state.storage.save_user_trip(&trip).await?;
    Ok(Json(SaveTripResponse {
        trip_id: trip.trip_id,
        message: "Trip saved successfully".to_string(),
    }))
}

/// GET /api/user/trips
pub async fn get_user_trips(
    State(state): State<GatewayState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<UserTrip>> {
    Ok(Json(
        state
            .storage
            .list_user_trips(&user.user_id, USER_TRIP_LIST_LIMIT)
            .await?,
    ))
}

/// DELETE /api/user/trips/{trip_id}
pub async fn delete_user_trip(
    State(state): State<GatewayState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(trip_id): Path<String>,
) -> ApiResult<MessageResponse> {
    if !state
        .storage
        .delete_user_trip(&trip_id, &user.user_id)
        .await?
    {
        return Err(TripmateError::not_found("Trip", trip_id).into());
    }
    Ok(MessageResponse::new("Trip deleted successfully"))
}

/// First 12 hex characters of a fresh v4 uuid.
fn short_hex_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..12].to_string()
}
