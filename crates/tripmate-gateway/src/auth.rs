// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication for the gateway: session tokens, password hashing and
//! the middleware guarding account routes.
//!
//! The session token is read from the session cookie first, then from
//! `Authorization: Bearer <token>`. A token is
//! `base64url(claims JSON) "." hex(HMAC-SHA256(secret, first part))`.

use std::sync::Arc;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{TimeDelta, Utc};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{debug, warn};
use tripmate_config::model::AuthConfig;
use tripmate_config::validation::MAX_TOKEN_TTL_DAYS;
use tripmate_core::{TripmateError, User};

use crate::error::ApiError;
use crate::server::GatewayState;

type HmacSha256 = Hmac<Sha256>;

const NOT_AUTHENTICATED: &str = "Not authenticated";

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String,
    pub email: String,
    /// Expiry as a Unix timestamp in seconds.
    pub exp: i64,
}

/// Issues and verifies signed session tokens.
#[derive(Debug)]
pub struct TokenSigner {
    secret: SecretString,
    ttl: TimeDelta,
}

impl TokenSigner {
    pub fn new(secret: SecretString, ttl: TimeDelta) -> Self {
        Self { secret, ttl }
    }

    /// Builds a signer from the `[auth]` section. Without a configured
    /// secret a random one is generated, so tokens die with the process.
    pub fn from_config(config: &AuthConfig) -> Self {
        let secret = match &config.token_secret {
            Some(secret) if !secret.is_empty() => secret.clone(),
            _ => {
                warn!("auth.token_secret not set, using a per-process secret; sessions will not survive a restart");
                let mut bytes = [0u8; 32];
                OsRng.fill_bytes(&mut bytes);
                hex::encode(bytes)
            }
        };
        let days = config.token_ttl_days.clamp(1, MAX_TOKEN_TTL_DAYS);
        if days != config.token_ttl_days {
            warn!(
                configured = config.token_ttl_days,
                used = days,
                "auth.token_ttl_days out of range, clamped"
            );
        }
        Self::new(SecretString::from(secret), TimeDelta::days(days))
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Issues a token for `user_id` that expires after the configured TTL.
    pub fn issue(&self, user_id: &str, email: &str) -> Result<String, TripmateError> {
        let expires = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TripmateError::Internal("token expiry out of range".to_string()))?;
        let claims = Claims {
            user_id: user_id.to_string(),
            email: email.to_string(),
            exp: expires.timestamp(),
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, TripmateError> {
        let json = serde_json::to_vec(claims)
            .map_err(|e| TripmateError::Internal(format!("failed to encode token claims: {e}")))?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());
        Ok(format!("{payload}.{signature}"))
    }

    /// Verifies signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TripmateError> {
        let (payload, signature) = token
            .split_once('.')
            .ok_or_else(|| rejected("malformed token"))?;
        let signature = hex::decode(signature).map_err(|_| rejected("signature is not hex"))?;

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| rejected("bad signature"))?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| rejected("payload is not base64url"))?;
        let claims: Claims =
            serde_json::from_slice(&json).map_err(|_| rejected("payload is not valid claims"))?;

        if claims.exp <= Utc::now().timestamp() {
            return Err(rejected("token expired"));
        }
        Ok(claims)
    }

    fn mac(&self) -> Result<HmacSha256, TripmateError> {
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| TripmateError::Internal(format!("invalid token secret: {e}")))
    }
}

fn rejected(reason: &str) -> TripmateError {
    debug!(reason, "session token rejected");
    TripmateError::Unauthorized(NOT_AUTHENTICATED.to_string())
}

/// Hashes a password into a PHC string (Argon2id, random salt).
pub fn hash_password(password: &str) -> Result<String, TripmateError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| TripmateError::Internal(format!("password hashing failed: {e}")))
}

/// Checks a password against a stored PHC string.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!(error = %e, "stored password hash is unreadable");
            false
        }
    }
}

/// Session cookie attributes.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    /// `Secure; SameSite=None` when set, `SameSite=Lax` otherwise.
    pub secure: bool,
    pub max_age: TimeDelta,
}

impl CookieSettings {
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            name: config.cookie_name.clone(),
            secure: config.secure_cookie,
            max_age: TimeDelta::days(config.token_ttl_days),
        }
    }

    /// The cookie carrying a freshly issued token.
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        let same_site = if self.secure {
            SameSite::None
        } else {
            SameSite::Lax
        };
        Cookie::build((self.name.clone(), token))
            .http_only(true)
            .secure(self.secure)
            .same_site(same_site)
            .max_age(time::Duration::seconds(self.max_age.num_seconds()))
            .path("/")
            .build()
    }

    /// A cookie that, passed to [`CookieJar::remove`], clears the session.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build(self.name.clone()).path("/").build()
    }
}

/// Token signer and cookie settings shared by the auth routes.
#[derive(Debug, Clone)]
pub struct AuthState {
    pub signer: Arc<TokenSigner>,
    pub cookies: CookieSettings,
}

impl AuthState {
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            signer: Arc::new(TokenSigner::from_config(config)),
            cookies: CookieSettings::from_config(config),
        }
    }
}

/// The signed-in user, inserted into request extensions by [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Reads the session token: cookie first, then the bearer header.
pub fn session_token(jar: &CookieJar, headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(cookie) = jar.get(cookie_name)
        && !cookie.value().is_empty()
    {
        return Some(cookie.value().to_string());
    }
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Middleware that resolves the session token to a stored user.
///
/// Rejects with 401 when the token is missing, invalid, expired, or names a
/// user that no longer exists.
pub async fn auth_middleware(
    State(state): State<GatewayState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = session_token(&jar, request.headers(), &state.auth.cookies.name)
        .ok_or_else(|| rejected("no session token"))?;
    let claims = state.auth.signer.verify(&token)?;

    let user = state
        .storage
        .get_user(&claims.user_id)
        .await?
        .ok_or_else(|| rejected("token names an unknown user"))?;

    request.extensions_mut().insert(AuthenticatedUser(user));
    Ok(next.run(request).await)
}
