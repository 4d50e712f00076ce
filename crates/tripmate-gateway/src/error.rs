// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping from [`TripmateError`] to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tripmate_core::TripmateError;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// A handler error. Wraps [`TripmateError`] so handlers can use `?`.
#[derive(Debug)]
pub struct ApiError(pub TripmateError);

impl From<TripmateError> for ApiError {
    fn from(err: TripmateError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            TripmateError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            TripmateError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            TripmateError::NotFound { .. } => StatusCode::NOT_FOUND,
            TripmateError::Provider { .. } => StatusCode::BAD_GATEWAY,
            TripmateError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            TripmateError::Config(_)
            | TripmateError::Storage { .. }
            | TripmateError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Server-side failures are not described.
    fn message(&self) -> String {
        match &self.0 {
            TripmateError::InvalidInput(msg) | TripmateError::Unauthorized(msg) => msg.clone(),
            TripmateError::NotFound { entity, .. } => format!("{entity} not found"),
            TripmateError::Provider { .. } => "the trip planner is unavailable".to_string(),
            TripmateError::Timeout { .. } => "the trip planner took too long to reply".to_string(),
            _ => "internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self.0, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self.0, "request rejected");
        }
        (status, Json(ErrorResponse { error: self.message() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn status_mapping() {
        let cases = [
            (TripmateError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (TripmateError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (TripmateError::not_found("trip", "t1"), StatusCode::NOT_FOUND),
            (
                TripmateError::Provider {
                    message: "x".into(),
                    source: None,
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                TripmateError::Timeout {
                    duration: Duration::from_secs(1),
                },
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                TripmateError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status(), status);
        }
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let err = ApiError(TripmateError::Internal("db path /secret".into()));
        assert_eq!(err.message(), "internal server error");
    }

    #[test]
    fn error_response_serializes() {
        let resp = ErrorResponse {
            error: "something went wrong".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"error":"something went wrong"}"#);
    }
}
