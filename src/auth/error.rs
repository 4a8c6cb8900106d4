// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
#[derive(Debug)]
pub enum AuthError {
    /// No identity header present
    MissingIdentity,
    /// Identity header is empty or not valid UTF-8
    InvalidIdentity,
    /// No authorization header present
    MissingAuthHeader,
    /// Invalid authorization header format
    InvalidAuthHeader,
    /// Presented capability does not match the configured credential
    InvalidCapability,
    /// No administrative capability is configured on this deployment
    AdminDisabled,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingIdentity => "missing_identity",
            AuthError::InvalidIdentity => "invalid_identity",
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::InvalidCapability => "invalid_capability",
            AuthError::AdminDisabled => "admin_disabled",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingIdentity
            | AuthError::InvalidIdentity
            | AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader => StatusCode::UNAUTHORIZED,
            AuthError::InvalidCapability => StatusCode::FORBIDDEN,
            AuthError::AdminDisabled => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingIdentity => write!(f, "Identity header is required"),
            AuthError::InvalidIdentity => write!(f, "Identity header is empty or malformed"),
            AuthError::MissingAuthHeader => write!(f, "Authorization header is required"),
            AuthError::InvalidAuthHeader => {
                write!(f, "Invalid authorization header format (expected 'Bearer <token>')")
            }
            AuthError::InvalidCapability => {
                write!(f, "Presented capability is not valid for this operation")
            }
            AuthError::AdminDisabled => {
                write!(f, "No administrative capability is configured")
            }
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn missing_identity_returns_401() {
        let response = AuthError::MissingIdentity.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error_code"], "missing_identity");
    }

    #[tokio::test]
    async fn invalid_capability_returns_403() {
        let response = AuthError::InvalidCapability.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_disabled_returns_503() {
        let response = AuthError::AdminDisabled.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
