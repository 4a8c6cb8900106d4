// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for caller identity and the admin capability.
//!
//! Use `Identity` in owner-facing handlers and `AdminAuth` in
//! capability-gated ones:
//!
//! ```rust,ignore
//! async fn my_handler(Identity(user_id): Identity) -> impl IntoResponse {
//!     // user_id is the proxy-asserted caller id
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{AdminCapability, AuthError};
use crate::state::AppState;

/// Header the authenticating front proxy uses to assert the caller identity.
pub const IDENTITY_HEADER: &str = "x-user-id";

/// Extractor for the proxy-asserted caller identity.
///
/// The front proxy terminates end-user authentication and injects the
/// resulting user id; a request reaching this service without the header was
/// not authenticated.
pub struct Identity(pub String);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(IDENTITY_HEADER)
            .ok_or(AuthError::MissingIdentity)?
            .to_str()
            .map_err(|_| AuthError::InvalidIdentity)?;

        if value.is_empty() {
            return Err(AuthError::InvalidIdentity);
        }

        Ok(Identity(value.to_string()))
    }
}

/// Extractor minting the administrative capability from a Bearer credential.
///
/// Rejects with 503 when the deployment has no capability configured, 401
/// when the header is absent or malformed, 403 on a mismatch.
pub struct AdminAuth(pub AdminCapability);

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let secret = state.admin_secret.as_ref().ok_or(AuthError::AdminDisabled)?;

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let presented = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidAuthHeader)?;

        let capability = secret
            .verify(presented)
            .ok_or(AuthError::InvalidCapability)?;

        Ok(AdminAuth(capability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn identity_from(headers: &[(&str, &str)]) -> Result<Identity, AuthError> {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        Identity::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn identity_requires_header() {
        let err = identity_from(&[]).await.err().unwrap();
        assert_eq!(err.error_code(), "missing_identity");
    }

    #[tokio::test]
    async fn identity_rejects_empty_value() {
        let err = identity_from(&[(IDENTITY_HEADER, "")]).await.err().unwrap();
        assert_eq!(err.error_code(), "invalid_identity");
    }

    #[tokio::test]
    async fn identity_extracts_user_id() {
        let Identity(user_id) = identity_from(&[(IDENTITY_HEADER, "user_42")]).await.unwrap();
        assert_eq!(user_id, "user_42");
    }
}
