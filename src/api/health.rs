// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response with individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall health status ("ok" or "degraded").
    pub status: String,
    /// Individual health checks and their results.
    pub checks: HealthChecks,
}

/// Individual health check results.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    /// Whether the service process is running.
    pub service: String,
    /// Proof store availability (absent when running history-less).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_store: Option<String>,
    /// Whether an administrative capability is configured.
    pub admin_capability: String,
}

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Check that the proof store answers a trivial read.
fn check_proof_store(state: &AppState) -> Option<String> {
    state.proof_db.as_ref().map(|db| match db.count() {
        Ok(_) => "ok".to_string(),
        Err(_) => "unavailable".to_string(),
    })
}

/// Health check endpoint handler.
///
/// Returns 200 if all checks pass, 503 if any check fails.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = ReadyResponse),
        (status = 503, description = "Service is unhealthy", body = ReadyResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let proof_store = check_proof_store(&state);
    let proofs_ok = proof_store.as_ref().map(|s| s == "ok").unwrap_or(true);

    let response = ReadyResponse {
        status: if proofs_ok { "ok" } else { "degraded" }.to_string(),
        checks: HealthChecks {
            service: "ok".to_string(),
            proof_store,
            admin_capability: if state.admin_secret.is_some() {
                "configured".to_string()
            } else {
                "disabled".to_string()
            },
        },
    };

    let status = if proofs_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running.
/// Does not check dependencies - use readiness for that.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness probe handler.
///
/// Returns 200 only if all dependencies are available.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadyResponse),
        (status = 503, description = "Service is not ready", body = ReadyResponse)
    )
)]
pub async fn readiness(state: State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    health(state).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn liveness_is_always_ok() {
        let response = liveness().await;
        assert_eq!(response.0.status, "ok");
    }

    #[tokio::test]
    async fn health_without_proof_store_is_ok() {
        let (status, body) = health(State(AppState::default())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.0.status, "ok");
        assert!(body.0.checks.proof_store.is_none());
        assert_eq!(body.0.checks.admin_capability, "disabled");
    }
}
