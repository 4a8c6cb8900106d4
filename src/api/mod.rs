// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    ledger::{Attestation, FeeVault, ProofRecord},
    models::{WalletId, WalletView},
    state::AppState,
    storage::ProofKind,
};

pub mod admin;
pub mod health;
pub mod transactions;
pub mod wallets;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/wallets", post(wallets::create_wallet))
        .route("/wallets/{wallet_id}", get(wallets::get_wallet))
        .route("/wallets/{wallet_id}/limits", put(wallets::update_limits))
        .route("/wallets/{wallet_id}/proofs", get(wallets::list_proofs))
        .route("/wallets/{wallet_id}/deposit", post(transactions::deposit))
        .route("/wallets/{wallet_id}/withdraw", post(transactions::withdraw))
        .route("/wallets/{wallet_id}/transfer", post(transactions::transfer))
        .route(
            "/admin/wallets/{wallet_id}/freeze",
            post(admin::freeze_wallet),
        )
        .route(
            "/admin/wallets/{wallet_id}/unfreeze",
            post(admin::unfreeze_wallet),
        )
        .route("/admin/wallets/{wallet_id}/kyc", post(admin::verify_kyc))
        .route("/admin/vault", get(admin::get_vault))
        .route("/admin/vault/withdraw", post(admin::withdraw_fees))
        .route("/admin/stats", get(admin::get_system_stats))
        .route("/admin/attestations/mint", post(admin::mint_identifier));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        health::readiness,
        wallets::create_wallet,
        wallets::get_wallet,
        wallets::update_limits,
        wallets::list_proofs,
        transactions::deposit,
        transactions::withdraw,
        transactions::transfer,
        admin::freeze_wallet,
        admin::unfreeze_wallet,
        admin::verify_kyc,
        admin::get_vault,
        admin::withdraw_fees,
        admin::get_system_stats,
        admin::mint_identifier
    ),
    components(
        schemas(
            WalletId,
            WalletView,
            Attestation,
            ProofRecord,
            FeeVault,
            ProofKind
        )
    ),
    tags(
        (name = "Health", description = "Service health probes"),
        (name = "Wallets", description = "Wallet lifecycle and proof history"),
        (name = "Transactions", description = "Attestation-gated money movement"),
        (name = "Admin", description = "Capability-gated administration")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::auth::AdminSecret;
    use crate::events::TracingSink;
    use crate::ledger::Ledger;

    fn test_state() -> AppState {
        AppState::new(
            Ledger::new(),
            None,
            Arc::new(TracingSink),
            Some(AdminSecret::new("test-capability")),
        )
    }

    fn attestation_json(identifier: u64) -> serde_json::Value {
        serde_json::json!({
            "transaction_hash": format!("0xhash{identifier}"),
            "signature": "c2ln",
            "verifier_public_key": "cGs=",
            "verifier_timestamp": 1_700_000_000u64,
            "identifier": identifier,
            "metadata": ""
        })
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        user: Option<&str>,
        bearer: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("x-user-id", user);
        }
        if let Some(bearer) = bearer {
            builder = builder.header("authorization", format!("Bearer {bearer}"));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(AppState::default());
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn deposit_then_withdraw_end_to_end() {
        let app = router(test_state());

        let (status, body) = send(&app, "POST", "/v1/wallets", Some("user_1"), None, None).await;
        assert_eq!(status, StatusCode::CREATED);
        let wallet_id = body["wallet"]["wallet_id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "POST",
            &format!("/v1/wallets/{wallet_id}/deposit"),
            Some("user_1"),
            None,
            Some(serde_json::json!({
                "amount": 6_000_000_000u64,
                "attestation": attestation_json(1)
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["new_balance"], 6_000_000_000u64);

        let (status, body) = send(
            &app,
            "POST",
            &format!("/v1/wallets/{wallet_id}/withdraw"),
            Some("user_1"),
            None,
            Some(serde_json::json!({
                "destination": "avax:dest",
                "amount": 5_000_000_000u64,
                "attestation": attestation_json(2)
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fee"], 25_000_000u64);
        assert_eq!(body["new_balance"], 975_000_000u64);
        assert_eq!(body["proof"]["amount"], 5_000_000_000u64);

        // Replaying the consumed attestation is rejected.
        let (status, _) = send(
            &app,
            "POST",
            &format!("/v1/wallets/{wallet_id}/withdraw"),
            Some("user_1"),
            None,
            Some(serde_json::json!({
                "destination": "avax:dest",
                "amount": 1_000_000u64,
                "attestation": attestation_json(2)
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn missing_identity_is_unauthorized() {
        let app = router(test_state());
        let (status, _) = send(&app, "POST", "/v1/wallets", None, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn other_users_wallet_is_forbidden() {
        let app = router(test_state());
        let (_, body) = send(&app, "POST", "/v1/wallets", Some("user_1"), None, None).await;
        let wallet_id = body["wallet"]["wallet_id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            "GET",
            &format!("/v1/wallets/{wallet_id}"),
            Some("user_2"),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_surface_requires_capability() {
        let app = router(test_state());
        let (_, body) = send(&app, "POST", "/v1/wallets", Some("user_1"), None, None).await;
        let wallet_id = body["wallet"]["wallet_id"].as_str().unwrap().to_string();
        let freeze_uri = format!("/v1/admin/wallets/{wallet_id}/freeze");

        let (status, _) = send(&app, "POST", &freeze_uri, None, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, "POST", &freeze_uri, None, Some("wrong"), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(&app, "POST", &freeze_uri, None, Some("test-capability"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["changed"], true);
        assert_eq!(body["wallet"]["frozen"], true);

        // Frozen wallets reject deposits.
        let (status, _) = send(
            &app,
            "POST",
            &format!("/v1/wallets/{wallet_id}/deposit"),
            Some("user_1"),
            None,
            Some(serde_json::json!({
                "amount": 1u64,
                "attestation": attestation_json(1)
            })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_disabled_without_configured_capability() {
        let app = router(AppState::default());
        let (status, _) = send(&app, "GET", "/v1/admin/stats", None, Some("anything"), None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
