// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet lifecycle API endpoints.
//!
//! Creation, owner views, limit updates, and proof record history. All
//! operations require the proxy-asserted identity and enforce ownership.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    auth::Identity,
    error::ApiError,
    events::LedgerEvent,
    ledger::ProofRecord,
    models::{WalletId, WalletView},
    state::AppState,
    storage::ProofKind,
};

/// Response after creating a wallet.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateWalletResponse {
    /// The created wallet state.
    pub wallet: WalletView,
    /// Message indicating success.
    pub message: String,
}

/// Request to update per-wallet spending limits.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateLimitsRequest {
    /// New rolling daily spending limit, in smallest units.
    pub daily_limit: u64,
    /// New per-transaction limit, in smallest units.
    pub transaction_limit: u64,
}

/// Query parameters for the proof record listing.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ProofListQuery {
    /// Maximum number of results (default: 50).
    #[param(default = 50)]
    pub limit: Option<usize>,
}

/// A proof record together with the operation that produced it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProofListItem {
    /// Which settlement kind produced this record.
    pub kind: ProofKind,
    /// The immutable proof record.
    pub proof: ProofRecord,
}

/// Proof record listing response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProofListResponse {
    /// Newest-first proof records.
    pub proofs: Vec<ProofListItem>,
}

/// Create a new custody wallet for the authenticated caller.
///
/// The wallet starts empty: zero balance, default limits, unfrozen,
/// KYC-unverified.
#[utoipa::path(
    post,
    path = "/v1/wallets",
    tag = "Wallets",
    responses(
        (status = 201, description = "Wallet created successfully", body = CreateWalletResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_wallet(
    Identity(user_id): Identity,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CreateWalletResponse>), ApiError> {
    let now = Utc::now();
    let account = state.ledger.write().await.create_wallet(&user_id, now);

    state.events.publish(&LedgerEvent::WalletCreated {
        wallet_id: account.wallet_id.clone(),
        owner_user_id: user_id,
        timestamp: now,
    });
    tracing::info!(wallet_id = %account.wallet_id, "wallet created");

    Ok((
        StatusCode::CREATED,
        Json(CreateWalletResponse {
            wallet: WalletView::from(&account),
            message: "Wallet created successfully".to_string(),
        }),
    ))
}

/// Get the caller's wallet state.
#[utoipa::path(
    get,
    path = "/v1/wallets/{wallet_id}",
    tag = "Wallets",
    params(
        ("wallet_id" = String, Path, description = "Wallet ID")
    ),
    responses(
        (status = 200, description = "Wallet state", body = WalletView),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not wallet owner"),
        (status = 404, description = "Wallet not found")
    )
)]
pub async fn get_wallet(
    Identity(user_id): Identity,
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
) -> Result<Json<WalletView>, ApiError> {
    let ledger = state.ledger.read().await;
    let account = ledger.wallet(&WalletId(wallet_id))?;
    if account.owner_user_id != user_id {
        return Err(ApiError::forbidden("You do not own this wallet"));
    }
    Ok(Json(WalletView::from(account)))
}

/// Update the wallet's spending limits.
///
/// Owner-only, and only after KYC verification.
#[utoipa::path(
    put,
    path = "/v1/wallets/{wallet_id}/limits",
    tag = "Wallets",
    params(
        ("wallet_id" = String, Path, description = "Wallet ID")
    ),
    request_body = UpdateLimitsRequest,
    responses(
        (status = 200, description = "Limits updated", body = WalletView),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not owner or not KYC-verified"),
        (status = 404, description = "Wallet not found")
    )
)]
pub async fn update_limits(
    Identity(user_id): Identity,
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
    Json(request): Json<UpdateLimitsRequest>,
) -> Result<Json<WalletView>, ApiError> {
    let wallet_id = WalletId(wallet_id);
    let view = {
        let mut ledger = state.ledger.write().await;
        let account = ledger.update_limits(
            &wallet_id,
            &user_id,
            request.daily_limit,
            request.transaction_limit,
        )?;
        WalletView::from(account)
    };

    state.events.publish(&LedgerEvent::LimitsUpdated {
        wallet_id,
        daily_limit: request.daily_limit,
        transaction_limit: request.transaction_limit,
        timestamp: Utc::now(),
    });

    Ok(Json(view))
}

/// List the wallet's proof records, newest first.
#[utoipa::path(
    get,
    path = "/v1/wallets/{wallet_id}/proofs",
    tag = "Wallets",
    params(
        ("wallet_id" = String, Path, description = "Wallet ID"),
        ProofListQuery
    ),
    responses(
        (status = 200, description = "Proof records", body = ProofListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not wallet owner"),
        (status = 404, description = "Wallet not found")
    )
)]
pub async fn list_proofs(
    Identity(user_id): Identity,
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
    Query(query): Query<ProofListQuery>,
) -> Result<Json<ProofListResponse>, ApiError> {
    let wallet_id = WalletId(wallet_id);
    {
        let ledger = state.ledger.read().await;
        let account = ledger.wallet(&wallet_id)?;
        if account.owner_user_id != user_id {
            return Err(ApiError::forbidden("You do not own this wallet"));
        }
    }

    let limit = query.limit.unwrap_or(50);
    let proofs = match &state.proof_db {
        Some(db) => db
            .list_by_wallet(&wallet_id, limit)?
            .into_iter()
            .map(|(proof, kind)| ProofListItem { kind, proof })
            .collect(),
        None => Vec::new(),
    };

    Ok(Json(ProofListResponse { proofs }))
}
