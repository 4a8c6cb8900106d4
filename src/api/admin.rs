// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Capability-gated administrative endpoints.
//!
//! Freeze/unfreeze, KYC verification, fee vault management, aggregate
//! statistics, and attestation identifier minting for integration harnesses.
//! Every handler requires the administrative capability; possession is the
//! entire authorization check.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    auth::AdminAuth,
    error::ApiError,
    events::LedgerEvent,
    ledger::FeeVault,
    models::{WalletId, WalletView},
    state::AppState,
};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response after a freeze/unfreeze/KYC mutation.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminWalletResponse {
    /// The wallet after the mutation.
    pub wallet: WalletView,
    /// Whether the flag actually changed (these operations are idempotent).
    pub changed: bool,
}

/// Request to drain collected fees from the vault.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VaultWithdrawRequest {
    /// Amount to withdraw, in smallest units.
    pub amount: u64,
    /// Recipient identity for the drained fees (uninterpreted).
    pub recipient: String,
}

/// Response after a vault withdrawal.
#[derive(Debug, Serialize, ToSchema)]
pub struct VaultWithdrawResponse {
    /// Amount withdrawn.
    pub amount: u64,
    /// Recipient identity.
    pub recipient: String,
    /// Vault balance after the withdrawal.
    pub remaining_balance: u64,
}

/// System statistics response.
#[derive(Debug, Serialize, ToSchema)]
pub struct SystemStatsResponse {
    /// Total number of wallets.
    pub total_wallets: usize,
    /// Number of frozen wallets.
    pub frozen_wallets: usize,
    /// Number of KYC-verified wallets.
    pub kyc_verified_wallets: usize,
    /// Attestation identifiers consumed so far.
    pub consumed_attestations: usize,
    /// Stored proof records (absent when running history-less).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_records: Option<u64>,
    /// Current fee vault state.
    pub vault: FeeVault,
    /// Server uptime in seconds.
    pub uptime_seconds: u64,
    /// Current timestamp.
    pub timestamp: String,
}

/// Response carrying a freshly minted attestation identifier.
#[derive(Debug, Serialize, ToSchema)]
pub struct MintIdentifierResponse {
    /// Never-colliding identifier for harness-built attestations.
    pub identifier: u64,
}

// ============================================================================
// Handlers
// ============================================================================

/// Freeze a wallet. Idempotent.
#[utoipa::path(
    post,
    path = "/v1/admin/wallets/{wallet_id}/freeze",
    tag = "Admin",
    params(
        ("wallet_id" = String, Path, description = "Wallet ID")
    ),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Wallet frozen", body = AdminWalletResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Invalid capability"),
        (status = 404, description = "Wallet not found")
    )
)]
pub async fn freeze_wallet(
    AdminAuth(capability): AdminAuth,
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
) -> Result<Json<AdminWalletResponse>, ApiError> {
    let wallet_id = WalletId(wallet_id);
    let (view, changed) = {
        let mut ledger = state.ledger.write().await;
        let changed = ledger.set_frozen(&capability, &wallet_id, true)?;
        (WalletView::from(ledger.wallet(&wallet_id)?), changed)
    };

    if changed {
        state.events.publish(&LedgerEvent::WalletFrozen {
            wallet_id: wallet_id.clone(),
            timestamp: Utc::now(),
        });
        tracing::info!(wallet_id = %wallet_id, "wallet frozen");
    }

    Ok(Json(AdminWalletResponse {
        wallet: view,
        changed,
    }))
}

/// Unfreeze a wallet. Idempotent.
#[utoipa::path(
    post,
    path = "/v1/admin/wallets/{wallet_id}/unfreeze",
    tag = "Admin",
    params(
        ("wallet_id" = String, Path, description = "Wallet ID")
    ),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Wallet unfrozen", body = AdminWalletResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Invalid capability"),
        (status = 404, description = "Wallet not found")
    )
)]
pub async fn unfreeze_wallet(
    AdminAuth(capability): AdminAuth,
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
) -> Result<Json<AdminWalletResponse>, ApiError> {
    let wallet_id = WalletId(wallet_id);
    let (view, changed) = {
        let mut ledger = state.ledger.write().await;
        let changed = ledger.set_frozen(&capability, &wallet_id, false)?;
        (WalletView::from(ledger.wallet(&wallet_id)?), changed)
    };

    if changed {
        state.events.publish(&LedgerEvent::WalletUnfrozen {
            wallet_id: wallet_id.clone(),
            timestamp: Utc::now(),
        });
        tracing::info!(wallet_id = %wallet_id, "wallet unfrozen");
    }

    Ok(Json(AdminWalletResponse {
        wallet: view,
        changed,
    }))
}

/// Mark a wallet KYC-verified. Idempotent.
#[utoipa::path(
    post,
    path = "/v1/admin/wallets/{wallet_id}/kyc",
    tag = "Admin",
    params(
        ("wallet_id" = String, Path, description = "Wallet ID")
    ),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Wallet KYC-verified", body = AdminWalletResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Invalid capability"),
        (status = 404, description = "Wallet not found")
    )
)]
pub async fn verify_kyc(
    AdminAuth(capability): AdminAuth,
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
) -> Result<Json<AdminWalletResponse>, ApiError> {
    let wallet_id = WalletId(wallet_id);
    let (view, changed) = {
        let mut ledger = state.ledger.write().await;
        let changed = ledger.verify_kyc(&capability, &wallet_id)?;
        (WalletView::from(ledger.wallet(&wallet_id)?), changed)
    };

    if changed {
        state.events.publish(&LedgerEvent::KycVerified {
            wallet_id: wallet_id.clone(),
            timestamp: Utc::now(),
        });
        tracing::info!(wallet_id = %wallet_id, "wallet KYC-verified");
    }

    Ok(Json(AdminWalletResponse {
        wallet: view,
        changed,
    }))
}

/// Current fee vault state.
#[utoipa::path(
    get,
    path = "/v1/admin/vault",
    tag = "Admin",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Vault state", body = FeeVault),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Invalid capability")
    )
)]
pub async fn get_vault(
    AdminAuth(_capability): AdminAuth,
    State(state): State<AppState>,
) -> Json<FeeVault> {
    Json(state.ledger.read().await.vault().clone())
}

/// Drain collected fees from the vault.
///
/// A local policy operation; no attestation involved.
#[utoipa::path(
    post,
    path = "/v1/admin/vault/withdraw",
    tag = "Admin",
    request_body = VaultWithdrawRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Fees withdrawn", body = VaultWithdrawResponse),
        (status = 400, description = "Invalid amount"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Invalid capability"),
        (status = 422, description = "Insufficient vault balance")
    )
)]
pub async fn withdraw_fees(
    AdminAuth(capability): AdminAuth,
    State(state): State<AppState>,
    Json(request): Json<VaultWithdrawRequest>,
) -> Result<Json<VaultWithdrawResponse>, ApiError> {
    let remaining = state
        .ledger
        .write()
        .await
        .withdraw_fees(&capability, request.amount)?;

    tracing::info!(
        amount = request.amount,
        recipient = %request.recipient,
        remaining,
        "fee vault withdrawal"
    );

    Ok(Json(VaultWithdrawResponse {
        amount: request.amount,
        recipient: request.recipient,
        remaining_balance: remaining,
    }))
}

/// Aggregate system statistics.
#[utoipa::path(
    get,
    path = "/v1/admin/stats",
    tag = "Admin",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "System statistics", body = SystemStatsResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Invalid capability")
    )
)]
pub async fn get_system_stats(
    AdminAuth(_capability): AdminAuth,
    State(state): State<AppState>,
) -> Json<SystemStatsResponse> {
    let (total_wallets, frozen_wallets, kyc_verified_wallets, consumed, vault) = {
        let ledger = state.ledger.read().await;
        let total = ledger.accounts().count();
        let frozen = ledger.accounts().filter(|a| a.frozen).count();
        let kyc = ledger.accounts().filter(|a| a.kyc_verified).count();
        (
            total,
            frozen,
            kyc,
            ledger.consumed_attestations(),
            ledger.vault().clone(),
        )
    };

    let proof_records = state
        .proof_db
        .as_ref()
        .and_then(|db| db.count().ok());

    Json(SystemStatsResponse {
        total_wallets,
        frozen_wallets,
        kyc_verified_wallets,
        consumed_attestations: consumed,
        proof_records,
        vault,
        uptime_seconds: state.started_at.elapsed().as_secs(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Mint a fresh attestation identifier.
///
/// For integration harnesses that build their own attestations; real
/// identifiers are assigned by the external verifier.
#[utoipa::path(
    post,
    path = "/v1/admin/attestations/mint",
    tag = "Admin",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Fresh identifier", body = MintIdentifierResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Invalid capability")
    )
)]
pub async fn mint_identifier(
    AdminAuth(_capability): AdminAuth,
    State(state): State<AppState>,
) -> Json<MintIdentifierResponse> {
    let identifier = state.ledger.write().await.mint_fresh_identifier();
    Json(MintIdentifierResponse { identifier })
}
