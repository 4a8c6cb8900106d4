// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Money-movement endpoints: deposit, withdraw, transfer.
//!
//! Each handler samples the clock, takes the ledger write guard for the whole
//! operation, and only after the engine commits does it mirror the proof
//! record and publish notifications. A failed mirror write is logged and
//! dropped; the settlement is already final.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    auth::Identity,
    error::ApiError,
    events::LedgerEvent,
    ledger::{Attestation, ProofRecord},
    models::WalletId,
    state::AppState,
    storage::ProofKind,
};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Request to credit externally-sourced funds.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DepositRequest {
    /// Amount in smallest units; must be greater than zero.
    pub amount: u64,
    /// Pre-verified attestation from the TEE verifier.
    pub attestation: Attestation,
}

/// Deposit response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DepositResponse {
    /// The credited wallet.
    pub wallet_id: WalletId,
    /// Amount credited.
    pub amount: u64,
    /// Balance after the credit.
    pub new_balance: u64,
    /// Cumulative amount received.
    pub total_received: u64,
}

/// Request to move funds out of custody.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct WithdrawRequest {
    /// External destination identity (uninterpreted).
    pub destination: String,
    /// Principal amount in smallest units; the platform fee comes on top.
    pub amount: u64,
    /// Pre-verified attestation from the TEE verifier.
    pub attestation: Attestation,
}

/// Withdrawal response: the settlement receipt.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WithdrawResponse {
    /// Principal moved to the destination.
    pub amount: u64,
    /// Platform fee collected into the vault.
    pub fee: u64,
    /// Balance after debiting `amount + fee`.
    pub new_balance: u64,
    /// The immutable proof record, owned by the caller from here on.
    pub proof: ProofRecord,
}

/// Request to move funds between two custody wallets.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TransferRequest {
    /// Receiving wallet.
    pub destination_wallet_id: WalletId,
    /// Principal amount in smallest units; half the standard fee comes on top.
    pub amount: u64,
    /// Pre-verified attestation from the TEE verifier.
    pub attestation: Attestation,
}

/// Transfer response: the settlement receipt.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransferResponse {
    /// Principal credited to the destination.
    pub amount: u64,
    /// Half-rate platform fee collected into the vault.
    pub fee: u64,
    /// Source balance after debiting `amount + fee`.
    pub source_balance: u64,
    /// Destination balance after the credit.
    pub destination_balance: u64,
    /// The immutable proof record, scoped to the source wallet.
    pub proof: ProofRecord,
}

// =============================================================================
// Helpers
// =============================================================================

/// Mirror a committed proof record into the durable history.
fn mirror_proof(state: &AppState, proof: &ProofRecord, kind: ProofKind) {
    if let Some(db) = &state.proof_db {
        if let Err(e) = db.insert(proof, kind) {
            tracing::warn!(
                error = %e,
                proof_id = %proof.proof_id,
                "Failed to mirror proof record"
            );
        }
    }
}

/// Publish the settlement notifications shared by withdraw and transfer.
fn publish_settlement(
    state: &AppState,
    proof: &ProofRecord,
    fee: u64,
    vault_balance: u64,
    now: DateTime<Utc>,
) {
    state.events.publish(&LedgerEvent::FeeCollected {
        wallet_id: proof.wallet_id.clone(),
        fee,
        vault_balance,
        timestamp: now,
    });
    state.events.publish(&LedgerEvent::transaction_verified(proof));
}

// =============================================================================
// Handlers
// =============================================================================

/// Credit externally-sourced funds against a fresh attestation.
///
/// Deposits carry no fee, no limit check, and produce no proof record.
#[utoipa::path(
    post,
    path = "/v1/wallets/{wallet_id}/deposit",
    tag = "Transactions",
    params(
        ("wallet_id" = String, Path, description = "Wallet ID")
    ),
    request_body = DepositRequest,
    responses(
        (status = 200, description = "Deposit settled", body = DepositResponse),
        (status = 400, description = "Invalid amount"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Wallet frozen"),
        (status = 404, description = "Wallet not found"),
        (status = 409, description = "Attestation already consumed")
    )
)]
pub async fn deposit(
    Identity(_user_id): Identity,
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
    Json(request): Json<DepositRequest>,
) -> Result<Json<DepositResponse>, ApiError> {
    let wallet_id = WalletId(wallet_id);
    let now = Utc::now();

    let outcome = state
        .ledger
        .write()
        .await
        .deposit(&wallet_id, request.amount, request.attestation, now)?;

    state.events.publish(&LedgerEvent::DepositSettled {
        wallet_id: wallet_id.clone(),
        amount: outcome.amount,
        new_balance: outcome.new_balance,
        timestamp: now,
    });
    tracing::info!(wallet_id = %wallet_id, amount = outcome.amount, "deposit settled");

    Ok(Json(DepositResponse {
        wallet_id,
        amount: outcome.amount,
        new_balance: outcome.new_balance,
        total_received: outcome.total_received,
    }))
}

/// Move funds out of custody toward an external destination.
///
/// Debits `amount + fee` from the wallet, credits the fee vault, and returns
/// the proof record binding the attestation to the movement.
#[utoipa::path(
    post,
    path = "/v1/wallets/{wallet_id}/withdraw",
    tag = "Transactions",
    params(
        ("wallet_id" = String, Path, description = "Wallet ID")
    ),
    request_body = WithdrawRequest,
    responses(
        (status = 200, description = "Withdrawal settled", body = WithdrawResponse),
        (status = 400, description = "Invalid or below-minimum amount"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Wallet frozen or caller not owner"),
        (status = 404, description = "Wallet not found"),
        (status = 409, description = "Attestation already consumed"),
        (status = 422, description = "Limit or balance violation")
    )
)]
pub async fn withdraw(
    Identity(user_id): Identity,
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
    Json(request): Json<WithdrawRequest>,
) -> Result<Json<WithdrawResponse>, ApiError> {
    let wallet_id = WalletId(wallet_id);
    let now = Utc::now();

    let (settlement, vault_balance) = {
        let mut ledger = state.ledger.write().await;
        let settlement = ledger.withdraw(
            &wallet_id,
            &user_id,
            &request.destination,
            request.amount,
            request.attestation,
            now,
        )?;
        (settlement, ledger.vault().balance)
    };

    mirror_proof(&state, &settlement.proof, ProofKind::Withdrawal);

    state.events.publish(&LedgerEvent::WithdrawalSettled {
        wallet_id: wallet_id.clone(),
        destination: settlement.destination.clone(),
        amount: settlement.amount,
        fee: settlement.fee,
        timestamp: now,
    });
    publish_settlement(&state, &settlement.proof, settlement.fee, vault_balance, now);
    tracing::info!(
        wallet_id = %wallet_id,
        amount = settlement.amount,
        fee = settlement.fee,
        proof_id = %settlement.proof.proof_id,
        "withdrawal settled"
    );

    Ok(Json(WithdrawResponse {
        amount: settlement.amount,
        fee: settlement.fee,
        new_balance: settlement.new_balance,
        proof: settlement.proof,
    }))
}

/// Move funds between two custody wallets at half the withdrawal fee.
#[utoipa::path(
    post,
    path = "/v1/wallets/{wallet_id}/transfer",
    tag = "Transactions",
    params(
        ("wallet_id" = String, Path, description = "Source wallet ID")
    ),
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Transfer settled", body = TransferResponse),
        (status = 400, description = "Invalid or below-minimum amount"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "A wallet is frozen or caller not owner"),
        (status = 404, description = "Wallet not found"),
        (status = 409, description = "Attestation already consumed"),
        (status = 422, description = "Limit or balance violation")
    )
)]
pub async fn transfer(
    Identity(user_id): Identity,
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
    Json(request): Json<TransferRequest>,
) -> Result<Json<TransferResponse>, ApiError> {
    let source_id = WalletId(wallet_id);
    let now = Utc::now();

    let (outcome, vault_balance) = {
        let mut ledger = state.ledger.write().await;
        let outcome = ledger.transfer(
            &source_id,
            &user_id,
            &request.destination_wallet_id,
            request.amount,
            request.attestation,
            now,
        )?;
        (outcome, ledger.vault().balance)
    };

    mirror_proof(&state, &outcome.proof, ProofKind::Transfer);

    state.events.publish(&LedgerEvent::TransferSettled {
        source_wallet_id: source_id.clone(),
        destination_wallet_id: request.destination_wallet_id.clone(),
        amount: outcome.amount,
        fee: outcome.fee,
        timestamp: now,
    });
    publish_settlement(&state, &outcome.proof, outcome.fee, vault_balance, now);
    tracing::info!(
        source = %source_id,
        destination = %request.destination_wallet_id,
        amount = outcome.amount,
        fee = outcome.fee,
        "transfer settled"
    );

    Ok(Json(TransferResponse {
        amount: outcome.amount,
        fee: outcome.fee,
        source_balance: outcome.source_balance,
        destination_balance: outcome.destination_balance,
        proof: outcome.proof,
    }))
}
