// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Immutable settlement receipts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::WalletId;

use super::Attestation;

/// Receipt binding an attestation to its on-ledger financial effect.
///
/// Created exactly once per accepted withdrawal/transfer, scoped to the
/// debited account, and handed to that account's owner. Never mutated after
/// construction; the proof history database stores it verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ProofRecord {
    /// Unique proof identifier (UUID).
    pub proof_id: String,
    /// Hash of the settled transaction, copied from the attestation.
    pub transaction_hash: String,
    /// The full attestation that authorized the movement.
    pub attestation: Attestation,
    /// The debited account (a back-reference by identity, not ownership).
    pub wallet_id: WalletId,
    /// Principal moved, excluding the fee.
    pub amount: u64,
    /// Local settlement timestamp.
    pub settled_at: DateTime<Utc>,
}

impl ProofRecord {
    pub(super) fn new(
        attestation: Attestation,
        wallet_id: WalletId,
        amount: u64,
        settled_at: DateTime<Utc>,
    ) -> Self {
        Self {
            proof_id: uuid::Uuid::new_v4().to_string(),
            transaction_hash: attestation.transaction_hash.clone(),
            attestation,
            wallet_id,
            amount,
            settled_at,
        }
    }
}
