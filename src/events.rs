// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Outbound notifications for the reconciliation backend.
//!
//! Every state change the backend cares about is published as one
//! [`LedgerEvent`] through an [`EventSink`]. Publication is fire-and-forget:
//! sinks must not fail the operation that produced the event, and delivery
//! transport is the sink implementation's concern. The default
//! [`TracingSink`] emits one structured log record per event under the
//! `ledger_events` target; the backend tails that stream.

use base64ct::{Base64, Encoding};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::WalletId;

/// Notification payloads, one variant per settled state change.
///
/// The serialized shape is the contract with the reconciliation backend;
/// field renames here are breaking changes.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    WalletCreated {
        wallet_id: WalletId,
        owner_user_id: String,
        timestamp: DateTime<Utc>,
    },
    DepositSettled {
        wallet_id: WalletId,
        amount: u64,
        new_balance: u64,
        timestamp: DateTime<Utc>,
    },
    WithdrawalSettled {
        wallet_id: WalletId,
        destination: String,
        amount: u64,
        fee: u64,
        timestamp: DateTime<Utc>,
    },
    TransferSettled {
        source_wallet_id: WalletId,
        destination_wallet_id: WalletId,
        amount: u64,
        fee: u64,
        timestamp: DateTime<Utc>,
    },
    WalletFrozen {
        wallet_id: WalletId,
        timestamp: DateTime<Utc>,
    },
    WalletUnfrozen {
        wallet_id: WalletId,
        timestamp: DateTime<Utc>,
    },
    LimitsUpdated {
        wallet_id: WalletId,
        daily_limit: u64,
        transaction_limit: u64,
        timestamp: DateTime<Utc>,
    },
    KycVerified {
        wallet_id: WalletId,
        timestamp: DateTime<Utc>,
    },
    FeeCollected {
        wallet_id: WalletId,
        fee: u64,
        vault_balance: u64,
        timestamp: DateTime<Utc>,
    },
    /// Lets the backend reconcile attested on-chain state with its own
    /// database: one per accepted withdrawal/transfer, carrying the proof
    /// record linkage.
    TransactionVerified {
        transaction_hash: String,
        /// Verifier signature, base64.
        attestation_signature: String,
        proof_record_id: String,
        wallet_id: WalletId,
        amount: u64,
        timestamp: DateTime<Utc>,
    },
}

impl LedgerEvent {
    /// Build the reconciliation event for an accepted settlement.
    pub fn transaction_verified(proof: &crate::ledger::ProofRecord) -> Self {
        Self::TransactionVerified {
            transaction_hash: proof.transaction_hash.clone(),
            attestation_signature: Base64::encode_string(&proof.attestation.signature),
            proof_record_id: proof.proof_id.clone(),
            wallet_id: proof.wallet_id.clone(),
            amount: proof.amount,
            timestamp: proof.settled_at,
        }
    }
}

/// Fire-and-forget event publication.
///
/// Implementations must be non-blocking and infallible from the caller's
/// perspective; a sink that cannot deliver logs and drops.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: &LedgerEvent);
}

/// Default sink: one structured `tracing` record per event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn publish(&self, event: &LedgerEvent) {
        match serde_json::to_string(event) {
            Ok(payload) => {
                tracing::info!(target: "ledger_events", payload = %payload, "ledger event")
            }
            Err(e) => tracing::warn!(target: "ledger_events", error = %e, "unserializable event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_tag_by_snake_case_type() {
        let event = LedgerEvent::DepositSettled {
            wallet_id: WalletId::from("w1"),
            amount: 5,
            new_balance: 5,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "deposit_settled");
        assert_eq!(json["amount"], 5);
    }

    #[test]
    fn tracing_sink_never_panics() {
        let event = LedgerEvent::WalletFrozen {
            wallet_id: WalletId::from("w1"),
            timestamp: Utc::now(),
        };
        TracingSink.publish(&event);
    }
}
