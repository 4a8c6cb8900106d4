// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Attestation-Gated Ledger Core
//!
//! Custody-side balance accounting. Fund movement is authorized only against
//! an attestation that the external TEE verifier already validated; the only
//! local check performed on an attestation is that its identifier has never
//! been consumed before.
//!
//! The module is deliberately synchronous and lock-free: every operation runs
//! as a single all-or-nothing unit of work against `&mut Ledger`, and the
//! caller (see [`crate::state::AppState`]) is responsible for handing out
//! exclusive access per operation.
//!
//! ## Submodules
//!
//! - `fees` - platform fee policy and the shared fee vault
//! - `wallet` - ledger accounts and the rolling daily spend window
//! - `attestation` - attestation payloads and the anti-replay registry
//! - `proof` - immutable settlement receipts
//! - `engine` - deposit/withdraw/transfer orchestration and admin operations

pub mod attestation;
pub mod engine;
pub mod fees;
pub mod proof;
pub mod wallet;

pub use attestation::{Attestation, AttestationRegistry};
pub use engine::{DepositOutcome, Ledger, Settlement, TransferOutcome};
pub use fees::{platform_fee, transfer_fee, FeeVault};
pub use proof::ProofRecord;
pub use wallet::WalletAccount;

/// Precondition violations surfaced by ledger operations.
///
/// None of these are transient: the engine performs no internal recovery and
/// a violated precondition aborts the whole operation with no mutation.
/// Retry policy (e.g. requesting a fresh attestation after a replay) belongs
/// to the external caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid amount")]
    InvalidAmount,

    #[error("wallet is frozen")]
    WalletFrozen,

    #[error("caller is not authorized for this operation")]
    Unauthorized,

    #[error("amount is below the minimum transaction threshold")]
    MinimumNotMet,

    #[error("amount exceeds the per-transaction limit")]
    TransactionLimitExceeded,

    #[error("daily spending limit exceeded")]
    DailyLimitExceeded,

    #[error("insufficient balance")]
    InsufficientBalance,

    #[error("attestation identifier was already consumed")]
    AttestationReplayed,

    #[error("wallet not found")]
    WalletNotFound,
}
