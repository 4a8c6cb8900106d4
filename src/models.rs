// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Shared data structures used across the REST API. Endpoint-specific
//! request/response types live next to their handlers; this module holds the
//! types that cross module boundaries.
//!
//! ## Wallet Id Type
//!
//! The [`WalletId`] newtype wraps the opaque ledger account identifier
//! (UUID-minted at creation). It provides type safety and clear semantics.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::ledger::WalletAccount;

// =============================================================================
// Wallet Id Type
// =============================================================================

/// Opaque ledger account identifier.
///
/// Minted as a UUID at wallet creation; treated as an uninterpreted string
/// everywhere else.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WalletId(pub String);

impl std::fmt::Display for WalletId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WalletId {
    fn from(value: String) -> Self {
        WalletId(value)
    }
}

impl From<&str> for WalletId {
    fn from(value: &str) -> Self {
        WalletId(value.to_string())
    }
}

impl From<WalletId> for String {
    fn from(value: WalletId) -> Self {
        value.0
    }
}

// =============================================================================
// Wallet View
// =============================================================================

/// Wallet state returned to API clients.
///
/// A direct projection of the ledger account. Balances are integers in the
/// smallest indivisible unit, never floats.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct WalletView {
    /// Unique wallet identifier.
    pub wallet_id: WalletId,
    /// Owner's user ID.
    pub owner_user_id: String,
    /// Current balance in smallest units.
    pub balance: u64,
    /// Whether the wallet is frozen.
    pub frozen: bool,
    /// Whether the owner passed KYC verification.
    pub kyc_verified: bool,
    /// Daily spending limit.
    pub daily_limit: u64,
    /// Per-transaction limit.
    pub transaction_limit: u64,
    /// Amount spent inside the current day window.
    pub daily_spent: u64,
    /// Cumulative amount received.
    pub total_received: u64,
    /// Cumulative amount sent.
    pub total_sent: u64,
    /// Number of accepted withdrawals/transfers.
    pub transaction_count: u64,
    /// When the wallet was created.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&WalletAccount> for WalletView {
    fn from(account: &WalletAccount) -> Self {
        Self {
            wallet_id: account.wallet_id.clone(),
            owner_user_id: account.owner_user_id.clone(),
            balance: account.balance,
            frozen: account.frozen,
            kyc_verified: account.kyc_verified,
            daily_limit: account.daily_limit,
            transaction_limit: account.transaction_limit,
            daily_spent: account.daily_spent,
            total_received: account.total_received,
            total_sent: account.total_sent,
            transaction_count: account.transaction_count,
            created_at: account.created_at,
        }
    }
}
