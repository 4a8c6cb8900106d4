// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ledger accounts and the rolling daily spend window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{DAY_WINDOW_MS, DEFAULT_DAILY_LIMIT, DEFAULT_TRANSACTION_LIMIT};
use crate::models::WalletId;

/// Sentinel for a day window that has never been observed.
///
/// Any real day index compares greater, so the first spend check after
/// creation always resets the window.
const WINDOW_UNINITIALIZED: i64 = -1;

/// Map a wall-clock instant to its day-window index.
///
/// Fixed-length 24h buckets over milliseconds since epoch. The tracker never
/// looks backward; a regressing clock value is silently ignored by
/// [`WalletAccount::reset_if_new_window`].
pub fn day_index(now: DateTime<Utc>) -> i64 {
    now.timestamp_millis() / DAY_WINDOW_MS
}

/// A custody-side ledger account.
///
/// The unit of mutation for deposit/withdraw/transfer. Mutated exclusively by
/// the transaction engine and the capability-gated admin operations; the
/// balance can never go negative (u64 plus checked arithmetic at every debit
/// site).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletAccount {
    /// Unique wallet identifier (UUID).
    pub wallet_id: WalletId,
    /// User ID of the owner.
    pub owner_user_id: String,
    /// Balance in smallest indivisible units.
    pub balance: u64,
    /// Frozen wallets reject every money-moving operation.
    pub frozen: bool,
    /// Set by the administrative authority after external KYC review.
    pub kyc_verified: bool,
    /// Rolling daily spending limit.
    pub daily_limit: u64,
    /// Per-transaction limit.
    pub transaction_limit: u64,
    /// Amount spent inside the current day window.
    pub daily_spent: u64,
    /// Day index of the last observed window reset.
    pub last_reset_day: i64,
    /// Cumulative amount received.
    pub total_received: u64,
    /// Cumulative amount sent.
    pub total_sent: u64,
    /// Count of accepted withdrawals/transfers. Only ever increases.
    pub transaction_count: u64,
    /// When the wallet was created.
    pub created_at: DateTime<Utc>,
}

impl WalletAccount {
    /// Create an empty account: zero balance, default limits, unfrozen,
    /// KYC-unverified, day window uninitialized.
    pub fn new(wallet_id: WalletId, owner_user_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            wallet_id,
            owner_user_id: owner_user_id.into(),
            balance: 0,
            frozen: false,
            kyc_verified: false,
            daily_limit: DEFAULT_DAILY_LIMIT,
            transaction_limit: DEFAULT_TRANSACTION_LIMIT,
            daily_spent: 0,
            last_reset_day: WINDOW_UNINITIALIZED,
            total_received: 0,
            total_sent: 0,
            transaction_count: 0,
            created_at: now,
        }
    }

    /// Roll the daily window forward if `current_day` is newer than the last
    /// observed one. No-op within the same day; no-op on a regressed clock.
    ///
    /// Must run before any spend-limit check in withdraw/transfer.
    pub fn reset_if_new_window(&mut self, current_day: i64) {
        if current_day > self.last_reset_day {
            self.daily_spent = 0;
            self.last_reset_day = current_day;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn account() -> WalletAccount {
        WalletAccount::new(
            WalletId::from("w1"),
            "user_1",
            Utc.timestamp_millis_opt(0).unwrap(),
        )
    }

    #[test]
    fn new_account_defaults() {
        let acct = account();
        assert_eq!(acct.balance, 0);
        assert!(!acct.frozen);
        assert!(!acct.kyc_verified);
        assert_eq!(acct.daily_limit, DEFAULT_DAILY_LIMIT);
        assert_eq!(acct.transaction_limit, DEFAULT_TRANSACTION_LIMIT);
        assert_eq!(acct.last_reset_day, WINDOW_UNINITIALIZED);
        assert_eq!(acct.transaction_count, 0);
    }

    #[test]
    fn first_window_check_always_resets() {
        let mut acct = account();
        acct.daily_spent = 500;
        acct.reset_if_new_window(0);
        assert_eq!(acct.daily_spent, 0);
        assert_eq!(acct.last_reset_day, 0);
    }

    #[test]
    fn same_day_reset_is_idempotent() {
        let mut acct = account();
        acct.reset_if_new_window(100);
        acct.daily_spent = 42;
        acct.reset_if_new_window(100);
        assert_eq!(acct.daily_spent, 42);
        assert_eq!(acct.last_reset_day, 100);
    }

    #[test]
    fn day_boundary_resets_exactly_once() {
        let mut acct = account();
        acct.reset_if_new_window(100);
        acct.daily_spent = 42;
        acct.reset_if_new_window(101);
        assert_eq!(acct.daily_spent, 0);
        assert_eq!(acct.last_reset_day, 101);
    }

    #[test]
    fn regressed_clock_is_ignored() {
        let mut acct = account();
        acct.reset_if_new_window(100);
        acct.daily_spent = 42;
        acct.reset_if_new_window(99);
        assert_eq!(acct.daily_spent, 42);
        assert_eq!(acct.last_reset_day, 100);
    }

    #[test]
    fn day_index_buckets_by_24h() {
        let start_of_day_two = Utc.timestamp_millis_opt(2 * 86_400_000).unwrap();
        assert_eq!(day_index(start_of_day_two), 2);
        let just_before = Utc.timestamp_millis_opt(2 * 86_400_000 - 1).unwrap();
        assert_eq!(day_index(just_before), 1);
    }
}
