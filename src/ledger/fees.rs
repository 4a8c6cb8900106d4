// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Platform fee policy and the shared fee vault.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{BASIS_POINT_DENOMINATOR, FEE_BASIS_POINTS};

use super::LedgerError;

/// Platform fee for a withdrawal: `floor(amount * bps / 10_000)`.
///
/// Pure and total, no failure modes. The multiplication is widened to u128
/// so the full u64 amount range is fee-able without overflow.
pub fn platform_fee(amount: u64) -> u64 {
    ((amount as u128 * FEE_BASIS_POINTS as u128) / BASIS_POINT_DENOMINATOR as u128) as u64
}

/// Platform fee for an internal transfer: half the withdrawal fee, floored.
pub fn transfer_fee(amount: u64) -> u64 {
    platform_fee(amount) / 2
}

/// The singleton pool accumulating collected platform fees.
///
/// Mutated only by transaction settlement (credit) and the capability-gated
/// withdrawal operation (debit). Invariant: `balance == total_collected -
/// total_withdrawn` for all operation histories.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct FeeVault {
    /// Fees currently held.
    pub balance: u64,
    /// Cumulative fees ever collected.
    pub total_collected: u64,
    /// Cumulative fees ever withdrawn.
    pub total_withdrawn: u64,
}

impl FeeVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit a collected fee. Must not fail: it runs after the settlement
    /// commit point.
    pub(super) fn credit(&mut self, fee: u64) {
        self.balance = self.balance.saturating_add(fee);
        self.total_collected = self.total_collected.saturating_add(fee);
    }

    /// Debit `amount` toward an administrative withdrawal.
    pub(super) fn debit(&mut self, amount: u64) -> Result<(), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        if self.balance < amount {
            return Err(LedgerError::InsufficientBalance);
        }
        self.balance -= amount;
        self.total_withdrawn = self.total_withdrawn.saturating_add(amount);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_is_fifty_basis_points() {
        assert_eq!(platform_fee(10_000), 50);
        assert_eq!(platform_fee(5_000_000_000), 25_000_000);
        assert_eq!(platform_fee(0), 0);
        // Floor: 199 * 50 / 10_000 = 0.995 -> 0
        assert_eq!(platform_fee(199), 0);
    }

    #[test]
    fn transfer_fee_is_half_floored() {
        assert_eq!(transfer_fee(2_000_000_000), 5_000_000);
        // platform_fee(300) = 1, halved floors to 0
        assert_eq!(transfer_fee(300), 0);
    }

    #[test]
    fn fee_survives_max_amount() {
        // Would overflow u64 without the u128 widening.
        assert_eq!(platform_fee(u64::MAX), u64::MAX / 200);
    }

    #[test]
    fn vault_conserves_balance() {
        let mut vault = FeeVault::new();
        vault.credit(100);
        vault.credit(50);
        vault.debit(30).unwrap();
        assert_eq!(vault.balance, 120);
        assert_eq!(vault.total_collected, 150);
        assert_eq!(vault.total_withdrawn, 30);
        assert_eq!(vault.balance, vault.total_collected - vault.total_withdrawn);
    }

    #[test]
    fn vault_debit_preconditions() {
        let mut vault = FeeVault::new();
        vault.credit(10);
        assert_eq!(vault.debit(0), Err(LedgerError::InvalidAmount));
        assert_eq!(vault.debit(11), Err(LedgerError::InsufficientBalance));
        // Failed debits leave the vault untouched.
        assert_eq!(vault.balance, 10);
        assert_eq!(vault.total_withdrawn, 0);
    }
}
