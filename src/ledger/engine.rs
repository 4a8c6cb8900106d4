// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The transaction engine.
//!
//! Sole mutation path into accounts, the fee vault, and the attestation
//! registry. Every operation validates all preconditions first, then applies
//! its mutations in one infallible commit section; there is no partial-commit
//! or rollback path to reproduce. The identifier is consumed at the commit
//! point, strictly before any balance becomes observable, so a rejected
//! settlement never burns a nonce and an accepted one always does.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::auth::AdminCapability;
use crate::config::MIN_TRANSACTION_AMOUNT;
use crate::models::WalletId;

use super::fees::{platform_fee, transfer_fee, FeeVault};
use super::wallet::day_index;
use super::{Attestation, AttestationRegistry, LedgerError, ProofRecord, WalletAccount};

/// Result of an accepted deposit. Deposits are notification-class movement:
/// no fee, no limit check, no proof record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositOutcome {
    pub amount: u64,
    pub new_balance: u64,
    pub total_received: u64,
}

/// Result of an accepted withdrawal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub proof: ProofRecord,
    pub amount: u64,
    pub fee: u64,
    pub destination: String,
    pub new_balance: u64,
}

/// Result of an accepted internal transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    pub proof: ProofRecord,
    pub amount: u64,
    pub fee: u64,
    pub source_balance: u64,
    pub destination_balance: u64,
}

/// The in-memory ledger: accounts, the shared fee vault, and the anti-replay
/// registry.
///
/// Operations take `&mut self`; the surrounding state layer serializes
/// conflicting operations by handing out exclusive access per operation, so
/// no operation ever observes or leaves a half-applied state.
#[derive(Debug, Default)]
pub struct Ledger {
    accounts: HashMap<WalletId, WalletAccount>,
    vault: FeeVault,
    registry: AttestationRegistry,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Create an empty wallet for `owner` and return its initial state.
    pub fn create_wallet(&mut self, owner: &str, now: DateTime<Utc>) -> WalletAccount {
        let wallet_id = WalletId(uuid::Uuid::new_v4().to_string());
        let account = WalletAccount::new(wallet_id.clone(), owner, now);
        self.accounts.insert(wallet_id, account.clone());
        account
    }

    /// Look up a wallet by id.
    pub fn wallet(&self, wallet_id: &WalletId) -> Result<&WalletAccount, LedgerError> {
        self.accounts.get(wallet_id).ok_or(LedgerError::WalletNotFound)
    }

    /// Iterate over all accounts (admin statistics).
    pub fn accounts(&self) -> impl Iterator<Item = &WalletAccount> {
        self.accounts.values()
    }

    /// Update per-account limits. Owner-only, and only once KYC-verified.
    pub fn update_limits(
        &mut self,
        wallet_id: &WalletId,
        caller: &str,
        daily_limit: u64,
        transaction_limit: u64,
    ) -> Result<&WalletAccount, LedgerError> {
        let account = self
            .accounts
            .get_mut(wallet_id)
            .ok_or(LedgerError::WalletNotFound)?;
        if account.owner_user_id != caller || !account.kyc_verified {
            return Err(LedgerError::Unauthorized);
        }
        account.daily_limit = daily_limit;
        account.transaction_limit = transaction_limit;
        Ok(account)
    }

    // =========================================================================
    // Money movement
    // =========================================================================

    /// Credit externally-sourced funds against a consumed attestation.
    pub fn deposit(
        &mut self,
        wallet_id: &WalletId,
        amount: u64,
        attestation: Attestation,
        _now: DateTime<Utc>,
    ) -> Result<DepositOutcome, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        let account = self
            .accounts
            .get_mut(wallet_id)
            .ok_or(LedgerError::WalletNotFound)?;
        if account.frozen {
            return Err(LedgerError::WalletFrozen);
        }
        let new_balance = account
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::InvalidAmount)?;
        if !self.registry.verify(&attestation) {
            return Err(LedgerError::AttestationReplayed);
        }

        // Commit: nothing below can fail.
        self.registry.mark_used(attestation.identifier);
        account.balance = new_balance;
        account.total_received = account.total_received.saturating_add(amount);

        Ok(DepositOutcome {
            amount,
            new_balance,
            total_received: account.total_received,
        })
    }

    /// Move funds out of custody toward an external destination.
    pub fn withdraw(
        &mut self,
        wallet_id: &WalletId,
        caller: &str,
        destination: &str,
        amount: u64,
        attestation: Attestation,
        now: DateTime<Utc>,
    ) -> Result<Settlement, LedgerError> {
        if amount < MIN_TRANSACTION_AMOUNT {
            return Err(LedgerError::MinimumNotMet);
        }
        let fee = platform_fee(amount);
        let debit = amount.checked_add(fee).ok_or(LedgerError::InvalidAmount)?;

        let account = self
            .accounts
            .get_mut(wallet_id)
            .ok_or(LedgerError::WalletNotFound)?;
        if account.frozen {
            return Err(LedgerError::WalletFrozen);
        }
        if account.owner_user_id != caller {
            return Err(LedgerError::Unauthorized);
        }
        account.reset_if_new_window(day_index(now));
        if account.balance < debit {
            return Err(LedgerError::InsufficientBalance);
        }
        if amount > account.transaction_limit {
            return Err(LedgerError::TransactionLimitExceeded);
        }
        let new_daily = account
            .daily_spent
            .checked_add(amount)
            .ok_or(LedgerError::DailyLimitExceeded)?;
        if new_daily > account.daily_limit {
            return Err(LedgerError::DailyLimitExceeded);
        }
        if !self.registry.verify(&attestation) {
            return Err(LedgerError::AttestationReplayed);
        }

        // Commit: nothing below can fail.
        self.registry.mark_used(attestation.identifier);
        account.balance -= debit;
        account.daily_spent = new_daily;
        account.total_sent = account.total_sent.saturating_add(amount);
        account.transaction_count += 1;
        let new_balance = account.balance;
        let proof = ProofRecord::new(attestation, wallet_id.clone(), amount, now);
        self.vault.credit(fee);

        Ok(Settlement {
            proof,
            amount,
            fee,
            destination: destination.to_string(),
            new_balance,
        })
    }

    /// Move funds between two custody wallets at half the withdrawal fee.
    ///
    /// The destination is credited exactly `amount`; the half-fee comes out
    /// of the source on top of the principal.
    pub fn transfer(
        &mut self,
        source_id: &WalletId,
        caller: &str,
        destination_id: &WalletId,
        amount: u64,
        attestation: Attestation,
        now: DateTime<Utc>,
    ) -> Result<TransferOutcome, LedgerError> {
        if source_id == destination_id {
            return Err(LedgerError::InvalidAmount);
        }
        if amount < MIN_TRANSACTION_AMOUNT {
            return Err(LedgerError::MinimumNotMet);
        }
        let fee = transfer_fee(amount);
        let debit = amount.checked_add(fee).ok_or(LedgerError::InvalidAmount)?;

        let [source, destination] = self.accounts.get_disjoint_mut([source_id, destination_id]);
        let Some(source) = source else {
            return Err(LedgerError::WalletNotFound);
        };
        let Some(destination) = destination else {
            return Err(LedgerError::WalletNotFound);
        };
        if source.frozen || destination.frozen {
            return Err(LedgerError::WalletFrozen);
        }
        if source.owner_user_id != caller {
            return Err(LedgerError::Unauthorized);
        }
        let credited = destination
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::InvalidAmount)?;
        source.reset_if_new_window(day_index(now));
        if source.balance < debit {
            return Err(LedgerError::InsufficientBalance);
        }
        if amount > source.transaction_limit {
            return Err(LedgerError::TransactionLimitExceeded);
        }
        let new_daily = source
            .daily_spent
            .checked_add(amount)
            .ok_or(LedgerError::DailyLimitExceeded)?;
        if new_daily > source.daily_limit {
            return Err(LedgerError::DailyLimitExceeded);
        }
        if !self.registry.verify(&attestation) {
            return Err(LedgerError::AttestationReplayed);
        }

        // Commit: nothing below can fail.
        self.registry.mark_used(attestation.identifier);
        source.balance -= debit;
        source.daily_spent = new_daily;
        source.total_sent = source.total_sent.saturating_add(amount);
        source.transaction_count += 1;
        destination.balance = credited;
        destination.total_received = destination.total_received.saturating_add(amount);
        let source_balance = source.balance;
        let destination_balance = destination.balance;
        let proof = ProofRecord::new(attestation, source_id.clone(), amount, now);
        self.vault.credit(fee);

        Ok(TransferOutcome {
            proof,
            amount,
            fee,
            source_balance,
            destination_balance,
        })
    }

    // =========================================================================
    // Administrative authority
    // =========================================================================

    /// Freeze or unfreeze a wallet. Idempotent; returns whether the flag
    /// changed.
    pub fn set_frozen(
        &mut self,
        _capability: &AdminCapability,
        wallet_id: &WalletId,
        frozen: bool,
    ) -> Result<bool, LedgerError> {
        let account = self
            .accounts
            .get_mut(wallet_id)
            .ok_or(LedgerError::WalletNotFound)?;
        let changed = account.frozen != frozen;
        account.frozen = frozen;
        Ok(changed)
    }

    /// Mark a wallet KYC-verified. Idempotent; returns whether the flag
    /// changed.
    pub fn verify_kyc(
        &mut self,
        _capability: &AdminCapability,
        wallet_id: &WalletId,
    ) -> Result<bool, LedgerError> {
        let account = self
            .accounts
            .get_mut(wallet_id)
            .ok_or(LedgerError::WalletNotFound)?;
        let changed = !account.kyc_verified;
        account.kyc_verified = true;
        Ok(changed)
    }

    /// Drain collected fees from the vault. Returns the remaining balance.
    pub fn withdraw_fees(
        &mut self,
        _capability: &AdminCapability,
        amount: u64,
    ) -> Result<u64, LedgerError> {
        self.vault.debit(amount)?;
        Ok(self.vault.balance)
    }

    /// Current fee vault state.
    pub fn vault(&self) -> &FeeVault {
        &self.vault
    }

    /// Mint a fresh attestation identifier for integration harnesses.
    pub fn mint_fresh_identifier(&mut self) -> u64 {
        self.registry.mint_fresh_identifier()
    }

    /// Number of attestation identifiers consumed so far.
    pub fn consumed_attestations(&self) -> usize {
        self.registry.consumed_count()
    }
}
