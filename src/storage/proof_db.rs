// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded proof record database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `proof_records`: proof_id → serialized ProofRecord
//! - `wallet_proof_index`: composite key (wallet_id|!timestamp|proof_id) → kind

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::ledger::ProofRecord;
use crate::models::WalletId;

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: proof_id → serialized ProofRecord (JSON bytes).
const PROOF_RECORDS: TableDefinition<&str, &[u8]> = TableDefinition::new("proof_records");

/// Index: composite key → settlement kind ("withdrawal"|"transfer").
/// Key format: `wallet_id|!timestamp_be|proof_id` for descending-time scans.
const WALLET_PROOF_INDEX: TableDefinition<&[u8], &str> =
    TableDefinition::new("wallet_proof_index");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ProofDbError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type ProofDbResult<T> = Result<T, ProofDbError>;

// =============================================================================
// Settlement kind
// =============================================================================

/// Which engine operation produced a proof record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProofKind {
    Withdrawal,
    Transfer,
}

impl ProofKind {
    fn as_str(self) -> &'static str {
        match self {
            ProofKind::Withdrawal => "withdrawal",
            ProofKind::Transfer => "transfer",
        }
    }

    fn from_str(s: &str) -> Option<Self> {
        match s {
            "withdrawal" => Some(ProofKind::Withdrawal),
            "transfer" => Some(ProofKind::Transfer),
            _ => None,
        }
    }
}

// =============================================================================
// Index Key Helpers
// =============================================================================

/// Build a composite key for the wallet_proof_index table.
///
/// Format: `wallet_id | inverted_timestamp_be_bytes | proof_id`
///
/// The inverted timestamp ensures newest-first ordering when scanning forward.
fn make_index_key(wallet_id: &WalletId, timestamp: i64, proof_id: &str) -> Vec<u8> {
    let id = wallet_id.0.as_bytes();
    let mut key = Vec::with_capacity(id.len() + 1 + 8 + 1 + proof_id.len());
    key.extend_from_slice(id);
    key.push(b'|');
    key.extend_from_slice(&(!timestamp as u64).to_be_bytes());
    key.push(b'|');
    key.extend_from_slice(proof_id.as_bytes());
    key
}

/// Build a prefix key for range scanning all proofs of a wallet.
fn make_prefix(wallet_id: &WalletId) -> Vec<u8> {
    let id = wallet_id.0.as_bytes();
    let mut prefix = Vec::with_capacity(id.len() + 1);
    prefix.extend_from_slice(id);
    prefix.push(b'|');
    prefix
}

/// Build the upper bound for a range scan (prefix with 0xFF bytes appended).
fn make_prefix_end(wallet_id: &WalletId) -> Vec<u8> {
    let mut end = make_prefix(wallet_id);
    end.extend_from_slice(&[0xFF; 20]);
    end
}

// =============================================================================
// ProofDatabase
// =============================================================================

/// Embedded ACID proof record history.
pub struct ProofDatabase {
    db: Database,
}

impl ProofDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> ProofDbResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PROOF_RECORDS)?;
            let _ = write_txn.open_table(WALLET_PROOF_INDEX)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Insert a proof record and its index entry.
    ///
    /// Proof records are immutable: this is insert-only, never update.
    pub fn insert(&self, proof: &ProofRecord, kind: ProofKind) -> ProofDbResult<()> {
        let json = serde_json::to_vec(proof)?;
        let timestamp = proof.settled_at.timestamp();

        let write_txn = self.db.begin_write()?;
        {
            let mut proof_table = write_txn.open_table(PROOF_RECORDS)?;
            proof_table.insert(proof.proof_id.as_str(), json.as_slice())?;

            let mut idx_table = write_txn.open_table(WALLET_PROOF_INDEX)?;
            let key = make_index_key(&proof.wallet_id, timestamp, &proof.proof_id);
            idx_table.insert(key.as_slice(), kind.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up a single proof record by id.
    pub fn get(&self, proof_id: &str) -> ProofDbResult<Option<ProofRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PROOF_RECORDS)?;
        match table.get(proof_id)? {
            Some(value) => {
                let proof: ProofRecord = serde_json::from_slice(value.value())?;
                Ok(Some(proof))
            }
            None => Ok(None),
        }
    }

    /// Newest-first listing of a wallet's proof records, bounded by `limit`.
    pub fn list_by_wallet(
        &self,
        wallet_id: &WalletId,
        limit: usize,
    ) -> ProofDbResult<Vec<(ProofRecord, ProofKind)>> {
        let read_txn = self.db.begin_read()?;
        let idx_table = read_txn.open_table(WALLET_PROOF_INDEX)?;
        let proof_table = read_txn.open_table(PROOF_RECORDS)?;

        let prefix = make_prefix(wallet_id);
        let prefix_end = make_prefix_end(wallet_id);

        let mut results = Vec::new();
        let range = idx_table.range(prefix.as_slice()..prefix_end.as_slice())?;

        for entry in range {
            let entry = entry?;
            let key_bytes = entry.0.value().to_vec();
            let kind = ProofKind::from_str(entry.1.value()).unwrap_or(ProofKind::Withdrawal);

            if let Some(proof_id) = extract_proof_id_from_key(&key_bytes) {
                if let Some(value) = proof_table.get(proof_id.as_str())? {
                    let proof: ProofRecord = serde_json::from_slice(value.value())?;
                    results.push((proof, kind));
                }
            }

            if results.len() >= limit {
                break;
            }
        }

        Ok(results)
    }

    /// Total number of stored proof records.
    pub fn count(&self) -> ProofDbResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PROOF_RECORDS)?;
        Ok(table.len()?)
    }
}

/// Extract the proof_id segment from a composite index key.
fn extract_proof_id_from_key(key: &[u8]) -> Option<String> {
    // proof_id starts after the second '|'; the timestamp segment may itself
    // contain the delimiter byte, so split from the known fixed layout: the
    // timestamp is always 8 bytes framed by two delimiters.
    let first = key.iter().position(|&b| b == b'|')?;
    let rest = key.get(first + 1 + 8 + 1..)?;
    String::from_utf8(rest.to_vec()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    use crate::ledger::{Attestation, Ledger};

    fn setup() -> (TempDir, ProofDatabase) {
        let temp = TempDir::new().unwrap();
        let db = ProofDatabase::open(&temp.path().join("proofs.redb")).unwrap();
        (temp, db)
    }

    fn att(identifier: u64) -> Attestation {
        Attestation {
            transaction_hash: format!("0xhash{identifier}"),
            signature: vec![0xAA; 8],
            verifier_public_key: vec![0xBB; 8],
            verifier_timestamp: 1_700_000_000,
            identifier,
            metadata: vec![1],
        }
    }

    /// Produce real proof records through the engine.
    fn settle(n: u64) -> Vec<ProofRecord> {
        let mut ledger = Ledger::new();
        let wallet = ledger.create_wallet("user_1", Utc.timestamp_millis_opt(0).unwrap());
        ledger
            .deposit(
                &wallet.wallet_id,
                100_000_000_000,
                att(1),
                Utc.timestamp_millis_opt(0).unwrap(),
            )
            .unwrap();

        (0..n)
            .map(|i| {
                let now = Utc.timestamp_millis_opt((i as i64 + 1) * 86_400_000).unwrap();
                ledger
                    .withdraw(&wallet.wallet_id, "user_1", "dest", 1_000_000, att(i + 2), now)
                    .unwrap()
                    .proof
            })
            .collect()
    }

    #[test]
    fn insert_and_get_round_trip() {
        let (_temp, db) = setup();
        let proofs = settle(1);

        db.insert(&proofs[0], ProofKind::Withdrawal).unwrap();
        let loaded = db.get(&proofs[0].proof_id).unwrap().unwrap();
        assert_eq!(loaded, proofs[0]);
        assert_eq!(db.count().unwrap(), 1);
    }

    #[test]
    fn missing_proof_is_none() {
        let (_temp, db) = setup();
        assert!(db.get("nope").unwrap().is_none());
    }

    #[test]
    fn list_is_newest_first_and_bounded() {
        let (_temp, db) = setup();
        let proofs = settle(3);
        for proof in &proofs {
            db.insert(proof, ProofKind::Withdrawal).unwrap();
        }

        let wallet_id = proofs[0].wallet_id.clone();
        let listed = db.list_by_wallet(&wallet_id, 10).unwrap();
        assert_eq!(listed.len(), 3);
        // Settled on consecutive days; newest first.
        assert_eq!(listed[0].0.proof_id, proofs[2].proof_id);
        assert_eq!(listed[2].0.proof_id, proofs[0].proof_id);

        let bounded = db.list_by_wallet(&wallet_id, 2).unwrap();
        assert_eq!(bounded.len(), 2);

        let other = db.list_by_wallet(&WalletId::from("other"), 10).unwrap();
        assert!(other.is_empty());
    }

    #[test]
    fn kind_survives_round_trip() {
        let (_temp, db) = setup();
        let proofs = settle(1);
        db.insert(&proofs[0], ProofKind::Transfer).unwrap();
        let listed = db.list_by_wallet(&proofs[0].wallet_id, 10).unwrap();
        assert_eq!(listed[0].1, ProofKind::Transfer);
    }
}
