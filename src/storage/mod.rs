// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Proof Record Storage
//!
//! Durable history of settlement proof records, backed by an embedded redb
//! database (pure Rust, ACID).
//!
//! The authoritative ledger state lives in memory behind the state layer's
//! lock; this store is the queryable mirror of every proof record the engine
//! produced. Writes happen after the in-memory commit and are best-effort:
//! a failed mirror write is logged, never unwound into the settlement.

pub mod proof_db;

pub use proof_db::{ProofDatabase, ProofDbError, ProofDbResult, ProofKind};
