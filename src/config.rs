// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and the ledger policy
//! defaults used throughout the application. Configuration is loaded from the
//! environment at startup; policy constants are compile-time defaults that
//! per-account limit updates may override (per account, never globally).
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LEDGER_DB_PATH` | Proof record history database (redb) | `/data/ledger/proofs.redb` |
//! | `ADMIN_CAPABILITY` | Administrative capability credential | Unset disables admin surface |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

/// Environment variable name for the proof record database path.
///
/// The database holds the immutable proof record history. In the enclave
/// deployment the path lives under the encrypted `/data` mount; the service
/// itself treats it as a normal filesystem path.
pub const LEDGER_DB_ENV: &str = "LEDGER_DB_PATH";

/// Default location for the proof record database.
pub const LEDGER_DB_DEFAULT: &str = "/data/ledger/proofs.redb";

/// Environment variable carrying the administrative capability credential.
///
/// Possession of this value is necessary and sufficient for freeze/unfreeze,
/// KYC verification, and fee vault withdrawal. When unset, every admin
/// endpoint rejects.
pub const ADMIN_CAPABILITY_ENV: &str = "ADMIN_CAPABILITY";

// =============================================================================
// Ledger policy defaults
// =============================================================================

/// Smallest accepted withdrawal/transfer amount, in smallest indivisible units.
pub const MIN_TRANSACTION_AMOUNT: u64 = 1_000_000;

/// Daily spending limit applied to newly created wallets.
pub const DEFAULT_DAILY_LIMIT: u64 = 10_000_000_000;

/// Per-transaction limit applied to newly created wallets.
pub const DEFAULT_TRANSACTION_LIMIT: u64 = 5_000_000_000;

/// Platform fee rate in basis points (1 bps = 0.01%).
pub const FEE_BASIS_POINTS: u64 = 50;

/// Basis point denominator.
pub const BASIS_POINT_DENOMINATOR: u64 = 10_000;

/// Length of the daily spending window in milliseconds.
pub const DAY_WINDOW_MS: i64 = 86_400_000;
