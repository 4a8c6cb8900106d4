// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared application state.
//!
//! The ledger sits behind one `RwLock`: money-moving and administrative
//! operations take the write guard for their full duration, which is exactly
//! the exclusive, serialized, all-or-nothing access the engine assumes.
//! Handlers never await while holding the guard.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;

use crate::auth::AdminSecret;
use crate::events::{EventSink, TracingSink};
use crate::ledger::Ledger;
use crate::storage::ProofDatabase;

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<RwLock<Ledger>>,
    /// Durable proof record mirror; `None` runs the service history-less
    /// (tests, ephemeral harnesses).
    pub proof_db: Option<Arc<ProofDatabase>>,
    pub events: Arc<dyn EventSink>,
    /// Administrative capability credential; `None` disables the admin
    /// surface entirely.
    pub admin_secret: Option<AdminSecret>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        ledger: Ledger,
        proof_db: Option<ProofDatabase>,
        events: Arc<dyn EventSink>,
        admin_secret: Option<AdminSecret>,
    ) -> Self {
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
            proof_db: proof_db.map(Arc::new),
            events,
            admin_secret,
            started_at: Instant::now(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Ledger::new(), None, Arc::new(TracingSink), None)
    }
}
