// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr, path::PathBuf, sync::Arc};

use tracing_subscriber::EnvFilter;

use relational_ledger_server::api::router;
use relational_ledger_server::auth::AdminSecret;
use relational_ledger_server::config::{ADMIN_CAPABILITY_ENV, LEDGER_DB_DEFAULT, LEDGER_DB_ENV};
use relational_ledger_server::events::TracingSink;
use relational_ledger_server::ledger::Ledger;
use relational_ledger_server::state::AppState;
use relational_ledger_server::storage::ProofDatabase;

#[tokio::main]
async fn main() {
    init_tracing();

    // Open the proof record history
    let db_path: PathBuf = env::var(LEDGER_DB_ENV)
        .unwrap_or_else(|_| LEDGER_DB_DEFAULT.to_string())
        .into();
    let proof_db = match ProofDatabase::open(&db_path) {
        Ok(db) => Some(db),
        Err(e) => {
            tracing::error!(error = %e, path = %db_path.display(), "failed to open proof store");
            std::process::exit(1);
        }
    };

    // The admin surface stays disabled unless a capability is configured
    let admin_secret = match env::var(ADMIN_CAPABILITY_ENV) {
        Ok(credential) if !credential.is_empty() => Some(AdminSecret::new(credential)),
        _ => {
            tracing::warn!("no administrative capability configured; admin endpoints disabled");
            None
        }
    };

    let state = AppState::new(Ledger::new(), proof_db, Arc::new(TracingSink), admin_secret);
    let app = router(state);

    // Parse bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");

    tracing::info!(%addr, "Relational Ledger server listening (docs at /docs)");

    // TLS (RA-TLS) terminates in the fronting proxy; this service binds plain HTTP.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let json = env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install shutdown handler");
        return;
    }
    tracing::info!("shutdown signal received");
}
