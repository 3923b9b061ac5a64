//! `SiteBid` Server - Main Entry Point
//!
//! Construction bidding marketplace backend.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use sb_common::policy::{AccessPolicy, PermissionTable};
use sb_server::{api, authz, config, db};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sb_server=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting SiteBid Server"
    );

    // Build the shared access policy and surface any divergence between
    // the domination relation and the permission table before serving.
    let table = PermissionTable::builtin();
    for warning in table.audit_consistency() {
        warn!(
            dominator = %warning.dominator,
            dominated = %warning.dominated,
            missing = ?warning.missing,
            "role model inconsistency: {warning}"
        );
    }
    let break_glass = config.break_glass()?;
    if !break_glass.is_empty() {
        info!("Break-glass operator allow-list configured");
    }
    let policy = AccessPolicy::new(table, break_glass);

    // Initialize database and the cached permission store
    let db_pool = db::create_pool(&config.database_url).await?;
    let permissions = authz::CachedPermissionStore::new(
        Arc::new(authz::PgPermissionStore::new(db_pool)),
        config.permission_lookup_timeout,
        config.fail_open_on_timeout,
    );

    // Build application state and router
    let state = api::AppState::new(config.clone(), policy, permissions);
    let app = api::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(address = %config.bind_address, "Server listening");

    // Graceful shutdown handler
    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Received shutdown signal, cleaning up...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
