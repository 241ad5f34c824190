//! # Kasir API Server
//!
//! ## Usage
//! ```bash
//! # Defaults: 0.0.0.0:8080, ./kasir.db, no API key
//! cargo run -p kasir-api
//!
//! # Explicit config file
//! cargo run -p kasir-api -- --config ./kasir.toml
//!
//! # Environment overrides
//! KASIR_PORT=9000 KASIR_API_KEY=secret RUST_LOG=kasir_db=debug cargo run -p kasir-api
//! ```

use std::path::PathBuf;

use kasir_api::{build_router, ApiConfig, AppState};
use kasir_db::Database;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Kasir API server...");

    let config = ApiConfig::load(config_path_from_args())?;
    info!(
        addr = %config.server.bind_address(),
        db = %config.database.path.display(),
        auth = config.auth.api_key.is_some(),
        utc_offset_minutes = config.report.utc_offset_minutes,
        "Configuration loaded"
    );
    if config.auth.api_key.is_none() {
        warn!("No API key configured, /api routes are open");
    }

    let db = Database::new(config.db_config()).await?;
    info!("Database ready");

    let addr = config.server.bind_address();
    let app = build_router(AppState::new(db.clone(), config));

    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// `--config <path>` / `-c <path>`, if given.
fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" || arg == "-c" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
