//! # Kasir API
//!
//! HTTP surface for the Kasir POS backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Kasir API Routes                               │
//! │                                                                         │
//! │  /health                      (open)                                   │
//! │                                                                         │
//! │  /api/*                       (X-API-Key when configured)              │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  checkout      │  │  transactions  │  │  report                    ││
//! │  │                │  │                │  │                            ││
//! │  │ • POST         │  │ • GET list     │  │ • GET hari-ini             ││
//! │  │   /checkout    │  │ • GET {id}     │  │ • GET ?start_date&end_date ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐                                │
//! │  │  products      │  │  categories    │                                │
//! │  │ • CRUD         │  │ • CRUD         │                                │
//! │  │ • ?name=search │  │                │                                │
//! │  └────────────────┘  └────────────────┘                                │
//! │                                                                         │
//! │                  ┌──────────────────────────────┐                      │
//! │                  │  kasir-db (SQLite, WAL)      │                      │
//! │                  └──────────────────────────────┘                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config`] for the file format and environment variables.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::middleware;
use axum::Router;
use kasir_db::Database;
use tower_http::trace::TraceLayer;

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        AppState {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the full application router.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::checkout::router())
        .merge(routes::transactions::router())
        .merge(routes::report::router())
        .merge(routes::products::router())
        .merge(routes::categories::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    Router::new()
        .merge(routes::health::router())
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
