//! Health check endpoint.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// GET /health
///
/// 200 while the database answers queries, 503 otherwise.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    if state.db.health_check().await {
        return (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                message: "API running",
            }),
        );
    }

    warn!("Health check failed, database unreachable");
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(HealthResponse {
            status: "error",
            message: "Database unavailable",
        }),
    )
}

/// Returns the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
