//! API key middleware.
//!
//! When `auth.api_key` is set, every `/api` request must carry it in the
//! `X-API-Key` header. Without a configured key the API is open.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;

/// Header carrying the client's key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Rejects requests whose `X-API-Key` is missing or wrong.
pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(expected) = state.config.auth.api_key.as_deref() {
        check_key(req.headers().get(API_KEY_HEADER).and_then(|v| v.to_str().ok()), expected)
            .inspect_err(|_| debug!(path = %req.uri().path(), "Rejected API key"))?;
    }

    Ok(next.run(req).await)
}

fn check_key(provided: Option<&str>, expected: &str) -> Result<(), ApiError> {
    match provided {
        None | Some("") => Err(ApiError::Unauthorized("API key required")),
        Some(key) if key == expected => Ok(()),
        Some(_) => Err(ApiError::Unauthorized("Invalid API key")),
    }
}
