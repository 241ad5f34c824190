//! Error types for the Kasir API.
//!
//! Every failure leaves the server as `{"error": <code>, "message": <text>}`
//! with a status picked from the error's [`ErrorKind`].
//!
//! ```text
//! ┌──────────────┬──────────────────────────────┬────────┐
//! │ Kind         │ Typical cause                │ Status │
//! ├──────────────┼──────────────────────────────┼────────┤
//! │ Validation   │ empty cart, bad date         │ 400    │
//! │ NotFound     │ unknown product / order      │ 404    │
//! │ Conflict     │ out of stock, duplicate name │ 409    │
//! │ Storage      │ database fault               │ 500    │
//! │ Storage/busy │ write lock wait expired      │ 503    │
//! │ Timeout      │ checkout exceeded its bound  │ 503    │
//! │ (auth)       │ missing / wrong X-API-Key    │ 401    │
//! └──────────────┴──────────────────────────────┴────────┘
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kasir_core::{CoreError, ErrorKind, ValidationError};
use kasir_db::DbError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// Errors surfaced by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("Method not allowed")]
    MethodNotAllowed,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::Db(DbError::Domain(err))
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Db(DbError::from(err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(format!("Invalid ID: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    /// Status code and machine-readable code for this error.
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed"),
            ApiError::Db(err) => match (err.kind(), err) {
                (ErrorKind::Validation, _) => (StatusCode::BAD_REQUEST, "validation_error"),
                (ErrorKind::NotFound, _) => (StatusCode::NOT_FOUND, "not_found"),
                (ErrorKind::Conflict, DbError::Domain(CoreError::InsufficientStock { .. })) => {
                    (StatusCode::CONFLICT, "insufficient_stock")
                }
                (ErrorKind::Conflict, _) => (StatusCode::CONFLICT, "conflict"),
                (ErrorKind::Timeout, _) => (StatusCode::SERVICE_UNAVAILABLE, "timeout"),
                (ErrorKind::Storage, DbError::Busy(_) | DbError::PoolExhausted) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "database_busy")
                }
                (ErrorKind::Storage, _) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status();

        if status.is_server_error() {
            error!(error = %self, code, "Request failed");
        }

        let body = ErrorBody {
            error: code,
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn status_of(err: impl Into<ApiError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_validation_maps_to_400() {
        assert_eq!(
            status_of(ValidationError::Empty { field: "items".into() }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CoreError::AmountOverflow { product_id: 1 }),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_product_not_found_maps_to_404() {
        assert_eq!(status_of(CoreError::ProductNotFound(7)), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(DbError::not_found("Order", 9)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_insufficient_stock_maps_to_409() {
        let err = ApiError::from(CoreError::InsufficientStock {
            product_id: 1,
            name: "Widget".into(),
            available: 0,
            requested: 1,
        });
        assert_eq!(err.status(), (StatusCode::CONFLICT, "insufficient_stock"));
    }

    #[test]
    fn test_busy_and_timeout_map_to_503() {
        assert_eq!(
            status_of(DbError::Busy("database is locked".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(DbError::Timeout(Duration::from_secs(10))),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_storage_maps_to_500() {
        assert_eq!(
            status_of(DbError::QueryFailed("disk I/O error".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_and_method() {
        assert_eq!(
            status_of(ApiError::Unauthorized("API key required")),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(ApiError::MethodNotAllowed),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }
}
