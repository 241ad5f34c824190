//! Route modules, one per resource.

pub mod categories;
pub mod checkout;
pub mod health;
pub mod products;
pub mod report;
pub mod transactions;

use serde::Serialize;

use crate::error::ApiError;

/// Body returned by DELETE endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}

/// Fallback for methods a route does not serve.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
