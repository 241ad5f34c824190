//! Checkout endpoint.
//!
//! ```text
//! POST /api/checkout
//!   [{"product_id": 1, "quantity": 4}]            bare list
//!   {"items": [{"product_id": 1, "quantity": 4}]} wrapped
//!
//! 201 Created  → Order with its lines
//! 400          → empty cart, non-positive quantity
//! 404          → unknown product
//! 409          → insufficient stock (nothing was written)
//! 503          → lock wait or checkout timeout expired
//! ```

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use kasir_core::{CheckoutItem, Order};
use serde::Deserialize;
use tracing::info;

use crate::error::ApiResult;
use crate::routes::method_not_allowed;
use crate::AppState;

/// Accepted checkout bodies.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CheckoutRequest {
    Items(Vec<CheckoutItem>),
    Wrapped { items: Vec<CheckoutItem> },
}

impl CheckoutRequest {
    pub fn into_items(self) -> Vec<CheckoutItem> {
        match self {
            CheckoutRequest::Items(items) | CheckoutRequest::Wrapped { items } => items,
        }
    }
}

/// POST /api/checkout
async fn checkout(
    State(state): State<AppState>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Order>)> {
    let Json(request) = payload?;
    let items = request.into_items();

    let order = state.db.checkout().checkout(&items).await?;

    info!(
        order_id = order.id,
        total = %order.total_amount,
        "Checkout completed"
    );
    Ok((StatusCode::CREATED, Json(order)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/checkout", post(checkout).fallback(method_not_allowed))
}
