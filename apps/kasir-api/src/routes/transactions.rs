//! Ledger read endpoints.

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use kasir_core::Order;
use kasir_db::DbError;
use serde::Deserialize;

use crate::error::ApiResult;
use crate::routes::method_not_allowed;
use crate::AppState;

/// Page size when `limit` is not given.
const DEFAULT_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<u32>,
}

/// GET /api/transactions?limit=N
///
/// Newest first, headers only.
async fn list_transactions(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Order>>> {
    let Query(params) = params?;
    let orders = state
        .db
        .orders()
        .list_recent(params.limit.unwrap_or(DEFAULT_LIMIT))
        .await?;
    Ok(Json(orders))
}

/// GET /api/transactions/{id}
async fn get_transaction(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Order>> {
    let Path(id) = id?;
    let order = state
        .db
        .orders()
        .get_by_id(id)
        .await?
        .ok_or_else(|| DbError::not_found("Transaction", id))?;
    Ok(Json(order))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).fallback(method_not_allowed),
        )
        .route(
            "/transactions/{id}",
            get(get_transaction).fallback(method_not_allowed),
        )
}
