//! Product catalogue endpoints.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use kasir_core::{Product, ProductInput};
use kasir_db::DbError;
use serde::Deserialize;
use tracing::info;

use crate::error::ApiResult;
use crate::routes::{method_not_allowed, MessageResponse};
use crate::AppState;

/// Cap on search results.
const SEARCH_LIMIT: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    /// Substring of the product name.
    pub name: Option<String>,
}

/// GET /api/products[?name=...]
async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Product>>> {
    let Query(query) = query?;
    let products = match query.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => state.db.products().search(name, SEARCH_LIMIT).await?,
        _ => state.db.products().list().await?,
    };
    Ok(Json(products))
}

/// POST /api/products
async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let Json(input) = payload?;
    let product = state.db.products().insert(&input).await?;
    info!(id = product.id, name = %product.name, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /api/products/{id}
async fn get_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Product>> {
    let Path(id) = id?;
    let product = state
        .db
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| DbError::not_found("Product", id))?;
    Ok(Json(product))
}

/// PUT /api/products/{id}
async fn update_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let Path(id) = id?;
    let Json(input) = payload?;
    let product = state.db.products().update(id, &input).await?;
    Ok(Json(product))
}

/// DELETE /api/products/{id}
///
/// Refused with 409 once the product appears on an order.
async fn delete_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(id) = id?;
    state.db.products().delete(id).await?;
    info!(id, "Product deleted");
    Ok(Json(MessageResponse::new("Product deleted")))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(list_products)
                .post(create_product)
                .fallback(method_not_allowed),
        )
        .route(
            "/products/{id}",
            get(get_product)
                .put(update_product)
                .delete(delete_product)
                .fallback(method_not_allowed),
        )
}
