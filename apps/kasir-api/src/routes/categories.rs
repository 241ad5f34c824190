//! Category endpoints.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use kasir_core::{Category, CategoryInput};
use kasir_db::DbError;

use crate::error::ApiResult;
use crate::routes::{method_not_allowed, MessageResponse};
use crate::AppState;

async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.db.categories().list().await?))
}

async fn create_category(
    State(state): State<AppState>,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let Json(input) = payload?;
    let category = state.db.categories().insert(&input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn get_category(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Category>> {
    let Path(id) = id?;
    let category = state
        .db
        .categories()
        .get_by_id(id)
        .await?
        .ok_or_else(|| DbError::not_found("Category", id))?;
    Ok(Json(category))
}

async fn update_category(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> ApiResult<Json<Category>> {
    let Path(id) = id?;
    let Json(input) = payload?;
    Ok(Json(state.db.categories().update(id, &input).await?))
}

async fn delete_category(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(id) = id?;
    state.db.categories().delete(id).await?;
    Ok(Json(MessageResponse::new("Category deleted")))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/categories",
            get(list_categories)
                .post(create_category)
                .fallback(method_not_allowed),
        )
        .route(
            "/categories/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category)
                .fallback(method_not_allowed),
        )
}
