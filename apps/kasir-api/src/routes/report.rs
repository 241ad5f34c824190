//! Sales report endpoints.
//!
//! ```text
//! GET /api/report/hari-ini                                today
//! GET /api/report?start_date=2026-01-01&end_date=2026-01-31  inclusive range
//! ```
//!
//! Both are read-only; any other method gets 405.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use kasir_core::{DateRange, SalesSummary};
use serde::Deserialize;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::routes::method_not_allowed;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ReportParams {
    /// Both dates, parsed and ordered.
    pub fn range(&self) -> ApiResult<DateRange> {
        let (Some(start), Some(end)) = (
            self.start_date.as_deref().filter(|s| !s.is_empty()),
            self.end_date.as_deref().filter(|s| !s.is_empty()),
        ) else {
            return Err(ApiError::BadRequest(
                "start_date and end_date required".to_string(),
            ));
        };

        Ok(DateRange::parse(start, end)?)
    }
}

/// GET /api/report/hari-ini
async fn today_report(State(state): State<AppState>) -> ApiResult<Json<SalesSummary>> {
    let summary = state.db.reports().today_summary().await?;
    Ok(Json(summary))
}

/// GET /api/report?start_date=YYYY-MM-DD&end_date=YYYY-MM-DD
async fn range_report(
    State(state): State<AppState>,
    params: Result<Query<ReportParams>, QueryRejection>,
) -> ApiResult<Json<SalesSummary>> {
    let Query(params) = params?;
    let range = params.range()?;
    debug!(start = %range.start(), end = %range.end(), "Range report");

    let summary = state.db.reports().summary_for_range(range).await?;
    Ok(Json(summary))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/report", get(range_report).fallback(method_not_allowed))
        .route(
            "/report/hari-ini",
            get(today_report).fallback(method_not_allowed),
        )
}
