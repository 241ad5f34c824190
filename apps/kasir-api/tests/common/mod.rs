//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use kasir_api::{build_router, ApiConfig, AppState};
use kasir_core::FixedClock;
use kasir_db::Database;
use tempfile::TempDir;
use tower::ServiceExt;

/// A router over a fresh database. Keep it alive for the whole test; the
/// database file is removed on drop.
pub struct TestApp {
    pub db: Database,
    state: AppState,
    _dir: TempDir,
}

impl TestApp {
    /// A fresh router; `oneshot` consumes it, so build one per request.
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }
}

pub async fn test_app() -> TestApp {
    test_app_with(ApiConfig::default()).await
}

pub async fn test_app_with_key(key: &str) -> TestApp {
    let mut config = ApiConfig::default();
    config.auth.api_key = Some(key.to_string());
    test_app_with(config).await
}

/// Builds the app with the clock fixed at 2026-01-15 10:00 UTC.
pub async fn test_app_with(mut config: ApiConfig) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    config.database.path = dir.path().join("kasir-api-test.db");

    let clock = FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap());
    let db = Database::with_clock(config.db_config(), Arc::new(clock))
        .await
        .unwrap();

    TestApp {
        state: AppState::new(db.clone(), config),
        db,
        _dir: dir,
    }
}

/// Send a request with an optional JSON body and extra headers.
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<&serde_json::Value>,
    headers: &[(&str, &str)],
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, Some(body), &[]).await
}

/// Send a PUT request with a JSON body and return the response.
pub async fn put_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "PUT", uri, Some(body), &[]).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, None, &[]).await
}

/// Send a DELETE request and return the response.
pub async fn delete_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "DELETE", uri, None, &[]).await
}

/// Creates a product through the API and returns its id.
pub async fn create_product(app: &TestApp, name: &str, price: i64, stock: i64) -> i64 {
    let (status, json) = post_json(
        app.router(),
        "/api/products",
        &serde_json::json!({ "name": name, "price": price, "stock": stock }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    json["id"].as_i64().unwrap()
}
