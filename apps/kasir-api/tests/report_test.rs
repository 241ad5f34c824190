//! Integration tests for the report endpoints.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{create_product, get_json, post_json, send, test_app};

#[tokio::test]
async fn test_today_report_without_sales() {
    let app = test_app().await;

    let (status, json) = get_json(app.router(), "/api/report/hari-ini").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"total_revenue": 0, "total_transaksi": 0}));
}

#[tokio::test]
async fn test_today_report_after_checkouts() {
    let app = test_app().await;
    let mie = create_product(&app, "Indomie Goreng", 3000, 50).await;
    let teh = create_product(&app, "Teh Botol", 5000, 50).await;

    for cart in [
        json!([{"product_id": mie, "quantity": 3}, {"product_id": teh, "quantity": 1}]),
        json!([{"product_id": mie, "quantity": 2}]),
    ] {
        let (status, _) = post_json(app.router(), "/api/checkout", &cart).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, json) = get_json(app.router(), "/api/report/hari-ini").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({
            "total_revenue": 20000,
            "total_transaksi": 2,
            "produk_terlaris": {"nama": "Indomie Goreng", "qty_terjual": 5}
        })
    );
}

#[tokio::test]
async fn test_range_report() {
    let app = test_app().await;
    let widget = create_product(&app, "Widget", 3000, 10).await;
    post_json(
        app.router(),
        "/api/checkout",
        &json!([{"product_id": widget, "quantity": 4}]),
    )
    .await;

    let (status, json) = get_json(
        app.router(),
        "/api/report?start_date=2026-01-01&end_date=2026-01-31",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_revenue"], 12000);
    assert_eq!(json["total_transaksi"], 1);

    let (status, json) = get_json(
        app.router(),
        "/api/report?start_date=2026-02-01&end_date=2026-02-28",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"total_revenue": 0, "total_transaksi": 0}));
}

#[tokio::test]
async fn test_range_report_requires_both_dates() {
    let app = test_app().await;

    for uri in [
        "/api/report",
        "/api/report?start_date=2026-01-01",
        "/api/report?end_date=2026-01-31",
    ] {
        let (status, json) = get_json(app.router(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(json["message"], "start_date and end_date required");
    }
}

#[tokio::test]
async fn test_range_report_rejects_bad_dates() {
    let app = test_app().await;

    let (status, json) = get_json(
        app.router(),
        "/api/report?start_date=2026-02-01&end_date=2026-01-01",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");

    let (status, _) = get_json(
        app.router(),
        "/api/report?start_date=15-01-2026&end_date=2026-01-31",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_report_endpoints_are_read_only() {
    let app = test_app().await;

    for uri in ["/api/report/hari-ini", "/api/report"] {
        let (status, json) = send(app.router(), "POST", uri, Some(&json!({})), &[]).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{uri}");
        assert_eq!(json["error"], "method_not_allowed");
    }
}
