//! Integration tests for the reporting aggregator.

mod common;

use chrono::NaiveDate;
use kasir_core::{BestSeller, CheckoutItem, DateRange, Money, ProductInput, SalesSummary};

use common::{add_product, at, checkout_at, fixed_now, stock_of, test_db, test_db_with};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
    DateRange::new(start, end).unwrap()
}

#[tokio::test]
async fn test_empty_window_reports_zeroes_and_no_best_seller() {
    let db = test_db().await;

    let summary = db
        .reports()
        .summary_for_range(range(day(2026, 1, 1), day(2026, 1, 31)))
        .await
        .unwrap();

    assert_eq!(summary, SalesSummary::default());
    assert!(summary.best_seller.is_none());
}

#[tokio::test]
async fn test_today_summary_uses_clock() {
    let db = test_db().await;
    let widget = add_product(&db, "Widget", 3000, 50).await;

    db.checkout()
        .checkout(&[CheckoutItem::new(widget.id, 4)])
        .await
        .unwrap();
    db.checkout()
        .checkout(&[CheckoutItem::new(widget.id, 1)])
        .await
        .unwrap();
    // Yesterday's sale does not count today.
    checkout_at(&db, at(2026, 1, 14, 23, 59, 59), &[CheckoutItem::new(widget.id, 9)])
        .await
        .unwrap();

    let summary = db.reports().today_summary().await.unwrap();
    assert_eq!(summary.total_revenue, Money::new(15000));
    assert_eq!(summary.total_orders, 2);
    assert_eq!(
        summary.best_seller,
        Some(BestSeller {
            name: "Widget".to_string(),
            quantity_sold: 5,
        })
    );
    assert_eq!(db.reports().today(), DateRange::single_day(fixed_now().date_naive()));
}

#[tokio::test]
async fn test_range_is_inclusive_of_both_calendar_days() {
    let db = test_db().await;
    let widget = add_product(&db, "Widget", 1000, 100).await;
    let cart = [CheckoutItem::new(widget.id, 1)];

    checkout_at(&db, at(2025, 12, 31, 23, 59, 59), &cart).await.unwrap();
    checkout_at(&db, at(2026, 1, 1, 0, 0, 0), &cart).await.unwrap();
    checkout_at(&db, at(2026, 1, 15, 12, 30, 0), &cart).await.unwrap();
    checkout_at(&db, at(2026, 1, 31, 23, 59, 59), &cart).await.unwrap();
    checkout_at(&db, at(2026, 2, 1, 0, 0, 0), &cart).await.unwrap();

    let summary = db
        .reports()
        .summary_for_range(range(day(2026, 1, 1), day(2026, 1, 31)))
        .await
        .unwrap();

    assert_eq!(summary.total_orders, 3);
    assert_eq!(summary.total_revenue, Money::new(3000));

    let single = db
        .reports()
        .summary_for_range(DateRange::single_day(day(2026, 1, 15)))
        .await
        .unwrap();
    assert_eq!(single.total_orders, 1);
}

#[tokio::test]
async fn test_open_ended_range_up_to_last_four_digit_year() {
    let db = test_db().await;
    let widget = add_product(&db, "Widget", 1000, 10).await;
    checkout_at(&db, at(2026, 1, 15, 10, 0, 0), &[CheckoutItem::new(widget.id, 2)])
        .await
        .unwrap();

    let summary = db
        .reports()
        .summary_for_range(DateRange::parse("2026-01-01", "9999-12-31").unwrap())
        .await
        .unwrap();

    assert_eq!(summary.total_orders, 1);
    assert_eq!(summary.total_revenue, Money::new(2000));
    assert_eq!(
        summary.best_seller,
        Some(BestSeller {
            name: "Widget".to_string(),
            quantity_sold: 2,
        })
    );

    let from_year_zero = db
        .reports()
        .summary_for_range(range(day(0, 1, 1), day(9999, 12, 31)))
        .await
        .unwrap();
    assert_eq!(from_year_zero.total_orders, 1);
}

#[tokio::test]
async fn test_best_seller_sums_quantities_per_product() {
    let db = test_db().await;
    let mie = add_product(&db, "Indomie Goreng", 3000, 100).await;
    let teh = add_product(&db, "Teh Botol", 5000, 100).await;

    checkout_at(
        &db,
        at(2026, 1, 10, 9, 0, 0),
        &[CheckoutItem::new(mie.id, 3), CheckoutItem::new(teh.id, 4)],
    )
    .await
    .unwrap();
    checkout_at(&db, at(2026, 1, 11, 9, 0, 0), &[CheckoutItem::new(mie.id, 2)])
        .await
        .unwrap();

    let summary = db
        .reports()
        .summary_for_range(range(day(2026, 1, 1), day(2026, 1, 31)))
        .await
        .unwrap();

    assert_eq!(summary.total_orders, 2);
    assert_eq!(summary.total_revenue, Money::new(9000 + 20000 + 6000));
    assert_eq!(
        summary.best_seller,
        Some(BestSeller {
            name: "Indomie Goreng".to_string(),
            quantity_sold: 5,
        })
    );
}

#[tokio::test]
async fn test_best_seller_tie_goes_to_first_sold() {
    let db = test_db().await;
    let kopi = add_product(&db, "Kopi", 1500, 100).await;
    let teh = add_product(&db, "Teh Botol", 5000, 100).await;

    checkout_at(&db, at(2026, 1, 10, 9, 0, 0), &[CheckoutItem::new(teh.id, 3)])
        .await
        .unwrap();
    checkout_at(&db, at(2026, 1, 10, 9, 5, 0), &[CheckoutItem::new(kopi.id, 3)])
        .await
        .unwrap();

    let summary = db
        .reports()
        .summary_for_range(DateRange::single_day(day(2026, 1, 10)))
        .await
        .unwrap();

    let best = summary.best_seller.unwrap();
    assert_eq!(best.name, "Teh Botol");
    assert_eq!(best.quantity_sold, 3);
}

#[tokio::test]
async fn test_renamed_product_counted_once_under_latest_name() {
    let db = test_db().await;
    let kopi = add_product(&db, "Kopi", 1500, 100).await;
    let teh = add_product(&db, "Teh Botol", 5000, 100).await;

    checkout_at(&db, at(2026, 1, 10, 8, 0, 0), &[CheckoutItem::new(kopi.id, 2)])
        .await
        .unwrap();
    checkout_at(&db, at(2026, 1, 10, 8, 30, 0), &[CheckoutItem::new(teh.id, 3)])
        .await
        .unwrap();

    db.products()
        .update(
            kopi.id,
            &ProductInput {
                name: "Kopi Susu".to_string(),
                price: Money::new(2000),
                stock: 98,
                category_id: None,
            },
        )
        .await
        .unwrap();

    checkout_at(&db, at(2026, 1, 10, 9, 0, 0), &[CheckoutItem::new(kopi.id, 2)])
        .await
        .unwrap();

    let summary = db
        .reports()
        .summary_for_range(DateRange::single_day(day(2026, 1, 10)))
        .await
        .unwrap();

    assert_eq!(
        summary.best_seller,
        Some(BestSeller {
            name: "Kopi Susu".to_string(),
            quantity_sold: 4,
        })
    );
    assert_eq!(summary.total_revenue, Money::new(3000 + 15000 + 4000));
}

#[tokio::test]
async fn test_reports_are_repeatable() {
    let db = test_db().await;
    let widget = add_product(&db, "Widget", 3000, 10).await;
    db.checkout()
        .checkout(&[CheckoutItem::new(widget.id, 2)])
        .await
        .unwrap();

    let reports = db.reports();
    let first = reports.today_summary().await.unwrap();
    let second = reports.today_summary().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(stock_of(&db, widget.id).await, 8);
}

#[tokio::test]
async fn test_calendar_days_follow_reporting_offset() {
    // WIB, UTC+7
    let db = test_db_with(|c| c.report_utc_offset_minutes(7 * 60)).await;
    let widget = add_product(&db, "Widget", 1000, 10).await;

    // 18:00 UTC on the 15th is 01:00 on the 16th in WIB.
    checkout_at(&db, at(2026, 1, 15, 18, 0, 0), &[CheckoutItem::new(widget.id, 1)])
        .await
        .unwrap();

    let on_15th = db
        .reports()
        .summary_for_range(DateRange::single_day(day(2026, 1, 15)))
        .await
        .unwrap();
    let on_16th = db
        .reports()
        .summary_for_range(DateRange::single_day(day(2026, 1, 16)))
        .await
        .unwrap();

    assert_eq!(on_15th.total_orders, 0);
    assert_eq!(on_16th.total_orders, 1);
}

#[test]
fn test_inverted_range_rejected_before_querying() {
    assert!(DateRange::parse("2026-02-01", "2026-01-01").is_err());
    assert!(DateRange::new(day(2026, 2, 1), day(2026, 1, 1)).is_err());
}
