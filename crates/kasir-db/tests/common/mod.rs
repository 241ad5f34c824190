//! Shared helpers for kasir-db integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use kasir_core::{CheckoutItem, FixedClock, Money, Order, Product, ProductInput};
use kasir_db::{CheckoutEngine, Database, DbConfig, DbResult};
use tempfile::TempDir;

/// Fixed "now" used across tests: 2026-01-15 10:00 UTC.
pub fn fixed_now() -> DateTime<Utc> {
    at(2026, 1, 15, 10, 0, 0)
}

pub fn at(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, mi, s).unwrap()
}

/// A migrated file-backed database that lives as long as this value.
///
/// File-backed rather than `:memory:` so the pool can hold several
/// connections that see the same data.
pub struct TestDb {
    pub db: Database,
    _dir: TempDir,
}

impl std::ops::Deref for TestDb {
    type Target = Database;

    fn deref(&self) -> &Database {
        &self.db
    }
}

pub async fn test_db() -> TestDb {
    test_db_with(|config| config).await
}

/// Builds a database whose config has been adjusted by `tweak`.
pub async fn test_db_with(tweak: impl FnOnce(DbConfig) -> DbConfig) -> TestDb {
    let dir = tempfile::tempdir().unwrap();
    let config = tweak(DbConfig::new(dir.path().join("kasir-test.db")));
    let db = Database::with_clock(config, Arc::new(FixedClock(fixed_now())))
        .await
        .unwrap();
    TestDb { db, _dir: dir }
}

pub async fn add_product(db: &Database, name: &str, price: i64, stock: i64) -> Product {
    db.products()
        .insert(&ProductInput {
            name: name.to_string(),
            price: Money::new(price),
            stock,
            category_id: None,
        })
        .await
        .unwrap()
}

pub async fn stock_of(db: &Database, product_id: i64) -> i64 {
    db.products()
        .get_by_id(product_id)
        .await
        .unwrap()
        .unwrap()
        .stock
}

pub async fn order_count(db: &Database) -> i64 {
    db.orders().count().await.unwrap()
}

pub async fn line_count(db: &Database) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM order_lines")
        .fetch_one(db.pool())
        .await
        .unwrap()
}

/// Checks out with the order stamped at `when`.
pub async fn checkout_at(
    db: &Database,
    when: DateTime<Utc>,
    items: &[CheckoutItem],
) -> DbResult<Order> {
    CheckoutEngine::new(
        db.pool().clone(),
        Arc::new(FixedClock(when)),
        Duration::from_secs(5),
    )
    .checkout(items)
    .await
}
