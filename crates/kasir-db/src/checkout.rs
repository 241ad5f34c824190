//! # Checkout Engine
//!
//! Turns a cart into a committed order, or into nothing at all.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        checkout(items)                                  │
//! │                                                                         │
//! │  0. validate_checkout_items  ── rejected carts never take the lock     │
//! │       │                                                                 │
//! │  ┌────▼──────────────── tokio::time::timeout(checkout_timeout) ─────┐  │
//! │  │ 1. UnitOfWork::begin  (BEGIN IMMEDIATE)                          │  │
//! │  │       │                                                          │  │
//! │  │ 2. for each item, in caller order:                               │  │
//! │  │       SELECT name, price, stock   → missing?  ProductNotFound    │  │
//! │  │                                   → short?    InsufficientStock  │  │
//! │  │       subtotal = price × qty      → overflow? AmountOverflow     │  │
//! │  │       UPDATE stock = stock - qty                                  │  │
//! │  │       │                                                          │  │
//! │  │ 3. INSERT orders       (total, created_at from Clock)            │  │
//! │  │ 4. INSERT order_lines  (name snapshot, subtotal)                 │  │
//! │  │       │                                                          │  │
//! │  │    any error ──► ROLLBACK ──► error                              │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │       │ elapsed: unit of work dropped, connection closed ──► Timeout   │
//! │       │                                                                 │
//! │  5. COMMIT (untimed, its own result is reported) ──► Order             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Locking
//! SQLite has no row locks. `BEGIN IMMEDIATE` takes the single database
//! write lock before the first read, so every product row the cart touches
//! is covered from the start until commit or abort. Two checkouts that share
//! a product are serialized; the second sees the first one's decrements.
//! Since there is only one lock, caller order cannot deadlock.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use kasir_core::validation::validate_checkout_items;
use kasir_core::{CheckoutItem, Clock, CoreError, Money, Order, OrderLine};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::unit_of_work::UnitOfWork;

/// A cart line after its product row has been read and its stock taken.
struct PricedLine {
    product_id: i64,
    product_name: String,
    quantity: i64,
    subtotal: Money,
}

/// Executes checkouts as single atomic units of work.
#[derive(Clone)]
pub struct CheckoutEngine {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
    timeout: Duration,
}

impl CheckoutEngine {
    /// Creates a new engine. `timeout` bounds each checkout up to its commit.
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>, timeout: Duration) -> Self {
        CheckoutEngine {
            pool,
            clock,
            timeout,
        }
    }

    /// Checks out a cart.
    ///
    /// ## Returns
    /// * `Ok(Order)` - committed order with one line per item, in order
    /// * `Err(DbError)` - nothing was persisted
    ///
    /// ## Errors
    /// - `Domain(Validation)` - empty cart, too many lines, quantity <= 0,
    ///   amount overflow
    /// - `Domain(ProductNotFound)` - some line names an unknown product
    /// - `Domain(InsufficientStock)` - some line asks for more than is left
    /// - `Busy` - the write lock stayed taken past the lock timeout
    /// - `Timeout` - the unit was still taking stock when the checkout
    ///   timeout elapsed
    ///
    /// ## Commit Is Not Timed
    /// The timeout covers `BEGIN` and every statement before `COMMIT`. Once
    /// `COMMIT` is sent its own outcome is reported, so a `Timeout` always
    /// means nothing was written.
    ///
    /// ## Not Idempotent
    /// Calling twice with the same cart creates two orders.
    pub async fn checkout(&self, items: &[CheckoutItem]) -> DbResult<Order> {
        validate_checkout_items(items)?;

        debug!(lines = items.len(), "Starting checkout");

        let (uow, outcome) = match tokio::time::timeout(self.timeout, self.prepare(items)).await {
            Ok(prepared) => prepared?,
            Err(_) => {
                warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Checkout timed out, unit of work aborted"
                );
                return Err(DbError::Timeout(self.timeout));
            }
        };

        match outcome {
            Ok(order) => {
                uow.commit().await?;
                info!(
                    order_id = order.id,
                    total = %order.total_amount,
                    lines = order.details.len(),
                    "Checkout committed"
                );
                Ok(order)
            }
            Err(err) => {
                uow.rollback().await;
                warn!(error = %err, "Checkout aborted");
                Err(err)
            }
        }
    }

    /// Opens the unit of work and runs every statement short of `COMMIT`.
    async fn prepare(&self, items: &[CheckoutItem]) -> DbResult<(UnitOfWork, DbResult<Order>)> {
        let mut uow = UnitOfWork::begin(&self.pool).await?;
        let created_at = self.clock.now();

        let outcome = match uow.conn() {
            Ok(conn) => apply(conn, items, created_at).await,
            Err(err) => Err(err),
        };

        Ok((uow, outcome))
    }
}

/// Runs every statement of one checkout on the unit's connection.
async fn apply(
    conn: &mut SqliteConnection,
    items: &[CheckoutItem],
    created_at: DateTime<Utc>,
) -> DbResult<Order> {
    let mut total = Money::zero();
    let mut priced = Vec::with_capacity(items.len());

    for item in items {
        let row: Option<(String, i64, i64)> =
            sqlx::query_as("SELECT name, price, stock FROM products WHERE id = ?1")
                .bind(item.product_id)
                .fetch_optional(&mut *conn)
                .await?;

        let (name, price, stock) = row.ok_or(CoreError::ProductNotFound(item.product_id))?;

        if stock < item.quantity {
            return Err(CoreError::InsufficientStock {
                product_id: item.product_id,
                name,
                available: stock,
                requested: item.quantity,
            }
            .into());
        }

        let overflow = || CoreError::AmountOverflow {
            product_id: item.product_id,
        };
        let subtotal = Money::new(price)
            .checked_mul_quantity(item.quantity)
            .ok_or_else(overflow)?;
        total = total.checked_add(subtotal).ok_or_else(overflow)?;

        sqlx::query("UPDATE products SET stock = stock - ?1 WHERE id = ?2")
            .bind(item.quantity)
            .bind(item.product_id)
            .execute(&mut *conn)
            .await?;

        debug!(
            product_id = item.product_id,
            quantity = item.quantity,
            remaining = stock - item.quantity,
            "Stock taken"
        );

        priced.push(PricedLine {
            product_id: item.product_id,
            product_name: name,
            quantity: item.quantity,
            subtotal,
        });
    }

    let order_id: i64 = sqlx::query_scalar(
        "INSERT INTO orders (total_amount, created_at) VALUES (?1, ?2) RETURNING id",
    )
    .bind(total.amount())
    .bind(created_at)
    .fetch_one(&mut *conn)
    .await?;

    let mut details = Vec::with_capacity(priced.len());
    for line in priced {
        let line_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO order_lines (order_id, product_id, product_name, quantity, subtotal)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id
            "#,
        )
        .bind(order_id)
        .bind(line.product_id)
        .bind(&line.product_name)
        .bind(line.quantity)
        .bind(line.subtotal.amount())
        .fetch_one(&mut *conn)
        .await?;

        details.push(OrderLine {
            id: line_id,
            order_id,
            product_id: line.product_id,
            product_name: line.product_name,
            quantity: line.quantity,
            subtotal: line.subtotal,
        });
    }

    Ok(Order {
        id: order_id,
        total_amount: total,
        created_at,
        details,
    })
}
