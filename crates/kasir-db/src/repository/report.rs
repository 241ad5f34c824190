//! # Report Repository
//!
//! Sales summaries aggregated from the ledger.
//!
//! ## Query Plan
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  DateRange ──► utc_bounds(offset) ──► [from, to)                       │
//! │                                          │                              │
//! │                 BEGIN (deferred, one WAL snapshot)                      │
//! │                                          │                              │
//! │     ┌────────────────────────────────────┼──────────────────────┐       │
//! │     ▼                                    ▼                      ▼       │
//! │  SUM(total_amount)                 COUNT(*) orders     best seller     │
//! │  COALESCE → 0                                          GROUP BY        │
//! │                                                        product_id      │
//! │     └────────────────────────────────────┬──────────────────────┘       │
//! │                                          ▼                              │
//! │                                    SalesSummary                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Best Seller Rules
//! - Lines are grouped by `product_id`, so a product renamed mid-window is
//!   still counted once.
//! - Highest summed quantity wins. On a tie, the product whose first line in
//!   the window was written earliest wins.
//! - The reported name is the snapshot on that product's latest line in the
//!   window.
//! - No lines in the window means no best seller.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use kasir_core::{BestSeller, Clock, DateRange, Money, SalesSummary};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;

/// Reporting aggregator.
#[derive(Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
    offset: FixedOffset,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    ///
    /// `offset` fixes which instants belong to which calendar day.
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>, offset: FixedOffset) -> Self {
        ReportRepository {
            pool,
            clock,
            offset,
        }
    }

    /// The current calendar day in the reporting offset.
    pub fn today(&self) -> DateRange {
        let local_today = self.clock.now().with_timezone(&self.offset).date_naive();
        DateRange::single_day(local_today)
    }

    /// Summary of today's sales.
    pub async fn today_summary(&self) -> DbResult<SalesSummary> {
        self.summary_for_range(self.today()).await
    }

    /// Summary of sales between two calendar days, both inclusive.
    ///
    /// Read-only; calling it twice with no checkouts in between returns the
    /// same summary.
    pub async fn summary_for_range(&self, range: DateRange) -> DbResult<SalesSummary> {
        let (from, to) = range.utc_bounds(self.offset);
        debug!(
            start = %range.start(),
            end = %range.end(),
            from = %from,
            to = %to,
            "Building sales summary"
        );

        let mut tx = self.pool.begin().await?;

        let (revenue, orders): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(total_amount), 0), COUNT(*)
            FROM orders
            WHERE created_at >= ?1 AND created_at < ?2
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_one(&mut *tx)
        .await?;

        let best_seller = best_seller(&mut *tx, from, to).await?;

        tx.commit().await?;

        Ok(SalesSummary {
            total_revenue: Money::new(revenue),
            total_orders: orders,
            best_seller,
        })
    }
}

async fn best_seller(
    conn: &mut SqliteConnection,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> DbResult<Option<BestSeller>> {
    let top: Option<(i64, i64, i64)> = sqlx::query_as(
        r#"
        SELECT ol.product_id,
               SUM(ol.quantity) AS qty_sold,
               MIN(ol.id)       AS first_line
        FROM order_lines ol
        JOIN orders o ON o.id = ol.order_id
        WHERE o.created_at >= ?1 AND o.created_at < ?2
        GROUP BY ol.product_id
        ORDER BY qty_sold DESC, first_line ASC
        LIMIT 1
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_optional(&mut *conn)
    .await?;

    let Some((product_id, quantity_sold, _)) = top else {
        return Ok(None);
    };

    let name: String = sqlx::query_scalar(
        r#"
        SELECT ol.product_name
        FROM order_lines ol
        JOIN orders o ON o.id = ol.order_id
        WHERE ol.product_id = ?1 AND o.created_at >= ?2 AND o.created_at < ?3
        ORDER BY ol.id DESC
        LIMIT 1
        "#,
    )
    .bind(product_id)
    .bind(from)
    .bind(to)
    .fetch_one(&mut *conn)
    .await?;

    Ok(Some(BestSeller {
        name,
        quantity_sold,
    }))
}
