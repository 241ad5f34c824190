//! # Domain Types
//!
//! Core domain types used throughout Kasir POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Order      │   │   OrderLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  order_id (FK)  │       │
//! │  │  name           │   │  total_amount   │◄──│  product_id     │       │
//! │  │  price (Money)  │   │  created_at     │   │  product_name   │       │
//! │  │  stock          │   │  details[]      │   │  quantity       │       │
//! │  └─────────────────┘   └─────────────────┘   │  subtotal       │       │
//! │                                              └─────────────────┘       │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CheckoutItem   │   │  SalesSummary   │   │   DateRange     │       │
//! │  │  (request line) │   │  (derived)      │   │  (report input) │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ledger Immutability
//! `Order` and `OrderLine` are written once by the checkout engine and never
//! updated. `OrderLine.product_name` is a snapshot, so renaming a product
//! later does not rewrite history.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{parse_date, ValidationResult};

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Store-assigned identifier.
    pub id: i64,

    /// Display name shown to cashier and copied onto order lines.
    pub name: String,

    /// Unit price in whole Rupiah.
    pub price: Money,

    /// Units on hand. Never negative.
    pub stock: i64,

    /// Optional category.
    pub category_id: Option<i64>,
}

/// Payload for creating or replacing a product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductInput {
    pub name: String,
    pub price: Money,
    pub stock: i64,
    #[serde(default)]
    #[ts(optional)]
    pub category_id: Option<i64>,
}

// =============================================================================
// Category
// =============================================================================

/// A product grouping ("Makanan", "Minuman", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Payload for creating or replacing a category.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    #[ts(optional)]
    pub description: Option<String>,
}

// =============================================================================
// Checkout Request
// =============================================================================

/// One requested line of a checkout.
///
/// Lines are processed in the order the caller sent them. The same product
/// may appear on more than one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutItem {
    pub product_id: i64,
    pub quantity: i64,
}

impl CheckoutItem {
    pub const fn new(product_id: i64, quantity: i64) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

// =============================================================================
// Ledger: Order & OrderLine
// =============================================================================

/// A committed checkout.
///
/// ## Lifecycle
/// ```text
/// CheckoutItem[] ──► CheckoutEngine ──► COMMIT ──► Order (immutable)
///                                   └─► ROLLBACK ──► nothing persisted
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    /// Assigned on commit, strictly increasing.
    pub id: i64,

    /// Sum of all line subtotals.
    pub total_amount: Money,

    /// Set by the store inside the unit of work.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Lines in the order they were requested.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    #[serde(default)]
    pub details: Vec<OrderLine>,
}

/// One line of a committed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderLine {
    pub id: i64,

    /// Owning order.
    #[serde(rename = "transaction_id")]
    pub order_id: i64,

    pub product_id: i64,

    /// Product name as it was at the time of sale.
    pub product_name: String,

    pub quantity: i64,

    /// Unit price at time of sale × quantity.
    pub subtotal: Money,
}

// =============================================================================
// Reporting
// =============================================================================

/// Aggregated sales figures for a date window. Derived, never stored.
///
/// ## Wire Format
/// ```text
/// {
///   "total_revenue": 45000,
///   "total_transaksi": 5,
///   "produk_terlaris": { "nama": "Indomie Goreng", "qty_terjual": 12 }
/// }
/// ```
/// `produk_terlaris` is omitted entirely (not `null`) when the window has no
/// sales.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesSummary {
    pub total_revenue: Money,

    #[serde(rename = "total_transaksi")]
    pub total_orders: i64,

    #[serde(
        rename = "produk_terlaris",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    #[ts(optional)]
    pub best_seller: Option<BestSeller>,
}

/// The product with the highest quantity sold in a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BestSeller {
    #[serde(rename = "nama")]
    pub name: String,

    #[serde(rename = "qty_terjual")]
    pub quantity_sold: i64,
}

/// An inclusive range of calendar days.
///
/// ## Window Semantics
/// ```text
/// DateRange { start: 2026-01-01, end: 2026-01-31 }, offset +07:00
///      │
///      ▼ utc_bounds()
/// [2025-12-31T17:00:00Z, 2026-01-31T17:00:00Z)   ← half-open
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> ValidationResult<Self> {
        if start > end {
            return Err(ValidationError::InvertedRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parses `YYYY-MM-DD` bounds, as sent in `start_date` / `end_date`.
    pub fn parse(start: &str, end: &str) -> ValidationResult<Self> {
        let start = parse_date("start_date", start)?;
        let end = parse_date("end_date", end)?;
        Self::new(start, end)
    }

    /// A range covering exactly one day.
    pub const fn single_day(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Converts the local calendar days into a half-open UTC interval.
    ///
    /// Both bounds are clamped to years 0000-9999, where RFC 3339 text
    /// sorts the same way as the instants it names.
    pub fn utc_bounds(&self, offset: FixedOffset) -> (DateTime<Utc>, DateTime<Utc>) {
        let after_end = self.end.succ_opt().unwrap_or(NaiveDate::MAX);
        let (first, last) = text_ordered_bounds();
        (
            local_midnight_to_utc(self.start, offset).clamp(first, last),
            local_midnight_to_utc(after_end, offset).clamp(first, last),
        )
    }
}

/// Earliest and latest instants whose RFC 3339 form has a four-digit year.
fn text_ordered_bounds() -> (DateTime<Utc>, DateTime<Utc>) {
    let first = NaiveDate::from_ymd_opt(0, 1, 1).unwrap_or(NaiveDate::MIN);
    let last = NaiveDate::from_ymd_opt(9999, 12, 31)
        .and_then(|day| day.and_hms_nano_opt(23, 59, 59, 999_999_999))
        .unwrap_or(NaiveDateTime::MAX);
    (first.and_time(NaiveTime::MIN).and_utc(), last.and_utc())
}

fn local_midnight_to_utc(day: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let local = day.and_time(NaiveTime::MIN);
    let shift = Duration::seconds(i64::from(offset.local_minus_utc()));
    local.checked_sub_signed(shift).unwrap_or(local).and_utc()
}

// =============================================================================
// Unit Tests
// =============================================================================
