//! # Money Module
//!
//! Provides the `Money` type for monetary values in whole Rupiah.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Rupiah has no minor unit in everyday retail, so every price,          │
//! │  subtotal and revenue figure is a whole number of Rupiah stored         │
//! │  in an i64. Arithmetic that can overflow is CHECKED: a checkout         │
//! │  that would overflow is rejected instead of wrapping.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kasir_core::money::Money;
//!
//! let price = Money::new(3000);
//! let subtotal = price.checked_mul_quantity(4).unwrap();
//! let total = subtotal.checked_add(Money::new(5000)).unwrap();
//! assert_eq!(total.amount(), 17000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole Rupiah.
///
/// Serializes as a bare JSON integer, so `{"price": 3000}` on the wire
/// maps directly onto `Money(3000)`.
///
/// ## Where Money is Used
/// ```text
/// Product.price ──► × quantity ──► OrderLine.subtotal
///                                        │
///                                        ▼ Σ
///                                  Order.total_amount ──► SalesSummary.total_revenue
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole Rupiah.
    #[inline]
    pub const fn new(amount: i64) -> Self {
        Money(amount)
    }

    /// Returns the value in whole Rupiah.
    #[inline]
    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity, returning `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use kasir_core::money::Money;
    ///
    /// let unit_price = Money::new(3000);
    /// assert_eq!(unit_price.checked_mul_quantity(4), Some(Money::new(12000)));
    /// assert_eq!(Money::new(i64::MAX).checked_mul_quantity(2), None);
    /// ```
    ///
    /// ## User Workflow
    /// ```text
    /// Product: Indomie Goreng Rp3.000
    /// Quantity: 4
    ///      │
    ///      ▼
    /// checked_mul_quantity(4) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line subtotal: Rp12.000
    /// ```
    #[inline]
    pub const fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display uses Indonesian grouping: `Rp12.000`, `-Rp1.500`.
///
/// ## Note
/// This is for logs and receipts. The API always sends the raw integer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}Rp{}", sign, grouped)
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Unchecked addition. Use [`Money::checked_add`] on the checkout path.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl From<i64> for Money {
    fn from(amount: i64) -> Self {
        Money(amount)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_grouping() {
        assert_eq!(Money::new(0).to_string(), "Rp0");
        assert_eq!(Money::new(500).to_string(), "Rp500");
        assert_eq!(Money::new(3000).to_string(), "Rp3.000");
        assert_eq!(Money::new(12000).to_string(), "Rp12.000");
        assert_eq!(Money::new(1234567).to_string(), "Rp1.234.567");
        assert_eq!(Money::new(-1500).to_string(), "-Rp1.500");
    }

    #[test]
    fn test_checked_arithmetic() {
        let price = Money::new(3000);
        assert_eq!(price.checked_mul_quantity(4), Some(Money::new(12000)));
        assert_eq!(price.checked_mul_quantity(0), Some(Money::zero()));
        assert_eq!(Money::new(i64::MAX / 2 + 1).checked_mul_quantity(2), None);

        assert_eq!(
            Money::new(12000).checked_add(Money::new(5000)),
            Some(Money::new(17000))
        );
        assert_eq!(Money::new(i64::MAX).checked_add(Money::new(1)), None);
    }

    #[test]
    fn test_sum_of_subtotals() {
        let total: Money = [Money::new(12000), Money::new(5000), Money::new(3000)]
            .into_iter()
            .sum();
        assert_eq!(total.amount(), 20000);
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let json = serde_json::to_string(&Money::new(3000)).unwrap();
        assert_eq!(json, "3000");

        let back: Money = serde_json::from_str("12000").unwrap();
        assert_eq!(back, Money::new(12000));
    }
}
