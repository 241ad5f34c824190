//! # Validation Module
//!
//! Input validation for Kasir POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP (axum extractors)                                       │
//! │  └── Type validation (JSON / query deserialization)                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Cart shape (non-empty, bounded, positive quantities)             │
//! │  ├── Product / category fields                                         │
//! │  └── Report dates                                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (price >= 0, stock >= 0, quantity > 0)                     │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here runs before a unit of work is opened, so a rejected
//! request never takes the inventory lock.
//!
//! ## Usage
//! ```rust
//! use kasir_core::types::CheckoutItem;
//! use kasir_core::validation::validate_checkout_items;
//!
//! let cart = [CheckoutItem::new(1, 4)];
//! assert!(validate_checkout_items(&cart).is_ok());
//! assert!(validate_checkout_items(&[]).is_err());
//! ```

use chrono::{Datelike, NaiveDate};

use crate::error::ValidationError;
use crate::types::{CategoryInput, CheckoutItem, ProductInput};
use crate::{MAX_CART_LINES, MAX_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Wire format of report dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Checkout Validators
// =============================================================================

/// Validates a checkout cart.
///
/// ## Rules
/// - At least one line
/// - At most [`MAX_CART_LINES`] lines
/// - Every quantity strictly positive
pub fn validate_checkout_items(items: &[CheckoutItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Empty {
            field: "items".to_string(),
        });
    }

    if items.len() > MAX_CART_LINES {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_CART_LINES as i64,
        });
    }

    for item in items {
        validate_quantity(item.quantity)?;
    }

    Ok(())
}

/// Validates a line quantity.
///
/// ## Example
/// ```rust
/// use kasir_core::validation::validate_quantity;
///
/// assert!(validate_quantity(1).is_ok());
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(-3).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a product or category name.
///
/// ## Rules
/// - Must not be blank
/// - At most [`MAX_NAME_LEN`] characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a product price (whole Rupiah, zero allowed).
pub fn validate_price(price: i64) -> ValidationResult<()> {
    if price < 0 {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Validates a stock level.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::Negative {
            field: "stock".to_string(),
        });
    }
    Ok(())
}

/// Validates a full product payload.
pub fn validate_product_input(input: &ProductInput) -> ValidationResult<()> {
    validate_name("name", &input.name)?;
    validate_price(input.price.amount())?;
    validate_stock(input.stock)?;
    Ok(())
}

/// Validates a full category payload.
pub fn validate_category_input(input: &CategoryInput) -> ValidationResult<()> {
    validate_name("name", &input.name)
}

// =============================================================================
// Report Validators
// =============================================================================

/// Parses a `YYYY-MM-DD` date, naming the offending field on failure.
pub fn parse_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let date =
        NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("expected YYYY-MM-DD ({})", e),
        })?;

    if !(0..=9999).contains(&date.year()) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "year must have four digits".to_string(),
        });
    }

    Ok(date)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    #[test]
    fn test_empty_cart_rejected() {
        let err = validate_checkout_items(&[]).unwrap_err();
        assert!(matches!(err, ValidationError::Empty { .. }));
    }

    #[test]
    fn test_cart_line_limit() {
        let full = vec![CheckoutItem::new(1, 1); MAX_CART_LINES];
        assert!(validate_checkout_items(&full).is_ok());

        let over = vec![CheckoutItem::new(1, 1); MAX_CART_LINES + 1];
        assert!(matches!(
            validate_checkout_items(&over),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_non_positive_quantity_anywhere_rejected() {
        let cart = [CheckoutItem::new(1, 2), CheckoutItem::new(2, 0)];
        assert!(matches!(
            validate_checkout_items(&cart),
            Err(ValidationError::MustBePositive { .. })
        ));

        let cart = [CheckoutItem::new(1, -1)];
        assert!(validate_checkout_items(&cart).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Indomie Goreng").is_ok());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"A".repeat(MAX_NAME_LEN)).is_ok());
        assert!(validate_name("name", &"A".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_product_input() {
        let mut input = ProductInput {
            name: "Teh Botol".to_string(),
            price: Money::new(5000),
            stock: 20,
            category_id: None,
        };
        assert!(validate_product_input(&input).is_ok());

        input.price = Money::new(-1);
        assert!(matches!(
            validate_product_input(&input),
            Err(ValidationError::Negative { .. })
        ));

        input.price = Money::zero();
        input.stock = -5;
        assert!(validate_product_input(&input).is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("start_date", "2026-01-31").unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()
        );
        assert!(matches!(
            parse_date("start_date", ""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            parse_date("end_date", "2026-02-30"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_date("end_date", "+10000-01-01"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert_eq!(
            parse_date("end_date", "9999-12-31").unwrap(),
            NaiveDate::from_ymd_opt(9999, 12, 31).unwrap()
        );
    }
}
