//! # Error Types
//!
//! Domain-specific error types for kasir-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kasir-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations (stock, lookups)      │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── ErrorKind        - Classification shared by every layer           │
//! │                                                                         │
//! │  kasir-db errors (separate crate)                                      │
//! │  └── DbError          - Storage failures, timeouts, wraps CoreError    │
//! │                                                                         │
//! │  kasir-api errors (in app)                                             │
//! │  └── ApiError         - What HTTP clients see (status + JSON)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why ErrorKind?
//! Callers need to tell a retryable conflict (someone bought the last unit)
//! from a permanent validation failure without string matching. Every error
//! type in the workspace exposes `kind()`, and the HTTP layer maps kinds to
//! status codes in one place.

use thiserror::Error;

// =============================================================================
// Error Kind
// =============================================================================

/// Coarse classification of any error in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or missing input. Rejected before touching storage.
    Validation,
    /// A referenced entity does not exist.
    NotFound,
    /// The request is well-formed but conflicts with current state
    /// (insufficient stock, duplicate, referenced by the ledger).
    Conflict,
    /// Connectivity, constraint or lock-wait failure in the store.
    Storage,
    /// A unit of work exceeded its time bound and was aborted.
    Timeout,
}

impl ErrorKind {
    /// Whether the same request may succeed if retried later.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Conflict | ErrorKind::Timeout)
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    ///
    /// ## When This Occurs
    /// - A checkout line references a product id that doesn't exist
    /// - The product was deleted between browsing and checkout
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Insufficient stock to complete the checkout.
    ///
    /// ## User Workflow
    /// ```text
    /// Checkout [{product_id: 1, quantity: 5}]
    ///      │
    ///      ▼
    /// Lock row, read stock: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { name: "Indomie Goreng", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// Whole checkout rolled back, client sees 409
    /// ```
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        name: String,
        available: i64,
        requested: i64,
    },

    /// A line subtotal or order total does not fit in the money type.
    #[error("Amount overflow while pricing product {product_id}")]
    AmountOverflow { product_id: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::ProductNotFound(_) => ErrorKind::NotFound,
            CoreError::InsufficientStock { .. } => ErrorKind::Conflict,
            CoreError::AmountOverflow { .. } | CoreError::Validation(_) => ErrorKind::Validation,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// They are always raised before any storage work starts.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A collection that must have entries is empty.
    #[error("{field} must not be empty")]
    Empty { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Date range whose start lies after its end.
    #[error("start_date {start} is after end_date {end}")]
    InvertedRange { start: String, end: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product_id: 1,
            name: "Indomie Goreng".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Indomie Goreng: available 3, requested 5"
        );
        assert_eq!(CoreError::ProductNotFound(42).to_string(), "Product not found: 42");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Empty {
            field: "items".to_string(),
        };
        assert_eq!(err.to_string(), "items must not be empty");

        let err = ValidationError::InvertedRange {
            start: "2026-02-01".to_string(),
            end: "2026-01-01".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "start_date 2026-02-01 is after end_date 2026-01-01"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_kinds_and_retryability() {
        assert_eq!(CoreError::ProductNotFound(1).kind(), ErrorKind::NotFound);

        let stock = CoreError::InsufficientStock {
            product_id: 1,
            name: "Widget".to_string(),
            available: 0,
            requested: 1,
        };
        assert_eq!(stock.kind(), ErrorKind::Conflict);
        assert!(stock.kind().is_retryable());

        assert!(!ErrorKind::Validation.is_retryable());
        assert!(!ErrorKind::NotFound.is_retryable());
        assert!(ErrorKind::Timeout.is_retryable());
    }
}
