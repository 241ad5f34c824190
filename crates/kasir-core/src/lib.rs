//! # kasir-core: Pure Business Logic for Kasir POS
//!
//! This crate holds the domain model of the point-of-sale backend as pure
//! types and functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Kasir Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    kasir-api (axum)                             │   │
//! │  │    /api/checkout   /api/report   /api/products   /health        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kasir-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   clock   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  Clock    │  │  carts    │  │   │
//! │  │   │  Order    │  │           │  │           │  │  dates    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  kasir-db (Database Layer)                      │   │
//! │  │     SQLite, checkout engine, ledger, reporting aggregator       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, OrderLine, SalesSummary, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types and error classification
//! - [`validation`] - Input validation for carts, products and report dates
//! - [`clock`] - Time source abstraction
//!
//! ## Example Usage
//!
//! ```rust
//! use kasir_core::money::Money;
//!
//! let price = Money::new(3000);
//! let subtotal = price.checked_mul_quantity(4).unwrap();
//! assert_eq!(subtotal.amount(), 12000);
//! assert_eq!(subtotal.to_string(), "Rp12.000");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of lines allowed in a single checkout.
///
/// ## Business Reason
/// Bounds how long one checkout holds the inventory write lock.
pub const MAX_CART_LINES: usize = 100;

/// Maximum length of a product or category name.
pub const MAX_NAME_LEN: usize = 200;
