//! # kasir-db: Database Layer for Kasir POS
//!
//! This crate provides database access for the Kasir POS backend: the
//! inventory store, the sales ledger, the checkout engine that writes to
//! both atomically, and the reporting aggregator that reads the ledger.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kasir Data Flow                                  │
//! │                                                                         │
//! │  HTTP handler (POST /api/checkout, GET /api/report)                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     kasir-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │ CheckoutEngine│    │ Repositories │  │   │
//! │  │   │   (pool.rs)   │    │ (checkout.rs) │    │ product      │  │   │
//! │  │   │               │───►│  UnitOfWork   │    │ category     │  │   │
//! │  │   │ SqlitePool    │    │  BEGIN        │    │ order        │  │   │
//! │  │   │ Clock         │    │  IMMEDIATE    │    │ report       │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (WAL)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`unit_of_work`] - Write transaction guard
//! - [`checkout`] - Atomic checkout
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kasir_core::CheckoutItem;
//! use kasir_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("kasir.db")).await?;
//!
//! let order = db.checkout().checkout(&[CheckoutItem::new(1, 4)]).await?;
//! let today = db.reports().today_summary().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod unit_of_work;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::CheckoutEngine;
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use unit_of_work::UnitOfWork;

// Repository re-exports for convenience
pub use repository::category::CategoryRepository;
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
pub use repository::report::ReportRepository;
