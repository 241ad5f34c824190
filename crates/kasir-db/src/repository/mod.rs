//! # Repository Module
//!
//! Database repository implementations for Kasir POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.reports().summary_for_range(range)                         │
//! │       ▼                                                                 │
//! │  ReportRepository                                                      │
//! │  ├── today_summary(&self)                                              │
//! │  └── summary_for_range(&self, range)                                   │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  SQL lives only in this module and in the checkout engine.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Inventory CRUD and search
//! - [`CategoryRepository`](category::CategoryRepository) - Category CRUD
//! - [`OrderRepository`](order::OrderRepository) - Ledger reads
//! - [`ReportRepository`](report::ReportRepository) - Sales summaries

pub mod category;
pub mod order;
pub mod product;
pub mod report;
