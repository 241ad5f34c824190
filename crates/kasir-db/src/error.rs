//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)          CoreError (stock, not found)      │
//! │       │                                    │                            │
//! │       ▼                                    ▼                            │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (kasir-api) ← Status code chosen from DbError::kind()        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Client receives {"error": ..., "message": ...}                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use kasir_core::{CoreError, ErrorKind, ValidationError};
use thiserror::Error;

/// SQLite primary and extended result codes that mean "another connection
/// holds the lock": SQLITE_BUSY, BUSY_RECOVERY, BUSY_SNAPSHOT, BUSY_TIMEOUT.
const SQLITE_BUSY_CODES: [&str; 4] = ["5", "261", "517", "773"];

/// Database operation errors.
///
/// These errors wrap sqlx errors and domain errors raised inside a unit of
/// work, and provide a classification for the HTTP layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `get_by_id` / `update` / `delete` on an id that doesn't exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Creating a category with a name that already exists
    #[error("Duplicate {field}: already exists")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Deleting a product that appears on an order line
    /// - Referencing a category that doesn't exist
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// CHECK constraint violation (negative price or stock slipped past
    /// validation).
    #[error("Constraint violation: {0}")]
    CheckViolation(String),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// The lock wait exceeded the busy timeout.
    ///
    /// ## When This Occurs
    /// ```text
    /// Checkout A: BEGIN IMMEDIATE ──► holds write lock ──────────────► COMMIT
    /// Checkout B:      BEGIN IMMEDIATE ──► waits ... lock_timeout ──► Busy
    /// ```
    #[error("Database is busy: {0}")]
    Busy(String),

    /// A unit of work exceeded its time bound and was aborted.
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Business rule violation raised inside a unit of work.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DbError::NotFound { .. } => ErrorKind::NotFound,
            DbError::UniqueViolation { .. } | DbError::ForeignKeyViolation { .. } => {
                ErrorKind::Conflict
            }
            DbError::CheckViolation(_) => ErrorKind::Validation,
            DbError::Timeout(_) => ErrorKind::Timeout,
            DbError::Domain(err) => err.kind(),
            DbError::ConnectionFailed(_)
            | DbError::MigrationFailed(_)
            | DbError::QueryFailed(_)
            | DbError::Busy(_)
            | DbError::PoolExhausted
            | DbError::Internal(_) => ErrorKind::Storage,
        }
    }

    /// Whether the same request may succeed if retried later.
    ///
    /// Stock conflicts, lock waits and timeouts depend on what other
    /// checkouts are doing. Validation and lookups do not.
    pub fn is_retryable(&self) -> bool {
        match self {
            DbError::Busy(_) | DbError::Timeout(_) | DbError::PoolExhausted => true,
            DbError::Domain(err) => err.kind().is_retryable(),
            _ => false,
        }
    }
}

impl From<ValidationError> for DbError {
    fn from(err: ValidationError) -> Self {
        DbError::Domain(CoreError::Validation(err))
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → constraint kind, busy code, or QueryFailed
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                let code = db_err.code();

                if code
                    .as_deref()
                    .is_some_and(|c| SQLITE_BUSY_CODES.contains(&c))
                    || msg.contains("database is locked")
                {
                    return DbError::Busy(msg.to_string());
                }

                // SQLite constraint messages:
                // "UNIQUE constraint failed: <table>.<column>"
                // "FOREIGN KEY constraint failed"
                // "CHECK constraint failed: <expr>"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("CHECK constraint failed") {
                    DbError::CheckViolation(msg.to_string())
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
