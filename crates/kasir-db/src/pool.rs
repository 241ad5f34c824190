//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  Server startup                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← pool size, lock/checkout timeouts, offset       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + run migrations            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │                           │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...   │  (max_connections)        │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  checkout  ──► Conn1 (BEGIN IMMEDIATE, holds write lock)               │
//! │  checkout  ──► Conn2 (waits up to lock_timeout for the lock)           │
//! │  report    ──► Conn3 (WAL snapshot read, never waits)                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled so reports read a
//! consistent snapshot while a checkout holds the write lock.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::FixedOffset;
use kasir_core::{Clock, SystemClock, ValidationError};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::checkout::CheckoutEngine;
use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::category::CategoryRepository;
use crate::repository::order::OrderRepository;
use crate::repository::product::ProductRepository;
use crate::repository::report::ReportRepository;

/// Largest accepted reporting offset, in minutes (UTC±14:00).
pub const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/kasir/kasir.db")
///     .max_connections(8)
///     .checkout_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// How long to wait for a free pooled connection.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// SQLite busy timeout: how long a unit of work waits for another
    /// unit's write lock before failing with [`DbError::Busy`].
    /// Default: 5 seconds
    pub lock_timeout: Duration,

    /// Upper bound on one checkout unit of work, lock wait included.
    /// Default: 10 seconds
    pub checkout_timeout: Duration,

    /// Offset of the reporting calendar from UTC, in minutes.
    /// Default: 0 (calendar days are UTC days)
    pub report_utc_offset_minutes: i32,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            lock_timeout: Duration::from_secs(5),
            checkout_timeout: Duration::from_secs(10),
            report_utc_offset_minutes: 0,
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection acquire timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the SQLite busy timeout.
    pub fn lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Sets the checkout unit-of-work bound.
    pub fn checkout_timeout(mut self, timeout: Duration) -> Self {
        self.checkout_timeout = timeout;
        self
    }

    /// Sets the reporting calendar offset.
    pub fn report_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.report_utc_offset_minutes = minutes;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Resolves the reporting offset, rejecting values beyond ±14 hours.
    pub fn report_offset(&self) -> DbResult<FixedOffset> {
        let minutes = self.report_utc_offset_minutes;
        if minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(offset_out_of_range());
        }
        FixedOffset::east_opt(minutes * 60).ok_or_else(offset_out_of_range)
    }
}

fn offset_out_of_range() -> DbError {
    ValidationError::OutOfRange {
        field: "report_utc_offset_minutes".to_string(),
        min: -i64::from(MAX_UTC_OFFSET_MINUTES),
        max: i64::from(MAX_UTC_OFFSET_MINUTES),
    }
    .into()
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Cheap to clone: the pool and clock are reference counted. The HTTP layer
/// keeps one `Database` in its router state and every handler asks it for
/// the repository it needs.
///
/// ## Usage in Handlers
/// ```rust,ignore
/// async fn today_report(State(state): State<AppState>) -> Result<Json<SalesSummary>, ApiError> {
///     let summary = state.db.reports().today_summary().await?;
///     Ok(Json(summary))
/// }
/// ```
#[derive(Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,

    /// Source of order timestamps and "today".
    clock: Arc<dyn Clock>,

    checkout_timeout: Duration,

    report_offset: FixedOffset,
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("pool", &self.pool)
            .field("checkout_timeout", &self.checkout_timeout)
            .field("report_offset", &self.report_offset)
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Creates a new database connection pool using the system clock.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite:
    ///    - WAL mode for concurrent reads
    ///    - NORMAL synchronous (balance of safety/speed)
    ///    - Foreign keys enabled
    ///    - Busy timeout = `lock_timeout`
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock)).await
    }

    /// Same as [`Database::new`], with an explicit clock.
    pub async fn with_clock(config: DbConfig, clock: Arc<dyn Clock>) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let report_offset = config.report_offset()?;

        let connect_options = SqliteConnectOptions::new()
            .filename(&config.database_path)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // SQLite has foreign keys disabled by default
            .foreign_keys(true)
            .busy_timeout(config.lock_timeout)
            .create_if_missing(true);

        debug!(
            lock_timeout_ms = config.lock_timeout.as_millis() as u64,
            "Connection options configured"
        );

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database {
            pool,
            clock,
            checkout_timeout: config.checkout_timeout,
            report_offset,
        };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Runs database migrations. Called by `new()` when enabled.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        Ok(())
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the clock shared by checkout and reporting.
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Returns the product (inventory) repository.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    /// Returns the category repository.
    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone())
    }

    /// Returns the read side of the ledger.
    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    /// Returns the reporting aggregator.
    pub fn reports(&self) -> ReportRepository {
        ReportRepository::new(self.pool.clone(), self.clock(), self.report_offset)
    }

    /// Returns the checkout engine.
    pub fn checkout(&self) -> CheckoutEngine {
        CheckoutEngine::new(self.pool.clone(), self.clock(), self.checkout_timeout)
    }

    /// Closes the database connection pool.
    ///
    /// ## Note
    /// After calling close, all repository operations will fail.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
