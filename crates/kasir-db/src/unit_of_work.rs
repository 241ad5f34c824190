//! # Unit of Work
//!
//! A write transaction pinned to one pooled connection.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  UnitOfWork::begin(pool)                                               │
//! │       │  acquire connection                                            │
//! │       │  BEGIN IMMEDIATE  ← takes the database write lock now,         │
//! │       │                     waits up to busy_timeout if held           │
//! │       ▼                                                                 │
//! │  conn() ── reads / writes ── all inside the same transaction           │
//! │       │                                                                 │
//! │       ├── commit()    → COMMIT, connection back to pool                │
//! │       ├── rollback()  → ROLLBACK, connection back to pool              │
//! │       └── dropped     → connection detached and closed;                │
//! │                         SQLite rolls back on close                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The drop path is what makes a cancelled future safe: when the checkout
//! timeout fires mid-statement the guard is dropped, and a half-finished
//! transaction never returns to the pool.

use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};

/// An open `BEGIN IMMEDIATE` transaction.
pub struct UnitOfWork {
    conn: Option<PoolConnection<Sqlite>>,

    /// True while a transaction may be open on `conn`.
    open: bool,
}

impl UnitOfWork {
    /// Acquires a connection and takes the write lock.
    ///
    /// ## Errors
    /// - [`DbError::Busy`] when another unit holds the lock past the busy
    ///   timeout
    /// - [`DbError::PoolExhausted`] when no connection frees up in time
    pub async fn begin(pool: &SqlitePool) -> DbResult<Self> {
        let conn = pool.acquire().await?;
        let mut uow = UnitOfWork {
            conn: Some(conn),
            open: true,
        };

        // `open` stays true if this future is cancelled mid-statement.
        let begun = sqlx::query("BEGIN IMMEDIATE").execute(uow.conn()?).await;
        if let Err(err) = begun {
            uow.open = false;
            return Err(err.into());
        }

        debug!("Unit of work started");
        Ok(uow)
    }

    /// The connection all statements of this unit must run on.
    pub fn conn(&mut self) -> DbResult<&mut SqliteConnection> {
        self.conn
            .as_deref_mut()
            .ok_or_else(|| DbError::Internal("unit of work already finished".to_string()))
    }

    /// Makes every change visible atomically.
    pub async fn commit(mut self) -> DbResult<()> {
        sqlx::query("COMMIT").execute(self.conn()?).await?;
        self.open = false;
        debug!("Unit of work committed");
        Ok(())
    }

    /// Discards every change.
    ///
    /// A failed ROLLBACK is logged and left to the drop path, which closes
    /// the connection.
    pub async fn rollback(mut self) {
        let result = match self.conn() {
            Ok(conn) => sqlx::query("ROLLBACK").execute(conn).await.map(|_| ()),
            Err(_) => return,
        };

        match result {
            Ok(()) => {
                self.open = false;
                debug!("Unit of work rolled back");
            }
            Err(err) => warn!(error = %err, "ROLLBACK failed, closing connection"),
        }
    }
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        if let Some(conn) = self.conn.take() {
            warn!("Unit of work dropped while open, closing its connection");
            drop(conn.detach());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("uow.db")))
            .await
            .unwrap();
        (dir, db)
    }

    async fn category_count(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_commit_persists() {
        let (_dir, db) = test_db().await;

        let mut uow = UnitOfWork::begin(db.pool()).await.unwrap();
        sqlx::query("INSERT INTO categories (name) VALUES ('Makanan')")
            .execute(uow.conn().unwrap())
            .await
            .unwrap();
        uow.commit().await.unwrap();

        assert_eq!(category_count(&db).await, 1);
    }

    #[tokio::test]
    async fn test_rollback_discards() {
        let (_dir, db) = test_db().await;

        let mut uow = UnitOfWork::begin(db.pool()).await.unwrap();
        sqlx::query("INSERT INTO categories (name) VALUES ('Minuman')")
            .execute(uow.conn().unwrap())
            .await
            .unwrap();
        uow.rollback().await;

        assert_eq!(category_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_drop_without_commit_discards_and_releases_lock() {
        let (_dir, db) = test_db().await;

        {
            let mut uow = UnitOfWork::begin(db.pool()).await.unwrap();
            sqlx::query("INSERT INTO categories (name) VALUES ('Snack')")
                .execute(uow.conn().unwrap())
                .await
                .unwrap();
        }

        assert_eq!(category_count(&db).await, 0);

        // The write lock is free again.
        let uow = UnitOfWork::begin(db.pool()).await.unwrap();
        uow.commit().await.unwrap();
    }
}
