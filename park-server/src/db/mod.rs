//! Database Module
//!
//! SQLite connection pool and migrations.

pub mod models;
pub mod repository;

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

use crate::utils::AppError;

/// Embedded migrations, shared by the runtime pool and test pools.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Database service — owns a SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Create a new database service with WAL mode and run migrations.
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        // busy_timeout/foreign_keys go through connect options so every pooled
        // connection gets them, not just the one that ran a pragma
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true)
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");

        Ok(Self { pool })
    }
}

// ── Explicit transactions ───────────────────────────────────────────
//
// Engine mutations open with BEGIN IMMEDIATE so the writer lock is taken up
// front: a deferred BEGIN that reads before writing can abort with
// SQLITE_BUSY mid-transaction under writer contention instead of waiting on
// the busy timeout. The `Transaction` guard rolls back on drop, so a request
// future cancelled between begin and commit cannot leak an open write
// transaction back into the pool.

/// Transaction handle for engine mutations.
pub type SqliteTx = sqlx::Transaction<'static, sqlx::Sqlite>;

/// Open an IMMEDIATE transaction from the pool.
pub async fn begin_immediate(pool: &SqlitePool) -> Result<SqliteTx, AppError> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

/// Roll back explicitly. Dropping the guard would too; this logs failures.
pub async fn rollback(tx: SqliteTx) {
    if let Err(e) = tx.rollback().await {
        tracing::warn!(error = %e, "Rollback failed");
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use sqlx::SqlitePool;
    use sqlx::sqlite::SqlitePoolOptions;

    use super::MIGRATOR;

    /// In-memory pool for single-connection tests; the embedded migrator
    /// provides the schema.
    pub async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&pool)
            .await
            .unwrap();
        MIGRATOR.run(&pool).await.unwrap();
        pool
    }
}
