mod migrations;
mod models;
mod queries;

pub use models::*;
pub use queries::*;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Sqlite;
use thiserror::Error;
use tracing::{debug, info};

/// Failure to hand out a pooled connection.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("timed out waiting for a free database connection")]
    Exhausted,
    #[error("database pool is closed")]
    Closed,
    #[error("database connection failed: {0}")]
    Connection(#[source] sqlx::Error),
}

impl From<sqlx::Error> for PoolError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => Self::Exhausted,
            sqlx::Error::PoolClosed => Self::Closed,
            other => Self::Connection(other),
        }
    }
}

/// Bounds for the connection pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            min_connections: 1,
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the database pool, running migrations if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails or migrations fail.
    pub async fn new(path: &Path, settings: &PoolSettings) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            // Writes are serialized by SQLite; concurrent handlers wait instead of
            // failing with SQLITE_BUSY.
            .busy_timeout(Duration::from_secs(10));

        let pool = SqlitePoolOptions::new()
            .min_connections(settings.min_connections)
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open SQLite database at {}", path.display()))?;

        let db = Self { pool };
        db.run_migrations().await?;
        db.verify_writable(path).await?;

        info!(
            path = %path.display(),
            min_connections = settings.min_connections,
            max_connections = settings.max_connections,
            "Database pool ready"
        );

        Ok(db)
    }

    async fn verify_writable(&self, path: &Path) -> Result<()> {
        // Starting a transaction requires write capability on SQLite.
        let tx = self.pool.begin().await.with_context(|| {
            format!(
                "SQLite database is not writable (path: {}). Check file permissions",
                path.display()
            )
        })?;

        tx.commit()
            .await
            .context("Failed to commit SQLite writability check")?;
        Ok(())
    }

    /// Run all pending migrations.
    async fn run_migrations(&self) -> Result<()> {
        migrations::run(&self.pool).await?;
        debug!("Database migrations complete");
        Ok(())
    }

    /// Check out one connection for the duration of a request.
    ///
    /// The connection goes back to the pool when the returned guard is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Exhausted`] when no connection frees up within the
    /// acquire timeout and [`PoolError::Closed`] after [`Database::close`].
    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>, PoolError> {
        self.pool.acquire().await.map_err(PoolError::from)
    }

    /// Close every connection and refuse new checkouts. Safe to call repeatedly.
    pub async fn close(&self) {
        if !self.pool.is_closed() {
            self.pool.close().await;
            info!("Database pool closed");
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Get a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
