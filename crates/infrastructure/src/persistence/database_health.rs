//! SQLite database health adapter
//!
//! Implements the `DatabaseHealthPort` on top of the shared sqlx pool.

use std::time::Instant;

use application::error::ApplicationError;
use application::ports::{DatabaseHealth, DatabaseHealthPort};
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, instrument, warn};

/// SQLite database health adapter
#[derive(Debug, Clone)]
pub struct SqliteDatabaseHealth {
    pool: SqlitePool,
}

impl SqliteDatabaseHealth {
    /// Create a new database health adapter with the given connection pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatabaseHealthPort for SqliteDatabaseHealth {
    #[instrument(skip(self))]
    async fn is_available(&self) -> bool {
        match sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
        {
            Ok(_) => {
                debug!("Database health check passed");
                true
            },
            Err(e) => {
                warn!(error = %e, "Database health check failed");
                false
            },
        }
    }

    #[instrument(skip(self))]
    async fn check_health(&self) -> Result<DatabaseHealth, ApplicationError> {
        let start = Instant::now();

        let version: String = sqlx::query_scalar("SELECT sqlite_version()")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                ApplicationError::Internal(format!("Database health query failed: {e}"))
            })?;

        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        debug!(version = %version, response_time_ms = elapsed_ms, "Database health check completed");

        Ok(DatabaseHealth::reachable(format!("SQLite {version}")).with_response_time(elapsed_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::async_connection::AsyncDatabase;

    #[tokio::test]
    async fn reports_available() {
        let db = AsyncDatabase::in_memory().await.unwrap();
        let health = SqliteDatabaseHealth::new(db.pool().clone());
        assert!(health.is_available().await);
    }

    #[tokio::test]
    async fn check_health_reports_version() {
        let db = AsyncDatabase::in_memory().await.unwrap();
        let health = SqliteDatabaseHealth::new(db.pool().clone());

        let status = health.check_health().await.unwrap();
        assert!(status.reachable);
        assert!(status.version.unwrap().starts_with("SQLite 3."));
        assert!(status.response_time_ms.is_some());
    }

    #[tokio::test]
    async fn closed_pool_is_unavailable() {
        let db = AsyncDatabase::in_memory().await.unwrap();
        let health = SqliteDatabaseHealth::new(db.pool().clone());
        db.close().await;

        assert!(!health.is_available().await);
        assert!(health.check_health().await.is_err());
    }
}
