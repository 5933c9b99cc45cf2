//! PostgreSQL persistence for the movie catalog.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod models;
pub mod repositories;

pub use error::{StoreError, StoreResult};

pub type DbPool = sqlx::PgPool;

/// Time allowed for the initial connectivity ping.
const CONNECT_PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection pool bounds.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Upper bound on open connections.
    pub max_connections: u32,
    /// Connections kept open even when idle.
    pub min_connections: u32,
    /// Idle connections above `min_connections` are closed after this long.
    pub idle_timeout: Duration,
    /// How long a caller waits for a free connection before failing.
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 25,
            min_connections: 0,
            idle_timeout: Duration::from_secs(15 * 60),
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Create a connection pool from a database URL and verify it answers.
pub async fn create_pool(database_url: &str, config: &PoolConfig) -> Result<DbPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .idle_timeout(config.idle_timeout)
        .acquire_timeout(config.acquire_timeout)
        .connect(database_url)
        .await?;

    match tokio::time::timeout(CONNECT_PING_TIMEOUT, health_check(&pool)).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(StoreError::Timeout {
                operation: "connect",
                after: CONNECT_PING_TIMEOUT,
            })
        }
    }

    tracing::info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        idle_timeout_secs = config.idle_timeout.as_secs(),
        "Database pool ready"
    );
    Ok(pool)
}

/// Run a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
