/// Postgres pool for the board store
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::db::pool::{connect, PoolConfig};
///
/// # async fn example() -> Result<(), sqlx::Error> {
/// let pool = connect(PoolConfig::new("postgresql://localhost/taskboard").with_max_connections(16)).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub url: String,
    pub max_connections: u32,

    /// Connections kept open while idle
    pub min_connections: u32,

    /// Wait for a free connection before failing with `PoolTimedOut`
    pub acquire_timeout: Duration,

    /// `None` keeps idle connections forever
    pub idle_timeout: Option<Duration>,
}

impl PoolConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self.min_connections = self.min_connections.min(self.max_connections);
        self
    }
}

/// Opens the pool and checks the server answers
pub async fn connect(config: PoolConfig) -> Result<PgPool, sqlx::Error> {
    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Connecting to Postgres"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .connect(&config.url)
        .await?;

    ping(&pool).await?;
    Ok(pool)
}

/// Round trip to the server
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    debug!(size = pool.size(), idle = pool.num_idle(), "Postgres reachable");
    Ok(())
}

/// Waits for checked-out connections to come back, then closes the pool
pub async fn close(pool: PgPool) {
    info!("Closing Postgres pool");
    pool.close().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_config_defaults() {
        let config = PoolConfig::new("postgresql://localhost/taskboard");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.acquire_timeout, Duration::from_secs(30));
        assert_eq!(config.idle_timeout, Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_max_connections_bounds_min() {
        let config = PoolConfig::new("postgresql://localhost/taskboard").with_max_connections(0);
        assert_eq!(config.max_connections, 1);
        assert_eq!(config.min_connections, 1);
    }
}
