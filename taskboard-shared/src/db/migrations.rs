/// Schema migrations for users, projects, columns and tasks
///
/// The SQL files under the workspace `migrations/` directory are compiled
/// into the binary, so a deployed server never needs them on disk.
///
/// ```no_run
/// use taskboard_shared::db::migrations::{ensure_database_exists, run_migrations};
/// use taskboard_shared::db::pool::{connect, PoolConfig};
///
/// # async fn example(url: String) -> Result<(), Box<dyn std::error::Error>> {
/// ensure_database_exists(&url).await?;
/// let pool = connect(PoolConfig::new(url)).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::migrate::{MigrateDatabase, MigrateError, Migrator};
use sqlx::{postgres::PgPool, Postgres};
use tracing::{error, info};

static MIGRATOR: Migrator = sqlx::migrate!("../migrations");

/// Applies pending migrations; already-applied ones are skipped
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    let known = MIGRATOR.iter().count();
    MIGRATOR.run(pool).await.map_err(|e| {
        error!(error = %e, "Schema migration failed");
        e
    })?;
    info!(migrations = known, "Schema up to date");
    Ok(())
}

/// Creates the database named in `database_url` if it is missing
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if !Postgres::database_exists(database_url).await? {
        info!("Creating database");
        Postgres::create_database(database_url).await?;
    }
    Ok(())
}
