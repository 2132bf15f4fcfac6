//! Postgres pool and schema migrations

use anyhow::{Context, Result};
use facemark_core::Config;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::path::Path;
use std::time::Duration;

const IDLE_TIMEOUT: Duration = Duration::from_secs(600);
const MAX_LIFETIME: Duration = Duration::from_secs(1800);

/// Open the pool and bring the attendance and profile tables up to date.
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    let acquire_timeout = Duration::from_secs(config.db_timeout_seconds());
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections())
        .acquire_timeout(acquire_timeout)
        .idle_timeout(IDLE_TIMEOUT)
        .max_lifetime(MAX_LIFETIME)
        .connect(config.database_url())
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = config.db_max_connections(),
        acquire_timeout_secs = acquire_timeout.as_secs(),
        "Database pool ready"
    );

    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    let migrator = Migrator::new(migrations_dir)
        .await
        .context("Failed to load migrations")?;
    let known = migrator.iter().count();
    migrator
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!(migrations = known, "Schema up to date");

    Ok(pool)
}
