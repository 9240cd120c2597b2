//! Record store setup

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tubely_core::{Config, RecordStoreBackend};
use tubely_db::{InMemoryVideoRepository, PgVideoRepository, VideoRepository};

/// Build the video repository selected by `RECORD_STORE`.
pub async fn setup_record_store(config: &Config) -> Result<Arc<dyn VideoRepository>> {
    match config.record_store {
        RecordStoreBackend::Postgres => {
            let pool = setup_database(config).await?;
            Ok(Arc::new(PgVideoRepository::new(pool)))
        }
        RecordStoreBackend::Memory => {
            tracing::warn!("Using in-memory record store; videos are lost on restart");
            Ok(Arc::new(InMemoryVideoRepository::new()))
        }
    }
}

/// Setup database connection pool and run migrations
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set when RECORD_STORE=postgres")?;

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = config.db_max_connections,
        "Database connected successfully"
    );

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}
