//! Application setup and initialization
//!
//! Wiring for the binary: database, storage, notifier, services and routes, in that order.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;

use crate::state::AppState;
use anyhow::{Context, Result};
use facemark_core::Config;
use facemark_db::{AttendanceRepository, ProfileRepository};
use facemark_services::EmailNotifier;
use facemark_storage::create_storage;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    tracing::info!(
        environment = %config.environment(),
        storage_backend = ?config.storage_backend(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;

    let storage = create_storage(&config)
        .await
        .context("Failed to initialize object storage")?;
    tracing::info!(backend = ?storage.backend_type(), "Object storage initialized");

    let notifier = EmailNotifier::from_config(&config)
        .map(|n| Arc::new(n) as Arc<dyn facemark_core::Notifier>);

    let collaborators = services::Collaborators {
        profiles: Arc::new(ProfileRepository::new(pool.clone())),
        records: Arc::new(AttendanceRepository::new(pool.clone())),
        storage,
        notifier,
        db_pool: Some(pool),
    };
    let state = services::initialize_services(&config, collaborators);

    let router = routes::setup_routes(&config, state.clone()).await?;

    Ok((state, router))
}
