//! HTTP listener and shutdown handling

use anyhow::{Context, Result};
use axum::Router;
use facemark_core::{Config, StorageBackend};
use std::net::{Ipv4Addr, SocketAddr};

/// Bind the listener, log the effective facemark settings, serve until a shutdown signal.
pub async fn start_server(config: &Config, app: Router) -> Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.server_port()));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let storage_location = match config.storage_backend() {
        StorageBackend::S3 => config.s3_bucket().unwrap_or_default(),
        StorageBackend::Local => config.local_storage_path().unwrap_or_default(),
    };

    tracing::info!(
        addr = %addr,
        environment = %config.environment(),
        storage_backend = %config.storage_backend(),
        storage_location = %storage_location,
        signed_url_ttl_secs = config.signed_url_ttl_secs(),
        max_request_body_bytes = config.max_request_body_bytes(),
        max_stored_photos = config.max_stored_photos(),
        require_image_dimensions = config.require_image_dimensions(),
        stage_timeout_secs = config.stage_timeout_secs(),
        email_notifications = config.email_notifications_enabled(),
        "Facemark accepting attendance submissions"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown())
        .await
        .context("HTTP server terminated with an error")?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on SIGINT, or SIGTERM on unix. A handler that cannot be installed is logged
/// and never fires, leaving the other one in charge.
async fn wait_for_shutdown() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        _ = interrupt => "SIGINT",
        _ = terminate => "SIGTERM",
    };

    tracing::info!(signal, "Draining in-flight submissions before shutdown");
}
