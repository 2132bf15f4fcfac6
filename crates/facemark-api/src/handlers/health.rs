//! Health check handlers.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use std::time::Duration;

/// Liveness check: the process is running.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness check: critical dependencies (database) are reachable.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Ready to serve"),
        (status = 503, description = "A dependency is unavailable")
    )
)]
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    const TIMEOUT: Duration = Duration::from_secs(5);

    let mut response = serde_json::json!({
        "status": "ready",
        "database": "not_configured"
    });

    let mut overall_ready = true;
    if let Some(pool) = state.db_pool.as_ref() {
        match tokio::time::timeout(TIMEOUT, sqlx::query("SELECT 1").execute(pool)).await {
            Ok(Ok(_)) => response["database"] = serde_json::json!("ready"),
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Database readiness check failed");
                response["database"] = serde_json::json!("not_ready");
                overall_ready = false;
            }
            Err(_) => {
                tracing::error!("Database readiness check timed out");
                response["database"] = serde_json::json!("timeout");
                overall_ready = false;
            }
        }
    }

    let status_code = if overall_ready {
        StatusCode::OK
    } else {
        response["status"] = serde_json::json!("not_ready");
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
