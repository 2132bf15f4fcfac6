//! Application state shared by every handler.

use facemark_core::Authenticator;
use facemark_services::{AttendanceOrchestrator, IngestionService, PhotoEnrollmentService};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub authenticator: Arc<dyn Authenticator>,
    pub ingestion: Arc<IngestionService>,
    pub enrollment: Arc<PhotoEnrollmentService>,
    pub orchestrator: Arc<AttendanceOrchestrator>,
    /// `None` when the stores are not Postgres-backed (tests); readiness then skips the ping.
    pub db_pool: Option<PgPool>,
}
