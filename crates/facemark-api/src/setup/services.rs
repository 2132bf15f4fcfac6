//! Service construction from collaborators

use crate::auth::JwtAuthenticator;
use crate::state::AppState;
use facemark_core::{Config, Notifier, ProfileStore, RecordStore};
use facemark_processing::{ImageValidator, UploadQuota, ValidatorPolicy};
use facemark_services::{
    AttendanceOrchestrator, IngestionService, OrchestratorSettings, PhotoEnrollmentService,
    PrecomputedDescriptorDetector,
};
use facemark_storage::ObjectStorage;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

/// External systems the services are built on.
pub struct Collaborators {
    pub profiles: Arc<dyn ProfileStore>,
    pub records: Arc<dyn RecordStore>,
    pub storage: Arc<dyn ObjectStorage>,
    pub notifier: Option<Arc<dyn Notifier>>,
    pub db_pool: Option<PgPool>,
}

pub fn initialize_services(config: &Config, collaborators: Collaborators) -> Arc<AppState> {
    let Collaborators {
        profiles,
        records,
        storage,
        notifier,
        db_pool,
    } = collaborators;

    let validator = Arc::new(ImageValidator::new(ValidatorPolicy {
        require_dimensions: config.require_image_dimensions(),
    }));
    let quota = UploadQuota::new(config.max_stored_photos());
    let ingestion = Arc::new(IngestionService::new(profiles.clone(), validator, quota));

    let settings = OrchestratorSettings {
        stage_timeout: Duration::from_secs(config.stage_timeout_secs()),
        signed_url_ttl: Duration::from_secs(config.signed_url_ttl_secs()),
    };

    let enrollment = Arc::new(PhotoEnrollmentService::new(
        ingestion.clone(),
        storage.clone(),
        profiles.clone(),
        settings.signed_url_ttl,
        settings.stage_timeout,
    ));

    if notifier.is_none() {
        tracing::info!("Attendance notifications disabled");
    }

    let orchestrator = Arc::new(AttendanceOrchestrator::new(
        ingestion.clone(),
        Arc::new(PrecomputedDescriptorDetector::default()),
        storage,
        records,
        profiles,
        notifier,
        settings,
    ));

    Arc::new(AppState {
        authenticator: Arc::new(JwtAuthenticator::new(config.jwt_secret())),
        ingestion,
        enrollment,
        orchestrator,
        db_pool,
    })
}
