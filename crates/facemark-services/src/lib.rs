//! Facemark Services Layer
//!
//! Business services composed from the collaborator traits in `facemark-core`:
//! the ingestion boundary, photo enrollment, and the attendance submission pipeline,
//! plus the concrete SMTP notifier and descriptor-carrying face detector. Keep
//! coordination here; keep thin HTTP handling in `facemark-api`.

pub mod audit;
pub mod detector;
pub mod enrollment;
pub mod ingestion;
pub mod notifier;
pub mod orchestrator;
mod timeout;

#[cfg(test)]
pub(crate) mod test_support;

pub use detector::PrecomputedDescriptorDetector;
pub use enrollment::PhotoEnrollmentService;
pub use ingestion::{AdmittedImage, IngestionService};
pub use notifier::EmailNotifier;
pub use orchestrator::{
    AttendanceOrchestrator, OrchestratorSettings, SubmissionOutcome, SubmissionRequest,
    SubmissionStage,
};
