//! Attendance submission orchestrator
//!
//! Sequences one submission through
//! `Idle → Capturing → Validating → Uploading → Persisting → Notifying → Done`.
//! Stages of one submission never overlap. Only `Validating` and `Persisting` failures
//! are fatal; a storage failure degrades to a record without an image, and the
//! notification runs detached so it can never change the outcome.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use facemark_core::{
    AppError, AttendanceEvent, AttendanceNotice, AttendanceStatus, CaptureFrame, DetectedFormat,
    FaceDetector, Notifier, Principal, ProfileStore, RecordStore,
};
use facemark_storage::{attendance_frame_key, ObjectStorage};
use serde::Serialize;
use uuid::Uuid;

use crate::audit;
use crate::ingestion::IngestionService;
use crate::timeout::within;

/// Shown to the user when the frame held no usable face.
pub const NO_FACE_MESSAGE: &str = "No face detected. Look at the camera and try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStage {
    Idle,
    Capturing,
    Validating,
    Uploading,
    Persisting,
    Notifying,
    Done,
    Errored,
}

impl Display for SubmissionStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            SubmissionStage::Idle => "idle",
            SubmissionStage::Capturing => "capturing",
            SubmissionStage::Validating => "validating",
            SubmissionStage::Uploading => "uploading",
            SubmissionStage::Persisting => "persisting",
            SubmissionStage::Notifying => "notifying",
            SubmissionStage::Done => "done",
            SubmissionStage::Errored => "errored",
        };
        write!(f, "{}", name)
    }
}

/// One attendance submission from an authenticated principal.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub principal: Principal,
    pub claimed_owner: Principal,
    pub frame: CaptureFrame,
    /// Reusing an id after a failed attempt resolves to the same record.
    pub submission_id: Option<Uuid>,
}

/// Terminal observation of a submission. Each variant carries the visited stages.
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// Nothing usable was captured; the pipeline is back at `Idle`.
    Retry {
        message: String,
        trail: Vec<SubmissionStage>,
    },
    Done {
        record_id: Uuid,
        submission_id: Uuid,
        image_reference: Option<String>,
        trail: Vec<SubmissionStage>,
    },
    Errored {
        stage: SubmissionStage,
        error: AppError,
        trail: Vec<SubmissionStage>,
    },
}

impl SubmissionOutcome {
    pub fn trail(&self) -> &[SubmissionStage] {
        match self {
            SubmissionOutcome::Retry { trail, .. }
            | SubmissionOutcome::Done { trail, .. }
            | SubmissionOutcome::Errored { trail, .. } => trail,
        }
    }

    /// Stage the submission ended in.
    pub fn terminal_stage(&self) -> SubmissionStage {
        match self {
            SubmissionOutcome::Retry { .. } => SubmissionStage::Idle,
            SubmissionOutcome::Done { .. } => SubmissionStage::Done,
            SubmissionOutcome::Errored { .. } => SubmissionStage::Errored,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrchestratorSettings {
    /// Deadline for each external step.
    pub stage_timeout: Duration,
    /// Lifetime of the retrieval URL stored on the record.
    pub signed_url_ttl: Duration,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            stage_timeout: Duration::from_secs(10),
            signed_url_ttl: Duration::from_secs(3600),
        }
    }
}

#[derive(Clone)]
pub struct AttendanceOrchestrator {
    ingestion: Arc<IngestionService>,
    detector: Arc<dyn FaceDetector>,
    storage: Arc<dyn ObjectStorage>,
    records: Arc<dyn RecordStore>,
    profiles: Arc<dyn ProfileStore>,
    notifier: Option<Arc<dyn Notifier>>,
    settings: OrchestratorSettings,
}

impl AttendanceOrchestrator {
    pub fn new(
        ingestion: Arc<IngestionService>,
        detector: Arc<dyn FaceDetector>,
        storage: Arc<dyn ObjectStorage>,
        records: Arc<dyn RecordStore>,
        profiles: Arc<dyn ProfileStore>,
        notifier: Option<Arc<dyn Notifier>>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            ingestion,
            detector,
            storage,
            records,
            profiles,
            notifier,
            settings,
        }
    }

    /// Run one submission to a terminal state.
    #[tracing::instrument(
        skip(self, request),
        fields(principal = %request.principal, submission_id = tracing::field::Empty)
    )]
    pub async fn submit(&self, request: SubmissionRequest) -> SubmissionOutcome {
        let submission_id = request.submission_id.unwrap_or_else(Uuid::new_v4);
        tracing::Span::current().record("submission_id", tracing::field::display(submission_id));

        let mut trail = vec![SubmissionStage::Idle, SubmissionStage::Capturing];

        let detected = self
            .step(SubmissionStage::Capturing, self.detector.detect(&request.frame))
            .await;
        let capture = match detected {
            Ok(Some(capture)) => capture,
            Ok(None) => {
                trail.push(SubmissionStage::Idle);
                return SubmissionOutcome::Retry {
                    message: NO_FACE_MESSAGE.to_string(),
                    trail,
                };
            }
            Err(e) => {
                tracing::warn!(error = %e, "Face detection failed, returning to idle");
                trail.push(SubmissionStage::Idle);
                return SubmissionOutcome::Retry {
                    message: NO_FACE_MESSAGE.to_string(),
                    trail,
                };
            }
        };

        trail.push(SubmissionStage::Validating);
        let admitted = self
            .step(
                SubmissionStage::Validating,
                self.ingestion.admit_frame(
                    request.principal,
                    request.claimed_owner,
                    &capture.image_data_uri,
                ),
            )
            .await;
        let (format, bytes) = match admitted {
            Ok(admitted) => match (admitted.result.valid, admitted.result.format) {
                (true, Some(format)) => (format, admitted.bytes),
                _ => {
                    let error = admitted.result.rejection.map(AppError::from).unwrap_or_else(|| {
                        AppError::Internal("Validator rejected image without a reason".to_string())
                    });
                    return errored(SubmissionStage::Validating, error, trail);
                }
            },
            Err(error) => return errored(SubmissionStage::Validating, error, trail),
        };

        trail.push(SubmissionStage::Uploading);
        let image_reference = match self.upload(request.principal, format, bytes).await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Frame upload failed, recording attendance without an image"
                );
                None
            }
        };

        trail.push(SubmissionStage::Persisting);
        let event = AttendanceEvent {
            submission_id,
            principal: request.principal,
            descriptor: capture.descriptor,
            confidence: capture.confidence,
            image_reference: image_reference.clone(),
            status: AttendanceStatus::Present,
            timestamp: Utc::now(),
        };
        let record_id = match self
            .step(SubmissionStage::Persisting, self.records.insert(&event))
            .await
        {
            Ok(id) => id,
            Err(error) => return errored(SubmissionStage::Persisting, error, trail),
        };
        audit::log_attendance_recorded(request.principal, record_id, submission_id);

        trail.push(SubmissionStage::Notifying);
        self.spawn_notification(AttendanceNotice::from_event(record_id, &event));

        trail.push(SubmissionStage::Done);
        tracing::info!(
            record_id = %record_id,
            has_image = image_reference.is_some(),
            "Attendance submission completed"
        );

        SubmissionOutcome::Done {
            record_id,
            submission_id,
            image_reference,
            trail,
        }
    }

    async fn step<T, F>(&self, stage: SubmissionStage, fut: F) -> Result<T, AppError>
    where
        F: std::future::Future<Output = Result<T, AppError>>,
    {
        within(&stage.to_string(), self.settings.stage_timeout, fut).await
    }

    /// Store the frame and return a time-limited URL for it.
    async fn upload(
        &self,
        principal: Principal,
        format: DetectedFormat,
        bytes: Vec<u8>,
    ) -> Result<String, AppError> {
        let key = attendance_frame_key(principal, format);
        let stage = SubmissionStage::Uploading;

        self.step(stage, async {
            self.storage
                .put(&key, bytes, format.mime_type())
                .await
                .map_err(|e| AppError::upstream(stage.to_string(), e))
        })
        .await?;

        self.step(stage, async {
            self.storage
                .create_time_limited_url(&key, self.settings.signed_url_ttl)
                .await
                .map_err(|e| AppError::upstream(stage.to_string(), e))
        })
        .await
    }

    /// Fire-and-forget delivery; failures are logged and never reach the caller.
    fn spawn_notification(&self, notice: AttendanceNotice) {
        let Some(notifier) = self.notifier.clone() else {
            return;
        };
        let profiles = Arc::clone(&self.profiles);
        let limit = self.settings.stage_timeout;
        let stage = SubmissionStage::Notifying.to_string();

        tokio::spawn(async move {
            let address = match within(&stage, limit, profiles.contact_address(notice.principal))
                .await
            {
                Ok(Some(address)) => address,
                Ok(None) => {
                    tracing::debug!(principal = %notice.principal, "No contact address, skipping notification");
                    return;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to look up contact address");
                    return;
                }
            };

            match within(&stage, limit, notifier.send(&address, &notice)).await {
                Ok(()) => tracing::debug!(record_id = %notice.record_id, "Attendance notification sent"),
                Err(e) => tracing::warn!(
                    error = %e,
                    record_id = %notice.record_id,
                    "Attendance notification failed"
                ),
            }
        });
    }
}

fn errored(
    stage: SubmissionStage,
    error: AppError,
    mut trail: Vec<SubmissionStage>,
) -> SubmissionOutcome {
    tracing::warn!(stage = %stage, error = %error, "Attendance submission failed");
    trail.push(SubmissionStage::Errored);
    SubmissionOutcome::Errored { stage, error, trail }
}
