//! Interfaces to the external collaborators of the ingestion pipeline.
//!
//! The pipeline only depends on these traits. Postgres-backed stores live in
//! `facemark-db`, the SMTP notifier and detector in `facemark-services`, and the JWT
//! authenticator in `facemark-api`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    AttendanceEvent, AttendanceNotice, CaptureFrame, FaceCapture, Principal, StoredPhoto,
};

/// Resolves a bearer credential to a principal.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Returns the principal for the credential or [`AppError::Unauthenticated`].
    async fn authenticate(&self, bearer: &str) -> Result<Principal, AppError>;
}

/// Profile data the pipeline reads and appends to.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Current number of stored enrollment photos for the principal.
    async fn stored_photo_count(&self, principal: Principal) -> Result<i64, AppError>;

    /// Record a newly stored enrollment photo.
    async fn append_photo_reference(
        &self,
        principal: Principal,
        storage_key: &str,
        url: &str,
    ) -> Result<StoredPhoto, AppError>;

    /// Registered contact address, if the principal has one.
    async fn contact_address(&self, principal: Principal) -> Result<Option<String>, AppError>;
}

/// Append-only attendance record store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert the event and return its record id.
    ///
    /// Inserting an event whose `submission_id` already exists for the same principal
    /// returns the existing id without creating a second record. A `submission_id` already
    /// recorded for another principal yields [`AppError::Conflict`].
    async fn insert(&self, event: &AttendanceEvent) -> Result<Uuid, AppError>;
}

/// Delivers attendance notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, address: &str, notice: &AttendanceNotice) -> Result<(), AppError>;
}

/// Face detection black box.
#[async_trait]
pub trait FaceDetector: Send + Sync {
    /// Returns `Ok(None)` when no usable face is present in the frame.
    async fn detect(&self, frame: &CaptureFrame) -> Result<Option<FaceCapture>, AppError>;
}
