use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Principal;
use crate::constants::DESCRIPTOR_LENGTH;

/// Attendance status recorded for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "attendance_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl Display for AttendanceStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AttendanceStatus::Present => write!(f, "present"),
            AttendanceStatus::Absent => write!(f, "absent"),
        }
    }
}

/// Fixed-length numeric face descriptor produced by the external capture model.
///
/// Only constructed through [`FaceDescriptor::new`], which enforces the length and
/// rejects non-finite components.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FaceDescriptor(Vec<f32>);

impl FaceDescriptor {
    pub fn new(values: Vec<f32>) -> Option<Self> {
        if values.len() != DESCRIPTOR_LENGTH || values.iter().any(|v| !v.is_finite()) {
            return None;
        }
        Some(Self(values))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }
}

/// One frame handed to the face detector.
///
/// The frame is an encoded image data URI. The descriptor model runs next to the camera,
/// so the frame may arrive with a descriptor and confidence already attached.
#[derive(Debug, Clone)]
pub struct CaptureFrame {
    pub image_data_uri: String,
    pub descriptor: Option<Vec<f32>>,
    pub confidence: Option<f32>,
}

/// Result of a successful detection: one descriptor plus the encoded frame it came from.
#[derive(Debug, Clone)]
pub struct FaceCapture {
    pub descriptor: FaceDescriptor,
    pub confidence: f32,
    pub image_data_uri: String,
}

/// Immutable attendance record created once per successful submission.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceEvent {
    /// Idempotency key; repeated inserts with the same id resolve to the same record.
    pub submission_id: Uuid,
    pub principal: Principal,
    pub descriptor: FaceDescriptor,
    pub confidence: f32,
    pub image_reference: Option<String>,
    pub status: AttendanceStatus,
    pub timestamp: DateTime<Utc>,
}

/// Template data for the attendance notification.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceNotice {
    pub record_id: Uuid,
    pub principal: Principal,
    pub status: AttendanceStatus,
    pub confidence: f32,
    pub image_url: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AttendanceNotice {
    pub fn from_event(record_id: Uuid, event: &AttendanceEvent) -> Self {
        Self {
            record_id,
            principal: event.principal,
            status: event.status,
            confidence: event.confidence,
            image_url: event.image_reference.clone(),
            timestamp: event.timestamp,
        }
    }
}
