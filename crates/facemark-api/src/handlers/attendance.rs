use crate::auth::AuthenticatedPrincipal;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use facemark_core::{CaptureFrame, Principal};
use facemark_services::{SubmissionOutcome, SubmissionRequest, SubmissionStage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

pub const FAILED_STAGE_HEADER: &str = "x-failed-stage";

#[derive(Debug, Deserialize, ToSchema)]
pub struct AttendanceSubmission {
    pub claimed_owner_id: Principal,
    /// `data:image/<type>;base64,<payload>` of the captured frame
    pub image_data_uri: String,
    /// Face descriptor computed next to the camera (128 values)
    #[serde(default)]
    pub descriptor: Option<Vec<f32>>,
    /// Detection confidence in `0..=1`
    #[serde(default)]
    pub confidence: Option<f32>,
    /// Idempotency key; resubmitting with the same id never creates a second record
    #[serde(default)]
    pub submission_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceResponse {
    /// Terminal stage: `done`, or `idle` when the frame held no usable face
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<Uuid>,
    /// Time-limited URL of the stored frame; absent when storage failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Stages visited, in order
    pub trail: Vec<String>,
}

fn stage_names(trail: &[SubmissionStage]) -> Vec<String> {
    trail.iter().map(ToString::to_string).collect()
}

/// Run one attendance submission to its terminal state.
#[utoipa::path(
    post,
    path = "/api/v0/attendance",
    tag = "attendance",
    request_body = AttendanceSubmission,
    responses(
        (status = 201, description = "Attendance recorded", body = AttendanceResponse),
        (status = 200, description = "No face detected; capture again", body = AttendanceResponse),
        (status = 400, description = "Body is not a base64 image data URI", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Claimed owner is not the caller", body = ErrorResponse),
        (status = 409, description = "submission_id already used by another account", body = ErrorResponse),
        (status = 422, description = "Frame rejected by validation", body = ErrorResponse),
        (status = 500, description = "Record could not be persisted", body = ErrorResponse),
        (status = 504, description = "A stage timed out", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip_all,
    fields(principal = %principal.0, operation = "submit_attendance")
)]
pub async fn submit_attendance(
    State(state): State<Arc<AppState>>,
    principal: AuthenticatedPrincipal,
    ValidatedJson(body): ValidatedJson<AttendanceSubmission>,
) -> Response {
    let request = SubmissionRequest {
        principal: principal.0,
        claimed_owner: body.claimed_owner_id,
        frame: CaptureFrame {
            image_data_uri: body.image_data_uri,
            descriptor: body.descriptor,
            confidence: body.confidence,
        },
        submission_id: body.submission_id,
    };

    match state.orchestrator.submit(request).await {
        SubmissionOutcome::Done {
            record_id,
            submission_id,
            image_reference,
            trail,
        } => (
            StatusCode::CREATED,
            Json(AttendanceResponse {
                state: SubmissionStage::Done.to_string(),
                record_id: Some(record_id),
                submission_id: Some(submission_id),
                image_reference,
                message: None,
                trail: stage_names(&trail),
            }),
        )
            .into_response(),
        SubmissionOutcome::Retry { message, trail } => (
            StatusCode::OK,
            Json(AttendanceResponse {
                state: SubmissionStage::Idle.to_string(),
                record_id: None,
                submission_id: None,
                image_reference: None,
                message: Some(message),
                trail: stage_names(&trail),
            }),
        )
            .into_response(),
        SubmissionOutcome::Errored { stage, error, .. } => {
            tracing::info!(stage = %stage, error = %error, "Attendance submission errored");
            let mut response = HttpAppError(error).into_response();
            if let Ok(value) = HeaderValue::from_str(&stage.to_string()) {
                response.headers_mut().insert(FAILED_STAGE_HEADER, value);
            }
            response
        }
    }
}
