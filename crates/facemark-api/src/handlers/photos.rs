use crate::auth::AuthenticatedPrincipal;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use facemark_core::{DetectedFormat, ImageDimensions, Principal, StoredPhoto, ValidationResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PhotoUploadRequest {
    /// Account the image is submitted for; must match the authenticated principal
    pub claimed_owner_id: Principal,
    /// `data:image/<type>;base64,<payload>`
    pub image_data_uri: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<DetectedFormat>,
    pub size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<ImageDimensions>,
}

impl From<ValidationResult> for ValidationResponse {
    fn from(result: ValidationResult) -> Self {
        Self {
            valid: result.valid,
            reason: result.reason(),
            code: result.rejection.as_ref().map(|r| r.code().to_string()),
            format: result.format,
            size: result.size,
            dimensions: result.dimensions,
        }
    }
}

/// Inspect an image without storing it. A rejected image is a 200 with `valid: false`.
#[utoipa::path(
    post,
    path = "/api/v0/photos/validate",
    tag = "photos",
    request_body = PhotoUploadRequest,
    responses(
        (status = 200, description = "Validation verdict", body = ValidationResponse),
        (status = 400, description = "Body is not a base64 image data URI", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Claimed owner is not the caller", body = ErrorResponse),
        (status = 429, description = "Stored photo limit reached", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(principal = %principal.0, operation = "validate_photo"))]
pub async fn validate_photo(
    State(state): State<Arc<AppState>>,
    principal: AuthenticatedPrincipal,
    ValidatedJson(body): ValidatedJson<PhotoUploadRequest>,
) -> Result<Json<ValidationResponse>, HttpAppError> {
    let result = state
        .ingestion
        .admit(principal.0, body.claimed_owner_id, &body.image_data_uri)
        .await?;

    Ok(Json(result.into()))
}

/// Validate, store and register a profile photo.
#[utoipa::path(
    post,
    path = "/api/v0/photos",
    tag = "photos",
    request_body = PhotoUploadRequest,
    responses(
        (status = 201, description = "Photo stored", body = StoredPhoto),
        (status = 400, description = "Body is not a base64 image data URI", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Claimed owner is not the caller", body = ErrorResponse),
        (status = 422, description = "Image rejected by validation", body = ErrorResponse),
        (status = 429, description = "Stored photo limit reached", body = ErrorResponse),
        (status = 502, description = "Storage or profile store failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(principal = %principal.0, operation = "enroll_photo"))]
pub async fn enroll_photo(
    State(state): State<Arc<AppState>>,
    principal: AuthenticatedPrincipal,
    ValidatedJson(body): ValidatedJson<PhotoUploadRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let photo = state
        .enrollment
        .enroll(principal.0, body.claimed_owner_id, &body.image_data_uri)
        .await?;

    Ok((StatusCode::CREATED, Json(photo)))
}
