use crate::error::ErrorResponse;
use crate::handlers;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::liveness_check,
        handlers::health::readiness_check,
        handlers::photos::validate_photo,
        handlers::photos::enroll_photo,
        handlers::attendance::submit_attendance,
    ),
    components(schemas(
        ErrorResponse,
        handlers::photos::PhotoUploadRequest,
        handlers::photos::ValidationResponse,
        handlers::attendance::AttendanceSubmission,
        handlers::attendance::AttendanceResponse,
        facemark_core::StoredPhoto,
        facemark_core::DetectedFormat,
        facemark_core::ImageDimensions,
        facemark_core::Principal,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "photos", description = "Photo validation and enrollment"),
        (name = "attendance", description = "Attendance submission"),
        (name = "health", description = "Liveness and readiness checks")
    ),
    info(
        title = "Facemark API",
        description = "Biometric image ingestion and attendance submission"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
