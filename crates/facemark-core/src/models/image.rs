use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Serialize;
use utoipa::ToSchema;

/// Image format detected from leading bytes. Never derived from a claimed content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DetectedFormat {
    Jpeg,
    Png,
    Webp,
}

impl DetectedFormat {
    /// Content type used when the payload is written to object storage.
    pub fn mime_type(&self) -> &'static str {
        match self {
            DetectedFormat::Jpeg => "image/jpeg",
            DetectedFormat::Png => "image/png",
            DetectedFormat::Webp => "image/webp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DetectedFormat::Jpeg => "jpg",
            DetectedFormat::Png => "png",
            DetectedFormat::Webp => "webp",
        }
    }
}

impl Display for DetectedFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DetectedFormat::Jpeg => write!(f, "jpeg"),
            DetectedFormat::Png => write!(f, "png"),
            DetectedFormat::Webp => write!(f, "webp"),
        }
    }
}

/// Pixel dimensions read from format-specific header structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Specific reason an upload was rejected. Each variant carries the bound it violated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationRejection {
    #[error("Image too large: {size} bytes exceeds the maximum of {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("Image too small: {size} bytes is below the minimum of {min} bytes")]
    TooSmall { size: usize, min: usize },

    #[error("Invalid image format: only JPEG, PNG and WEBP images are accepted")]
    InvalidFormat,

    #[error("Image dimensions too small: {width}x{height} (minimum {min}px per side)")]
    DimensionsTooSmall { width: u32, height: u32, min: u32 },

    #[error("Image dimensions too large: {width}x{height} (maximum {max}px per side)")]
    DimensionsTooLarge { width: u32, height: u32, max: u32 },

    #[error("Image dimensions could not be determined")]
    DimensionsUnknown,
}

impl ValidationRejection {
    /// Machine-readable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationRejection::TooLarge { .. } => "FILE_TOO_LARGE",
            ValidationRejection::TooSmall { .. } => "FILE_TOO_SMALL",
            ValidationRejection::InvalidFormat => "INVALID_FORMAT",
            ValidationRejection::DimensionsTooSmall { .. } => "DIMENSIONS_TOO_SMALL",
            ValidationRejection::DimensionsTooLarge { .. } => "DIMENSIONS_TOO_LARGE",
            ValidationRejection::DimensionsUnknown => "DIMENSIONS_UNKNOWN",
        }
    }
}

/// Outcome of inspecting one upload. Returned once, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub format: Option<DetectedFormat>,
    pub size: usize,
    pub dimensions: Option<ImageDimensions>,
    pub rejection: Option<ValidationRejection>,
}

impl ValidationResult {
    pub fn accepted(
        format: DetectedFormat,
        size: usize,
        dimensions: Option<ImageDimensions>,
    ) -> Self {
        Self {
            valid: true,
            format: Some(format),
            size,
            dimensions,
            rejection: None,
        }
    }

    pub fn rejected(
        size: usize,
        format: Option<DetectedFormat>,
        dimensions: Option<ImageDimensions>,
        rejection: ValidationRejection,
    ) -> Self {
        Self {
            valid: false,
            format,
            size,
            dimensions,
            rejection: Some(rejection),
        }
    }

    /// Human-readable rejection reason, if any.
    pub fn reason(&self) -> Option<String> {
        self.rejection.as_ref().map(ToString::to_string)
    }
}
