//! Fixed bounds for image admission and attendance capture.

/// Largest accepted upload, in bytes (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5_242_880;

/// Smallest accepted upload, in bytes.
pub const MIN_IMAGE_BYTES: usize = 1000;

/// Smallest accepted width or height, in pixels.
pub const MIN_DIMENSION: u32 = 100;

/// Largest accepted width or height, in pixels.
pub const MAX_DIMENSION: u32 = 4000;

/// Cumulative cap on stored enrollment photos per principal.
///
/// The name mirrors the product wording; the limit is a lifetime total, not a daily window.
pub const MAX_UPLOADS_PER_DAY: i64 = 20;

/// Length of the face descriptor produced by the capture model.
pub const DESCRIPTOR_LENGTH: usize = 128;

/// API path prefix.
pub const API_PREFIX: &str = "/api/v0";
