//! Image format validator
//!
//! Decides whether an untrusted byte payload is a genuine, bounded image. The payload's
//! own bytes are the only source of truth: any content type claimed by the client is
//! ignored here. Validation reads fixed header structures and never decodes pixels.

use facemark_core::constants::{MAX_DIMENSION, MAX_IMAGE_BYTES, MIN_DIMENSION, MIN_IMAGE_BYTES};
use facemark_core::models::{
    DetectedFormat, ImageDimensions, ValidationRejection, ValidationResult,
};

const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];
const PNG_SIGNATURE: &[u8] = &[0x89, 0x50, 0x4E, 0x47];
const RIFF_SIGNATURE: &[u8] = &[0x52, 0x49, 0x46, 0x46];

// Signatures are mutually non-overlapping, so order only decides which check runs first.
const SIGNATURES: [(&[u8], DetectedFormat); 3] = [
    (JPEG_SIGNATURE, DetectedFormat::Jpeg),
    (PNG_SIGNATURE, DetectedFormat::Png),
    (RIFF_SIGNATURE, DetectedFormat::Webp),
];

/// Anything that can judge a raw payload.
///
/// Implemented by [`ImageValidator`]; the ingestion service depends on the trait so the
/// validator can be observed in tests.
pub trait PayloadValidator: Send + Sync {
    fn validate(&self, data: &[u8]) -> ValidationResult;
}

/// Policy knobs for the documented dimension-extraction gap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidatorPolicy {
    /// Reject images whose dimensions cannot be read (WEBP, JPEG without SOF).
    /// Off by default: such images are accepted after the byte-size gate.
    pub require_dimensions: bool,
}

/// Byte-level image validator. Total, deterministic and free of side effects.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageValidator {
    policy: ValidatorPolicy,
}

impl ImageValidator {
    pub fn new(policy: ValidatorPolicy) -> Self {
        Self { policy }
    }

    /// Validate a payload: size gate, magic bytes, header dimensions, dimension gate.
    pub fn validate(&self, data: &[u8]) -> ValidationResult {
        let size = data.len();

        if size > MAX_IMAGE_BYTES {
            return ValidationResult::rejected(
                size,
                None,
                None,
                ValidationRejection::TooLarge {
                    size,
                    max: MAX_IMAGE_BYTES,
                },
            );
        }
        if size < MIN_IMAGE_BYTES {
            return ValidationResult::rejected(
                size,
                None,
                None,
                ValidationRejection::TooSmall {
                    size,
                    min: MIN_IMAGE_BYTES,
                },
            );
        }

        let Some(format) = detect_format(data) else {
            return ValidationResult::rejected(size, None, None, ValidationRejection::InvalidFormat);
        };

        let dimensions = extract_dimensions(format, data);

        match dimensions {
            Some(dims) => {
                if let Some(rejection) = check_dimensions(dims) {
                    return ValidationResult::rejected(size, Some(format), Some(dims), rejection);
                }
            }
            None if self.policy.require_dimensions => {
                return ValidationResult::rejected(
                    size,
                    Some(format),
                    None,
                    ValidationRejection::DimensionsUnknown,
                );
            }
            None => {}
        }

        ValidationResult::accepted(format, size, dimensions)
    }
}

impl PayloadValidator for ImageValidator {
    fn validate(&self, data: &[u8]) -> ValidationResult {
        ImageValidator::validate(self, data)
    }
}

/// Match leading bytes against the known signatures.
pub fn detect_format(data: &[u8]) -> Option<DetectedFormat> {
    SIGNATURES
        .iter()
        .find(|(signature, _)| data.starts_with(signature))
        .map(|(_, format)| *format)
}

/// Read pixel dimensions from the format's header structures, where supported.
pub fn extract_dimensions(format: DetectedFormat, data: &[u8]) -> Option<ImageDimensions> {
    match format {
        DetectedFormat::Jpeg => jpeg_dimensions(data),
        DetectedFormat::Png => png_dimensions(data),
        // Not extracted; accepted on the byte-size gate alone unless policy requires dimensions.
        DetectedFormat::Webp => None,
    }
}

fn check_dimensions(dims: ImageDimensions) -> Option<ValidationRejection> {
    if dims.width < MIN_DIMENSION || dims.height < MIN_DIMENSION {
        return Some(ValidationRejection::DimensionsTooSmall {
            width: dims.width,
            height: dims.height,
            min: MIN_DIMENSION,
        });
    }
    if dims.width > MAX_DIMENSION || dims.height > MAX_DIMENSION {
        return Some(ValidationRejection::DimensionsTooLarge {
            width: dims.width,
            height: dims.height,
            max: MAX_DIMENSION,
        });
    }
    None
}

fn read_u16_be(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset.checked_add(2)?)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

fn read_u32_be(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Start-Of-Frame markers share the C0..=CF range with DHT (C4), JPG (C8) and DAC (CC).
fn is_start_of_frame(marker: u8) -> bool {
    (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC)
}

/// Walk JPEG marker segments after SOI until the first SOF.
///
/// Segment layout: `FF <marker> <len:u16> <payload>`, where `len` counts itself. In a
/// SOF payload the precision byte comes first, then height and width as u16.
fn jpeg_dimensions(data: &[u8]) -> Option<ImageDimensions> {
    let mut pos = 2;

    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];

        match marker {
            // Fill byte before a marker.
            0xFF => {
                pos += 1;
                continue;
            }
            // Stand-alone markers without a length field.
            0x01 | 0xD0..=0xD8 => {
                pos += 2;
                continue;
            }
            // Scan data or end of image: no SOF can follow.
            0xD9 | 0xDA => return None,
            _ => {}
        }

        let length = usize::from(read_u16_be(data, pos + 2)?);
        if length < 2 {
            return None;
        }

        if is_start_of_frame(marker) {
            let height = read_u16_be(data, pos + 5)?;
            let width = read_u16_be(data, pos + 7)?;
            return Some(ImageDimensions {
                width: u32::from(width),
                height: u32::from(height),
            });
        }

        pos += 2 + length;
    }

    None
}

/// IHDR always follows the 8-byte signature: width at offset 16, height at 20.
fn png_dimensions(data: &[u8]) -> Option<ImageDimensions> {
    if data.len() < 24 {
        return None;
    }
    Some(ImageDimensions {
        width: read_u32_be(data, 16)?,
        height: read_u32_be(data, 20)?,
    })
}
