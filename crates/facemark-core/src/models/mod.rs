//! Domain models

pub mod attendance;
pub mod image;
pub mod photo;
pub mod principal;

pub use attendance::{
    AttendanceEvent, AttendanceNotice, AttendanceStatus, CaptureFrame, FaceCapture,
    FaceDescriptor,
};
pub use image::{DetectedFormat, ImageDimensions, ValidationRejection, ValidationResult};
pub use photo::StoredPhoto;
pub use principal::Principal;
