//! Facemark Core Library
//!
//! This crate provides the domain models, error types, configuration and
//! collaborator traits shared by every Facemark component.

pub mod collaborators;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use collaborators::{Authenticator, FaceDetector, Notifier, ProfileStore, RecordStore};
pub use config::{Config, FacemarkConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    AttendanceEvent, AttendanceNotice, AttendanceStatus, CaptureFrame, DetectedFormat,
    FaceCapture, FaceDescriptor, ImageDimensions, Principal, StoredPhoto, ValidationRejection,
    ValidationResult,
};
pub use storage_types::StorageBackend;
