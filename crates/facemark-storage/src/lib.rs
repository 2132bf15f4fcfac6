//! Facemark Storage Library
//!
//! Object storage for validated capture frames and enrollment photos, with S3 and local
//! filesystem backends behind the [`ObjectStorage`] trait.
//!
//! # Storage key format
//!
//! The first path segment of every key is the owning principal:
//!
//! - **Attendance frames**: `{principal}/attendance/{uuid}.{ext}`
//! - **Enrollment photos**: `{principal}/profile/{uuid}.{ext}`
//!
//! Keys must not contain `..` or a leading `/`. Key generation is centralized in the
//! `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use facemark_core::StorageBackend;
pub use keys::{attendance_frame_key, profile_photo_key};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ObjectStorage, StorageError, StorageResult};
