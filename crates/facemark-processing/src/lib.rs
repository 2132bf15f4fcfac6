//! Facemark Processing Library
//!
//! Pure inspection of untrusted upload payloads: data-URI decoding, magic-byte and
//! header-based image validation, and the stored-photo quota decision. Nothing in this
//! crate performs I/O.

pub mod data_uri;
pub mod quota;
pub mod validator;

pub use data_uri::{decode_image_data_uri, DataUriError, DecodedImage};
pub use quota::{check_quota, UploadQuota};
pub use validator::{detect_format, ImageValidator, PayloadValidator, ValidatorPolicy};
