//! Data URI decoding
//!
//! Captured frames arrive as `data:image/<subtype>;base64,<payload>`. The claimed subtype
//! is kept only for logging; the validator decides the real format from the bytes.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataUriError {
    #[error("Image data must be a data URI")]
    MissingScheme,

    #[error("Image data URI must declare an image media type")]
    NotAnImage,

    #[error("Image data URI must be base64 encoded")]
    NotBase64,

    #[error("Image data URI has no payload separator")]
    MissingPayload,

    #[error("Image data URI payload is not valid base64: {0}")]
    InvalidBase64(String),
}

/// Decoded payload plus the media type the client claimed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub claimed_mime: String,
    pub bytes: Vec<u8>,
}

pub fn decode_image_data_uri(uri: &str) -> Result<DecodedImage, DataUriError> {
    let rest = uri
        .trim()
        .strip_prefix("data:")
        .ok_or(DataUriError::MissingScheme)?;
    let (header, payload) = rest.split_once(',').ok_or(DataUriError::MissingPayload)?;

    let mut params = header.split(';');
    let mime = params.next().unwrap_or_default().to_ascii_lowercase();
    if !mime.starts_with("image/") {
        return Err(DataUriError::NotAnImage);
    }
    if !params.any(|p| p.eq_ignore_ascii_case("base64")) {
        return Err(DataUriError::NotBase64);
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| DataUriError::InvalidBase64(e.to_string()))?;

    Ok(DecodedImage {
        claimed_mime: mime,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_base64_image_payload() {
        let uri = format!("data:image/jpeg;base64,{}", STANDARD.encode([0xFF, 0xD8, 0xFF]));
        let decoded = decode_image_data_uri(&uri).unwrap();
        assert_eq!(decoded.claimed_mime, "image/jpeg");
        assert_eq!(decoded.bytes, vec![0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn rejects_non_data_uris() {
        assert_eq!(
            decode_image_data_uri("https://example.com/a.jpg"),
            Err(DataUriError::MissingScheme)
        );
    }

    #[test]
    fn rejects_non_image_media_types() {
        assert_eq!(
            decode_image_data_uri("data:text/html;base64,PGh0bWw+"),
            Err(DataUriError::NotAnImage)
        );
    }

    #[test]
    fn rejects_percent_encoded_payloads() {
        assert_eq!(
            decode_image_data_uri("data:image/png,abc"),
            Err(DataUriError::NotBase64)
        );
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(matches!(
            decode_image_data_uri("data:image/png;base64,!!!"),
            Err(DataUriError::InvalidBase64(_))
        ));
    }

    #[test]
    fn claimed_type_does_not_change_bytes() {
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(b"GIF89a"));
        let decoded = decode_image_data_uri(&uri).unwrap();
        assert_eq!(decoded.bytes, b"GIF89a");
    }
}
