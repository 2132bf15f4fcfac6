use base64::{engine::general_purpose::STANDARD, Engine as _};
use facemark_core::constants::DESCRIPTOR_LENGTH;
use facemark_core::Principal;
use serde_json::{json, Value};

/// Baseline JPEG with a SOF0 header of the given size, padded past the minimum byte size.
pub fn create_test_jpeg(width: u16, height: u16) -> Vec<u8> {
    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
    jpeg.extend_from_slice(b"JFIF\0");
    jpeg.extend_from_slice(&[1, 1, 0, 0, 1, 0, 1, 0, 0]);
    jpeg.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08]);
    jpeg.extend_from_slice(&height.to_be_bytes());
    jpeg.extend_from_slice(&width.to_be_bytes());
    jpeg.extend_from_slice(&[3, 1, 0x22, 0, 2, 0x11, 1, 3, 0x11, 1]);
    jpeg.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x08, 1, 1, 0, 0, 0x3F, 0]);
    jpeg.resize(4096, 0x55);
    jpeg
}

pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

pub fn jpeg_data_uri(width: u16, height: u16) -> String {
    data_uri("image/jpeg", &create_test_jpeg(width, height))
}

pub fn descriptor() -> Vec<f32> {
    (0..DESCRIPTOR_LENGTH).map(|i| i as f32 / 1000.0).collect()
}

pub fn photo_body(owner: Principal, image_data_uri: &str) -> Value {
    json!({
        "claimed_owner_id": owner,
        "image_data_uri": image_data_uri,
    })
}

pub fn attendance_body(owner: Principal, image_data_uri: &str) -> Value {
    json!({
        "claimed_owner_id": owner,
        "image_data_uri": image_data_uri,
        "descriptor": descriptor(),
        "confidence": 0.93,
    })
}
