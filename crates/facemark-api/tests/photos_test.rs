//! Photo validation and enrollment integration tests.
//!
//! Run with: `cargo test -p facemark-api --test photos_test`

mod helpers;

use helpers::auth::{bearer, test_user};
use helpers::fixtures::{data_uri, jpeg_data_uri, photo_body};
use helpers::{api_path, setup_test_app, setup_test_app_with, stores};
use serde_json::{json, Value};
use uuid::Uuid;

#[tokio::test]
async fn test_validate_accepts_well_formed_jpeg() {
    let app = setup_test_app().await;
    let (principal, token) = test_user();

    let response = app
        .client()
        .post(&api_path("/photos/validate"))
        .add_header("Authorization", bearer(&token))
        .json(&photo_body(principal, &jpeg_data_uri(200, 200)))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["valid"], true);
    assert_eq!(body["format"], "jpeg");
    assert_eq!(body["dimensions"]["width"], 200);
    assert_eq!(body["dimensions"]["height"], 200);
    assert!(body.get("reason").is_none());
    assert_eq!(app.stored_files(), 0);
}

#[tokio::test]
async fn test_validate_reports_dimension_rejection() {
    let app = setup_test_app().await;
    let (principal, token) = test_user();

    let response = app
        .client()
        .post(&api_path("/photos/validate"))
        .add_header("Authorization", bearer(&token))
        .json(&photo_body(principal, &jpeg_data_uri(50, 50)))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["valid"], false);
    assert_eq!(body["code"], "DIMENSIONS_TOO_SMALL");
    assert!(body["reason"].as_str().unwrap().contains("100"));
}

#[tokio::test]
async fn test_validate_rejects_disguised_payload() {
    let app = setup_test_app().await;
    let (principal, token) = test_user();
    let script = "<script>alert(1)</script>".repeat(100);

    let response = app
        .client()
        .post(&api_path("/photos/validate"))
        .add_header("Authorization", bearer(&token))
        .json(&photo_body(principal, &data_uri("image/png", script.as_bytes())))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["valid"], false);
    assert_eq!(body["code"], "INVALID_FORMAT");
}

#[tokio::test]
async fn test_validate_for_other_owner_is_forbidden() {
    let app = setup_test_app().await;
    let (_, token) = test_user();
    let (someone_else, _) = test_user();

    let response = app
        .client()
        .post(&api_path("/photos/validate"))
        .add_header("Authorization", bearer(&token))
        .json(&photo_body(someone_else, &jpeg_data_uri(200, 200)))
        .await;

    assert_eq!(response.status_code(), 403);
    let body: Value = response.json();
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_validate_rejects_non_data_uri() {
    let app = setup_test_app().await;
    let (principal, token) = test_user();

    let response = app
        .client()
        .post(&api_path("/photos/validate"))
        .add_header("Authorization", bearer(&token))
        .json(&photo_body(principal, "https://example.com/face.jpg"))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "MALFORMED_INPUT");
}

#[tokio::test]
async fn test_validate_rejects_invalid_owner_id() {
    let app = setup_test_app().await;
    let (_, token) = test_user();

    let response = app
        .client()
        .post(&api_path("/photos/validate"))
        .add_header("Authorization", bearer(&token))
        .json(&json!({
            "claimed_owner_id": "not-a-uuid",
            "image_data_uri": jpeg_data_uri(200, 200),
        }))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_quota_is_enforced_before_validation() {
    let (principal, token) = test_user();
    let app = setup_test_app_with(
        stores::MemoryProfiles::default().with_stored(principal, 20),
        stores::MemoryRecords::default(),
    )
    .await;

    let response = app
        .client()
        .post(&api_path("/photos/validate"))
        .add_header("Authorization", bearer(&token))
        .json(&photo_body(principal, &jpeg_data_uri(200, 200)))
        .await;

    assert_eq!(response.status_code(), 429);
    let body: Value = response.json();
    assert_eq!(body["code"], "QUOTA_EXCEEDED");
    assert!(body["error"].as_str().unwrap().contains("20 of 20"));
}

#[tokio::test]
async fn test_enroll_stores_photo_and_reference() {
    let app = setup_test_app().await;
    let (principal, token) = test_user();

    let response = app
        .client()
        .post(&api_path("/photos"))
        .add_header("Authorization", bearer(&token))
        .json(&photo_body(principal, &jpeg_data_uri(640, 480)))
        .await;

    assert_eq!(response.status_code(), 201);
    let body: Value = response.json();
    let key = body["storage_key"].as_str().unwrap();
    assert!(key.starts_with(&format!("{}/profile/", principal)));
    assert!(key.ends_with(".jpg"));
    assert!(body["url"]
        .as_str()
        .unwrap()
        .starts_with(helpers::TEST_STORAGE_BASE_URL));
    assert!(Uuid::parse_str(body["id"].as_str().unwrap()).is_ok());

    assert_eq!(app.profiles.photos().len(), 1);
    assert_eq!(app.stored_files(), 1);
    assert!(app.temp_dir.path().join(key).exists());
}

#[tokio::test]
async fn test_enroll_rejected_image_stores_nothing() {
    let app = setup_test_app().await;
    let (principal, token) = test_user();

    let response = app
        .client()
        .post(&api_path("/photos"))
        .add_header("Authorization", bearer(&token))
        .json(&photo_body(principal, &jpeg_data_uri(5000, 200)))
        .await;

    assert_eq!(response.status_code(), 422);
    let body: Value = response.json();
    assert_eq!(body["code"], "VALIDATION_REJECTED");
    assert!(body["error"].as_str().unwrap().contains("4000"));
    assert!(app.profiles.photos().is_empty());
    assert_eq!(app.stored_files(), 0);
}
