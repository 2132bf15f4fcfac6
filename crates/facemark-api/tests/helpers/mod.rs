//! Test helpers: build AppState and router for integration tests.
//!
//! Stores are in memory and objects go to a temporary directory, so these tests need
//! neither Postgres nor S3. Run with `cargo test -p facemark-api`.

#![allow(dead_code)]

pub mod auth;
pub mod fixtures;
pub mod stores;

use axum_test::TestServer;
use facemark_api::setup::{routes, services};
use facemark_core::constants::API_PREFIX;
use facemark_core::{Config, FacemarkConfig, StorageBackend};
use facemark_storage::LocalStorage;
use std::sync::Arc;
use tempfile::TempDir;

pub const TEST_STORAGE_BASE_URL: &str = "http://localhost:4000/media";

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", API_PREFIX, path)
}

/// Test application: server, in-memory stores, and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub profiles: Arc<stores::MemoryProfiles>,
    pub records: Arc<stores::MemoryRecords>,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Number of files written under the storage directory.
    pub fn stored_files(&self) -> usize {
        fn count(dir: &std::path::Path) -> usize {
            std::fs::read_dir(dir)
                .map(|entries| {
                    entries
                        .flatten()
                        .map(|e| {
                            let path = e.path();
                            if path.is_dir() {
                                count(&path)
                            } else {
                                1
                            }
                        })
                        .sum()
                })
                .unwrap_or(0)
        }
        count(self.temp_dir.path())
    }
}

pub fn create_test_config(storage_path: &str) -> Config {
    Config::new(FacemarkConfig {
        jwt_secret: auth::TEST_JWT_SECRET.to_string(),
        storage_backend: StorageBackend::Local,
        local_storage_path: Some(storage_path.to_string()),
        local_storage_base_url: Some(TEST_STORAGE_BASE_URL.to_string()),
        ..FacemarkConfig::default()
    })
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(stores::MemoryProfiles::default(), stores::MemoryRecords::default()).await
}

/// Setup test app around the given stores.
pub async fn setup_test_app_with(
    profiles: stores::MemoryProfiles,
    records: stores::MemoryRecords,
) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let storage_path = temp_dir.path().to_string_lossy().to_string();
    let config = create_test_config(&storage_path);

    let storage = Arc::new(
        LocalStorage::new(temp_dir.path(), TEST_STORAGE_BASE_URL.to_string())
            .await
            .expect("Failed to create local storage"),
    );

    let profiles = Arc::new(profiles);
    let records = Arc::new(records);

    let state = services::initialize_services(
        &config,
        services::Collaborators {
            profiles: profiles.clone(),
            records: records.clone(),
            storage,
            notifier: None,
            db_pool: None,
        },
    );

    let router = routes::setup_routes(&config, state)
        .await
        .expect("Failed to build router");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        profiles,
        records,
        temp_dir,
    }
}
