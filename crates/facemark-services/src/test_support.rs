//! In-memory collaborators with call counters.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use facemark_core::{
    AppError, AttendanceEvent, AttendanceNotice, Notifier, Principal, ProfileStore, RecordStore,
    StorageBackend, StoredPhoto, ValidationResult,
};
use facemark_processing::{ImageValidator, PayloadValidator};
use facemark_storage::{ObjectStorage, StorageError, StorageResult};
use uuid::Uuid;

/// Minimal baseline JPEG: SOI, SOF0 with the given size, SOS, padded to 2 KiB.
pub fn jpeg_bytes(width: u16, height: u16) -> Vec<u8> {
    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xC0, 0x00, 0x11, 0x08];
    jpeg.extend_from_slice(&height.to_be_bytes());
    jpeg.extend_from_slice(&width.to_be_bytes());
    jpeg.extend_from_slice(&[3, 1, 0x22, 0, 2, 0x11, 1, 3, 0x11, 1]);
    jpeg.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x08, 1, 1, 0, 0, 0x3F, 0]);
    jpeg.resize(2048, 0);
    jpeg
}

pub fn jpeg_data_uri(width: u16, height: u16) -> String {
    format!("data:image/jpeg;base64,{}", STANDARD.encode(jpeg_bytes(width, height)))
}

#[derive(Default)]
pub struct CountingValidator {
    inner: ImageValidator,
    calls: AtomicUsize,
}

impl CountingValidator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PayloadValidator for CountingValidator {
    fn validate(&self, data: &[u8]) -> ValidationResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.validate(data)
    }
}

#[derive(Default)]
pub struct FakeProfiles {
    count: AtomicI64,
    count_reads: AtomicUsize,
    contact: Mutex<Option<String>>,
    appended: Mutex<Vec<StoredPhoto>>,
    fail_append: AtomicBool,
}

impl FakeProfiles {
    pub fn with_count(count: i64) -> Self {
        let profiles = Self::default();
        profiles.count.store(count, Ordering::SeqCst);
        profiles
    }

    pub fn with_contact(address: &str) -> Self {
        let profiles = Self::default();
        *profiles.contact.lock().unwrap() = Some(address.to_string());
        profiles
    }

    pub fn fail_append(&self) {
        self.fail_append.store(true, Ordering::SeqCst);
    }

    pub fn count_reads(&self) -> usize {
        self.count_reads.load(Ordering::SeqCst)
    }

    pub fn appended(&self) -> Vec<StoredPhoto> {
        self.appended.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfileStore for FakeProfiles {
    async fn stored_photo_count(&self, _principal: Principal) -> Result<i64, AppError> {
        self.count_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.count.load(Ordering::SeqCst))
    }

    async fn append_photo_reference(
        &self,
        principal: Principal,
        storage_key: &str,
        url: &str,
    ) -> Result<StoredPhoto, AppError> {
        if self.fail_append.load(Ordering::SeqCst) {
            return Err(AppError::Internal("profile store unavailable".to_string()));
        }
        let photo = StoredPhoto {
            id: Uuid::new_v4(),
            principal,
            storage_key: storage_key.to_string(),
            url: url.to_string(),
            created_at: chrono::Utc::now(),
        };
        self.appended.lock().unwrap().push(photo.clone());
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(photo)
    }

    async fn contact_address(&self, _principal: Principal) -> Result<Option<String>, AppError> {
        Ok(self.contact.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct FakeStorage {
    puts: AtomicUsize,
    deletes: AtomicUsize,
    keys: Mutex<Vec<String>>,
    fail_put: AtomicBool,
    fail_url: AtomicBool,
    put_delay: Mutex<Option<Duration>>,
}

impl FakeStorage {
    pub fn failing_put() -> Self {
        let storage = Self::default();
        storage.fail_put.store(true, Ordering::SeqCst);
        storage
    }

    pub fn failing_url() -> Self {
        let storage = Self::default();
        storage.fail_url.store(true, Ordering::SeqCst);
        storage
    }

    pub fn slow_put(delay: Duration) -> Self {
        let storage = Self::default();
        *storage.put_delay.lock().unwrap() = Some(delay);
        storage
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStorage for FakeStorage {
    async fn put(
        &self,
        storage_key: &str,
        _data: Vec<u8>,
        _content_type: &str,
    ) -> StorageResult<String> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        let delay = *self.put_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("bucket unavailable".to_string()));
        }
        self.keys.lock().unwrap().push(storage_key.to_string());
        Ok(storage_key.to_string())
    }

    async fn create_time_limited_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        if self.fail_url.load(Ordering::SeqCst) {
            return Err(StorageError::BackendError("signer unavailable".to_string()));
        }
        Ok(format!(
            "https://objects.test/{}?expires={}",
            storage_key,
            expires_in.as_secs()
        ))
    }

    async fn delete(&self, _storage_key: &str) -> StorageResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[derive(Default)]
pub struct FakeRecords {
    inserts: AtomicUsize,
    events: Mutex<Vec<(Uuid, AttendanceEvent)>>,
    fail: AtomicBool,
}

impl FakeRecords {
    pub fn failing() -> Self {
        let records = Self::default();
        records.fail.store(true, Ordering::SeqCst);
        records
    }

    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<AttendanceEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(_, event)| event.clone())
            .collect()
    }
}

#[async_trait]
impl RecordStore for FakeRecords {
    async fn insert(&self, event: &AttendanceEvent) -> Result<Uuid, AppError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::upstream("persisting", "record store unavailable"));
        }
        let mut events = self.events.lock().unwrap();
        if let Some((id, existing)) = events
            .iter()
            .find(|(_, existing)| existing.submission_id == event.submission_id)
        {
            if existing.principal != event.principal {
                return Err(AppError::Conflict(format!(
                    "Submission {} was already used by another account",
                    event.submission_id
                )));
            }
            return Ok(*id);
        }
        let id = Uuid::new_v4();
        events.push((id, event.clone()));
        Ok(id)
    }
}

#[derive(Default)]
pub struct FakeNotifier {
    sent: AtomicUsize,
    fail: AtomicBool,
}

impl FakeNotifier {
    pub fn failing() -> Self {
        let notifier = Self::default();
        notifier.fail.store(true, Ordering::SeqCst);
        notifier
    }

    pub fn sent(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }

    /// Wait for the detached notification task to reach the notifier.
    pub async fn wait_for(&self, expected: usize) {
        for _ in 0..100 {
            if self.sent() >= expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn send(&self, _address: &str, _notice: &AttendanceNotice) -> Result<(), AppError> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::upstream("notifying", "smtp unavailable"));
        }
        Ok(())
    }
}
