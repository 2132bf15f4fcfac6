//! In-memory profile and record stores.

use async_trait::async_trait;
use chrono::Utc;
use facemark_core::{
    AppError, AttendanceEvent, Principal, ProfileStore, RecordStore, StoredPhoto,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryProfiles {
    preset_counts: Mutex<HashMap<Principal, i64>>,
    photos: Mutex<Vec<StoredPhoto>>,
}

impl MemoryProfiles {
    /// Pretend the principal already has `count` stored photos.
    pub fn with_stored(self, principal: Principal, count: i64) -> Self {
        self.preset_counts
            .lock()
            .unwrap()
            .insert(principal, count);
        self
    }

    pub fn photos(&self) -> Vec<StoredPhoto> {
        self.photos.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfiles {
    async fn stored_photo_count(&self, principal: Principal) -> Result<i64, AppError> {
        let preset = self
            .preset_counts
            .lock()
            .unwrap()
            .get(&principal)
            .copied()
            .unwrap_or(0);
        let stored = self
            .photos
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.principal == principal)
            .count() as i64;
        Ok(preset + stored)
    }

    async fn append_photo_reference(
        &self,
        principal: Principal,
        storage_key: &str,
        url: &str,
    ) -> Result<StoredPhoto, AppError> {
        let photo = StoredPhoto {
            id: Uuid::new_v4(),
            principal,
            storage_key: storage_key.to_string(),
            url: url.to_string(),
            created_at: Utc::now(),
        };
        self.photos.lock().unwrap().push(photo.clone());
        Ok(photo)
    }

    async fn contact_address(&self, _principal: Principal) -> Result<Option<String>, AppError> {
        Ok(None)
    }
}

#[derive(Default)]
pub struct MemoryRecords {
    by_submission: Mutex<HashMap<Uuid, (Uuid, AttendanceEvent)>>,
    failing: AtomicBool,
}

impl MemoryRecords {
    pub fn failing() -> Self {
        let records = Self::default();
        records.failing.store(true, Ordering::SeqCst);
        records
    }

    pub fn len(&self) -> usize {
        self.by_submission.lock().unwrap().len()
    }

    pub fn events(&self) -> Vec<AttendanceEvent> {
        self.by_submission
            .lock()
            .unwrap()
            .values()
            .map(|(_, event)| event.clone())
            .collect()
    }
}

#[async_trait]
impl RecordStore for MemoryRecords {
    async fn insert(&self, event: &AttendanceEvent) -> Result<Uuid, AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::upstream("persisting", "record store unavailable"));
        }
        let mut records = self.by_submission.lock().unwrap();
        let (id, existing) = records
            .entry(event.submission_id)
            .or_insert_with(|| (Uuid::new_v4(), event.clone()));
        if existing.principal != event.principal {
            return Err(AppError::Conflict(format!(
                "Submission {} was already used by another account",
                event.submission_id
            )));
        }
        Ok(*id)
    }
}
