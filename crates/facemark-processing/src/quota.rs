//! Stored-photo quota decision
//!
//! The limit counts photos currently stored on the profile, not uploads in a time
//! window. A principal at the limit stays there until photos are removed.

use facemark_core::constants::MAX_UPLOADS_PER_DAY;

/// Returns true when one more photo may be stored under the default limit.
pub fn check_quota(stored_count: i64) -> bool {
    UploadQuota::default().allows(stored_count)
}

/// Quota with a configurable ceiling on stored photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadQuota {
    max_stored_photos: i64,
}

impl Default for UploadQuota {
    fn default() -> Self {
        Self {
            max_stored_photos: MAX_UPLOADS_PER_DAY,
        }
    }
}

impl UploadQuota {
    pub fn new(max_stored_photos: i64) -> Self {
        Self { max_stored_photos }
    }

    pub fn limit(&self) -> i64 {
        self.max_stored_photos
    }

    /// A negative count from a misbehaving store is treated as zero.
    pub fn allows(&self, stored_count: i64) -> bool {
        stored_count.max(0) < self.max_stored_photos
    }

    /// Like [`UploadQuota::allows`], but returns the stored count and limit on refusal.
    pub fn check(&self, stored_count: i64) -> Result<(), (i64, i64)> {
        if self.allows(stored_count) {
            Ok(())
        } else {
            Err((stored_count, self.max_stored_photos))
        }
    }
}
