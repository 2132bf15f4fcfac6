//! Ingestion boundary
//!
//! Authorization, quota, decoding and byte validation for one upload, in that order.
//! Each step short-circuits: a principal acting for someone else never gets a byte
//! inspected, and a principal over quota never gets the payload decoded.

use std::sync::Arc;

use facemark_core::{AppError, Principal, ProfileStore, ValidationResult};
use facemark_processing::{decode_image_data_uri, PayloadValidator, UploadQuota};

use crate::audit;

/// Validation verdict plus the decoded bytes it was reached on.
#[derive(Debug, Clone)]
pub struct AdmittedImage {
    pub result: ValidationResult,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct IngestionService {
    profiles: Arc<dyn ProfileStore>,
    validator: Arc<dyn PayloadValidator>,
    quota: UploadQuota,
}

impl IngestionService {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        validator: Arc<dyn PayloadValidator>,
        quota: UploadQuota,
    ) -> Self {
        Self {
            profiles,
            validator,
            quota,
        }
    }

    /// Admit one upload and return the validator's verdict unchanged.
    ///
    /// `Ok` with `valid: false` is a rejected image; `Err` is an authorization, quota,
    /// decoding or store failure.
    pub async fn admit(
        &self,
        principal: Principal,
        claimed_owner: Principal,
        image_data_uri: &str,
    ) -> Result<ValidationResult, AppError> {
        self.admit_frame(principal, claimed_owner, image_data_uri)
            .await
            .map(|admitted| admitted.result)
    }

    /// Like [`IngestionService::admit`], but also hands back the decoded bytes so callers
    /// store exactly what was validated.
    #[tracing::instrument(skip(self, image_data_uri), fields(principal = %principal))]
    pub async fn admit_frame(
        &self,
        principal: Principal,
        claimed_owner: Principal,
        image_data_uri: &str,
    ) -> Result<AdmittedImage, AppError> {
        if let Err(e) = principal.ensure_owns(claimed_owner) {
            audit::log_ownership_mismatch(principal, claimed_owner);
            return Err(e);
        }

        let stored = self.profiles.stored_photo_count(principal).await?;
        if let Err((stored, limit)) = self.quota.check(stored) {
            audit::log_quota_exceeded(principal, stored, limit);
            return Err(AppError::QuotaExceeded { stored, limit });
        }

        let decoded = decode_image_data_uri(image_data_uri)
            .map_err(|e| AppError::MalformedInput(e.to_string()))?;

        let result = self.validator.validate(&decoded.bytes);

        if !result.valid {
            tracing::info!(
                size_bytes = result.size,
                claimed_mime = %decoded.claimed_mime,
                reason = ?result.reason(),
                "Upload rejected by image validator"
            );
        } else if result.dimensions.is_none() {
            tracing::warn!(
                size_bytes = result.size,
                format = ?result.format,
                "Image accepted without a dimension check"
            );
        } else {
            tracing::debug!(
                size_bytes = result.size,
                format = ?result.format,
                dimensions = ?result.dimensions,
                "Upload passed image validation"
            );
        }

        Ok(AdmittedImage {
            result,
            bytes: decoded.bytes,
        })
    }
}
