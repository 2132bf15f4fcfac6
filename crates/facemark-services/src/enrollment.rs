//! Photo enrollment
//!
//! Admits a profile photo through the ingestion boundary, stores it under the
//! principal's profile prefix and appends the reference to the profile store. Every
//! step is required: a failure after the object is written removes the object again.

use std::sync::Arc;
use std::time::Duration;

use facemark_core::{AppError, Principal, ProfileStore, StoredPhoto};
use facemark_storage::{profile_photo_key, ObjectStorage};

use crate::audit;
use crate::ingestion::IngestionService;
use crate::timeout::within;

const STAGE: &str = "storing photo";

#[derive(Clone)]
pub struct PhotoEnrollmentService {
    ingestion: Arc<IngestionService>,
    storage: Arc<dyn ObjectStorage>,
    profiles: Arc<dyn ProfileStore>,
    signed_url_ttl: Duration,
    stage_timeout: Duration,
}

impl PhotoEnrollmentService {
    pub fn new(
        ingestion: Arc<IngestionService>,
        storage: Arc<dyn ObjectStorage>,
        profiles: Arc<dyn ProfileStore>,
        signed_url_ttl: Duration,
        stage_timeout: Duration,
    ) -> Self {
        Self {
            ingestion,
            storage,
            profiles,
            signed_url_ttl,
            stage_timeout,
        }
    }

    #[tracing::instrument(skip(self, image_data_uri), fields(principal = %principal))]
    pub async fn enroll(
        &self,
        principal: Principal,
        claimed_owner: Principal,
        image_data_uri: &str,
    ) -> Result<StoredPhoto, AppError> {
        let admitted = self
            .ingestion
            .admit_frame(principal, claimed_owner, image_data_uri)
            .await?;

        let format = match (admitted.result.rejection, admitted.result.format) {
            (Some(rejection), _) => return Err(rejection.into()),
            (None, Some(format)) => format,
            (None, None) => {
                return Err(AppError::Internal(
                    "Validator accepted image without a format".to_string(),
                ))
            }
        };

        let key = profile_photo_key(principal, format);

        within(STAGE, self.stage_timeout, async {
            self.storage
                .put(&key, admitted.bytes, format.mime_type())
                .await
                .map_err(|e| AppError::upstream(STAGE, e))
        })
        .await?;

        let appended = async {
            let url = within(STAGE, self.stage_timeout, async {
                self.storage
                    .create_time_limited_url(&key, self.signed_url_ttl)
                    .await
                    .map_err(|e| AppError::upstream(STAGE, e))
            })
            .await?;

            within(
                STAGE,
                self.stage_timeout,
                self.profiles.append_photo_reference(principal, &key, &url),
            )
            .await
        }
        .await;

        match appended {
            Ok(photo) => {
                audit::log_photo_enrolled(principal, photo.id, &photo.storage_key);
                Ok(photo)
            }
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&key).await {
                    tracing::warn!(
                        error = %cleanup,
                        key = %key,
                        "Failed to remove orphaned enrollment photo"
                    );
                }
                Err(e)
            }
        }
    }
}
