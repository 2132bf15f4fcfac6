use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Principal;

/// Enrollment photo reference held by the profile store.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoredPhoto {
    pub id: Uuid,
    pub principal: Principal,
    pub storage_key: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}
