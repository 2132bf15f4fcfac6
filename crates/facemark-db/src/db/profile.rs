use async_trait::async_trait;
use chrono::{DateTime, Utc};
use facemark_core::{AppError, Principal, ProfileStore, StoredPhoto};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct StoredPhotoRow {
    id: Uuid,
    principal_id: Uuid,
    storage_key: String,
    url: String,
    created_at: DateTime<Utc>,
}

impl From<StoredPhotoRow> for StoredPhoto {
    fn from(row: StoredPhotoRow) -> Self {
        StoredPhoto {
            id: row.id,
            principal: Principal::new(row.principal_id),
            storage_key: row.storage_key,
            url: row.url,
            created_at: row.created_at,
        }
    }
}

/// Repository for profile data: contact address and stored enrollment photos
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for ProfileRepository {
    #[tracing::instrument(skip(self), fields(db.table = "stored_photos", db.operation = "count"))]
    async fn stored_photo_count(&self, principal: Principal) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<Postgres, i64>(
            "SELECT COUNT(*) FROM stored_photos WHERE principal_id = $1",
        )
        .bind(principal.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    #[tracing::instrument(skip(self, url), fields(db.table = "stored_photos", db.operation = "insert"))]
    async fn append_photo_reference(
        &self,
        principal: Principal,
        storage_key: &str,
        url: &str,
    ) -> Result<StoredPhoto, AppError> {
        let row = sqlx::query_as::<Postgres, StoredPhotoRow>(
            r#"
            INSERT INTO stored_photos (principal_id, storage_key, url)
            VALUES ($1, $2, $3)
            RETURNING id, principal_id, storage_key, url, created_at
            "#,
        )
        .bind(principal.as_uuid())
        .bind(storage_key)
        .bind(url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    #[tracing::instrument(skip(self), fields(db.table = "profiles", db.operation = "select"))]
    async fn contact_address(&self, principal: Principal) -> Result<Option<String>, AppError> {
        let email = sqlx::query_scalar::<Postgres, Option<String>>(
            "SELECT email FROM profiles WHERE id = $1",
        )
        .bind(principal.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(email.flatten())
    }
}
