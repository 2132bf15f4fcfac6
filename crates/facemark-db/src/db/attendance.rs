use async_trait::async_trait;
use facemark_core::{AppError, AttendanceEvent, Principal, RecordStore};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Append-only repository for attendance records
#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record id and owner for a submission, if it has already been persisted
    #[tracing::instrument(skip(self), fields(db.table = "attendance_records", db.operation = "select"))]
    pub async fn find_by_submission(
        &self,
        submission_id: Uuid,
    ) -> Result<Option<(Uuid, Principal)>, AppError> {
        let row = sqlx::query_as::<Postgres, (Uuid, Uuid)>(
            "SELECT id, principal_id FROM attendance_records WHERE submission_id = $1",
        )
        .bind(submission_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, owner)| (id, Principal::new(owner))))
    }
}

#[async_trait]
impl RecordStore for AttendanceRepository {
    #[tracing::instrument(
        skip(self, event),
        fields(
            db.table = "attendance_records",
            db.operation = "upsert",
            submission_id = %event.submission_id
        )
    )]
    async fn insert(&self, event: &AttendanceEvent) -> Result<Uuid, AppError> {
        let inserted = sqlx::query_scalar::<Postgres, Uuid>(
            r#"
            INSERT INTO attendance_records
                (submission_id, principal_id, descriptor, confidence, image_reference, status, recorded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (submission_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(event.submission_id)
        .bind(event.principal.as_uuid())
        .bind(event.descriptor.as_slice().to_vec())
        .bind(event.confidence)
        .bind(event.image_reference.as_deref())
        .bind(event.status)
        .bind(event.timestamp)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(id) = inserted {
            return Ok(id);
        }

        // Conflict: the submission id is already taken.
        let existing = self.find_by_submission(event.submission_id).await?;
        resolve_conflict(event, existing)
    }
}

/// A repeated submission resolves to its own record; a submission id owned by another
/// principal is a conflict, never a shared record.
fn resolve_conflict(
    event: &AttendanceEvent,
    existing: Option<(Uuid, Principal)>,
) -> Result<Uuid, AppError> {
    match existing {
        Some((id, owner)) if owner == event.principal => {
            tracing::debug!(submission_id = %event.submission_id, "Attendance submission already recorded");
            Ok(id)
        }
        Some(_) => {
            tracing::warn!(
                submission_id = %event.submission_id,
                principal = %event.principal,
                "Submission id already belongs to another principal"
            );
            Err(AppError::Conflict(format!(
                "Submission {} was already used by another account",
                event.submission_id
            )))
        }
        None => Err(AppError::Internal(format!(
            "Attendance record for submission {} vanished after conflict",
            event.submission_id
        ))),
    }
}
