//! Security audit logging
//!
//! Structured entries on the `audit` tracing target for authentication outcomes,
//! ownership mismatches, quota refusals and stored biometric data.

use facemark_core::Principal;
use serde::Serialize;
use uuid::Uuid;

/// Audit event types for categorization
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    AuthenticationSuccess,
    AuthenticationFailure,
    /// Principal tried to act on another principal's resources
    OwnershipMismatch,
    QuotaExceeded,
    PhotoEnrolled,
    AttendanceRecorded,
}

/// Structured audit log entry
#[derive(Debug, Serialize)]
pub struct AuditLogEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub event_type: AuditEventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimed_owner: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl AuditLogEntry {
    pub fn new(event_type: AuditEventType) -> Self {
        Self {
            timestamp: chrono::Utc::now(),
            event_type,
            principal: None,
            claimed_owner: None,
            details: None,
            success: true,
            error_message: None,
        }
    }

    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal.as_uuid());
        self
    }

    pub fn with_claimed_owner(mut self, claimed_owner: Principal) -> Self {
        self.claimed_owner = Some(claimed_owner.as_uuid());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Mark as failure
    pub fn with_failure(mut self, error_message: impl Into<String>) -> Self {
        self.success = false;
        self.error_message = Some(error_message.into());
        self
    }

    /// Log the entry on the `audit` target
    pub fn log(&self) {
        let json = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string());

        if self.success {
            tracing::event!(
                target: "audit",
                tracing::Level::INFO,
                audit_entry = %json,
                event_type = ?self.event_type,
                principal = ?self.principal,
                success = self.success,
                "Security audit log"
            );
        } else {
            tracing::event!(
                target: "audit",
                tracing::Level::WARN,
                audit_entry = %json,
                event_type = ?self.event_type,
                principal = ?self.principal,
                success = self.success,
                error = ?self.error_message,
                "Security audit log - failure"
            );
        }
    }
}

/// Log the outcome of resolving a bearer credential
pub fn log_authentication_attempt(principal: Option<Principal>, error_message: Option<String>) {
    match (principal, error_message) {
        (Some(principal), None) => AuditLogEntry::new(AuditEventType::AuthenticationSuccess)
            .with_principal(principal)
            .log(),
        (principal, error) => {
            let mut entry = AuditLogEntry::new(AuditEventType::AuthenticationFailure)
                .with_failure(error.unwrap_or_else(|| "Authentication failed".to_string()));
            entry.principal = principal.map(|p| p.as_uuid());
            entry.log();
        }
    }
}

pub fn log_ownership_mismatch(principal: Principal, claimed_owner: Principal) {
    AuditLogEntry::new(AuditEventType::OwnershipMismatch)
        .with_principal(principal)
        .with_claimed_owner(claimed_owner)
        .with_failure("Authenticated principal does not match the claimed owner")
        .log();
}

pub fn log_quota_exceeded(principal: Principal, stored: i64, limit: i64) {
    AuditLogEntry::new(AuditEventType::QuotaExceeded)
        .with_principal(principal)
        .with_details(serde_json::json!({ "stored": stored, "limit": limit }))
        .with_failure("Stored photo limit reached")
        .log();
}

pub fn log_photo_enrolled(principal: Principal, photo_id: Uuid, storage_key: &str) {
    AuditLogEntry::new(AuditEventType::PhotoEnrolled)
        .with_principal(principal)
        .with_details(serde_json::json!({ "photo_id": photo_id, "storage_key": storage_key }))
        .log();
}

pub fn log_attendance_recorded(principal: Principal, record_id: Uuid, submission_id: Uuid) {
    AuditLogEntry::new(AuditEventType::AttendanceRecorded)
        .with_principal(principal)
        .with_details(serde_json::json!({
            "record_id": record_id,
            "submission_id": submission_id,
        }))
        .log();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_entry_serializes_without_empty_fields() {
        let principal = Principal::new(Uuid::new_v4());
        let entry = AuditLogEntry::new(AuditEventType::OwnershipMismatch)
            .with_principal(principal)
            .with_failure("mismatch");

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["event_type"], "ownership_mismatch");
        assert_eq!(json["success"], false);
        assert!(json.get("claimed_owner").is_none());
        assert!(json.get("details").is_none());
    }
}
