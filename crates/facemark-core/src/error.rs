//! Error types module
//!
//! All failures in the ingestion and submission pipeline are unified under [`AppError`].
//! Each variant is a distinct failure kind so callers branch on the variant, never on the
//! message text.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx` feature.

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

use crate::models::ValidationRejection;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues and security-relevant rejections
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "QUOTA_EXCEEDED")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Upload quota exceeded: {stored} of {limit} photos already stored")]
    QuotaExceeded { stored: i64, limit: i64 },

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("{0}")]
    ValidationRejected(#[from] ValidationRejection),

    #[error("Upstream failure during {stage}: {message}")]
    Upstream { stage: String, message: String },

    #[error("Timed out during {stage} after {millis}ms")]
    Timeout { stage: String, millis: u64 },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Shorthand for an upstream collaborator failure at the given stage.
    pub fn upstream(stage: impl Into<String>, message: impl ToString) -> Self {
        AppError::Upstream {
            stage: stage.into(),
            message: message.to_string(),
        }
    }

    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Database(_) => "Database",
            AppError::Unauthenticated(_) => "Unauthenticated",
            AppError::Forbidden(_) => "Forbidden",
            AppError::QuotaExceeded { .. } => "QuotaExceeded",
            AppError::MalformedInput(_) => "MalformedInput",
            AppError::ValidationRejected(_) => "ValidationRejected",
            AppError::Upstream { .. } => "Upstream",
            AppError::Timeout { .. } => "Timeout",
            AppError::Conflict(_) => "Conflict",
            AppError::Configuration(_) => "Configuration",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::Database(_) => (
            500,
            "DATABASE_ERROR",
            true,
            Some("Retry the submission with the same submission_id"),
            true,
            LogLevel::Error,
        ),
        AppError::Unauthenticated(_) => (
            401,
            "UNAUTHENTICATED",
            false,
            Some("Sign in again and retry"),
            false,
            LogLevel::Debug,
        ),
        AppError::Forbidden(_) => (
            403,
            "FORBIDDEN",
            false,
            Some("Submit images only for your own account"),
            false,
            LogLevel::Warn,
        ),
        AppError::QuotaExceeded { .. } => (
            429,
            "QUOTA_EXCEEDED",
            false,
            Some("Remove stored photos before uploading new ones"),
            false,
            LogLevel::Debug,
        ),
        AppError::MalformedInput(_) => (
            400,
            "MALFORMED_INPUT",
            false,
            Some("Send the image as a base64 data URI"),
            false,
            LogLevel::Debug,
        ),
        AppError::ValidationRejected(_) => (
            422,
            "VALIDATION_REJECTED",
            false,
            Some("Capture a new JPEG, PNG or WEBP image within the size limits"),
            false,
            LogLevel::Debug,
        ),
        AppError::Upstream { .. } => (
            502,
            "UPSTREAM_FAILURE",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Timeout { .. } => (
            504,
            "UPSTREAM_TIMEOUT",
            true,
            Some("Retry after a short delay"),
            false,
            LogLevel::Warn,
        ),
        AppError::Conflict(_) => (
            409,
            "SUBMISSION_CONFLICT",
            false,
            Some("Submit again with a new submission_id"),
            false,
            LogLevel::Warn,
        ),
        AppError::Configuration(_) => (
            500,
            "CONFIGURATION_ERROR",
            false,
            Some("Contact support if this error persists"),
            true,
            LogLevel::Error,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Failed to record attendance".to_string(),
            AppError::Unauthenticated(ref msg) => msg.clone(),
            AppError::Forbidden(ref msg) => msg.clone(),
            AppError::QuotaExceeded { .. } => self.to_string(),
            AppError::MalformedInput(ref msg) => msg.clone(),
            AppError::ValidationRejected(ref rejection) => rejection.to_string(),
            AppError::Upstream { ref stage, .. } => {
                format!("An external service failed during {}", stage)
            }
            AppError::Timeout { .. } => self.to_string(),
            AppError::Conflict(ref msg) => msg.clone(),
            AppError::Configuration(_) => "Service is misconfigured".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}
