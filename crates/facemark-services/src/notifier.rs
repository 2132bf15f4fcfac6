//! SMTP notifier for attendance confirmations.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;

use facemark_core::{AppError, AttendanceNotice, Config, Notifier};

const STAGE: &str = "notifying";

/// Sends a plain-text confirmation for each recorded attendance event.
#[derive(Clone)]
pub struct EmailNotifier {
    mailer: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
}

impl EmailNotifier {
    /// Create the notifier from config. Returns `None` if disabled or SMTP not configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        if !config.email_notifications_enabled() {
            tracing::debug!("Email notifications disabled (EMAIL_NOTIFICATIONS_ENABLED=false)");
            return None;
        }
        let host = config.smtp_host()?;
        let from = config.smtp_from()?.to_string();
        let port = config.smtp_port();

        let credentials = match (config.smtp_user(), config.smtp_password()) {
            (Some(u), Some(p)) => Some(Credentials::new(u.to_string(), p.to_string())),
            _ => None,
        };

        let mailer = if config.smtp_tls() {
            let b = match AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host) {
                Ok(b) => b.port(port),
                Err(e) => {
                    tracing::error!(error = %e, host = %host, "Invalid SMTP relay");
                    return None;
                }
            };
            let b = match credentials {
                Some(c) => b.credentials(c),
                None => b,
            };
            tracing::info!(
                host = %host,
                port = port,
                "Email notifier initialized (SMTP with STARTTLS)"
            );
            b.build()
        } else {
            let b = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(port);
            let b = match credentials {
                Some(c) => b.credentials(c),
                None => b,
            };
            tracing::info!(host = %host, port = port, "Email notifier initialized (SMTP)");
            b.build()
        };

        Some(Self {
            mailer: Arc::new(mailer),
            from,
        })
    }
}

fn subject(notice: &AttendanceNotice) -> String {
    format!("Attendance recorded: {}", notice.status)
}

fn body(notice: &AttendanceNotice) -> String {
    let mut body = format!(
        "Your attendance was recorded as {} at {}.\n\nRecord: {}\nMatch confidence: {:.1}%\n",
        notice.status,
        notice.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        notice.record_id,
        notice.confidence * 100.0,
    );
    if let Some(url) = &notice.image_url {
        body.push_str(&format!("Captured image (link expires): {}\n", url));
    }
    body
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn send(&self, address: &str, notice: &AttendanceNotice) -> Result<(), AppError> {
        let to: Mailbox = address
            .parse()
            .map_err(|e| AppError::upstream(STAGE, format!("Invalid recipient: {}", e)))?;
        let from: Mailbox = self
            .from
            .parse()
            .map_err(|e| AppError::Configuration(format!("Invalid SMTP_FROM: {}", e)))?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(subject(notice))
            .header(ContentType::TEXT_PLAIN)
            .body(body(notice))
            .map_err(|e| AppError::upstream(STAGE, e))?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| AppError::upstream(STAGE, e))?;
        tracing::info!(record_id = %notice.record_id, "Attendance email sent");
        Ok(())
    }
}
