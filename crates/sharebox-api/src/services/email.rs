//! Email delivery of share links via SMTP.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use tracing::info;

use sharebox_core::{Config, ShareNotifier};

const SUBJECT: &str = "Files have been shared with you";

/// Sends share links to recipients.
#[derive(Clone)]
pub struct EmailService {
    mailer: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
}

impl EmailService {
    /// Create email service from config. Returns `None` if disabled or SMTP not configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        if !config.email_notifications_enabled() {
            tracing::debug!("Email notifications disabled (EMAIL_NOTIFICATIONS_ENABLED=false)");
            return None;
        }
        let host = config.smtp_host()?;
        let from = config.smtp_from()?.to_string();
        let port = config.smtp_port().unwrap_or(587);

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
                "Email service initialized (SMTP with STARTTLS)"
            );
            b.build()
        } else {
            let b = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(port);
            let b = match credentials {
                Some(c) => b.credentials(c),
                None => b,
            };
            tracing::info!(host = %host, port = port, "Email service initialized (SMTP)");
            b.build()
        };

        Some(Self {
            mailer: Arc::new(mailer),
            from,
        })
    }

    /// Send a plain-text email to one recipient.
    pub async fn send(&self, to: &str, subject: &str, body_plain: &str) -> Result<(), String> {
        let to_addr: Mailbox = to
            .parse()
            .map_err(|e| format!("Invalid recipient address {}: {}", to, e))?;
        let from_addr: Mailbox = self
            .from
            .parse()
            .map_err(|e| format!("Invalid SMTP_FROM: {}", e))?;

        let email = Message::builder()
            .from(from_addr)
            .to(to_addr)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body_plain.to_string())
            .map_err(|e| e.to_string())?;

        self.mailer.send(email).await.map_err(|e| e.to_string())?;
        info!("Share email sent");
        Ok(())
    }
}

pub fn share_email_body(session_link: &str) -> String {
    format!(
        "Someone shared files with you on Sharebox.\n\nOpen them here:\n{}\n",
        session_link
    )
}

#[async_trait]
impl ShareNotifier for EmailService {
    async fn notify_recipient(&self, to: &str, session_link: &str) -> Result<(), String> {
        self.send(to, SUBJECT, &share_email_body(session_link)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharebox_core::{BaseConfig, PersistenceBackend, SharingConfig, StorageBackend};

    fn config(email_enabled: bool) -> Config {
        Config(Box::new(SharingConfig {
            base: BaseConfig {
                server_port: 3000,
                cors_origins: vec!["*".to_string()],
                db_max_connections: 5,
                db_timeout_seconds: 30,
                jwt_secret: "test-secret-key-min-32-characters-long".to_string(),
                environment: "development".to_string(),
            },
            persistence_backend: PersistenceBackend::Memory,
            database_url: None,
            storage_backend: StorageBackend::Local,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            aws_region: None,
            local_storage_path: Some("/tmp/sharebox-test".to_string()),
            local_storage_base_url: Some("http://localhost:3000/files".to_string()),
            presigned_url_ttl_secs: 900,
            max_file_size_bytes: 10 * 1024 * 1024,
            max_files_per_session: 100,
            public_base_url: "http://localhost:3000".to_string(),
            email_notifications_enabled: email_enabled,
            smtp_host: Some("localhost".to_string()),
            smtp_port: Some(2525),
            smtp_user: None,
            smtp_password: None,
            smtp_from: Some("Sharebox <noreply@example.com>".to_string()),
            smtp_tls: false,
        }))
    }

    #[test]
    fn from_config_returns_none_when_email_disabled() {
        assert!(EmailService::from_config(&config(false)).is_none());
    }

    #[tokio::test]
    async fn from_config_builds_service_when_enabled() {
        assert!(EmailService::from_config(&config(true)).is_some());
    }

    #[tokio::test]
    async fn send_rejects_invalid_recipient() {
        let service = EmailService::from_config(&config(true)).unwrap();
        let err = service
            .send("not-an-email", SUBJECT, "body")
            .await
            .unwrap_err();
        assert!(err.contains("Invalid recipient address"));
    }

    #[test]
    fn share_email_body_contains_link() {
        let body = share_email_body("http://localhost:3000/files/abc");
        assert!(body.contains("http://localhost:3000/files/abc"));
    }
}
