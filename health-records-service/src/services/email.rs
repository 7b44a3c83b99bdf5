//! Outbound email for share-link notifications.

use crate::config::SmtpConfig;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Provider not enabled: {0}")]
    NotEnabled(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Send error: {0}")]
    SendFailed(String),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),
}

#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Returns the provider's message id when it reports one.
    async fn send(&self, email: &EmailMessage) -> Result<Option<String>, EmailError>;

    async fn health_check(&self) -> Result<(), EmailError>;

    fn is_enabled(&self) -> bool;
}

pub struct SmtpProvider {
    config: SmtpConfig,
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl SmtpProvider {
    pub fn new(config: SmtpConfig) -> Result<Self, EmailError> {
        if !config.enabled {
            return Ok(Self {
                config,
                transport: None,
            });
        }

        let creds = Credentials::new(config.user.clone(), config.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| EmailError::Configuration(format!("Failed to create SMTP relay: {}", e)))?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self {
            config,
            transport: Some(transport),
        })
    }
}

#[async_trait]
impl EmailProvider for SmtpProvider {
    async fn send(&self, email: &EmailMessage) -> Result<Option<String>, EmailError> {
        if !self.config.enabled {
            return Err(EmailError::NotEnabled(
                "SMTP email provider is not enabled".to_string(),
            ));
        }

        let transport = self.transport.as_ref().ok_or_else(|| {
            EmailError::Configuration("SMTP transport not initialized".to_string())
        })?;

        let from_mailbox: Mailbox = format!("{} <{}>", self.config.from_name, self.config.from_email)
            .parse()
            .map_err(|e| EmailError::Configuration(format!("Invalid from address: {}", e)))?;

        let to_mailbox: Mailbox = email
            .to
            .parse()
            .map_err(|e| EmailError::InvalidRecipient(format!("Invalid recipient: {}", e)))?;

        let builder = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(&email.subject);

        let message = match &email.body_html {
            Some(html) => builder.multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.body_text.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html.clone()),
                    ),
            ),
            None => builder
                .header(ContentType::TEXT_PLAIN)
                .body(email.body_text.clone()),
        }
        .map_err(|e| EmailError::SendFailed(format!("Failed to build message: {}", e)))?;

        let response = transport
            .send(message)
            .await
            .map_err(|e| EmailError::SendFailed(format!("Failed to send email: {}", e)))?;

        tracing::info!(to = %email.to, subject = %email.subject, "Email sent successfully");

        let message_id = response.message().next().map(|s| s.to_string());
        Ok(message_id)
    }

    async fn health_check(&self) -> Result<(), EmailError> {
        if !self.config.enabled {
            return Ok(());
        }

        let transport = self.transport.as_ref().ok_or_else(|| {
            EmailError::Configuration("SMTP transport not initialized".to_string())
        })?;

        transport
            .test_connection()
            .await
            .map_err(|e| EmailError::Connection(format!("SMTP connection test failed: {}", e)))?;

        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
    }
}

/// Mock email provider for testing
pub struct MockEmailProvider {
    enabled: bool,
    send_count: AtomicU64,
    sent: Mutex<Vec<EmailMessage>>,
}

impl MockEmailProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            send_count: AtomicU64::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Attempts are counted but every send fails.
    pub fn failing() -> Self {
        Self::new(false)
    }

    pub fn send_count(&self) -> u64 {
        self.send_count.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EmailProvider for MockEmailProvider {
    async fn send(&self, email: &EmailMessage) -> Result<Option<String>, EmailError> {
        let attempt = self.send_count.fetch_add(1, Ordering::SeqCst) + 1;

        if !self.enabled {
            return Err(EmailError::NotEnabled(
                "Mock email provider is not enabled".to_string(),
            ));
        }

        if let Ok(mut sent) = self.sent.lock() {
            sent.push(email.clone());
        }

        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            "[MOCK] Email would be sent"
        );

        Ok(Some(format!("mock-email-{}", attempt)))
    }

    async fn health_check(&self) -> Result<(), EmailError> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> EmailMessage {
        EmailMessage {
            to: "dr.lee@example.com".to_string(),
            subject: "Shared records".to_string(),
            body_text: "Open the link".to_string(),
            body_html: None,
        }
    }

    #[tokio::test]
    async fn disabled_smtp_provider_refuses_to_send() {
        let provider = SmtpProvider::new(SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            user: String::new(),
            password: String::new(),
            from_email: "noreply@example.com".to_string(),
            from_name: "Health Records".to_string(),
            enabled: false,
        })
        .unwrap();

        assert!(!provider.is_enabled());
        assert!(matches!(
            provider.send(&message()).await,
            Err(EmailError::NotEnabled(_))
        ));
        assert!(provider.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn mock_provider_records_messages() {
        let provider = MockEmailProvider::new(true);

        let id = provider.send(&message()).await.unwrap();

        assert_eq!(id.as_deref(), Some("mock-email-1"));
        assert_eq!(provider.send_count(), 1);
        assert_eq!(provider.sent()[0].to, "dr.lee@example.com");
    }

    #[tokio::test]
    async fn failing_mock_counts_attempts() {
        let provider = MockEmailProvider::failing();

        assert!(provider.send(&message()).await.is_err());
        assert_eq!(provider.send_count(), 1);
        assert!(provider.sent().is_empty());
    }
}
