//! Email service for contact form dispatch
//!
//! A valid contact submission is turned into exactly one email to the
//! configured recipient, with the submitter's address as reply-to. The
//! `Mailer` trait is the transport seam; production uses SMTP via lettre.

use crate::config::EmailConfig;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use lettre::{
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum EmailServiceError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Delivery error: {0}")]
    DeliveryError(#[from] anyhow::Error),
}

/// Contact form submission
#[derive(Debug, Clone, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    fn validate(&self) -> Result<(), EmailServiceError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(EmailServiceError::ValidationError(format!(
                    "Field '{}' must not be empty",
                    field
                )));
            }
        }
        Ok(())
    }
}

/// Email transport abstraction
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: Message) -> Result<()>;
}

/// SMTP transport backed by lettre
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn from_config(config: &EmailConfig) -> Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| anyhow!("Failed to create SMTP transport: {}", e))?
            .port(config.smtp_port);

        if !config.smtp_username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: Message) -> Result<()> {
        self.transport
            .send(message)
            .await
            .map_err(|e| anyhow!("Failed to send email: {}", e))?;
        Ok(())
    }
}

/// Email service
pub struct EmailService {
    mailer: Arc<dyn Mailer>,
    from: String,
    contact_recipient: String,
}

impl EmailService {
    pub fn new(mailer: Arc<dyn Mailer>, config: &EmailConfig) -> Self {
        Self {
            mailer,
            from: config.smtp_from.clone(),
            contact_recipient: config.contact_recipient.clone(),
        }
    }

    /// Validate a contact submission and dispatch it as a single email.
    pub async fn send_contact(&self, form: &ContactForm) -> Result<(), EmailServiceError> {
        form.validate()?;

        let email = build_contact_email(form, &self.from, &self.contact_recipient)
            .map_err(EmailServiceError::ValidationError)?;

        self.mailer.send(email).await?;

        tracing::info!(from = %form.email, "Contact message dispatched");
        Ok(())
    }
}

/// Build the contact email. The subject carries the submitter's name so
/// the recipient can triage without opening the body.
fn build_contact_email(form: &ContactForm, from: &str, to: &str) -> Result<Message, String> {
    let reply_to = form
        .email
        .trim()
        .parse()
        .map_err(|_| format!("Invalid email address: {}", form.email))?;

    Message::builder()
        .from(
            from.parse()
                .map_err(|_| format!("Invalid from address: {}", from))?,
        )
        .to(to
            .parse()
            .map_err(|_| format!("Invalid recipient address: {}", to))?)
        .reply_to(reply_to)
        .subject(format!("From {} | {}", form.name.trim(), form.subject.trim()))
        .header(ContentType::TEXT_PLAIN)
        .body(form.message.clone())
        .map_err(|e| format!("Failed to build email: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    pub struct RecordingMailer {
        pub sent: Mutex<Vec<Message>>,
    }

    impl RecordingMailer {
        pub fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, message: Message) -> Result<()> {
            self.sent.lock().unwrap().push(message);
            Ok(())
        }
    }

    fn config() -> EmailConfig {
        EmailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_username: String::new(),
            smtp_password: String::new(),
            smtp_from: "blog@example.com".to_string(),
            contact_recipient: "admin@example.com".to_string(),
        }
    }

    fn sample_form() -> ContactForm {
        ContactForm {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            subject: "Question".to_string(),
            message: "Hello there".to_string(),
        }
    }

    #[tokio::test]
    async fn test_valid_submission_sends_exactly_one_email() {
        let mailer = Arc::new(RecordingMailer::new());
        let service = EmailService::new(mailer.clone(), &config());

        service.send_contact(&sample_form()).await.unwrap();

        assert_eq!(mailer.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_field_rejected_without_sending() {
        let mailer = Arc::new(RecordingMailer::new());
        let service = EmailService::new(mailer.clone(), &config());

        let mut form = sample_form();
        form.message = "  ".to_string();

        let result = service.send_contact(&form).await;
        assert!(matches!(result, Err(EmailServiceError::ValidationError(_))));
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let mailer = Arc::new(RecordingMailer::new());
        let service = EmailService::new(mailer.clone(), &config());

        let mut form = sample_form();
        form.email = "not-an-address".to_string();

        let result = service.send_contact(&form).await;
        assert!(matches!(result, Err(EmailServiceError::ValidationError(_))));
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_subject_carries_name_and_subject() {
        let email =
            build_contact_email(&sample_form(), "blog@example.com", "admin@example.com").unwrap();
        let rendered = String::from_utf8(email.formatted()).unwrap();
        assert!(rendered.contains("Subject: From Alice | Question"));
        assert!(rendered.contains("Reply-To: alice@example.com"));
    }
}
