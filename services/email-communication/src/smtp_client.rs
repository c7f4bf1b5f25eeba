//! SMTP Client
//!
//! Handles email sending via SMTP using lettre.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart};
use lettre::{
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::path::Path;

use quotation_models::OutgoingEmail;

use crate::Notifier;

/// SMTP client configuration
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
}

/// SMTP client for sending emails
pub struct SmtpClient {
    config: SmtpConfig,
}

impl SmtpClient {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// Build the MIME message: a plain-text part plus the optional attachment.
    pub async fn build_message(&self, email: &OutgoingEmail) -> Result<Message> {
        let from_mailbox: Mailbox = format!("{} <{}>", self.config.from_name, self.config.from_email)
            .parse()
            .context("Invalid from address")?;

        let to_mailbox: Mailbox = email.to.parse().context("Invalid to address")?;

        let text_part = SinglePart::builder()
            .header(ContentType::TEXT_PLAIN)
            .body(email.body_text.clone());

        let mut body = MultiPart::mixed().singlepart(text_part);

        if let Some(path) = &email.attachment {
            body = body.singlepart(attachment_part(path).await?);
        }

        Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(email.subject.clone())
            .multipart(body)
            .context("Failed to build email")
    }

    /// Send email
    pub async fn send_email(&self, email: &OutgoingEmail) -> Result<String> {
        let message = self.build_message(email).await?;

        let creds = Credentials::new(
            self.config.username.clone(),
            self.config.password.clone(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)
            .context("Failed to create SMTP transport")?
            .port(self.config.port)
            .credentials(creds)
            .build();

        let response = mailer
            .send(message)
            .await
            .context("Failed to send email")?;

        Ok(response.message().collect::<Vec<_>>().join("\n"))
    }
}

#[async_trait]
impl Notifier for SmtpClient {
    async fn send(&self, email: &OutgoingEmail) -> Result<String> {
        self.send_email(email).await
    }
}

/// Read `path` into an attachment part named after the file.
async fn attachment_part(path: &Path) -> Result<SinglePart> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read attachment {}", path.display()))?;

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());

    let content_type = ContentType::parse(attachment_content_type(path))
        .context("Invalid attachment content type")?;

    Ok(Attachment::new(filename).body(data, content_type))
}

fn attachment_content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("csv") => "text/csv",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}
