// src/services/notifier.rs

//! Digest delivery.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::Result;
use crate::models::{MailConfig, MailCredentials};

/// A rendered digest ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Delivers a digest email.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, email: &Email) -> Result<()>;
}

/// Sends mail through an SMTP relay using STARTTLS and login credentials.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    /// Build a transport for the configured relay.
    ///
    /// No connection is opened until the first send.
    pub fn new(config: &MailConfig, credentials: &MailCredentials) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_server)?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                credentials.user.clone(),
                credentials.password.clone(),
            ))
            .timeout(Some(Duration::from_secs(config.timeout_secs)))
            .build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, email: &Email) -> Result<()> {
        let message = build_message(email)?;
        let response = self.transport.send(message).await?;
        log::debug!("SMTP response code {}", response.code());
        Ok(())
    }
}

/// Logs the digest instead of sending it.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, email: &Email) -> Result<()> {
        log::info!("Dry run: digest for {} not sent", email.to);
        log::info!("Subject: {}", email.subject);
        for line in email.text.lines() {
            log::info!("    {}", line);
        }
        Ok(())
    }
}

/// Build a multipart (plain text + HTML) message from an [`Email`].
pub fn build_message(email: &Email) -> Result<Message> {
    let from: Mailbox = email.from.parse()?;
    let to: Mailbox = email.to.parse()?;

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(email.subject.as_str())
        .multipart(MultiPart::alternative_plain_html(
            email.text.clone(),
            email.html.clone(),
        ))?;
    Ok(message)
}
