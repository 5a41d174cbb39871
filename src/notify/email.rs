//! Email notification channel.

use std::fmt;
use std::time::Duration;

use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::defaults;
use crate::monitor::ChangeEvent;

use super::{
    ChannelKind, DeliveryError, DeliveryReport, DestinationOutcome, Notifier, SkipReason, message,
};

/// SMTP settings for the email channel.
#[derive(Clone, PartialEq, Eq)]
pub struct EmailSettings {
    /// SMTP server host name
    pub smtp_server: String,
    /// SMTP submission port (STARTTLS)
    pub smtp_port: u16,
    /// Sender address, also used as the SMTP user name
    pub sender_email: String,
    /// Sender credential
    pub sender_password: String,
    /// Recipient address; empty means "send to the sender"
    pub recipient_email: String,
}

impl EmailSettings {
    /// Returns true if both sender address and credential are present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.sender_email.trim().is_empty() && !self.sender_password.is_empty()
    }

    /// Returns the effective recipient.
    #[must_use]
    pub fn recipient(&self) -> &str {
        if self.recipient_email.trim().is_empty() {
            &self.sender_email
        } else {
            &self.recipient_email
        }
    }
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            smtp_server: defaults::SMTP_SERVER.to_string(),
            smtp_port: defaults::SMTP_PORT,
            sender_email: String::new(),
            sender_password: String::new(),
            recipient_email: String::new(),
        }
    }
}

impl fmt::Debug for EmailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailSettings")
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .field("sender_email", &self.sender_email)
            .field("sender_password", &"<redacted>")
            .field("recipient_email", &self.recipient_email)
            .finish()
    }
}

/// A plaintext message ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    /// Sender mailbox
    pub from: String,
    /// Recipient mailbox
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Plaintext body
    pub body: String,
}

/// Trait for submitting one message over one SMTP session.
///
/// Abstracts the mail transport so the channel can be tested without a
/// mail server.
pub trait Mailer: Send + Sync {
    /// Opens a session, authenticates, submits `message` and closes.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] if the message or session fails.
    fn send(
        &self,
        settings: &EmailSettings,
        message: MailMessage,
    ) -> impl std::future::Future<Output = Result<(), DeliveryError>> + Send;
}

/// Production mailer using lettre's async SMTP transport.
///
/// Each call opens a fresh STARTTLS session authenticated with the
/// sender's credentials; no connection is kept between changes.
#[derive(Debug, Clone, Copy)]
pub struct SmtpMailer {
    timeout: Duration,
}

impl SmtpMailer {
    /// Creates a mailer with the default network timeout.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: defaults::http_timeout(),
        }
    }
}

impl Default for SmtpMailer {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_mailbox(role: &str, address: &str) -> Result<Mailbox, DeliveryError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| DeliveryError::InvalidDestination(format!("{role} '{address}': {e}")))
}

fn build_message(mail: MailMessage) -> Result<Message, DeliveryError> {
    Message::builder()
        .from(parse_mailbox("sender", &mail.from)?)
        .to(parse_mailbox("recipient", &mail.to)?)
        .subject(mail.subject)
        .header(ContentType::TEXT_PLAIN)
        .body(mail.body)
        .map_err(|e| DeliveryError::Message(e.to_string()))
}

impl Mailer for SmtpMailer {
    async fn send(&self, settings: &EmailSettings, mail: MailMessage) -> Result<(), DeliveryError> {
        let message = build_message(mail)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_server)
            .map_err(|e| DeliveryError::Mail(e.to_string()))?
            .port(settings.smtp_port)
            .credentials(Credentials::new(
                settings.sender_email.clone(),
                settings.sender_password.clone(),
            ))
            .timeout(Some(self.timeout))
            .build();

        transport
            .send(message)
            .await
            .map_err(|e| DeliveryError::Mail(e.to_string()))?;

        Ok(())
    }
}

/// Email notification channel with a single destination.
#[derive(Debug)]
pub struct EmailChannel<M> {
    settings: EmailSettings,
    mailer: M,
}

impl<M> EmailChannel<M> {
    /// Creates an email channel.
    #[must_use]
    pub const fn new(settings: EmailSettings, mailer: M) -> Self {
        Self { settings, mailer }
    }

    /// Returns the channel settings.
    #[must_use]
    pub const fn settings(&self) -> &EmailSettings {
        &self.settings
    }
}

impl<M: Mailer> EmailChannel<M> {
    async fn deliver(&self, event: &ChangeEvent) -> Result<(), DeliveryError> {
        let mail = MailMessage {
            from: self.settings.sender_email.clone(),
            to: self.settings.recipient().to_string(),
            subject: message::email_subject(event)?,
            body: message::email_body(event)?,
        };

        self.mailer.send(&self.settings, mail).await
    }
}

impl<M: Mailer> Notifier for EmailChannel<M> {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Email
    }

    async fn notify(&self, event: &ChangeEvent) -> DeliveryReport {
        if !self.settings.is_configured() {
            tracing::info!("email: skipped, {}", SkipReason::MissingCredentials);
            return DeliveryReport::Skipped(SkipReason::MissingCredentials);
        }

        let recipient = self.settings.recipient().to_string();
        let outcome = match self.deliver(event).await {
            Ok(()) => {
                tracing::info!("email: sent to {recipient}");
                DestinationOutcome::delivered(recipient)
            }
            Err(e) => {
                tracing::error!("email: delivery to {recipient} failed: {e}");
                DestinationOutcome::failed(recipient, e)
            }
        };

        let report = DeliveryReport::Attempted(vec![outcome]);
        tracing::info!("email: {report}");
        report
    }
}

#[cfg(test)]
#[path = "email_tests.rs"]
mod tests;
