//! Notification channels.
//!
//! This module provides:
//! - The channel abstraction ([`Notifier`]) and channel identifiers ([`ChannelKind`])
//! - Email over SMTP ([`EmailChannel`])
//! - Telegram bot messages ([`TelegramChannel`])
//! - Discord webhook embeds ([`DiscordChannel`])
//! - Per-channel delivery reporting ([`DeliveryReport`])
//!
//! Every channel attempts all of its destinations and never returns an
//! error to the caller: failures are logged and recorded in the report.

mod discord;
mod email;
mod message;
mod report;
mod telegram;

pub use discord::{DiscordChannel, DiscordSettings, EMBED_COLOR};
pub use email::{EmailChannel, EmailSettings, MailMessage, Mailer, SmtpMailer};
pub use report::{DeliveryError, DeliveryReport, DestinationOutcome, SkipReason, mask_secret};
pub use telegram::{TelegramChannel, TelegramSettings};

use std::fmt;
use std::str::FromStr;

use crate::http::HttpClient;
use crate::monitor::ChangeEvent;

/// Identifies a notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// SMTP email
    Email,
    /// Telegram bot
    Telegram,
    /// Discord webhook
    Discord,
}

impl ChannelKind {
    /// Returns the lowercase channel name used in configuration and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Telegram => "telegram",
            Self::Discord => "discord",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown channel name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown notification method '{0}'")]
pub struct UnknownChannel(pub String);

impl FromStr for ChannelKind {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "telegram" => Ok(Self::Telegram),
            "discord" => Ok(Self::Discord),
            _ => Err(UnknownChannel(s.to_string())),
        }
    }
}

/// A notification channel.
///
/// `notify` is infallible by contract: a channel that cannot act returns
/// [`DeliveryReport::Skipped`], and per-destination failures are recorded
/// in [`DeliveryReport::Attempted`].
pub trait Notifier: Send + Sync {
    /// Which channel this is.
    fn kind(&self) -> ChannelKind;

    /// Delivers `event` to every configured destination.
    fn notify(
        &self,
        event: &ChangeEvent,
    ) -> impl std::future::Future<Output = DeliveryReport> + Send;
}

/// Any of the supported channels, for heterogeneous dispatch.
#[derive(Debug)]
pub enum Channel<H, M> {
    /// Email channel
    Email(EmailChannel<M>),
    /// Telegram channel
    Telegram(TelegramChannel<H>),
    /// Discord channel
    Discord(DiscordChannel<H>),
}

impl<H: HttpClient, M: Mailer> Notifier for Channel<H, M> {
    fn kind(&self) -> ChannelKind {
        match self {
            Self::Email(channel) => channel.kind(),
            Self::Telegram(channel) => channel.kind(),
            Self::Discord(channel) => channel.kind(),
        }
    }

    async fn notify(&self, event: &ChangeEvent) -> DeliveryReport {
        match self {
            Self::Email(channel) => channel.notify(event).await,
            Self::Telegram(channel) => channel.notify(event).await,
            Self::Discord(channel) => channel.notify(event).await,
        }
    }
}
