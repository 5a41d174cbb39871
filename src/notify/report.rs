//! Delivery outcomes reported by notification channels.

use std::fmt;

use thiserror::Error;

use crate::http::HttpError;

/// Why a single destination did not receive the notification.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The HTTP request failed before a response arrived.
    #[error(transparent)]
    Transport(#[from] HttpError),

    /// The destination answered with a non-2xx status.
    #[error("Unexpected status {status}")]
    NonSuccessStatus {
        /// HTTP status code
        status: http::StatusCode,
        /// Response body, if valid UTF-8
        body: Option<String>,
    },

    /// The destination itself is unusable (bad URL, bad mailbox).
    #[error("Invalid destination: {0}")]
    InvalidDestination(String),

    /// The message could not be rendered or assembled.
    #[error("Failed to build message: {0}")]
    Message(String),

    /// The SMTP session failed (connect, STARTTLS, auth or submission).
    #[error("Mail submission failed: {0}")]
    Mail(String),
}

/// Why a channel declined to act. Not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Email sender address or credential is empty.
    MissingCredentials,
    /// Telegram bot token is empty.
    MissingToken,
    /// The channel has no destinations configured.
    NoDestinations,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::MissingCredentials => "sender address or password not configured",
            Self::MissingToken => "bot token not configured",
            Self::NoDestinations => "no destinations configured",
        };
        f.write_str(text)
    }
}

/// Outcome of one attempted delivery.
///
/// Only attempted destinations get an outcome; a channel never stops
/// before attempting all of its destinations.
#[derive(Debug)]
pub struct DestinationOutcome {
    /// Log-safe label of the destination (secrets masked).
    pub destination: String,
    /// The failure, if delivery did not succeed.
    pub error: Option<DeliveryError>,
}

impl DestinationOutcome {
    /// Records a successful delivery.
    #[must_use]
    pub fn delivered(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            error: None,
        }
    }

    /// Records a failed delivery.
    #[must_use]
    pub fn failed(destination: impl Into<String>, error: DeliveryError) -> Self {
        Self {
            destination: destination.into(),
            error: Some(error),
        }
    }

    /// Returns true if the destination accepted the notification.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// What one channel did with one change event.
#[derive(Debug)]
pub enum DeliveryReport {
    /// The channel is not configured and did nothing.
    Skipped(SkipReason),
    /// Every configured destination was attempted.
    Attempted(Vec<DestinationOutcome>),
    /// The channel failed unexpectedly; recorded by the dispatcher.
    Aborted(String),
}

impl DeliveryReport {
    /// Number of destinations that were attempted.
    #[must_use]
    pub fn attempted(&self) -> usize {
        match self {
            Self::Attempted(outcomes) => outcomes.len(),
            Self::Skipped(_) | Self::Aborted(_) => 0,
        }
    }

    /// Number of destinations that accepted the notification.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        match self {
            Self::Attempted(outcomes) => outcomes.iter().filter(|o| o.succeeded()).count(),
            Self::Skipped(_) | Self::Aborted(_) => 0,
        }
    }

    /// Returns true if the channel declined to act.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    /// Returns true if at least one destination failed or the channel aborted.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        match self {
            Self::Attempted(outcomes) => outcomes.iter().any(|o| !o.succeeded()),
            Self::Aborted(_) => true,
            Self::Skipped(_) => false,
        }
    }

    /// Returns the per-destination outcomes (empty unless attempted).
    #[must_use]
    pub fn outcomes(&self) -> &[DestinationOutcome] {
        match self {
            Self::Attempted(outcomes) => outcomes,
            Self::Skipped(_) | Self::Aborted(_) => &[],
        }
    }
}

impl fmt::Display for DeliveryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped(reason) => write!(f, "skipped ({reason})"),
            Self::Attempted(_) => {
                write!(f, "delivered {} of {}", self.succeeded(), self.attempted())
            }
            Self::Aborted(reason) => write!(f, "aborted ({reason})"),
        }
    }
}

/// Masks a secret-bearing string, keeping only its last six characters.
///
/// Strings of six characters or fewer are masked entirely.
#[must_use]
pub fn mask_secret(value: &str) -> String {
    const VISIBLE: usize = 6;

    let count = value.chars().count();
    if count <= VISIBLE {
        return "***".to_string();
    }
    let tail: String = value.chars().skip(count - VISIBLE).collect();
    format!("***{tail}")
}
