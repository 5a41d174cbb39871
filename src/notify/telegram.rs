//! Telegram bot notification channel.

use std::fmt;

use crate::config::defaults;
use crate::http::{HttpClient, HttpRequest};
use crate::monitor::ChangeEvent;

use super::{
    ChannelKind, DeliveryError, DeliveryReport, DestinationOutcome, Notifier, SkipReason, message,
};

/// Bot settings for the Telegram channel.
#[derive(Clone, PartialEq, Eq)]
pub struct TelegramSettings {
    /// Bot API token
    pub bot_token: String,
    /// Chat identifiers, notified in order
    pub chat_ids: Vec<String>,
    /// Bot API base URL
    pub api_base: String,
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_ids: Vec::new(),
            api_base: defaults::TELEGRAM_API_BASE.to_string(),
        }
    }
}

impl fmt::Debug for TelegramSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramSettings")
            .field("bot_token", &"<redacted>")
            .field("chat_ids", &self.chat_ids)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl TelegramSettings {
    /// Returns why the channel cannot act, if it cannot.
    #[must_use]
    pub fn skip_reason(&self) -> Option<SkipReason> {
        if self.bot_token.trim().is_empty() {
            Some(SkipReason::MissingToken)
        } else if self.chat_ids.is_empty() {
            Some(SkipReason::NoDestinations)
        } else {
            None
        }
    }

    /// Builds the `sendMessage` endpoint for the configured bot.
    fn endpoint(&self) -> Result<url::Url, DeliveryError> {
        let base = self.api_base.trim_end_matches('/');
        url::Url::parse(&format!("{base}/bot{}/sendMessage", self.bot_token.trim())).map_err(|e| {
            // The token is part of the URL; report only the parse error.
            DeliveryError::InvalidDestination(format!("bot API endpoint: {e}"))
        })
    }
}

/// Telegram notification channel.
///
/// Posts one Markdown message per chat id. A failing chat is logged and
/// recorded; the remaining chats are still attempted.
#[derive(Debug)]
pub struct TelegramChannel<H> {
    client: H,
    settings: TelegramSettings,
}

impl<H> TelegramChannel<H> {
    /// Creates a Telegram channel.
    #[must_use]
    pub const fn new(client: H, settings: TelegramSettings) -> Self {
        Self { client, settings }
    }

    /// Returns the channel settings.
    #[must_use]
    pub const fn settings(&self) -> &TelegramSettings {
        &self.settings
    }
}

impl<H: HttpClient> TelegramChannel<H> {
    async fn send_to(&self, chat_id: &str, event: &ChangeEvent) -> Result<(), DeliveryError> {
        let endpoint = self.settings.endpoint()?;
        let text = message::telegram_text(event)?;

        let request = HttpRequest::post(endpoint).with_form([
            ("chat_id", chat_id),
            ("text", text.as_str()),
            ("parse_mode", "Markdown"),
        ]);

        let response = self.client.request(request).await?;
        if response.is_success() {
            return Ok(());
        }

        Err(DeliveryError::NonSuccessStatus {
            status: response.status,
            body: response.body_text().map(ToString::to_string),
        })
    }

    async fn deliver_all(&self, event: &ChangeEvent) -> Vec<DestinationOutcome> {
        let mut outcomes = Vec::with_capacity(self.settings.chat_ids.len());

        for chat_id in &self.settings.chat_ids {
            match self.send_to(chat_id, event).await {
                Ok(()) => {
                    tracing::info!("telegram: sent to chat {chat_id}");
                    outcomes.push(DestinationOutcome::delivered(chat_id.clone()));
                }
                Err(e) => {
                    tracing::error!("telegram: delivery to chat {chat_id} failed: {e}");
                    outcomes.push(DestinationOutcome::failed(chat_id.clone(), e));
                }
            }
        }

        outcomes
    }
}

impl<H: HttpClient> Notifier for TelegramChannel<H> {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Telegram
    }

    async fn notify(&self, event: &ChangeEvent) -> DeliveryReport {
        if let Some(reason) = self.settings.skip_reason() {
            tracing::info!("telegram: skipped, {reason}");
            return DeliveryReport::Skipped(reason);
        }

        let report = DeliveryReport::Attempted(self.deliver_all(event).await);
        tracing::info!("telegram: {report}");
        report
    }
}

#[cfg(test)]
#[path = "telegram_tests.rs"]
mod tests;
