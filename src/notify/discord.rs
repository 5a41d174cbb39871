//! Discord webhook notification channel.

use serde::Serialize;

use crate::http::{HttpClient, HttpRequest};
use crate::monitor::ChangeEvent;
use crate::time::{format_human, format_iso8601};

use super::{
    ChannelKind, DeliveryError, DeliveryReport, DestinationOutcome, Notifier, SkipReason,
    mask_secret,
};

/// Embed accent color (green).
pub const EMBED_COLOR: u32 = 0x00ff00;

const EMBED_TITLE: &str = "🔄 Public IP changed";

/// Webhook settings for the Discord channel.
///
/// The URLs embed the webhook token and are only ever logged masked.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct DiscordSettings {
    /// Webhook URLs, notified in order
    pub webhook_urls: Vec<String>,
}

impl std::fmt::Debug for DiscordSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let masked: Vec<String> = self.webhook_urls.iter().map(|u| mask_secret(u)).collect();
        f.debug_struct("DiscordSettings")
            .field("webhook_urls", &masked)
            .finish()
    }
}

/// Webhook body: one embed per change.
#[derive(Debug, Serialize)]
struct WebhookPayload {
    embeds: [Embed; 1],
}

#[derive(Debug, Serialize)]
struct Embed {
    title: &'static str,
    color: u32,
    fields: [EmbedField; 3],
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct EmbedField {
    name: &'static str,
    value: String,
    inline: bool,
}

impl From<&ChangeEvent> for WebhookPayload {
    fn from(event: &ChangeEvent) -> Self {
        Self {
            embeds: [Embed {
                title: EMBED_TITLE,
                color: EMBED_COLOR,
                fields: [
                    EmbedField {
                        name: "Old IP",
                        value: event.previous_or_unknown().to_string(),
                        inline: true,
                    },
                    EmbedField {
                        name: "New IP",
                        value: event.current.to_string(),
                        inline: true,
                    },
                    EmbedField {
                        name: "Time",
                        value: format_human(event.observed_at),
                        inline: false,
                    },
                ],
                timestamp: format_iso8601(event.observed_at),
            }],
        }
    }
}

/// Discord notification channel.
///
/// Posts one embed to each webhook URL. A failing URL is logged (masked)
/// and recorded; the remaining URLs are still attempted.
#[derive(Debug)]
pub struct DiscordChannel<H> {
    client: H,
    settings: DiscordSettings,
}

impl<H> DiscordChannel<H> {
    /// Creates a Discord channel.
    #[must_use]
    pub const fn new(client: H, settings: DiscordSettings) -> Self {
        Self { client, settings }
    }

    /// Returns the channel settings.
    #[must_use]
    pub const fn settings(&self) -> &DiscordSettings {
        &self.settings
    }
}

impl<H: HttpClient> DiscordChannel<H> {
    async fn send_to(
        &self,
        webhook_url: &str,
        payload: &WebhookPayload,
    ) -> Result<(), DeliveryError> {
        let url = url::Url::parse(webhook_url)
            .map_err(|e| DeliveryError::InvalidDestination(e.to_string()))?;

        let request = HttpRequest::post(url)
            .with_json(payload)
            .map_err(|e| DeliveryError::Message(e.to_string()))?;

        let response = self.client.request(request).await?;
        if response.is_success() {
            return Ok(());
        }

        Err(DeliveryError::NonSuccessStatus {
            status: response.status,
            body: response.body_text().map(ToString::to_string),
        })
    }
}

impl<H: HttpClient> Notifier for DiscordChannel<H> {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Discord
    }

    async fn notify(&self, event: &ChangeEvent) -> DeliveryReport {
        if self.settings.webhook_urls.is_empty() {
            tracing::info!("discord: skipped, {}", SkipReason::NoDestinations);
            return DeliveryReport::Skipped(SkipReason::NoDestinations);
        }

        let payload = WebhookPayload::from(event);
        let mut outcomes = Vec::with_capacity(self.settings.webhook_urls.len());

        for webhook_url in &self.settings.webhook_urls {
            let label = mask_secret(webhook_url);
            match self.send_to(webhook_url, &payload).await {
                Ok(()) => {
                    tracing::info!("discord: sent to webhook {label}");
                    outcomes.push(DestinationOutcome::delivered(label));
                }
                Err(e) => {
                    tracing::error!("discord: delivery to webhook {label} failed: {e}");
                    outcomes.push(DestinationOutcome::failed(label, e));
                }
            }
        }

        let report = DeliveryReport::Attempted(outcomes);
        tracing::info!("discord: {report}");
        report
    }
}

#[cfg(test)]
#[path = "discord_tests.rs"]
mod tests;
