//! Fan-out of change events to the enabled notification channels.
//!
//! The [`Dispatcher`] invokes every channel exactly once per event, in
//! configured order, and isolates each channel from the others: a channel
//! that panics is recorded as [`DeliveryReport::Aborted`] and the remaining
//! channels still run.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::config::MonitorConfig;
use crate::monitor::ChangeEvent;
use crate::notify::{
    Channel, ChannelKind, DeliveryReport, DiscordChannel, EmailChannel, Notifier, TelegramChannel,
};


/// Per-channel reports for one change event, in dispatch order.
#[derive(Debug, Default)]
pub struct DispatchSummary {
    reports: Vec<(ChannelKind, DeliveryReport)>,
}

impl DispatchSummary {
    /// Returns the report of `kind`, if that channel was dispatched.
    #[must_use]
    pub fn report(&self, kind: ChannelKind) -> Option<&DeliveryReport> {
        self.reports
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, report)| report)
    }

    /// Iterates over `(channel, report)` pairs in dispatch order.
    pub fn iter(&self) -> impl Iterator<Item = &(ChannelKind, DeliveryReport)> {
        self.reports.iter()
    }

    /// Number of channels dispatched.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Returns true if no channel was dispatched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Number of channels that failed or aborted for at least one destination.
    #[must_use]
    pub fn failed_channels(&self) -> usize {
        self.reports.iter().filter(|(_, r)| r.has_failures()).count()
    }
}

/// Invokes each enabled channel once per change event.
#[derive(Debug)]
pub struct Dispatcher<N> {
    channels: Vec<N>,
}

impl<N> Dispatcher<N> {
    /// Creates a dispatcher over `channels`, invoked in the given order.
    #[must_use]
    pub const fn new(channels: Vec<N>) -> Self {
        Self { channels }
    }

    /// Returns the channels in dispatch order.
    #[must_use]
    pub fn channels(&self) -> &[N] {
        &self.channels
    }
}

impl<H: Clone, M: Clone> Dispatcher<Channel<H, M>> {
    /// Builds one channel per enabled notification method.
    ///
    /// `notification_methods` is already deduplicated by config validation.
    #[must_use]
    pub fn from_config(config: &MonitorConfig, client: H, mailer: M) -> Self {
        let channels = config
            .notification_methods
            .iter()
            .map(|kind| match kind {
                ChannelKind::Email => {
                    Channel::Email(EmailChannel::new(config.email.clone(), mailer.clone()))
                }
                ChannelKind::Telegram => Channel::Telegram(TelegramChannel::new(
                    client.clone(),
                    config.telegram.clone(),
                )),
                ChannelKind::Discord => {
                    Channel::Discord(DiscordChannel::new(client.clone(), config.discord.clone()))
                }
            })
            .collect();

        Self::new(channels)
    }
}

impl<N: Notifier> Dispatcher<N> {
    /// Delivers `event` through every channel and collects their reports.
    ///
    /// Never fails and never stops early.
    pub async fn dispatch(&self, event: &ChangeEvent) -> DispatchSummary {
        let mut reports = Vec::with_capacity(self.channels.len());

        for channel in &self.channels {
            let kind = channel.kind();
            let report = match AssertUnwindSafe(channel.notify(event)).catch_unwind().await {
                Ok(report) => report,
                Err(payload) => {
                    let reason = panic_message(payload.as_ref());
                    tracing::error!("{kind}: channel panicked: {reason}");
                    DeliveryReport::Aborted(reason)
                }
            };
            reports.push((kind, report));
        }

        let summary = DispatchSummary { reports };
        tracing::debug!(
            "Dispatched change to {} channel(s), {} with failures",
            summary.len(),
            summary.failed_channels()
        );
        summary
    }
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
