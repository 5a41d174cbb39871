//! The monitor loop state machine.

use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;

use crate::address::Address;
use crate::config::defaults;
use crate::dispatch::{DispatchSummary, Dispatcher, panic_message};
use crate::notify::Notifier;
use crate::resolver::AddressSource;
use crate::state::{LoadResult, StateStore};
use crate::time::{Clock, SystemClock};

use super::{ChangeEvent, CycleError, detect_change};

/// Where the loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// Constructed, persisted address not loaded yet.
    Idle,
    /// Querying the lookup services.
    Resolving,
    /// Comparing the resolved address with the last confirmed one.
    Comparing,
    /// Handing a change event to the channels.
    Dispatching,
    /// Writing the new address to durable state.
    Persisting,
    /// Waiting for the next check.
    Sleeping(Duration),
    /// Waiting after a failed cycle.
    Backoff(Duration),
}

impl fmt::Display for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Resolving => f.write_str("resolving"),
            Self::Comparing => f.write_str("comparing"),
            Self::Dispatching => f.write_str("dispatching"),
            Self::Persisting => f.write_str("persisting"),
            Self::Sleeping(d) => write!(f, "sleeping {}s", d.as_secs()),
            Self::Backoff(d) => write!(f, "backoff {}s", d.as_secs()),
        }
    }
}

/// Result of one Resolving → ... → wait step.
#[derive(Debug)]
pub enum CycleOutcome {
    /// The resolved address equals the last confirmed one.
    Unchanged(Address),
    /// The address changed; the event was dispatched and persisted.
    Changed {
        /// The dispatched event.
        event: ChangeEvent,
        /// Per-channel delivery reports.
        summary: DispatchSummary,
        /// Whether the state write succeeded.
        persisted: bool,
    },
    /// Resolution failed; the loop backs off.
    Failed(CycleError),
}

impl CycleOutcome {
    /// Returns true if the cycle dispatched a change.
    #[must_use]
    pub const fn is_changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }

    /// Returns true if the cycle failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Counters accumulated over the lifetime of a loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Cycles started
    pub cycles: u64,
    /// Changes dispatched
    pub changes: u64,
    /// Cycles that ended in backoff
    pub failures: u64,
}

/// Periodically resolves the external address and notifies on change.
///
/// Owns the only mutable state in the program: the last confirmed address.
/// A change is dispatched whenever the resolved address differs from it,
/// and the new address is persisted and cached afterwards regardless of
/// delivery outcome.
///
/// # Type Parameters
///
/// * `R` - The [`AddressSource`] used to resolve the current address
/// * `S` - The [`StateStore`] holding the address across restarts
/// * `N` - The [`Notifier`] channels behind the [`Dispatcher`]
/// * `C` - The [`Clock`] stamping change events (defaults to [`SystemClock`])
pub struct MonitorLoop<R, S, N, C = SystemClock> {
    resolver: R,
    store: S,
    dispatcher: Dispatcher<N>,
    clock: C,
    check_interval: Duration,
    backoff: Duration,
    last_known: Option<Address>,
    state: MonitorState,
    stats: LoopStats,
}

impl<R, S, N> MonitorLoop<R, S, N, SystemClock> {
    /// Creates a loop using the system clock.
    #[must_use]
    pub const fn new(
        resolver: R,
        store: S,
        dispatcher: Dispatcher<N>,
        check_interval: Duration,
    ) -> Self {
        Self::with_clock(resolver, store, dispatcher, SystemClock, check_interval)
    }
}

impl<R, S, N, C> MonitorLoop<R, S, N, C> {
    /// Creates a loop with a custom clock.
    #[must_use]
    pub const fn with_clock(
        resolver: R,
        store: S,
        dispatcher: Dispatcher<N>,
        clock: C,
        check_interval: Duration,
    ) -> Self {
        Self {
            resolver,
            store,
            dispatcher,
            clock,
            check_interval,
            backoff: defaults::backoff(),
            last_known: None,
            state: MonitorState::Idle,
            stats: LoopStats {
                cycles: 0,
                changes: 0,
                failures: 0,
            },
        }
    }

    /// Overrides the wait after a failed cycle.
    #[must_use]
    pub const fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> MonitorState {
        self.state
    }

    /// Returns the last confirmed address, if any.
    #[must_use]
    pub const fn last_known(&self) -> Option<&Address> {
        self.last_known.as_ref()
    }

    /// Returns the counters so far.
    #[must_use]
    pub const fn stats(&self) -> LoopStats {
        self.stats
    }

    /// Returns the dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher<N> {
        &self.dispatcher
    }

    fn transition(&mut self, next: MonitorState) {
        tracing::debug!("Monitor: {} -> {next}", self.state);
        self.state = next;
    }
}

impl<R, S, N, C> MonitorLoop<R, S, N, C>
where
    R: AddressSource,
    S: StateStore,
    N: Notifier,
    C: Clock,
{
    /// Loads the persisted address into the loop's cache.
    ///
    /// A missing or unreadable state file leaves the cache empty, so the
    /// first resolved address is reported as a change.
    pub fn load_state(&mut self) {
        self.last_known = match self.store.load() {
            LoadResult::Loaded(address) => {
                tracing::info!("Last known address: {address}");
                Some(address)
            }
            LoadResult::NotFound => {
                tracing::info!("No previous address found, starting fresh");
                None
            }
            LoadResult::Corrupted { reason } => {
                tracing::warn!("State file unusable ({reason}), will overwrite on next change");
                None
            }
        };
        self.transition(MonitorState::Sleeping(Duration::ZERO));
    }

    /// Runs one cycle: resolve, compare, and on change dispatch and persist.
    ///
    /// Leaves the loop in [`MonitorState::Sleeping`] or
    /// [`MonitorState::Backoff`] with the delay before the next cycle.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        self.stats.cycles += 1;
        self.transition(MonitorState::Resolving);

        let current = match self.resolve_guarded().await {
            Ok(address) => address,
            Err(e) => {
                tracing::error!("Address check failed: {e}");
                self.stats.failures += 1;
                self.transition(MonitorState::Backoff(self.backoff));
                return CycleOutcome::Failed(e);
            }
        };

        self.transition(MonitorState::Comparing);
        let Some(event) = detect_change(self.last_known.as_ref(), &current, self.clock.now()) else {
            tracing::debug!("Address unchanged: {current}");
            self.transition(MonitorState::Sleeping(self.check_interval));
            return CycleOutcome::Unchanged(current);
        };

        tracing::info!(
            "Public IP changed: {} -> {}",
            event.previous_or_unknown(),
            event.current
        );

        self.transition(MonitorState::Dispatching);
        let summary = self.dispatcher.dispatch(&event).await;

        self.transition(MonitorState::Persisting);
        let persisted = match self.store.save(&event.current).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to save state: {e}");
                false
            }
        };
        self.last_known = Some(event.current.clone());
        self.stats.changes += 1;

        self.transition(MonitorState::Sleeping(self.check_interval));
        CycleOutcome::Changed {
            event,
            summary,
            persisted,
        }
    }

    /// Runs cycles until `shutdown` resolves and returns the counters.
    ///
    /// `shutdown` is raced against every wait, so it takes effect between
    /// cycles without waiting out the check interval. A cycle in progress
    /// always completes.
    pub async fn run<F>(&mut self, shutdown: F) -> LoopStats
    where
        F: Future<Output = ()>,
    {
        if self.state == MonitorState::Idle {
            self.load_state();
        }

        tracing::info!(
            "Checking public IP every {}s",
            self.check_interval.as_secs()
        );

        tokio::pin!(shutdown);

        loop {
            let delay = match self.state {
                MonitorState::Sleeping(d) | MonitorState::Backoff(d) => d,
                _ => Duration::ZERO,
            };

            tokio::select! {
                biased;

                () = &mut shutdown => {
                    tracing::info!("Shutdown signal received, stopping...");
                    break;
                }

                () = tokio::time::sleep(delay) => {}
            }

            self.run_cycle().await;
        }

        tracing::info!(
            "Monitor stopped after {} cycle(s): {} change(s), {} failure(s)",
            self.stats.cycles,
            self.stats.changes,
            self.stats.failures
        );
        self.stats
    }

    /// Resolves the address, converting a resolver panic into an error.
    async fn resolve_guarded(&self) -> Result<Address, CycleError> {
        match AssertUnwindSafe(self.resolver.resolve()).catch_unwind().await {
            Ok(result) => result.map_err(CycleError::from),
            Err(payload) => Err(CycleError::Panicked(panic_message(payload.as_ref()))),
        }
    }
}

impl<R, S, N, C> fmt::Debug for MonitorLoop<R, S, N, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorLoop")
            .field("check_interval", &self.check_interval)
            .field("backoff", &self.backoff)
            .field("last_known", &self.last_known)
            .field("state", &self.state)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
