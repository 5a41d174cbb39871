//! Time abstraction for testability.
//!
//! This module provides a [`Clock`] trait that allows injecting fixed
//! clocks in tests while using the real system clock in production, plus
//! the timestamp formats used in notification messages.

use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};

/// Abstraction over system time for testability.
///
/// # Example
///
/// ```
/// use ipwatch::time::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let now = clock.now();
/// assert!(now >= std::time::SystemTime::UNIX_EPOCH);
/// ```
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> SystemTime;
}

/// Production clock using actual system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Formats a time for human-readable message bodies,
/// e.g. `2024-03-01 12:30:00 UTC`.
#[must_use]
pub fn format_human(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string()
}

/// Formats a time as ISO-8601 / RFC 3339, e.g. `2024-03-01T12:30:00Z`.
#[must_use]
pub fn format_iso8601(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Clock fixed at a given instant, for tests.
#[cfg(test)]
pub mod mock {
    use super::Clock;
    use std::time::{Duration, SystemTime};

    /// A clock that always returns the same instant.
    #[derive(Debug, Clone, Copy)]
    pub struct FixedClock(pub SystemTime);

    impl FixedClock {
        /// Creates a clock at `secs` seconds after the Unix epoch.
        #[must_use]
        pub fn at_secs(secs: u64) -> Self {
            Self(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> SystemTime {
            self.0
        }
    }
}
