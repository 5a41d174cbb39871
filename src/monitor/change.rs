//! Address change detection types and functions.

use std::time::SystemTime;

use crate::address::Address;

/// An observed transition of the external address.
///
/// Immutable unit handed to the dispatcher. `previous` is `None` when no
/// address was known before (first run, or unreadable state file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// The last confirmed address, if any.
    pub previous: Option<Address>,
    /// The newly resolved address.
    pub current: Address,
    /// When the change was observed.
    pub observed_at: SystemTime,
}

impl ChangeEvent {
    /// Creates a new change event.
    #[must_use]
    pub const fn new(previous: Option<Address>, current: Address, observed_at: SystemTime) -> Self {
        Self {
            previous,
            current,
            observed_at,
        }
    }

    /// Returns true if no address was known before this change.
    #[must_use]
    pub const fn is_first_observation(&self) -> bool {
        self.previous.is_none()
    }

    /// Returns the previous address text, or `"unknown"`.
    #[must_use]
    pub fn previous_or_unknown(&self) -> &str {
        self.previous.as_ref().map_or("unknown", Address::as_str)
    }
}

/// Compares a freshly resolved address with the last confirmed one.
///
/// Pure function: returns a [`ChangeEvent`] stamped with `timestamp` if the
/// addresses differ (including the transition from no address to some
/// address), `None` otherwise.
#[must_use]
pub fn detect_change(
    previous: Option<&Address>,
    current: &Address,
    timestamp: SystemTime,
) -> Option<ChangeEvent> {
    if previous == Some(current) {
        return None;
    }
    Some(ChangeEvent::new(
        previous.cloned(),
        current.clone(),
        timestamp,
    ))
}
