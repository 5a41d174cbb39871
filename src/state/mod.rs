//! Last-known address persistence across restarts.
//!
//! This module provides the [`StateStore`] abstraction and a plain text
//! file implementation ([`FileStateStore`]).

mod file;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use file::FileStateStore;

use std::io;

use thiserror::Error;

use crate::address::Address;

/// Result of loading state from persistent storage.
///
/// Explicitly models all valid states to avoid ambiguity:
/// - Successfully loaded previous address
/// - No previous state exists (first run)
/// - State exists but is unreadable or blank
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadResult {
    /// Successfully loaded the previously confirmed address.
    Loaded(Address),

    /// No state file exists (first run or explicitly deleted).
    NotFound,

    /// State file exists but could not be used.
    /// The monitor continues as if no address was known and overwrites
    /// the file on the next confirmed change.
    Corrupted {
        /// Reason for corruption (for logging).
        reason: String,
    },
}

impl LoadResult {
    /// Returns the loaded address, or `None` for `NotFound`/`Corrupted`.
    #[must_use]
    pub fn into_address(self) -> Option<Address> {
        match self {
            Self::Loaded(address) => Some(address),
            Self::NotFound | Self::Corrupted { .. } => None,
        }
    }

    /// Returns `true` if state was successfully loaded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Errors that can occur while persisting state.
///
/// Only covers write-side errors; read-side issues are modeled
/// as [`LoadResult`] variants to allow graceful degradation.
#[derive(Debug, Error)]
pub enum StateError {
    /// Failed to write the state file.
    #[error("Failed to write state file: {0}")]
    Write(#[source] io::Error),

    /// The background write task did not complete.
    #[error("State write task failed: {0}")]
    Task(#[source] tokio::task::JoinError),
}

/// Abstraction for persisting the last confirmed address between runs.
///
/// The monitor loop is the only writer.
pub trait StateStore: Send + Sync {
    /// Loads the previously saved address.
    fn load(&self) -> LoadResult;

    /// Replaces the saved address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be written.
    fn save(
        &self,
        address: &Address,
    ) -> impl std::future::Future<Output = Result<(), StateError>> + Send;
}

/// Mock state store for testing.
///
/// Allows tests to inject specific load results, capture saved addresses
/// and simulate write failures.
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::RwLock;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// A mock implementation of [`StateStore`] for testing.
    #[derive(Debug)]
    pub struct MockStateStore {
        load_result: LoadResult,
        saved: RwLock<Vec<Address>>,
        fail_writes: AtomicBool,
    }

    impl MockStateStore {
        fn with_result(load_result: LoadResult) -> Self {
            Self {
                load_result,
                saved: RwLock::new(Vec::new()),
                fail_writes: AtomicBool::new(false),
            }
        }

        /// Creates a mock that returns `LoadResult::Loaded` with the given address.
        #[must_use]
        pub fn with_loaded(address: &str) -> Self {
            Self::with_result(LoadResult::Loaded(Address::new(address).unwrap()))
        }

        /// Creates a mock that returns `LoadResult::NotFound`.
        #[must_use]
        pub fn not_found() -> Self {
            Self::with_result(LoadResult::NotFound)
        }

        /// Creates a mock that returns `LoadResult::Corrupted`.
        #[must_use]
        pub fn corrupted(reason: impl Into<String>) -> Self {
            Self::with_result(LoadResult::Corrupted {
                reason: reason.into(),
            })
        }

        /// Makes every subsequent save fail.
        #[must_use]
        pub fn failing_writes(self) -> Self {
            self.fail_writes.store(true, Ordering::SeqCst);
            self
        }

        /// Returns every address saved so far, oldest first.
        #[must_use]
        pub fn saved(&self) -> Vec<Address> {
            self.saved.read().unwrap().clone()
        }
    }

    impl StateStore for MockStateStore {
        fn load(&self) -> LoadResult {
            self.load_result.clone()
        }

        async fn save(&self, address: &Address) -> Result<(), StateError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StateError::Write(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "read-only filesystem",
                )));
            }
            self.saved.write().unwrap().push(address.clone());
            Ok(())
        }
    }

    impl<T: StateStore> StateStore for std::sync::Arc<T> {
        fn load(&self) -> LoadResult {
            (**self).load()
        }

        fn save(
            &self,
            address: &Address,
        ) -> impl std::future::Future<Output = Result<(), StateError>> + Send {
            (**self).save(address)
        }
    }
}
