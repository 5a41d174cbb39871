//! Error types for the monitor layer.

use thiserror::Error;

use crate::resolver::ResolveError;

/// Error type for a failed monitor cycle.
///
/// Either variant sends the loop into backoff. Everything else that can
/// go wrong in a cycle (channel failures, state write failures) is
/// absorbed where it happens.
#[derive(Debug, Error)]
pub enum CycleError {
    /// Every lookup service failed.
    #[error(transparent)]
    Resolution(#[from] ResolveError),

    /// The resolver panicked; the panic was caught.
    #[error("Address resolution panicked: {0}")]
    Panicked(String),
}
