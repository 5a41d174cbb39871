//! Error types for HTTP operations.

use thiserror::Error;

/// Error type for a single HTTP exchange.
///
/// Callers treat every variant as a transient failure of one upstream:
/// the resolver moves on to the next service, a channel moves on to the
/// next destination.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// Includes DNS resolution failures, refused connections, TLS errors
    /// and body read failures. The wrapped error never contains the URL.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The upstream did not answer within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The request could not be built (malformed URL or header).
    #[error("Invalid request: {0}")]
    InvalidUrl(String),
}
