//! Error types for address resolution.

use std::fmt;

use thiserror::Error;

use crate::http::HttpError;

/// Why a single lookup service could not provide an address.
///
/// Every variant is a soft failure: the resolver logs it and moves on.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request itself failed (connection, timeout, bad URL).
    #[error(transparent)]
    Transport(#[from] HttpError),

    /// The service answered with a non-2xx status.
    #[error("Unexpected status {0}")]
    Status(http::StatusCode),

    /// The body was not valid JSON.
    #[error("Unparseable body: {0}")]
    InvalidBody(#[source] serde_json::Error),

    /// The body parsed but none of the known fields held an address.
    #[error("Unrecognized response shape")]
    UnrecognizedShape,
}

/// A service failure tagged with the service that produced it.
#[derive(Debug)]
pub struct ServiceFailure {
    /// The service URL.
    pub service: String,
    /// What went wrong.
    pub error: ServiceError,
}

impl fmt::Display for ServiceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.service, self.error)
    }
}

/// Error type for [`super::AddressSource::resolve`].
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Every configured service failed.
    #[error("All {} address lookup services failed: {}", failures.len(), join(failures))]
    Exhausted {
        /// One entry per service, in query order.
        failures: Vec<ServiceFailure>,
    },
}

impl ResolveError {
    /// Returns the per-service failures that led to this error.
    #[must_use]
    pub fn failures(&self) -> &[ServiceFailure] {
        match self {
            Self::Exhausted { failures } => failures,
        }
    }
}

fn join(failures: &[ServiceFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
