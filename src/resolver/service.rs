//! Lookup service descriptors.

use serde_json::Value;

use crate::address::Address;

/// JSON keys that may hold the address, probed in this order.
///
/// A service answering with any other shape is skipped.
pub const KNOWN_FIELDS: &[&str] = &["ip", "origin", "query"];

/// Default lookup services, queried in this order.
const DEFAULT_SERVICE_URLS: &[&str] = &[
    "https://api.ipify.org?format=json",
    "https://httpbin.org/ip",
    "https://api.myip.com",
    "https://ipapi.co/json",
];

/// One external address lookup service.
///
/// Immutable after construction; the resolver queries services in the
/// order they were configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverService {
    url: url::Url,
    fields: &'static [&'static str],
}

impl ResolverService {
    /// Creates a service that is probed with [`KNOWN_FIELDS`].
    #[must_use]
    pub const fn new(url: url::Url) -> Self {
        Self {
            url,
            fields: KNOWN_FIELDS,
        }
    }

    /// Parses the service URL.
    ///
    /// # Errors
    ///
    /// Returns the parse error if `url` is not an absolute URL.
    pub fn parse(url: &str) -> Result<Self, url::ParseError> {
        url::Url::parse(url).map(Self::new)
    }

    /// Returns the service URL.
    #[must_use]
    pub const fn url(&self) -> &url::Url {
        &self.url
    }

    /// Extracts the address from a parsed response body.
    ///
    /// Returns the first known field holding a non-blank string; `None`
    /// means the shape is not recognized.
    #[must_use]
    pub fn extract(&self, body: &Value) -> Option<Address> {
        self.fields
            .iter()
            .filter_map(|field| body.get(field).and_then(Value::as_str))
            .find_map(|text| Address::new(text).ok())
    }
}

/// Returns the built-in service list.
#[must_use]
pub fn default_services() -> Vec<ResolverService> {
    DEFAULT_SERVICE_URLS
        .iter()
        .filter_map(|url| ResolverService::parse(url).ok())
        .collect()
}
