//! The external address value type.

use std::fmt;

use thiserror::Error;

/// Error returned when constructing an [`Address`] from blank text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Address must not be empty")]
pub struct EmptyAddress;

/// An externally visible network address as reported by a lookup service.
///
/// The value is opaque: IPv4 and IPv6 text are both accepted verbatim and
/// no semantic validation is performed beyond rejecting blank input.
/// Surrounding whitespace is trimmed; equality is exact string comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    /// Creates an address from text, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyAddress`] if the trimmed text is empty.
    pub fn new(text: impl AsRef<str>) -> Result<Self, EmptyAddress> {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EmptyAddress);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the address text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Address {
    type Err = EmptyAddress;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
