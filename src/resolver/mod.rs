//! External address resolution.
//!
//! This module provides:
//! - Lookup service descriptors and the default service list ([`ResolverService`])
//! - The resolution abstraction ([`AddressSource`])
//! - The HTTP implementation with ordered fallthrough ([`HttpResolver`])

mod error;
mod lookup;
mod service;


pub use error::{ResolveError, ServiceError, ServiceFailure};
pub use lookup::{AddressSource, HttpResolver};
pub use service::{KNOWN_FIELDS, ResolverService, default_services};
