//! HTTP transport shared by the resolver and the notification channels.
//!
//! This module provides:
//! - Value-typed requests and responses ([`HttpRequest`], [`HttpResponse`])
//! - The client abstraction ([`HttpClient`])
//! - The production client with a bounded timeout ([`ReqwestClient`])

mod client;
mod error;
mod request;

#[cfg(test)]
pub mod mock;
#[cfg(test)]
mod request_tests;

pub use client::ReqwestClient;
pub use error::HttpError;
pub use request::{HttpClient, HttpRequest, HttpResponse};
