//! ipwatch: public IP change monitor
//!
//! A library for periodically determining the host's external address via
//! public lookup services and notifying email, Telegram and Discord
//! destinations when it changes.

pub mod address;
pub mod config;
pub mod dispatch;
pub mod http;
pub mod monitor;
pub mod notify;
pub mod resolver;
pub mod state;
pub mod time;
