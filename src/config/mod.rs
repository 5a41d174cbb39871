//! Configuration layer for ipwatch.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`FileConfig`])
//! - Validated configuration ([`MonitorConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - including their environment variables
//!    (`IPWATCH_SMTP_PASSWORD`, `IPWATCH_TELEGRAM_TOKEN`)
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! # Leniency
//!
//! The monitor should keep running on a bad configuration rather than not
//! start at all. A malformed file, an unknown channel name or an out of
//! range number is logged as a warning and replaced by its default. Unknown
//! keys are ignored. A missing file is created from the commented template.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command};
pub use error::ConfigError;
pub use toml::{
    ChatId, DiscordSection, EmailSection, FileConfig, ResolverSection, TelegramSection,
    default_config_template,
};
pub use validated::{MonitorConfig, write_default_config};
