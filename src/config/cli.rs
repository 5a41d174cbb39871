//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use super::defaults;

/// ipwatch: public IP change monitor
///
/// Periodically determines this host's external address and notifies
/// email, Telegram and Discord destinations when it changes.
#[derive(Debug, Parser)]
#[command(name = "ipwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run (default: monitor until stopped)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file (created from a template if absent)
    #[arg(
        long,
        short,
        global = true,
        env = "IPWATCH_CONFIG",
        default_value = defaults::CONFIG_FILE
    )]
    pub config: PathBuf,

    /// Path to the file holding the last confirmed address
    #[arg(long = "state-file", global = true)]
    pub state_file: Option<PathBuf>,

    /// Seconds between checks
    #[arg(long = "check-interval", global = true)]
    pub check_interval: Option<u64>,

    /// SMTP password for the email channel
    #[arg(long = "smtp-password", env = "IPWATCH_SMTP_PASSWORD", hide_env_values = true)]
    pub smtp_password: Option<String>,

    /// Telegram bot token
    #[arg(long = "telegram-token", env = "IPWATCH_TELEGRAM_TOKEN", hide_env_values = true)]
    pub telegram_token: Option<String>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// File that log lines are appended to, in addition to stderr
    #[arg(long = "log-file", global = true, default_value = defaults::LOG_FILE)]
    pub log_file: PathBuf,

    /// Log to stderr only
    #[arg(long = "no-log-file", global = true)]
    pub no_log_file: bool,

    /// Resolve the external address once, print it and exit (same as `check`)
    #[arg(long = "check-ip")]
    pub check_ip: bool,
}

/// Subcommands for ipwatch
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve the external address once, print it and exit
    #[command(alias = "check-ip")]
    Check,

    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = defaults::CONFIG_FILE)]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }

    /// Returns true if this is the one-shot check command or flag.
    #[must_use]
    pub const fn is_check(&self) -> bool {
        self.check_ip || matches!(self.command, Some(Command::Check))
    }

    /// Returns the log file path, or `None` if file logging is disabled.
    #[must_use]
    pub fn log_file(&self) -> Option<&Path> {
        (!self.no_log_file).then_some(self.log_file.as_path())
    }
}
