//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default configuration file path.
pub const CONFIG_FILE: &str = "ipwatch.toml";

/// Default state file path.
pub const STATE_FILE: &str = "current_ip.txt";

/// Default log file, appended to alongside stderr output.
pub const LOG_FILE: &str = "ip_monitor.log";

/// Default check interval in seconds.
pub const CHECK_INTERVAL_SECS: u64 = 300;

/// Wait after a failed check, in seconds.
pub const BACKOFF_SECS: u64 = 60;

/// Timeout for every outbound network call, in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// Channels enabled when the configuration names none.
pub const NOTIFICATION_METHODS: &[&str] = &["discord"];

/// Default SMTP server.
pub const SMTP_SERVER: &str = "smtp.gmail.com";

/// Default SMTP submission port (STARTTLS).
pub const SMTP_PORT: u16 = 587;

/// Default Telegram Bot API base URL.
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Default check interval as Duration.
#[must_use]
pub const fn check_interval() -> Duration {
    Duration::from_secs(CHECK_INTERVAL_SECS)
}

/// Backoff after a failed check as Duration.
#[must_use]
pub const fn backoff() -> Duration {
    Duration::from_secs(BACKOFF_SECS)
}

/// Network timeout as Duration.
#[must_use]
pub const fn http_timeout() -> Duration {
    Duration::from_secs(HTTP_TIMEOUT_SECS)
}
