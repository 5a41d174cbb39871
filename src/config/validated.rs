//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final configuration used by the application.
//! Validation never aborts: an invalid value is logged and replaced by its
//! default.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::notify::{ChannelKind, DiscordSettings, EmailSettings, TelegramSettings};
use crate::resolver::{ResolverService, default_services};

use super::cli::Cli;
use super::defaults;
use super::error::ConfigError;
use super::toml::{ChatId, FileConfig};

/// Fully validated configuration ready for use by the application.
///
/// Loaded once at startup and never changed afterwards.
///
/// # Construction
///
/// Use [`MonitorConfig::load`] to read the file named on the command line,
/// or [`MonitorConfig::from_raw`] to merge already-parsed sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Wait between successful checks
    pub check_interval: Duration,

    /// Enabled channels in dispatch order, without duplicates
    pub notification_methods: Vec<ChannelKind>,

    /// Path to the file holding the last confirmed address
    pub state_file: PathBuf,

    /// Email channel settings
    pub email: EmailSettings,

    /// Telegram channel settings
    pub telegram: TelegramSettings,

    /// Discord channel settings
    pub discord: DiscordSettings,

    /// Lookup services in query order
    pub resolver_services: Vec<ResolverService>,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            check_interval: defaults::check_interval(),
            notification_methods: parse_methods(defaults::NOTIFICATION_METHODS),
            state_file: PathBuf::from(defaults::STATE_FILE),
            email: EmailSettings::default(),
            telegram: TelegramSettings::default(),
            discord: DiscordSettings::default(),
            resolver_services: default_services(),
            verbose: false,
        }
    }
}

impl fmt::Display for MonitorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let methods: Vec<&str> = self
            .notification_methods
            .iter()
            .map(|kind| kind.as_str())
            .collect();

        write!(
            f,
            "Config {{ check_interval: {}s, notification_methods: [{}], state_file: {}, \
             telegram_chats: {}, discord_webhooks: {}, resolver_services: {} }}",
            self.check_interval.as_secs(),
            methods.join(", "),
            self.state_file.display(),
            self.telegram.chat_ids.len(),
            self.discord.webhook_urls.len(),
            self.resolver_services.len(),
        )
    }
}

impl MonitorConfig {
    /// Creates a configuration from CLI arguments and an optional parsed file.
    ///
    /// CLI arguments (and their environment variables) take precedence over
    /// file values, which take precedence over built-in defaults.
    #[must_use]
    pub fn from_raw(cli: &Cli, file: Option<&FileConfig>) -> Self {
        for key in file.iter().flat_map(|f| &f.invalid_keys) {
            tracing::warn!("Ignoring invalid value for '{key}' in config file");
        }

        Self {
            check_interval: Self::resolve_check_interval(cli, file),
            notification_methods: Self::resolve_methods(file),
            state_file: Self::resolve_state_file(cli, file),
            email: Self::resolve_email(cli, file),
            telegram: Self::resolve_telegram(cli, file),
            discord: Self::resolve_discord(file),
            resolver_services: Self::resolve_services(file),
            verbose: cli.verbose,
        }
    }

    /// Loads and merges configuration from CLI and the config file.
    ///
    /// A missing file is created from [`super::default_config_template`].
    /// An unreadable or malformed file is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns an error only if a missing file cannot be created.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let path = &cli.config;

        let file = match FileConfig::load(path) {
            Ok(file) => Some(file),
            Err(e) if e.is_not_found() => {
                write_default_config(path)?;
                tracing::info!("Created default configuration at {}", path.display());
                None
            }
            Err(e) => {
                tracing::warn!("{e}; using default configuration");
                None
            }
        };

        Ok(Self::from_raw(cli, file.as_ref()))
    }

    fn resolve_check_interval(cli: &Cli, file: Option<&FileConfig>) -> Duration {
        // Priority: CLI explicit > TOML > default
        let seconds = cli
            .check_interval
            .map(|s| i64::try_from(s).unwrap_or(i64::MAX))
            .or_else(|| file.and_then(|f| f.check_interval));

        match seconds {
            None => defaults::check_interval(),
            Some(s) if s >= 1 => Duration::from_secs(s.unsigned_abs()),
            Some(s) => {
                tracing::warn!(
                    "Invalid check_interval {s} (must be at least 1), using {}s",
                    defaults::CHECK_INTERVAL_SECS
                );
                defaults::check_interval()
            }
        }
    }

    fn resolve_methods(file: Option<&FileConfig>) -> Vec<ChannelKind> {
        match file.and_then(|f| f.notification_methods.as_deref()) {
            Some(names) => parse_methods(names),
            None => parse_methods(defaults::NOTIFICATION_METHODS),
        }
    }

    fn resolve_state_file(cli: &Cli, file: Option<&FileConfig>) -> PathBuf {
        // CLI takes precedence
        if let Some(ref path) = cli.state_file {
            return path.clone();
        }

        file.and_then(|f| non_blank(f.state_file.as_deref()))
            .map_or_else(|| PathBuf::from(defaults::STATE_FILE), PathBuf::from)
    }

    fn resolve_email(cli: &Cli, file: Option<&FileConfig>) -> EmailSettings {
        let section = file.map(|f| &f.email);
        let mut email = EmailSettings::default();

        if let Some(server) = section.and_then(|s| non_blank(s.smtp_server.as_deref())) {
            email.smtp_server = server.to_string();
        }

        if let Some(port) = section.and_then(|s| s.smtp_port) {
            match u16::try_from(port) {
                Ok(port) if port > 0 => email.smtp_port = port,
                _ => tracing::warn!(
                    "Invalid email.smtp_port {port}, using {}",
                    defaults::SMTP_PORT
                ),
            }
        }

        if let Some(sender) = section.and_then(|s| s.sender_email.as_deref()) {
            email.sender_email = sender.trim().to_string();
        }

        if let Some(password) = cli
            .smtp_password
            .as_deref()
            .or_else(|| section.and_then(|s| s.sender_password.as_deref()))
        {
            email.sender_password = password.to_string();
        }

        if let Some(recipient) = section.and_then(|s| s.recipient_email.as_deref()) {
            email.recipient_email = recipient.trim().to_string();
        }

        email
    }

    fn resolve_telegram(cli: &Cli, file: Option<&FileConfig>) -> TelegramSettings {
        let section = file.map(|f| &f.telegram);
        let mut telegram = TelegramSettings::default();

        if let Some(token) = cli
            .telegram_token
            .as_deref()
            .or_else(|| section.and_then(|s| s.bot_token.as_deref()))
        {
            telegram.bot_token = token.trim().to_string();
        }

        if let Some(section) = section {
            let ids = section.chat_ids.iter().chain(section.chat_id.as_ref());
            telegram.chat_ids = dedupe(ids.map(ChatId::to_string));

            if let Some(base) = non_blank(section.api_base.as_deref()) {
                if url::Url::parse(base).is_ok() {
                    telegram.api_base = base.to_string();
                } else {
                    tracing::warn!(
                        "Invalid telegram.api_base '{base}', using {}",
                        defaults::TELEGRAM_API_BASE
                    );
                }
            }
        }

        telegram
    }

    fn resolve_discord(file: Option<&FileConfig>) -> DiscordSettings {
        let Some(section) = file.map(|f| &f.discord) else {
            return DiscordSettings::default();
        };

        let urls = section
            .webhook_urls
            .iter()
            .chain(section.webhook_url.as_ref())
            .map(|u| u.trim().to_string());

        DiscordSettings {
            webhook_urls: dedupe(urls),
        }
    }

    fn resolve_services(file: Option<&FileConfig>) -> Vec<ResolverService> {
        let configured = file.map_or(&[][..], |f| f.resolver.services.as_slice());
        if configured.is_empty() {
            return default_services();
        }

        let services: Vec<ResolverService> = configured
            .iter()
            .filter_map(|raw| match ResolverService::parse(raw.trim()) {
                Ok(service) => Some(service),
                Err(e) => {
                    tracing::warn!("Ignoring invalid lookup service '{raw}': {e}");
                    None
                }
            })
            .collect();

        if services.is_empty() {
            tracing::warn!("No usable lookup services configured, using built-in list");
            return default_services();
        }

        services
    }
}

/// Writes the default configuration template to a file.
///
/// Parent directories are created as needed.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let to_error = |source| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(to_error)?;
    }

    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(to_error)
}

// Helper functions

/// Parses channel names, dropping unknown names and repeats.
fn parse_methods<S: AsRef<str>>(names: &[S]) -> Vec<ChannelKind> {
    let mut methods = Vec::new();

    for name in names {
        match name.as_ref().parse::<ChannelKind>() {
            Ok(kind) if !methods.contains(&kind) => methods.push(kind),
            Ok(_) => {}
            Err(e) => tracing::warn!("{e}, ignoring"),
        }
    }

    methods
}

/// Drops blank entries and repeats, keeping first occurrences in order.
fn dedupe(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();

    for value in values {
        if !value.is_empty() && !unique.contains(&value) {
            unique.push(value);
        }
    }

    unique
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
