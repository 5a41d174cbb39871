//! TOML configuration file parsing.
//!
//! The file is read into a [`toml::Table`] and each key is extracted on its
//! own. A value of the wrong type is dropped and its dotted path recorded in
//! [`FileConfig::invalid_keys`], so one typo never discards the rest of the
//! file. Unknown keys are ignored; range checks happen later in
//! [`super::MonitorConfig::from_raw`].

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use toml::Table;

use super::ConfigError;

/// Root configuration structure from the TOML file.
#[derive(Debug, Default)]
pub struct FileConfig {
    /// Seconds between checks
    pub check_interval: Option<i64>,

    /// Enabled channels, in dispatch order
    pub notification_methods: Option<Vec<String>>,

    /// Path of the file holding the last confirmed address
    pub state_file: Option<String>,

    /// Email channel section
    pub email: EmailSection,

    /// Telegram channel section
    pub telegram: TelegramSection,

    /// Discord channel section
    pub discord: DiscordSection,

    /// Lookup service section
    pub resolver: ResolverSection,

    /// Dotted paths of keys whose values had the wrong type
    pub invalid_keys: Vec<String>,
}

/// Email channel section.
#[derive(Debug, Default)]
pub struct EmailSection {
    /// SMTP server host name
    pub smtp_server: Option<String>,
    /// SMTP port
    pub smtp_port: Option<i64>,
    /// Sender address
    pub sender_email: Option<String>,
    /// Sender credential
    pub sender_password: Option<String>,
    /// Recipient address (defaults to the sender)
    pub recipient_email: Option<String>,
}

/// A Telegram chat identifier, written as a string or an integer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ChatId {
    /// Numeric id, e.g. `-1001234567890`
    Number(i64),
    /// Text id, e.g. `"@channelname"`
    Text(String),
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s.trim()),
        }
    }
}

/// Telegram channel section.
#[derive(Debug, Default)]
pub struct TelegramSection {
    /// Bot API token
    pub bot_token: Option<String>,
    /// Chat ids, notified in order
    pub chat_ids: Vec<ChatId>,
    /// Single chat id (appended to `chat_ids`)
    pub chat_id: Option<ChatId>,
    /// Bot API base URL
    pub api_base: Option<String>,
}

/// Discord channel section.
#[derive(Debug, Default)]
pub struct DiscordSection {
    /// Webhook URLs, notified in order
    pub webhook_urls: Vec<String>,
    /// Single webhook URL (appended to `webhook_urls`)
    pub webhook_url: Option<String>,
}

/// Lookup service section.
#[derive(Debug, Default)]
pub struct ResolverSection {
    /// Lookup service URLs, replacing the built-in list
    pub services: Vec<String>,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TomlParse`] if the document is not valid TOML.
    /// Values of the wrong type are not errors; see [`Self::invalid_keys`].
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let table: Table =
            toml::from_str(content).map_err(|e| ConfigError::toml_parse(&e, content))?;

        let mut invalid_keys = Vec::new();
        let mut root = Fields::root(&table, &mut invalid_keys);

        let check_interval = root.value("check_interval");
        let notification_methods = root.value("notification_methods");
        let state_file = root.value("state_file");
        let email = EmailSection::read(&mut root.section("email"));
        let telegram = TelegramSection::read(&mut root.section("telegram"));
        let discord = DiscordSection::read(&mut root.section("discord"));
        let resolver = ResolverSection {
            services: root.section("resolver").list("services"),
        };

        Ok(Self {
            check_interval,
            notification_methods,
            state_file,
            email,
            telegram,
            discord,
            resolver,
            invalid_keys,
        })
    }
}

impl EmailSection {
    fn read(fields: &mut Fields<'_>) -> Self {
        Self {
            smtp_server: fields.value("smtp_server"),
            smtp_port: fields.value("smtp_port"),
            sender_email: fields.value("sender_email"),
            sender_password: fields.value("sender_password"),
            recipient_email: fields.value("recipient_email"),
        }
    }
}

impl TelegramSection {
    fn read(fields: &mut Fields<'_>) -> Self {
        Self {
            bot_token: fields.value("bot_token"),
            chat_ids: fields.list("chat_ids"),
            chat_id: fields.value("chat_id"),
            api_base: fields.value("api_base"),
        }
    }
}

impl DiscordSection {
    fn read(fields: &mut Fields<'_>) -> Self {
        Self {
            webhook_urls: fields.list("webhook_urls"),
            webhook_url: fields.value("webhook_url"),
        }
    }
}

/// Typed access to one table, recording keys whose values do not fit.
struct Fields<'a> {
    table: Option<&'a Table>,
    section: Option<&'static str>,
    invalid: &'a mut Vec<String>,
}

impl<'a> Fields<'a> {
    const fn root(table: &'a Table, invalid: &'a mut Vec<String>) -> Self {
        Self {
            table: Some(table),
            section: None,
            invalid,
        }
    }

    /// Returns the sub-table `name`; a non-table value is recorded as invalid.
    fn section(&mut self, name: &'static str) -> Fields<'_> {
        let value = self.table.and_then(|t| t.get(name));
        let table = value.and_then(toml::Value::as_table);
        if value.is_some() && table.is_none() {
            self.invalid.push(name.to_string());
        }

        Fields {
            table,
            section: Some(name),
            invalid: self.invalid,
        }
    }

    fn path(&self, key: &str) -> String {
        match self.section {
            Some(section) => format!("{section}.{key}"),
            None => key.to_string(),
        }
    }

    fn value<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let value = self.table?.get(key)?;
        if let Ok(parsed) = T::deserialize(value.clone()) {
            return Some(parsed);
        }

        let path = self.path(key);
        self.invalid.push(path);
        None
    }

    /// Reads an array, keeping the elements that fit and recording the rest.
    fn list<T: DeserializeOwned>(&mut self, key: &str) -> Vec<T> {
        let Some(value) = self.table.and_then(|t| t.get(key)) else {
            return Vec::new();
        };

        let Some(items) = value.as_array() else {
            let path = self.path(key);
            self.invalid.push(path);
            return Vec::new();
        };

        let mut parsed = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match T::deserialize(item.clone()) {
                Ok(item) => parsed.push(item),
                Err(_) => {
                    let path = format!("{}[{index}]", self.path(key));
                    self.invalid.push(path);
                }
            }
        }
        parsed
    }
}

/// Generates a default configuration file with comments.
///
/// The template carries no credentials; parsing it yields the built-in
/// defaults.
#[must_use]
pub fn default_config_template() -> String {
    r#"# ipwatch configuration file

# Seconds between checks (default: 300)
check_interval = 300

# Channels to notify, in order: "email", "telegram", "discord"
notification_methods = ["discord"]

# File holding the last confirmed address (default: current_ip.txt)
state_file = "current_ip.txt"

[email]
# smtp_server = "smtp.gmail.com"
# smtp_port = 587
# sender_email = "you@example.com"
# Prefer the IPWATCH_SMTP_PASSWORD environment variable
# sender_password = ""
# Empty means "send to the sender"
# recipient_email = ""

[telegram]
# Prefer the IPWATCH_TELEGRAM_TOKEN environment variable
# bot_token = ""
# chat_ids = [123456789, "@yourchannel"]
# api_base = "https://api.telegram.org"

[discord]
# webhook_urls = ["https://discord.com/api/webhooks/<id>/<token>"]

[resolver]
# Lookup services queried in order; replaces the built-in list
# services = ["https://api.ipify.org?format=json", "https://httpbin.org/ip"]
"#
    .to_string()
}
