//! Tests for validated configuration.

use std::path::PathBuf;
use std::time::Duration;

use super::cli::Cli;
use super::toml::FileConfig;
use super::validated::{MonitorConfig, write_default_config};
use crate::notify::ChannelKind;
use crate::resolver::default_services;

/// Helper to create CLI args from a slice
fn cli(args: &[&str]) -> Cli {
    let mut full_args = vec!["ipwatch"];
    full_args.extend(args);
    Cli::parse_from_iter(full_args)
}

/// Helper to parse TOML config
fn toml(content: &str) -> FileConfig {
    FileConfig::parse(content).unwrap()
}

mod defaults {
    use super::*;

    #[test]
    fn no_file_yields_defaults() {
        let config = MonitorConfig::from_raw(&cli(&[]), None);

        assert_eq!(config, MonitorConfig::default());
        assert_eq!(config.check_interval, Duration::from_secs(300));
        assert_eq!(config.notification_methods, vec![ChannelKind::Discord]);
        assert_eq!(config.state_file, PathBuf::from("current_ip.txt"));
        assert_eq!(config.email.smtp_server, "smtp.gmail.com");
        assert_eq!(config.email.smtp_port, 587);
        assert_eq!(config.telegram.api_base, "https://api.telegram.org");
        assert_eq!(config.resolver_services, default_services());
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config = MonitorConfig::from_raw(&cli(&[]), Some(&toml("")));
        assert_eq!(config, MonitorConfig::default());
    }

    #[test]
    fn display_summarizes_without_secrets() {
        let file = toml(
            r#"
            [email]
            sender_password = "hunter2"
            [telegram]
            bot_token = "123:secret"
            chat_ids = [1, 2]
        "#,
        );
        let config = MonitorConfig::from_raw(&cli(&[]), Some(&file));
        let shown = config.to_string();

        assert!(shown.contains("check_interval: 300s"));
        assert!(shown.contains("notification_methods: [discord]"));
        assert!(shown.contains("telegram_chats: 2"));
        assert!(!shown.contains("hunter2"));
        assert!(!shown.contains("secret"));
    }
}

mod check_interval {
    use super::*;

    #[test]
    fn file_value_is_used() {
        let config = MonitorConfig::from_raw(&cli(&[]), Some(&toml("check_interval = 60")));
        assert_eq!(config.check_interval, Duration::from_secs(60));
    }

    #[test]
    fn cli_overrides_file() {
        let config = MonitorConfig::from_raw(
            &cli(&["--check-interval", "15"]),
            Some(&toml("check_interval = 60")),
        );
        assert_eq!(config.check_interval, Duration::from_secs(15));
    }

    #[test]
    fn zero_falls_back_to_default() {
        let config = MonitorConfig::from_raw(&cli(&[]), Some(&toml("check_interval = 0")));
        assert_eq!(config.check_interval, Duration::from_secs(300));
    }

    #[test]
    fn negative_falls_back_to_default() {
        let config = MonitorConfig::from_raw(&cli(&[]), Some(&toml("check_interval = -10")));
        assert_eq!(config.check_interval, Duration::from_secs(300));
    }

    #[test]
    fn zero_on_cli_falls_back_to_default() {
        let config = MonitorConfig::from_raw(&cli(&["--check-interval", "0"]), None);
        assert_eq!(config.check_interval, Duration::from_secs(300));
    }
}

mod notification_methods {
    use super::*;

    #[test]
    fn order_is_preserved() {
        let file = toml(r#"notification_methods = ["telegram", "email", "discord"]"#);
        let config = MonitorConfig::from_raw(&cli(&[]), Some(&file));

        assert_eq!(
            config.notification_methods,
            vec![ChannelKind::Telegram, ChannelKind::Email, ChannelKind::Discord]
        );
    }

    #[test]
    fn duplicates_collapse_to_first_occurrence() {
        let file = toml(r#"notification_methods = ["discord", "email", "Discord", "email"]"#);
        let config = MonitorConfig::from_raw(&cli(&[]), Some(&file));

        assert_eq!(
            config.notification_methods,
            vec![ChannelKind::Discord, ChannelKind::Email]
        );
    }

    #[test]
    fn unknown_names_are_ignored() {
        let file = toml(r#"notification_methods = ["slack", "telegram", "sms"]"#);
        let config = MonitorConfig::from_raw(&cli(&[]), Some(&file));

        assert_eq!(config.notification_methods, vec![ChannelKind::Telegram]);
    }

    #[test]
    fn explicit_empty_list_disables_all_channels() {
        let file = toml("notification_methods = []");
        let config = MonitorConfig::from_raw(&cli(&[]), Some(&file));

        assert!(config.notification_methods.is_empty());
    }
}

mod channels {
    use super::*;

    #[test]
    fn email_section_is_applied() {
        let file = toml(
            r#"
            [email]
            smtp_server = "mail.example.com"
            smtp_port = 465
            sender_email = " me@example.com "
            sender_password = "pw"
        "#,
        );
        let config = MonitorConfig::from_raw(&cli(&[]), Some(&file));

        assert_eq!(config.email.smtp_server, "mail.example.com");
        assert_eq!(config.email.smtp_port, 465);
        assert_eq!(config.email.sender_email, "me@example.com");
        assert!(config.email.is_configured());
        assert_eq!(config.email.recipient(), "me@example.com");
    }

    #[test]
    fn invalid_smtp_port_falls_back() {
        for port in ["0", "70000", "-1"] {
            let file = toml(&format!("[email]\nsmtp_port = {port}"));
            let config = MonitorConfig::from_raw(&cli(&[]), Some(&file));
            assert_eq!(config.email.smtp_port, 587, "port {port}");
        }
    }

    #[test]
    fn blank_smtp_server_falls_back() {
        let file = toml("[email]\nsmtp_server = \"  \"");
        let config = MonitorConfig::from_raw(&cli(&[]), Some(&file));
        assert_eq!(config.email.smtp_server, "smtp.gmail.com");
    }

    #[test]
    fn cli_secrets_override_file() {
        let file = toml(
            r#"
            [email]
            sender_password = "from-file"
            [telegram]
            bot_token = "file-token"
        "#,
        );
        let config = MonitorConfig::from_raw(
            &cli(&["--smtp-password", "from-cli", "--telegram-token", "cli-token"]),
            Some(&file),
        );

        assert_eq!(config.email.sender_password, "from-cli");
        assert_eq!(config.telegram.bot_token, "cli-token");
    }

    #[test]
    fn telegram_chat_ids_merge_list_and_alias() {
        let file = toml(
            r#"
            [telegram]
            bot_token = "t"
            chat_ids = [42, "@news", 42]
            chat_id = -100123
        "#,
        );
        let config = MonitorConfig::from_raw(&cli(&[]), Some(&file));

        assert_eq!(config.telegram.chat_ids, vec!["42", "@news", "-100123"]);
    }

    #[test]
    fn invalid_telegram_api_base_falls_back() {
        let file = toml("[telegram]\napi_base = \"not a url\"");
        let config = MonitorConfig::from_raw(&cli(&[]), Some(&file));
        assert_eq!(config.telegram.api_base, "https://api.telegram.org");
    }

    #[test]
    fn discord_urls_merge_list_and_alias() {
        let file = toml(
            r#"
            [discord]
            webhook_urls = ["https://discord.com/api/webhooks/1/a", "  "]
            webhook_url = "https://discord.com/api/webhooks/2/b"
        "#,
        );
        let config = MonitorConfig::from_raw(&cli(&[]), Some(&file));

        assert_eq!(
            config.discord.webhook_urls,
            vec![
                "https://discord.com/api/webhooks/1/a",
                "https://discord.com/api/webhooks/2/b",
            ]
        );
    }
}

mod resolver_services {
    use super::*;

    #[test]
    fn override_replaces_defaults() {
        let file = toml(r#"[resolver]
services = ["https://one.example/ip", "https://two.example/json"]"#);
        let config = MonitorConfig::from_raw(&cli(&[]), Some(&file));

        let urls: Vec<&str> = config
            .resolver_services
            .iter()
            .map(|s| s.url().as_str())
            .collect();
        assert_eq!(urls, vec!["https://one.example/ip", "https://two.example/json"]);
    }

    #[test]
    fn invalid_entries_are_skipped() {
        let file = toml(r#"[resolver]
services = ["nope", "https://one.example/ip"]"#);
        let config = MonitorConfig::from_raw(&cli(&[]), Some(&file));

        assert_eq!(config.resolver_services.len(), 1);
    }

    #[test]
    fn all_invalid_falls_back_to_defaults() {
        let file = toml(r#"[resolver]
services = ["nope", "also nope"]"#);
        let config = MonitorConfig::from_raw(&cli(&[]), Some(&file));

        assert_eq!(config.resolver_services, default_services());
    }
}

mod state_file {
    use super::*;

    #[test]
    fn cli_overrides_file() {
        let config = MonitorConfig::from_raw(
            &cli(&["--state-file", "/cli/ip.txt"]),
            Some(&toml(r#"state_file = "/file/ip.txt""#)),
        );
        assert_eq!(config.state_file, PathBuf::from("/cli/ip.txt"));
    }

    #[test]
    fn file_value_is_used() {
        let config =
            MonitorConfig::from_raw(&cli(&[]), Some(&toml(r#"state_file = "/file/ip.txt""#)));
        assert_eq!(config.state_file, PathBuf::from("/file/ip.txt"));
    }
}

mod loading {
    use super::*;
    use std::fs;

    use tempfile::TempDir;

    fn cli_for(path: &std::path::Path) -> Cli {
        cli(&["--config", path.to_str().unwrap()])
    }

    #[test]
    fn missing_file_is_created_from_template() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("ipwatch.toml");

        let config = MonitorConfig::load(&cli_for(&path)).unwrap();

        assert_eq!(config, MonitorConfig::default());
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, super::super::default_config_template());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ipwatch.toml");
        fs::write(&path, "check_interval = = 5").unwrap();

        let config = MonitorConfig::load(&cli_for(&path)).unwrap();

        assert_eq!(config, MonitorConfig::default());
        assert_eq!(fs::read_to_string(&path).unwrap(), "check_interval = = 5");
    }

    #[test]
    fn wrong_type_keeps_the_rest_of_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ipwatch.toml");
        fs::write(
            &path,
            "check_interval = \"600\"\n\
             [discord]\n\
             webhook_urls = [\"https://discord.com/api/webhooks/1/tok\"]\n",
        )
        .unwrap();

        let config = MonitorConfig::load(&cli_for(&path)).unwrap();

        assert_eq!(config.check_interval, Duration::from_secs(300));
        assert_eq!(
            config.discord.webhook_urls,
            vec!["https://discord.com/api/webhooks/1/tok".to_string()]
        );
    }

    #[test]
    fn valid_file_is_applied() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ipwatch.toml");
        fs::write(&path, "check_interval = 42\nnotification_methods = [\"email\"]").unwrap();

        let config = MonitorConfig::load(&cli_for(&path)).unwrap();

        assert_eq!(config.check_interval, Duration::from_secs(42));
        assert_eq!(config.notification_methods, vec![ChannelKind::Email]);
    }

    #[test]
    fn write_default_config_reports_failure() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();

        let result = write_default_config(&blocker.join("ipwatch.toml"));

        assert!(matches!(result, Err(crate::config::ConfigError::FileWrite { .. })));
    }
}
