use std::time::{Duration, SystemTime};

use super::*;
use crate::address::Address;
use crate::http::mock::{MockClient, Reply};

fn settings(chat_ids: &[&str]) -> TelegramSettings {
    TelegramSettings {
        bot_token: "123456:ABC-secret-token".to_string(),
        chat_ids: chat_ids.iter().map(ToString::to_string).collect(),
        ..TelegramSettings::default()
    }
}

fn event() -> ChangeEvent {
    ChangeEvent::new(
        Some(Address::new("203.0.113.5").unwrap()),
        Address::new("198.51.100.9").unwrap(),
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_709_296_200),
    )
}

fn form_value(body: &str, key: &str) -> Option<String> {
    url::form_urlencoded::parse(body.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

#[tokio::test]
async fn skips_without_token() {
    let mut settings = settings(&["42"]);
    settings.bot_token = "  ".to_string();
    let channel = TelegramChannel::new(MockClient::new([]), settings);

    let report = channel.notify(&event()).await;

    assert!(matches!(report, DeliveryReport::Skipped(SkipReason::MissingToken)));
    assert_eq!(channel.client.calls(), 0);
}

#[tokio::test]
async fn skips_without_chats() {
    let channel = TelegramChannel::new(MockClient::new([]), settings(&[]));

    let report = channel.notify(&event()).await;

    assert!(matches!(report, DeliveryReport::Skipped(SkipReason::NoDestinations)));
    assert_eq!(channel.client.calls(), 0);
}

#[tokio::test]
async fn posts_markdown_message_per_chat() {
    let channel = TelegramChannel::new(MockClient::new([]), settings(&["42", "-100123"]));

    let report = channel.notify(&event()).await;

    assert_eq!(report.to_string(), "delivered 2 of 2");
    let requests = channel.client.captured_requests();
    assert_eq!(requests.len(), 2);

    let first = &requests[0];
    assert_eq!(first.method, http::Method::POST);
    assert_eq!(
        first.url.as_str(),
        "https://api.telegram.org/bot123456:ABC-secret-token/sendMessage"
    );

    let body = first.body_text().unwrap();
    assert_eq!(form_value(body, "chat_id").as_deref(), Some("42"));
    assert_eq!(form_value(body, "parse_mode").as_deref(), Some("Markdown"));
    let text = form_value(body, "text").unwrap();
    assert!(text.contains("`203.0.113.5`"));
    assert!(text.contains("`198.51.100.9`"));

    let second = requests[1].body_text().unwrap();
    assert_eq!(form_value(second, "chat_id").as_deref(), Some("-100123"));
}

#[tokio::test]
async fn failing_chat_does_not_stop_the_rest() {
    let client = MockClient::new([Reply::status(403), Reply::Refused, Reply::ok("{\"ok\":true}")]);
    let channel = TelegramChannel::new(client, settings(&["1", "2", "3"]));

    let report = channel.notify(&event()).await;

    assert_eq!(channel.client.calls(), 3);
    assert_eq!(report.attempted(), 3);
    assert_eq!(report.succeeded(), 1);

    let outcomes = report.outcomes();
    assert!(matches!(
        outcomes[0].error,
        Some(DeliveryError::NonSuccessStatus { status, .. }) if status == http::StatusCode::FORBIDDEN
    ));
    assert!(matches!(outcomes[1].error, Some(DeliveryError::Transport(_))));
    assert!(outcomes[2].succeeded());
}

#[tokio::test]
async fn honors_custom_api_base() {
    let mut settings = settings(&["42"]);
    settings.api_base = "http://localhost:8081/".to_string();
    let channel = TelegramChannel::new(MockClient::new([]), settings);

    channel.notify(&event()).await;

    let requests = channel.client.captured_requests();
    assert_eq!(
        requests[0].url.as_str(),
        "http://localhost:8081/bot123456:ABC-secret-token/sendMessage"
    );
}

#[test]
fn debug_output_hides_token() {
    let debug = format!("{:?}", settings(&["42"]));

    assert!(!debug.contains("secret-token"));
    assert!(debug.contains("42"));
}
