//! Notification text rendering.
//!
//! Message bodies are fixed Handlebars templates filled with the old and
//! new address and the observation time.

use handlebars::Handlebars;
use serde::Serialize;

use crate::monitor::ChangeEvent;
use crate::time::format_human;

use super::DeliveryError;

const EMAIL_SUBJECT: &str = "Public IP changed - {{time}}";

const EMAIL_BODY: &str = "Hello!

Your public IP address has changed:

- Old IP: {{previous}}
- New IP: {{current}}
- Time: {{time}}

IP Monitor
";

const TELEGRAM_TEXT: &str = "🔄 *Public IP changed*

- Old IP: `{{previous}}`
- New IP: `{{current}}`
- Time: {{time}}";

/// Template variables.
#[derive(Serialize)]
struct MessageData<'a> {
    previous: &'a str,
    current: &'a str,
    time: String,
}

impl<'a> From<&'a ChangeEvent> for MessageData<'a> {
    fn from(event: &'a ChangeEvent) -> Self {
        Self {
            previous: event.previous_or_unknown(),
            current: event.current.as_str(),
            time: format_human(event.observed_at),
        }
    }
}

fn render(template: &str, event: &ChangeEvent) -> Result<String, DeliveryError> {
    let mut handlebars = Handlebars::new();
    // Plain text and Markdown targets; HTML escaping would mangle them.
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .render_template(template, &MessageData::from(event))
        .map_err(|e| DeliveryError::Message(e.to_string()))
}

/// Renders the email subject line.
///
/// # Errors
///
/// Returns [`DeliveryError::Message`] if rendering fails.
pub fn email_subject(event: &ChangeEvent) -> Result<String, DeliveryError> {
    render(EMAIL_SUBJECT, event)
}

/// Renders the plaintext email body.
///
/// # Errors
///
/// Returns [`DeliveryError::Message`] if rendering fails.
pub fn email_body(event: &ChangeEvent) -> Result<String, DeliveryError> {
    render(EMAIL_BODY, event)
}

/// Renders the Markdown-flavored Telegram message.
///
/// # Errors
///
/// Returns [`DeliveryError::Message`] if rendering fails.
pub fn telegram_text(event: &ChangeEvent) -> Result<String, DeliveryError> {
    render(TELEGRAM_TEXT, event)
}
