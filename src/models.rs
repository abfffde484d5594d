use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::errors::EndpointError;

/// Sender label substituted when an API element carries none.
pub const UNKNOWN_SENDER: &str = "Unknown";

/// Renders an instant as a time-of-day string for display.
pub type TimeFormatter = fn(&DateTime<Utc>) -> String;

/// A chat message as sent to and received from the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub sender: String,
    #[serde(with = "iso8601")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(text: impl Into<String>, sender: impl Into<String>) -> Self {
        Self::at(text, sender, Utc::now())
    }

    pub fn at(text: impl Into<String>, sender: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self { text: text.into(), sender: sender.into(), timestamp }
    }
}

/// One element of a history response, before validation.
///
/// Every field is kept as a raw JSON value so that a wrongly typed field
/// degrades that field only, not the whole element.
#[derive(Debug, Default, Deserialize)]
pub struct WireMessage {
    #[serde(default)]
    pub text: Option<Value>,
    #[serde(default)]
    pub sender: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<Value>,
}

impl WireMessage {
    /// Validates into a [`Message`].
    ///
    /// Text must be a non-blank string. A missing sender becomes
    /// [`UNKNOWN_SENDER`]; a missing or unparseable timestamp becomes `received_at`.
    pub fn into_message(self, received_at: DateTime<Utc>) -> Result<Message, &'static str> {
        let text = match self.text.as_ref().and_then(Value::as_str) {
            Some(t) if !trim_text(t).is_empty() => t.to_string(),
            Some(_) => return Err("blank text"),
            None => return Err("missing text"),
        };

        let sender = self
            .sender
            .as_ref()
            .and_then(Value::as_str)
            .filter(|s| !trim_text(s).is_empty())
            .unwrap_or(UNKNOWN_SENDER)
            .to_string();

        let timestamp = self
            .timestamp
            .as_ref()
            .and_then(Value::as_str)
            .and_then(parse_timestamp)
            .unwrap_or(received_at);

        Ok(Message { text, sender, timestamp })
    }
}

/// Validates a history response body into messages, preserving order.
///
/// A body that is not an array is an error. Array elements that cannot be
/// turned into a [`Message`] are skipped with a warning.
pub fn parse_history(body: Value, received_at: DateTime<Utc>) -> Result<Vec<Message>, EndpointError> {
    let Value::Array(items) = body else {
        return Err(EndpointError::UnexpectedShape { expected: "a JSON array of messages" });
    };

    let messages = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let wire = match serde_json::from_value::<WireMessage>(item) {
                Ok(wire) => wire,
                Err(e) => {
                    warn!("Skipping history element {index}: {e}");
                    return None;
                }
            };
            match wire.into_message(received_at) {
                Ok(message) => Some(message),
                Err(reason) => {
                    warn!("Skipping history element {index}: {reason}");
                    None
                }
            }
        })
        .collect();

    Ok(messages)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Sent,
    Received,
}

impl MessageKind {
    /// CSS class applied to the rendered node.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Sent => "sent",
            MessageKind::Received => "received",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the view renders for one message. `text` is raw and must be inserted
/// as text, never as markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEntry {
    pub kind: MessageKind,
    pub sender: String,
    pub text: String,
    pub time: String,
}

impl MessageEntry {
    pub fn from_message(message: &Message, self_label: &str, format_time: TimeFormatter) -> Self {
        let kind = if message.sender == self_label {
            MessageKind::Sent
        } else {
            MessageKind::Received
        };
        Self {
            kind,
            sender: message.sender.clone(),
            text: message.text.clone(),
            time: format_time(&message.timestamp),
        }
    }

    /// Class list for the node, e.g. `"message sent"`.
    pub fn css_class(&self) -> String {
        format!("message {}", self.kind)
    }
}

/// Default [`TimeFormatter`]: local wall-clock time of day.
pub fn format_local_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Parses an ISO-8601 date-time. Strings without an offset are read as local
/// time, the way browsers read them.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Trims whitespace and byte-order marks from both ends.
pub fn trim_text(raw: &str) -> &str {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Neutralizes markup characters for hosts that have to build HTML strings.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-01-01T00:00:00.000Z`.
mod iso8601 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(timestamp: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.sender,
            self.text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn received_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn fixed_time(_: &DateTime<Utc>) -> String {
        "12:00".to_string()
    }

    #[test]
    fn serializes_with_millisecond_utc_timestamp() {
        let msg = Message::at("Hello", "You", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({"text": "Hello", "sender": "You", "timestamp": "2024-01-01T00:00:00.000Z"})
        );
    }

    #[test]
    fn deserializes_offset_timestamps_into_utc() {
        let msg: Message = serde_json::from_value(json!({
            "text": "Hi", "sender": "Bob", "timestamp": "2024-01-01T02:00:00+02:00"
        }))
        .unwrap();
        assert_eq!(msg.timestamp, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn history_keeps_api_order() {
        let body = json!([
            {"text": "first", "sender": "Bob", "timestamp": "2024-01-01T00:00:00Z"},
            {"text": "second", "sender": "Ann", "timestamp": "2024-01-01T00:01:00Z"},
        ]);
        let messages = parse_history(body, received_at()).unwrap();
        let texts: Vec<_> = messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["first", "second"]);
    }

    #[test]
    fn history_rejects_non_array_bodies() {
        let err = parse_history(json!({"messages": []}), received_at()).unwrap_err();
        assert!(matches!(err, EndpointError::UnexpectedShape { .. }));
    }

    #[test]
    fn malformed_elements_are_skipped_or_defaulted() {
        let body = json!([
            "just a string",
            {"sender": "Bob"},
            {"text": "   ", "sender": "Bob"},
            {"text": 42, "sender": "Bob"},
            {"text": "kept", "sender": 7, "timestamp": "yesterday"},
        ]);
        let messages = parse_history(body, received_at()).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "kept");
        assert_eq!(messages[0].sender, UNKNOWN_SENDER);
        assert_eq!(messages[0].timestamp, received_at());
    }

    #[test]
    fn offsetless_timestamps_are_local_time() {
        let body = json!([
            {"text": "a", "timestamp": "2024-01-01T10:30:00"},
            {"text": "b", "timestamp": "2024-01-01T10:30:00.123"},
            {"text": "c", "timestamp": "2024-01-01T10:30:00Z"},
        ]);
        let messages = parse_history(body, received_at()).unwrap();

        let local = |raw: &str| {
            let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").unwrap();
            Local.from_local_datetime(&naive).earliest().unwrap().with_timezone(&Utc)
        };
        assert_eq!(messages[0].timestamp, local("2024-01-01T10:30:00"));
        assert_eq!(messages[1].timestamp, local("2024-01-01T10:30:00.123"));
        assert_eq!(messages[2].timestamp, Utc.with_ymd_and_hms(2024, 1, 1, 10, 30, 0).unwrap());
        assert!(messages.iter().all(|m| m.timestamp != received_at()));
    }

    #[test]
    fn trim_text_strips_byte_order_marks() {
        assert_eq!(trim_text("\u{feff}"), "");
        assert_eq!(trim_text(" \u{feff}hi\n"), "hi");
        assert_eq!(trim_text("a b"), "a b");
    }

    #[test]
    fn entry_kind_follows_self_label() {
        let mine = Message::new("a", "You");
        let theirs = Message::new("b", "you");
        assert_eq!(MessageEntry::from_message(&mine, "You", fixed_time).kind, MessageKind::Sent);
        assert_eq!(
            MessageEntry::from_message(&theirs, "You", fixed_time).kind,
            MessageKind::Received
        );
    }

    #[test]
    fn entry_keeps_markup_as_raw_text() {
        let msg = Message::new("<b>bold</b>", "Eve");
        let entry = MessageEntry::from_message(&msg, "You", fixed_time);
        assert_eq!(entry.text, "<b>bold</b>");
        assert_eq!(entry.time, "12:00");
        assert_eq!(entry.css_class(), "message received");
    }

    #[test]
    fn escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html(r#"<img src=x onerror="alert('x')">&"#),
            "&lt;img src=x onerror=&quot;alert(&#39;x&#39;)&quot;&gt;&amp;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn local_time_is_time_of_day() {
        let formatted = format_local_time(&received_at());
        assert_eq!(formatted.len(), 8);
        assert_eq!(formatted.matches(':').count(), 2);
    }
}
