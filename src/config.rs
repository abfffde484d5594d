/// Endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "/api/messages";
/// Label marking messages authored by this client.
pub const DEFAULT_SELF_LABEL: &str = "You";
pub const DEFAULT_SEND_FAILURE_NOTICE: &str = "Failed to send message. Please try again.";

/// Template for a message shown when history cannot be loaded. The timestamp
/// is filled in when the fallback is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackMessage {
    pub sender: String,
    pub text: String,
}

impl FallbackMessage {
    pub fn new(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self { sender: sender.into(), text: text.into() }
    }

    pub fn welcome() -> Self {
        Self::new("System", "Welcome to the chat!")
    }
}

/// Settings for one [`crate::ChatClient`] instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    pub endpoint: String,
    pub self_label: String,
    pub send_failure_notice: String,
    /// Rendered in place of the history when loading fails. Empty disables it.
    pub fallback: Vec<FallbackMessage>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            self_label: DEFAULT_SELF_LABEL.to_string(),
            send_failure_notice: DEFAULT_SEND_FAILURE_NOTICE.to_string(),
            fallback: vec![FallbackMessage::welcome()],
        }
    }
}

impl ChatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_self_label(mut self, label: impl Into<String>) -> Self {
        self.self_label = label.into();
        self
    }

    pub fn with_send_failure_notice(mut self, notice: impl Into<String>) -> Self {
        self.send_failure_notice = notice.into();
        self
    }

    pub fn with_fallback(mut self, fallback: Vec<FallbackMessage>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn without_fallback(self) -> Self {
        self.with_fallback(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_stock_widget() {
        let config = ChatConfig::default();
        assert_eq!(config.endpoint, "/api/messages");
        assert_eq!(config.self_label, "You");
        assert_eq!(config.send_failure_notice, "Failed to send message. Please try again.");
        assert_eq!(config.fallback, vec![FallbackMessage::new("System", "Welcome to the chat!")]);
    }

    #[test]
    fn builders_override_fields() {
        let config = ChatConfig::new()
            .with_endpoint("https://chat.example.com/messages")
            .with_self_label("me")
            .without_fallback();
        assert_eq!(config.endpoint, "https://chat.example.com/messages");
        assert_eq!(config.self_label, "me");
        assert!(config.fallback.is_empty());
    }
}
