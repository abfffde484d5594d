//! Build-time settings for the browser widget.

use chat_widget::config::{DEFAULT_ENDPOINT, DEFAULT_SELF_LABEL};
use chat_widget::ChatConfig;

/// Overrides read at compile time, so a static bundle can target a
/// different endpoint without code changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontendConfig {
    /// URL of the messages endpoint.
    pub endpoint: String,
    /// Sender label for messages typed here.
    pub self_label: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            endpoint: option_env!("CHAT_WIDGET_ENDPOINT")
                .unwrap_or(DEFAULT_ENDPOINT)
                .to_string(),
            self_label: option_env!("CHAT_WIDGET_SELF_LABEL")
                .unwrap_or(DEFAULT_SELF_LABEL)
                .to_string(),
        }
    }
}

impl FrontendConfig {
    pub fn chat_config(&self) -> ChatConfig {
        ChatConfig::default()
            .with_endpoint(self.endpoint.clone())
            .with_self_label(self.self_label.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_config_carries_overrides() {
        let config = FrontendConfig {
            endpoint: "/chat/api".to_string(),
            self_label: "me".to_string(),
        };
        let chat = config.chat_config();
        assert_eq!(chat.endpoint, "/chat/api");
        assert_eq!(chat.self_label, "me");
        assert_eq!(chat.fallback.len(), 1);
    }

    #[test]
    fn default_is_never_empty() {
        let config = FrontendConfig::default();
        assert!(!config.endpoint.is_empty());
        assert!(!config.self_label.is_empty());
    }
}
