//! Seams between [`crate::ChatClient`] and the host environment.
//!
//! The widget runs on a single-threaded event loop, so none of these are
//! required to be `Send` and the endpoint futures are `?Send`.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::EndpointError;
use crate::models::{Message, MessageEntry};

/// The remote message store.
#[async_trait(?Send)]
pub trait MessageEndpoint {
    /// `GET` the history. Returns the decoded JSON body; a non-2xx status is
    /// [`EndpointError::Status`].
    async fn fetch_messages(&self) -> Result<Value, EndpointError>;

    /// `POST` one message as JSON. Any 2xx status is success.
    async fn post_message(&self, message: &Message) -> Result<(), EndpointError>;
}

/// Append-only list of rendered messages.
pub trait MessageView {
    /// Append to the end. `entry.text` must go through a text-only path.
    fn append(&self, entry: MessageEntry);

    /// Bring the newest entry into view.
    fn scroll_to_latest(&self);
}

/// The text field messages are composed in.
pub trait ComposeInput {
    fn value(&self) -> String;
    fn clear(&self);
}

/// Blocking user notification.
pub trait Alerter {
    fn alert(&self, message: &str);
}

/// `true` for Enter pressed without Shift, which submits instead of
/// inserting a newline. Enter that confirms an IME composition never submits.
pub fn is_submit_key(key: &str, shift: bool, composing: bool) -> bool {
    key == "Enter" && !shift && !composing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_plain_enter_submits() {
        assert!(is_submit_key("Enter", false, false));
        assert!(!is_submit_key("Enter", true, false));
        assert!(!is_submit_key("a", false, false));
        assert!(!is_submit_key("NumpadEnter", false, false));
    }

    #[test]
    fn enter_during_composition_does_not_submit() {
        assert!(!is_submit_key("Enter", false, true));
        assert!(!is_submit_key("Enter", true, true));
    }
}
