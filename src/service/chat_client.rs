use chrono::Utc;
use tracing::{debug, error, info};

use crate::config::ChatConfig;
use crate::errors::ChatError;
use crate::models::{format_local_time, parse_history, trim_text, Message, MessageEntry, TimeFormatter};
use crate::surface::{Alerter, ComposeInput, MessageEndpoint, MessageView};

/// Result of loading the history. Informational only: failures have already
/// been handled by the time this is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The history loaded and this many messages were rendered.
    Loaded(usize),
    /// Loading failed and the fallback sequence was rendered instead.
    Fallback { error: ChatError, rendered: usize },
}

/// Result of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The input was blank; nothing was sent.
    Skipped,
    Sent(MessageEntry),
    /// The user has been alerted and the draft left in place.
    Failed(ChatError),
}

/// The chat widget: renders history, sends what the user types, and shows
/// sent messages once the endpoint accepts them.
pub struct ChatClient {
    config: ChatConfig,
    endpoint: Box<dyn MessageEndpoint>,
    view: Box<dyn MessageView>,
    input: Box<dyn ComposeInput>,
    alerter: Box<dyn Alerter>,
    format_time: TimeFormatter,
}

impl ChatClient {
    pub fn new(
        config: ChatConfig,
        endpoint: impl MessageEndpoint + 'static,
        view: impl MessageView + 'static,
        input: impl ComposeInput + 'static,
        alerter: impl Alerter + 'static,
    ) -> Self {
        Self {
            config,
            endpoint: Box::new(endpoint),
            view: Box::new(view),
            input: Box::new(input),
            alerter: Box::new(alerter),
            format_time: format_local_time,
        }
    }

    /// Replaces how timestamps are turned into display strings.
    pub fn with_time_formatter(mut self, format_time: TimeFormatter) -> Self {
        self.format_time = format_time;
        self
    }

    /// Runs once when the host page is ready. Input handlers are wired by the
    /// host; this loads the history.
    pub async fn initialize(&self) -> LoadOutcome {
        debug!("Initializing chat widget against {}", self.config.endpoint);
        self.load_messages().await
    }

    /// Renders the full history, or the fallback sequence if it cannot be loaded.
    pub async fn load_messages(&self) -> LoadOutcome {
        match self.fetch_history().await {
            Ok(messages) => {
                for message in &messages {
                    self.add_message(message);
                }
                info!("Loaded {} messages", messages.len());
                LoadOutcome::Loaded(messages.len())
            }
            Err(err) => {
                error!("Error loading messages: {err}");
                let now = Utc::now();
                let fallback: Vec<Message> = self
                    .config
                    .fallback
                    .iter()
                    .map(|f| Message::at(f.text.clone(), f.sender.clone(), now))
                    .collect();
                for message in &fallback {
                    self.add_message(message);
                }
                LoadOutcome::Fallback { error: err, rendered: fallback.len() }
            }
        }
    }

    async fn fetch_history(&self) -> Result<Vec<Message>, ChatError> {
        let body = self
            .endpoint
            .fetch_messages()
            .await
            .map_err(ChatError::LoadFailure)?;
        parse_history(body, Utc::now()).map_err(ChatError::LoadFailure)
    }

    /// Sends the trimmed input. On success the message is rendered and the
    /// input cleared; on failure the user is alerted and the input kept.
    pub async fn send_message(&self) -> SendOutcome {
        let text = trim_text(&self.input.value()).to_string();
        if text.is_empty() {
            return SendOutcome::Skipped;
        }

        let label = self.config.self_label.clone();
        let outgoing = Message::new(text.clone(), label.clone());
        debug!("Sending message to {}", self.config.endpoint);

        match self.endpoint.post_message(&outgoing).await {
            Ok(()) => {
                // Fresh timestamp: the rendered copy is not the one that was sent.
                let entry = self.add_message(&Message::new(text, label));
                self.input.clear();
                SendOutcome::Sent(entry)
            }
            Err(e) => {
                let err = ChatError::SendFailure(e);
                error!("Error sending message: {err}");
                self.alerter.alert(&self.config.send_failure_notice);
                SendOutcome::Failed(err)
            }
        }
    }

    /// Appends one message to the view and scrolls to it.
    pub fn add_message(&self, message: &Message) -> MessageEntry {
        let entry = MessageEntry::from_message(message, &self.config.self_label, self.format_time);
        self.view.append(entry.clone());
        self.view.scroll_to_latest();
        entry
    }
}
