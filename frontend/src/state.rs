use chat_widget::{Alerter, ComposeInput, MessageEntry, MessageView};
use chrono::{DateTime, Utc};
use gloo_timers::callback::Timeout;
use leptos::html;
use leptos::prelude::*;
use wasm_bindgen::JsValue;

/// Message list backed by a Leptos signal. Entries are rendered as text nodes.
#[derive(Clone, Copy)]
pub struct SignalView {
    pub entries: ReadSignal<Vec<MessageEntry>>,
    set_entries: WriteSignal<Vec<MessageEntry>>,
    container: NodeRef<html::Div>,
}

impl SignalView {
    pub fn new(container: NodeRef<html::Div>) -> Self {
        let (entries, set_entries) = signal(Vec::<MessageEntry>::new());
        Self { entries, set_entries, container }
    }
}

impl MessageView for SignalView {
    fn append(&self, entry: MessageEntry) {
        self.set_entries.update(|entries| entries.push(entry));
    }

    fn scroll_to_latest(&self) {
        let container = self.container;
        // The appended node only exists after the next render.
        Timeout::new(0, move || {
            if let Some(el) = container.get_untracked() {
                el.set_scroll_top(el.scroll_height());
            }
        })
        .forget();
    }
}

/// Compose field backed by a signal bound to the textarea.
#[derive(Clone, Copy)]
pub struct SignalInput {
    pub draft: RwSignal<String>,
}

impl SignalInput {
    pub fn new() -> Self {
        Self { draft: RwSignal::new(String::new()) }
    }
}

impl Default for SignalInput {
    fn default() -> Self {
        Self::new()
    }
}

impl ComposeInput for SignalInput {
    fn value(&self) -> String {
        self.draft.get_untracked()
    }

    fn clear(&self) {
        self.draft.set(String::new());
    }
}

/// `window.alert`.
#[derive(Clone, Copy, Default)]
pub struct WindowAlerter;

impl Alerter for WindowAlerter {
    fn alert(&self, message: &str) {
        let Some(window) = web_sys::window() else {
            log::error!("No window to alert on: {message}");
            return;
        };
        if let Err(e) = window.alert_with_message(message) {
            log::error!("Failed to show alert: {e:?}");
        }
    }
}

/// Time of day in the browser's locale, e.g. `3:04:05 PM`.
pub fn locale_time(timestamp: &DateTime<Utc>) -> String {
    let date = js_sys::Date::new(&JsValue::from_f64(timestamp.timestamp_millis() as f64));
    let locale = web_sys::window()
        .and_then(|w| w.navigator().language())
        .unwrap_or_else(|| "en-US".to_string());
    date.to_locale_time_string(&locale).into()
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use chat_widget::{Message, MessageKind};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn signal_input_clears() {
        let input = SignalInput::new();
        input.draft.set("draft".to_string());
        assert_eq!(input.value(), "draft");
        input.clear();
        assert_eq!(input.value(), "");
    }

    #[wasm_bindgen_test]
    fn signal_view_appends_in_order() {
        let view = SignalView::new(NodeRef::new());
        for text in ["one", "two"] {
            let msg = Message::new(text, "Bob");
            view.append(MessageEntry::from_message(&msg, "You", locale_time));
        }
        let entries = view.entries.get_untracked();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].text, "two");
        assert_eq!(entries[0].kind, MessageKind::Received);
    }

    #[wasm_bindgen_test]
    fn locale_time_is_not_empty() {
        assert!(!locale_time(&Utc::now()).is_empty());
    }
}
