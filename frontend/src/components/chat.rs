use std::rc::Rc;

use chat_widget::{is_submit_key, ChatClient, MessageEntry};
use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::HttpEndpoint;
use crate::config::FrontendConfig;
use crate::state::{locale_time, SignalInput, SignalView, WindowAlerter};

/// The chat widget: message list, compose form, and the client driving them.
#[component]
pub fn ChatWidget(config: FrontendConfig) -> impl IntoView {
    let container = NodeRef::<html::Div>::new();
    let view_state = SignalView::new(container);
    let input_state = SignalInput::new();

    let chat_config = config.chat_config();
    let endpoint = HttpEndpoint::new(chat_config.endpoint.clone());
    let client = ChatClient::new(chat_config, endpoint, view_state, input_state, WindowAlerter)
        .with_time_formatter(locale_time);
    let client = StoredValue::new_local(Rc::new(client));

    // Load history on mount
    let loader = client.get_value();
    spawn_local(async move {
        loader.initialize().await;
    });

    // Sends are not serialized; each one completes on its own.
    let send = move || {
        let client = client.get_value();
        spawn_local(async move {
            client.send_message().await;
        });
    };

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        send();
    };

    let on_keydown = move |ev: ev::KeyboardEvent| {
        if is_submit_key(&ev.key(), ev.shift_key(), ev.is_composing()) {
            ev.prevent_default();
            send();
        }
    };

    let draft = input_state.draft;
    let entries = view_state.entries;

    view! {
        <div class="chat-widget">
            <div id="messages-container" class="messages-container" node_ref=container>
                <For
                    each=move || entries.get().into_iter().enumerate()
                    key=|(index, _)| *index
                    children=move |(_, entry)| view! { <MessageBubble entry=entry /> }
                />
            </div>

            <form id="message-form" class="message-form" on:submit=on_submit>
                <textarea
                    id="message-input"
                    rows="1"
                    placeholder="Type a message… (Enter to send, Shift+Enter for newline)"
                    prop:value=draft
                    on:input=move |ev| draft.set(event_target_value(&ev))
                    on:keydown=on_keydown
                />
                <button type="submit" class="send-btn">"Send"</button>
            </form>
        </div>
    }
}

/// One rendered message. Text goes in as a text node, never as markup.
#[component]
fn MessageBubble(entry: MessageEntry) -> impl IntoView {
    let class = entry.css_class();
    view! {
        <div class=class>
            <div class="message-text">{entry.text}</div>
            <small class="message-time">{entry.time}</small>
        </div>
    }
}
