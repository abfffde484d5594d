mod api;
mod components;
mod config;
mod state;

use leptos::mount::mount_to_body;
use leptos::prelude::*;

use components::chat::ChatWidget;
use config::FrontendConfig;

/// Root application component.
#[component]
fn App() -> impl IntoView {
    view! {
        <div class="app-container">
            <ChatWidget config=FrontendConfig::default() />
        </div>
    }
}

fn main() {
    console_log::init_with_level(log::Level::Debug).expect("Failed to init logger");
    mount_to_body(App);
}
