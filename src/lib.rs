//! Core of a small chat widget: loads the message history from an HTTP
//! endpoint, posts what the user types, and renders both through host-provided
//! view and input surfaces.

pub mod config;
pub mod errors;
pub mod models;
pub mod service;
pub mod surface;

pub use config::{ChatConfig, FallbackMessage};
pub use errors::{ChatError, EndpointError};
pub use models::{escape_html, Message, MessageEntry, MessageKind};
pub use service::chat_client::{ChatClient, LoadOutcome, SendOutcome};
pub use surface::{is_submit_key, Alerter, ComposeInput, MessageEndpoint, MessageView};
