use async_trait::async_trait;
use chat_widget::{EndpointError, Message, MessageEndpoint};
use gloo_net::http::{Request, Response};
use serde_json::Value;

/// The message endpoint reached over `fetch`.
#[derive(Clone, Debug)]
pub struct HttpEndpoint {
    url: String,
}

impl HttpEndpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

fn check_status(resp: Response) -> Result<Response, EndpointError> {
    if !resp.ok() {
        return Err(EndpointError::Status { status: resp.status() });
    }
    Ok(resp)
}

#[async_trait(?Send)]
impl MessageEndpoint for HttpEndpoint {
    /// Fetches the message history as raw JSON; validation happens in the core.
    async fn fetch_messages(&self) -> Result<Value, EndpointError> {
        let resp = Request::get(&self.url)
            .send()
            .await
            .map_err(|e| EndpointError::Network(e.to_string()))?;

        check_status(resp)?
            .json::<Value>()
            .await
            .map_err(|e| EndpointError::Decode(e.to_string()))
    }

    /// Posts one message. `json` sets `Content-Type: application/json`.
    async fn post_message(&self, message: &Message) -> Result<(), EndpointError> {
        let resp = Request::post(&self.url)
            .json(message)
            .map_err(|e| EndpointError::Encode(e.to_string()))?
            .send()
            .await
            .map_err(|e| EndpointError::Network(e.to_string()))?;

        check_status(resp).map(|_| ())
    }
}
