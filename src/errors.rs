use thiserror::Error;

/// Failure talking to the message endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error: {status}")]
    Status { status: u16 },

    #[error("Parse error: {0}")]
    Decode(String),

    #[error("Serialize error: {0}")]
    Encode(String),

    #[error("Unexpected response shape: expected {expected}")]
    UnexpectedShape { expected: &'static str },
}

/// The two ways the widget can fail. Neither escapes [`crate::ChatClient`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("Failed to load messages: {0}")]
    LoadFailure(#[source] EndpointError),

    #[error("Failed to send message: {0}")]
    SendFailure(#[source] EndpointError),
}

impl ChatError {
    pub fn is_load_failure(&self) -> bool {
        matches!(self, ChatError::LoadFailure(_))
    }

    pub fn is_send_failure(&self) -> bool {
        matches!(self, ChatError::SendFailure(_))
    }

    pub fn endpoint_error(&self) -> &EndpointError {
        match self {
            ChatError::LoadFailure(e) | ChatError::SendFailure(e) => e,
        }
    }
}

impl EndpointError {
    /// `true` when the endpoint answered but with a non-2xx status.
    pub fn is_rejected(&self) -> bool {
        matches!(self, EndpointError::Status { .. })
    }
}

impl From<serde_json::Error> for EndpointError {
    fn from(e: serde_json::Error) -> Self {
        EndpointError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_carry_the_cause() {
        let err = ChatError::SendFailure(EndpointError::Status { status: 503 });
        assert_eq!(err.to_string(), "Failed to send message: Server error: 503");
        assert!(err.is_send_failure());
        assert!(err.endpoint_error().is_rejected());
    }

    #[test]
    fn json_errors_become_decode_failures() {
        let e = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let err = EndpointError::from(e);
        assert!(matches!(err, EndpointError::Decode(_)));
        assert!(!err.is_rejected());
    }
}
