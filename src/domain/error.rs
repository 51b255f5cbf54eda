use thiserror::Error;

#[derive(Debug, Error)]
pub enum OplatiError {
    #[error("validation: {0}")]
    Validation(String),

    #[error("transport: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("decode: {0}")]
    Decode(#[from] DecodeError),
}

impl OplatiError {
    /// The gateway's own classification, when the call was rejected remotely.
    pub fn gateway(&self) -> Option<&GatewayError> {
        match self {
            Self::Gateway(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(TransportError::Timeout(_)))
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("request execution failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("request encoding failed: {0}")]
    Encode(#[source] serde_json::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else {
            Self::Request(err)
        }
    }
}

/// Structured rejection returned by the gateway for any non-200 response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("OPLATI error {internal_code}: {message}")]
pub struct GatewayError {
    pub http_status: u16,
    pub status_code: String,
    pub internal_code: String,
    pub message: String,
    pub user_message: String,
    pub user_message_en: String,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("decoding error envelope failed (status code {status}): {source}")]
    ErrorEnvelope {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("decoding response failed (status code {status}): {source}")]
    Body {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("decoding payload failed: {0}")]
    Payload(#[source] serde_json::Error),

    #[error("bad payment {field} {value:?}: {source}")]
    Timestamp {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("{0}")]
    Field(String),
}

/// Error returned by a caller's notification handler.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("authentication: {0}")]
    Authentication(String),

    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] DecodeError),

    #[error("handler: {0}")]
    Handler(#[source] HandlerError),
}
