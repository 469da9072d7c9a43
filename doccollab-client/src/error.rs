use doccollab_protocol::ProtocolError;
pub use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("URL parsing error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("JSON deserialization error: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Server answered with HTTP status {0}")]
    HttpStatus(u16),

    #[error("{0}")]
    ServerError(String),

    #[error("Failed to interact with JavaScript API: {0}")]
    JsError(String),
}

impl ClientError {
    /// True when the server answered `success:false`, as opposed to a transport
    /// or decoding failure.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ClientError::ServerError(_))
    }
}

impl From<ProtocolError> for ClientError {
    fn from(value: ProtocolError) -> Self {
        match value {
            ProtocolError::Rejected(message) => ClientError::ServerError(message),
        }
    }
}

// Helper to convert JsValue to ClientError
impl From<JsValue> for ClientError {
    fn from(value: JsValue) -> Self {
        ClientError::JsError(format!("{:?}", value))
    }
}
