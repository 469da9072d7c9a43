use thiserror::Error;
use wasm_bindgen::JsValue;

pub type Result<T> = std::result::Result<T, WebError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WebError {
    #[error("No global window")]
    NoWindow,

    #[error("No document on window")]
    NoDocument,

    #[error("Element not found: {0}")]
    MissingElement(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JavaScript error: {0}")]
    Js(String),
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        WebError::Js(
            value
                .as_string()
                .unwrap_or_else(|| format!("{:?}", value)),
        )
    }
}

impl From<WebError> for JsValue {
    fn from(value: WebError) -> Self {
        JsValue::from_str(&value.to_string())
    }
}
