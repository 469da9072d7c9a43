use std::sync::RwLock;

use lazy_static::lazy_static;
use serde::Deserialize;
use wasm_bindgen::JsValue;

use crate::utils::{Result, WebError, dom::window};

/// Tunables of the browser widgets. Every field can be overridden from JS.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WebConfig {
    /// Origin of the REST API. Falls back to `window.location.origin`.
    pub api_base: Option<String>,
    pub toast_duration_ms: u32,
    pub toast_fade_ms: u32,
    pub alert_duration_ms: u32,
    pub alert_fade_ms: u32,
    pub title_flash_interval_ms: u32,
    pub resize_debounce_ms: u32,
    pub swipe_threshold_px: f64,
    pub mobile_max_width: f64,
    pub tablet_max_width: f64,
    pub scroll_top_threshold_px: f64,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            toast_duration_ms: 5000,
            toast_fade_ms: 500,
            alert_duration_ms: 5000,
            alert_fade_ms: 300,
            title_flash_interval_ms: 1000,
            resize_debounce_ms: 250,
            swipe_threshold_px: 50.0,
            mobile_max_width: 768.0,
            tablet_max_width: 1024.0,
            scroll_top_threshold_px: 300.0,
        }
    }
}

impl WebConfig {
    /// Reads overrides from a JS object; `undefined` and `null` give the defaults.
    pub fn from_js(value: JsValue) -> Result<Self> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }

        serde_wasm_bindgen::from_value(value).map_err(|e| WebError::Config(e.to_string()))
    }

    pub fn resolve_api_base(&self) -> Result<String> {
        match &self.api_base {
            Some(base) => Ok(base.clone()),
            None => Ok(window()?.location().origin()?),
        }
    }
}

lazy_static! {
    static ref CONFIG: RwLock<WebConfig> = RwLock::new(WebConfig::default());
}

pub fn config() -> WebConfig {
    CONFIG.read().map(|c| c.clone()).unwrap_or_default()
}

/// Per-widget settings from a JS object, or the page-wide ones when `value`
/// is `undefined` or `null`.
pub fn config_or_page(value: JsValue) -> Result<WebConfig> {
    if value.is_undefined() || value.is_null() {
        Ok(config())
    } else {
        WebConfig::from_js(value)
    }
}

pub fn set_config(new_config: WebConfig) {
    if let Ok(mut current) = CONFIG.write() {
        *current = new_config;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_page_behavior() {
        let config = WebConfig::default();

        assert_eq!(config.toast_duration_ms, 5000);
        assert_eq!(config.resize_debounce_ms, 250);
        assert_eq!(config.swipe_threshold_px, 50.0);
        assert_eq!(config.mobile_max_width, 768.0);
        assert_eq!(config.tablet_max_width, 1024.0);
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let config: WebConfig =
            serde_json::from_str(r#"{"toastDurationMs": 8000, "apiBase": "https://x.org"}"#).unwrap();

        assert_eq!(config.toast_duration_ms, 8000);
        assert_eq!(config.api_base.as_deref(), Some("https://x.org"));
        assert_eq!(config.alert_fade_ms, 300);
    }

    #[test]
    fn explicit_api_base_wins() {
        let config = WebConfig {
            api_base: Some("http://localhost:5000".to_string()),
            ..WebConfig::default()
        };

        assert_eq!(config.resolve_api_base().unwrap(), "http://localhost:5000");
    }
}
