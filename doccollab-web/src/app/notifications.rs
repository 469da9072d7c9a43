use std::cell::Cell;
use std::str::FromStr;
use std::sync::RwLock;
use std::time::Duration;

use html_escape::encode_safe;
use lazy_static::lazy_static;
use log::{debug, warn};
use uuid::Uuid;
use web_sys::Element;
use web_time::Instant;

use crate::app::config::config;
use crate::utils::{
    Result, WebError,
    dom::{
        closest, document, element_by_id, listen, query, query_all, set_styles, target_element,
    },
    timer::set_timeout,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl Severity {
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Success => "✅",
            Severity::Error => "❌",
            Severity::Warning => "⚠️",
            Severity::Info => "ℹ️",
        }
    }

    pub fn default_title(&self) -> &'static str {
        match self {
            Severity::Success => "Success",
            Severity::Error => "Error",
            Severity::Warning => "Warning",
            Severity::Info => "Information",
        }
    }

    pub fn bg_class(&self) -> &'static str {
        match self {
            Severity::Success => "bg-success",
            Severity::Error => "bg-danger",
            Severity::Warning => "bg-warning",
            Severity::Info => "bg-info",
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "success" => Ok(Severity::Success),
            "error" | "danger" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            other => Err(format!("unknown severity: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub expires_at: Instant,
}

impl Toast {
    pub fn to_html(&self) -> String {
        format!(
            r#"<div class="toast-header {} text-white"><strong class="me-auto">{} {}</strong><button type="button" class="btn-close btn-close-white" data-bs-dismiss="toast"></button></div><div class="toast-body">{}</div>"#,
            self.severity.bg_class(),
            self.severity.icon(),
            encode_safe(&self.title),
            encode_safe(&self.message),
        )
    }
}

/// Toasts currently on screen, oldest first.
#[derive(Debug, Default)]
pub struct ToastStack {
    toasts: Vec<Toast>,
}

impl ToastStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty `title` falls back to the severity's default.
    pub fn push(
        &mut self,
        message: &str,
        severity: Severity,
        title: Option<&str>,
        now: Instant,
        lifetime: Duration,
    ) -> &Toast {
        let title = match title {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => severity.default_title().to_string(),
        };

        self.toasts.push(Toast {
            id: Uuid::new_v4(),
            severity,
            title,
            message: message.to_string(),
            expires_at: now + lifetime,
        });

        &self.toasts[self.toasts.len() - 1]
    }

    /// Removes and returns the ids of every toast whose lifetime has elapsed.
    pub fn expire(&mut self, now: Instant) -> Vec<Uuid> {
        let (expired, live): (Vec<Toast>, Vec<Toast>) = self
            .toasts
            .drain(..)
            .partition(|toast| toast.expires_at <= now);

        self.toasts = live;
        expired.into_iter().map(|toast| toast.id).collect()
    }

    pub fn dismiss(&mut self, id: Uuid) -> Option<Toast> {
        let index = self.toasts.iter().position(|toast| toast.id == id)?;
        Some(self.toasts.remove(index))
    }

    pub fn get(&self, id: Uuid) -> Option<&Toast> {
        self.toasts.iter().find(|toast| toast.id == id)
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

lazy_static! {
    static ref TOASTS: RwLock<ToastStack> = RwLock::new(ToastStack::new());
}

/// Appends a toast to `#toastContainer`. Does nothing when the page has none.
pub fn show_toast(message: &str, severity: Severity, title: Option<&str>) -> Result<()> {
    let Some(container) = element_by_id("toastContainer") else {
        debug!("No #toastContainer, dropping toast: {}", message);
        return Ok(());
    };
    install_dismiss_listener()?;

    let settings = config();
    let lifetime = Duration::from_millis(settings.toast_duration_ms as u64);

    let (id, html) = {
        let mut toasts = TOASTS
            .write()
            .map_err(|e| WebError::Js(format!("toast stack poisoned: {}", e)))?;
        let toast = toasts.push(message, severity, title, Instant::now(), lifetime);
        (toast.id, toast.to_html())
    };

    let element = document()?.create_element("div")?;
    element.set_class_name("toast show");
    element.set_attribute("role", "alert")?;
    element.set_attribute("data-toast-id", &id.to_string())?;
    element.set_inner_html(&html);
    container.append_child(&element)?;

    set_timeout(settings.toast_duration_ms, move || expire_toasts(id))
}

fn toast_element(id: Uuid) -> Option<Element> {
    query(&format!(r#"[data-toast-id="{}"]"#, id))
}

/// Fades a toast out and removes it from the page.
pub fn hide_toast(id: Uuid) {
    if let Ok(mut toasts) = TOASTS.write() {
        toasts.dismiss(id);
    }
    fade_out_toast(id);
}

/// Timer callback for `due`. Also takes down any other toast whose lifetime
/// has run out, since timers may fire late in background tabs.
fn expire_toasts(due: Uuid) {
    let expired = match TOASTS.write() {
        Ok(mut toasts) => {
            let mut expired = toasts.expire(Instant::now());
            if !expired.contains(&due) {
                toasts.dismiss(due);
                expired.push(due);
            }
            expired
        }
        Err(_) => vec![due],
    };

    for id in expired {
        fade_out_toast(id);
    }
}

fn fade_out_toast(id: Uuid) {
    let Some(element) = toast_element(id) else {
        return;
    };

    let _ = element.class_list().remove_1("show");
    let fade = config().toast_fade_ms;
    if let Err(e) = set_timeout(fade, move || element.remove()) {
        warn!("Could not schedule toast removal: {}", e);
    }
}

thread_local! {
    static DISMISS_INSTALLED: Cell<bool> = const { Cell::new(false) };
}

/// One document-level click listener closes every toast and alert, present
/// or future.
fn install_dismiss_listener() -> Result<()> {
    if DISMISS_INSTALLED.with(Cell::get) {
        return Ok(());
    }

    listen(&document()?.into(), "click", |event| {
        if let Some(target) = target_element(&event) {
            dismiss_from_click(&target);
        }
    })?;

    DISMISS_INSTALLED.with(|installed| installed.set(true));
    Ok(())
}

/// Closes the toast or alert owning a clicked close button. Returns whether
/// the click landed on one.
pub fn dismiss_from_click(target: &Element) -> bool {
    if let Some(button) = closest(target, ".toast .btn-close") {
        let id = closest(&button, "[data-toast-id]")
            .and_then(|toast| toast.get_attribute("data-toast-id"))
            .and_then(|id| Uuid::parse_str(&id).ok());

        if let Some(id) = id {
            hide_toast(id);
            return true;
        }
    }

    if let Some(button) = closest(target, ".alert .alert-close") {
        if let Some(alert) = closest(&button, ".alert") {
            slide_out(&alert);
            return true;
        }
    }

    false
}

/// Inner markup of an inline alert.
pub fn alert_html(message: &str) -> String {
    format!(
        r#"{} <button type="button" class="alert-close">&times;</button>"#,
        encode_safe(message)
    )
}

fn alert_class(kind: &str) -> String {
    let kind: String = kind
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();

    if kind.is_empty() {
        "alert alert-info".to_string()
    } else {
        format!("alert alert-{}", kind)
    }
}

/// Prepends an inline alert to `.main-content`.
pub fn show_alert(message: &str, kind: &str) -> Result<()> {
    let Some(main) = query(".main-content") else {
        debug!("No .main-content, dropping alert: {}", message);
        return Ok(());
    };
    install_dismiss_listener()?;

    let alert = document()?.create_element("div")?;
    alert.set_class_name(&alert_class(kind));
    alert.set_inner_html(&alert_html(message));
    main.insert_before(&alert, main.first_child().as_ref())?;

    schedule_alert_dismiss(&alert)
}

/// Slides an alert out once `alert_duration_ms` has passed.
pub fn schedule_alert_dismiss(alert: &Element) -> Result<()> {
    let target = alert.clone();
    set_timeout(config().alert_duration_ms, move || {
        if target.parent_node().is_some() {
            slide_out(&target);
        }
    })
}

/// Wires every `.alert` already present in the page.
pub fn wire_existing_alerts() -> Result<()> {
    install_dismiss_listener()?;
    for alert in query_all(".alert") {
        schedule_alert_dismiss(&alert)?;
    }
    Ok(())
}

fn slide_out(alert: &Element) {
    let fade = config().alert_fade_ms;
    let animation = format!("slideOut {}s ease forwards", fade as f64 / 1000.0);

    if let Err(e) = set_styles(alert, &[("animation", &animation)]) {
        warn!("Could not animate alert: {}", e);
    }

    let alert = alert.clone();
    if let Err(e) = set_timeout(fade, move || alert.remove()) {
        warn!("Could not schedule alert removal: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE_SECONDS: Duration = Duration::from_secs(5);

    #[test]
    fn error_toast_uses_danger_styling() {
        let mut stack = ToastStack::new();
        let toast = stack.push("Save failed", Severity::Error, None, Instant::now(), FIVE_SECONDS);

        assert_eq!(toast.title, "Error");
        let html = toast.to_html();
        assert!(html.contains("bg-danger"));
        assert!(html.contains("❌ Error"));
        assert!(html.contains(r#"<div class="toast-body">Save failed</div>"#));
    }

    #[test]
    fn toast_expires_after_its_lifetime() {
        let start = Instant::now();
        let mut stack = ToastStack::new();
        let id = stack.push("x", Severity::Error, None, start, FIVE_SECONDS).id;

        assert!(stack.expire(start + Duration::from_millis(4999)).is_empty());
        assert_eq!(stack.len(), 1);

        assert_eq!(stack.expire(start + FIVE_SECONDS), vec![id]);
        assert!(stack.is_empty());
    }

    #[test]
    fn expire_keeps_younger_toasts() {
        let start = Instant::now();
        let mut stack = ToastStack::new();
        let old = stack.push("old", Severity::Info, None, start, FIVE_SECONDS).id;
        let young = stack
            .push("young", Severity::Info, None, start + Duration::from_secs(3), FIVE_SECONDS)
            .id;

        assert_eq!(stack.expire(start + Duration::from_secs(6)), vec![old]);
        assert!(stack.get(young).is_some());
    }

    #[test]
    fn dismiss_removes_only_the_target() {
        let now = Instant::now();
        let mut stack = ToastStack::new();
        let a = stack.push("a", Severity::Success, Some("Saved"), now, FIVE_SECONDS).id;
        let b = stack.push("b", Severity::Warning, None, now, FIVE_SECONDS).id;

        assert_eq!(stack.dismiss(a).map(|t| t.title), Some("Saved".to_string()));
        assert!(stack.dismiss(a).is_none());
        assert_eq!(stack.len(), 1);
        assert!(stack.get(b).is_some());
    }

    #[test]
    fn empty_title_falls_back_to_default() {
        let mut stack = ToastStack::new();
        let toast = stack.push("m", Severity::Warning, Some(""), Instant::now(), FIVE_SECONDS);
        assert_eq!(toast.title, "Warning");
    }

    #[test]
    fn toast_text_is_escaped() {
        let mut stack = ToastStack::new();
        let html = stack
            .push("<b>hi</b>", Severity::Info, Some("a & b"), Instant::now(), FIVE_SECONDS)
            .to_html();

        assert!(html.contains("&lt;b&gt;hi&lt;&#x2F;b&gt;"));
        assert!(html.contains("a &amp; b"));
    }

    #[test]
    fn severities_parse() {
        assert_eq!("success".parse::<Severity>(), Ok(Severity::Success));
        assert_eq!("danger".parse::<Severity>(), Ok(Severity::Error));
        assert!("loud".parse::<Severity>().is_err());
        assert_eq!(Severity::default().bg_class(), "bg-info");
    }

    #[test]
    fn alert_markup() {
        assert_eq!(alert_class("success"), "alert alert-success");
        assert_eq!(alert_class("\" onclick=\"x"), "alert alert-onclickx");
        assert_eq!(alert_class(""), "alert alert-info");
        assert!(alert_html("Saved <now>").starts_with("Saved &lt;now&gt; <button"));
    }
}
