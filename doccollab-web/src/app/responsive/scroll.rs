use web_sys::{Element, ScrollBehavior, ScrollToOptions};

use crate::app::config::config;
use crate::utils::{
    Result,
    dom::{document, listen, set_styles, window},
};

const BUTTON_STYLE: &str = "position: fixed; bottom: 20px; right: 20px; width: 50px; height: 50px; \
border-radius: 50%; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; \
border: none; font-size: 20px; cursor: pointer; opacity: 0; visibility: hidden; \
transition: all 0.3s ease; z-index: 1000; box-shadow: 0 4px 15px rgba(0,0,0,0.2);";

pub fn scroll_button_visible(offset: f64, threshold: f64) -> bool {
    offset > threshold
}

fn visibility_styles(visible: bool) -> [(&'static str, &'static str); 2] {
    if visible {
        [("opacity", "1"), ("visibility", "visible")]
    } else {
        [("opacity", "0"), ("visibility", "hidden")]
    }
}

/// Adds the floating scroll-to-top button to the body. Visibility follows
/// the threshold in the current config.
pub fn init_scroll_to_top() -> Result<Element> {
    let document = document()?;
    let button = document.create_element("button")?;
    button.set_class_name("scroll-to-top");
    button.set_inner_html("&uarr;");
    button.set_attribute("style", BUTTON_STYLE)?;
    button.set_attribute("aria-label", "Scroll to top")?;

    if let Some(body) = document.body() {
        body.append_child(&button)?;
    }

    listen(&button, "click", |_| {
        if let Ok(window) = window() {
            let options = ScrollToOptions::new();
            options.set_top(0.0);
            options.set_behavior(ScrollBehavior::Smooth);
            window.scroll_to_with_scroll_to_options(&options);
        }
    })?;

    let target = button.clone();
    listen(&window()?.into(), "scroll", move |_| {
        let offset = window()
            .and_then(|w| Ok(w.page_y_offset()?))
            .unwrap_or_default();
        let _ = set_styles(
            &target,
            &visibility_styles(scroll_button_visible(
                offset,
                config().scroll_top_threshold_px,
            )),
        );
    })?;

    Ok(button)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_only_past_threshold() {
        assert!(!scroll_button_visible(0.0, 300.0));
        assert!(!scroll_button_visible(300.0, 300.0));
        assert!(scroll_button_visible(301.0, 300.0));
    }

    #[test]
    fn styles_follow_visibility() {
        assert_eq!(visibility_styles(true)[0], ("opacity", "1"));
        assert_eq!(visibility_styles(false)[1], ("visibility", "hidden"));
    }
}
