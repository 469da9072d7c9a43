use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlInputElement, KeyboardEvent};

use crate::utils::{
    Result,
    dom::{element_by_id, listen, query_all, set_styles},
};

pub const SEARCH_INPUT_ID: &str = "searchGroups";

/// Case-insensitive substring match of a group name.
pub fn group_matches(name: &str, query: &str) -> bool {
    name.to_lowercase().contains(&query.to_lowercase())
}

/// Ctrl+K or Cmd+K.
pub fn is_search_shortcut(key: &str, ctrl: bool, meta: bool) -> bool {
    (ctrl || meta) && key.eq_ignore_ascii_case("k")
}

/// Hides `.group-item` entries whose `h6` does not contain `query`.
pub fn filter_groups(query: &str) {
    for group in query_all(".group-item") {
        let name = group
            .query_selector("h6")
            .ok()
            .flatten()
            .and_then(|h| h.text_content())
            .unwrap_or_default();

        let display = if group_matches(&name, query) { "block" } else { "none" };
        let _ = set_styles(&group, &[("display", display)]);
    }
}

pub fn wire_group_search() -> Result<()> {
    let Some(input) = element_by_id(SEARCH_INPUT_ID) else {
        return Ok(());
    };

    listen(&input, "input", |event: Event| {
        if let Some(input) = event
            .target()
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
        {
            filter_groups(&input.value());
        }
    })
}

/// Focuses the group search on Ctrl/Cmd+K. Returns whether the key was handled.
pub fn handle_shortcut(event: &KeyboardEvent) -> bool {
    if !is_search_shortcut(&event.key(), event.ctrl_key(), event.meta_key()) {
        return false;
    }

    event.prevent_default();
    if let Some(input) = element_by_id(SEARCH_INPUT_ID)
        .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
    {
        let _ = input.focus();
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_ignores_case() {
        assert!(group_matches("Thesis Group", "thesis"));
        assert!(group_matches("Thesis Group", "GROUP"));
        assert!(group_matches("anything", ""));
        assert!(!group_matches("Physics", "math"));
    }

    #[test]
    fn shortcut_needs_a_modifier() {
        assert!(is_search_shortcut("k", true, false));
        assert!(is_search_shortcut("k", false, true));
        assert!(is_search_shortcut("K", true, false));
        assert!(!is_search_shortcut("k", false, false));
        assert!(!is_search_shortcut("j", true, false));
    }
}
