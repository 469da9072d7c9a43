use wasm_bindgen::{JsCast, prelude::Closure};
use web_sys::{Document, Element, Event, EventTarget, HtmlElement};

use super::error::{Result, WebError};

pub fn window() -> Result<web_sys::Window> {
    web_sys::window().ok_or(WebError::NoWindow)
}

pub fn document() -> Result<Document> {
    window()?.document().ok_or(WebError::NoDocument)
}

pub fn element_by_id(id: &str) -> Option<Element> {
    document().ok()?.get_element_by_id(id)
}

pub fn query(selector: &str) -> Option<Element> {
    document().ok()?.query_selector(selector).ok().flatten()
}

/// All elements under `root` matching `selector`, as `Element`s.
pub fn query_all_in(root: &Element, selector: &str) -> Vec<Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };

    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn query_all(selector: &str) -> Vec<Element> {
    match document().ok().and_then(|doc| doc.document_element()) {
        Some(root) => query_all_in(&root, selector),
        None => Vec::new(),
    }
}

/// The event target as an `Element`, if it is one.
pub fn target_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

pub fn closest(element: &Element, selector: &str) -> Option<Element> {
    element.closest(selector).ok().flatten()
}

pub fn set_styles(element: &Element, styles: &[(&str, &str)]) -> Result<()> {
    let element = element
        .dyn_ref::<HtmlElement>()
        .ok_or_else(|| WebError::Js("element is not an HtmlElement".to_string()))?;
    let style = element.style();

    for (property, value) in styles {
        style.set_property(property, value)?;
    }

    Ok(())
}

/// Registers a listener for the whole page lifetime.
pub fn listen<F>(target: &EventTarget, event_name: &str, handler: F) -> Result<()>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
