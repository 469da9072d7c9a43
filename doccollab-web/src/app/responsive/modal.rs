use log::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use crate::utils::{
    Result,
    dom::{element_by_id, listen, query_all, target_element},
    timer::set_timeout,
};

const ACTIVE: &str = "active";
const FOCUS_DELAY_MS: u32 = 100;

/// Opens the modal with `id` and focuses its first field shortly after.
pub fn show_modal(id: &str) -> Result<()> {
    let Some(modal) = element_by_id(id) else {
        debug!("No modal #{}", id);
        return Ok(());
    };

    modal.class_list().add_1(ACTIVE)?;

    let first_input = modal
        .query_selector("input, textarea, select")
        .ok()
        .flatten()
        .and_then(|e| e.dyn_into::<HtmlElement>().ok());

    if let Some(input) = first_input {
        set_timeout(FOCUS_DELAY_MS, move || {
            if let Err(e) = input.focus() {
                warn!("Could not focus modal field: {:?}", e);
            }
        })?;
    }

    Ok(())
}

pub fn hide_modal(id: &str) {
    if let Some(modal) = element_by_id(id) {
        close(&modal);
    }
}

fn close(modal: &Element) {
    let _ = modal.class_list().remove_1(ACTIVE);
}

/// Close button, backdrop click and Escape for every `.modal` on the page.
pub fn wire_modals() -> Result<()> {
    for modal in query_all(".modal") {
        if let Ok(Some(close_button)) = modal.query_selector(".modal-close") {
            let target = modal.clone();
            listen(&close_button, "click", move |_| close(&target))?;
        }

        let target = modal.clone();
        listen(&modal, "click", move |event| {
            // Only the backdrop itself, not clicks bubbling from the dialog.
            if target_element(&event).as_ref() == Some(&target) {
                close(&target);
            }
        })?;
    }

    Ok(())
}

/// Closes every open modal.
pub fn close_all_modals() {
    for modal in query_all(".modal.active") {
        close(&modal);
    }
}
