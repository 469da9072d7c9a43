use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{info, warn};
use wasm_bindgen::JsCast;
use web_sys::{Event, KeyboardEvent, TouchEvent};

use crate::app::config::{WebConfig, config, set_config};
use crate::app::notifications::wire_existing_alerts;
use crate::app::title::init_title_notifier;
use crate::utils::{
    Result,
    dom::{document, listen, window},
    timer::Debounced,
};

pub mod dropdown;
pub mod gesture;
pub mod layout;
pub mod menu;
pub mod modal;
pub mod scroll;
pub mod search;

use dropdown::{Dropdowns, close_on_outside_click, init_dropdowns};
use gesture::SwipeDetector;
use layout::update_editor_layout;
use menu::{NavMenu, close_members_panel};
use modal::{close_all_modals, wire_modals};
use scroll::init_scroll_to_top;
use search::{handle_shortcut, wire_group_search};

const ANIMATIONS_CSS: &str = "@keyframes slideOut { \
from { opacity: 1; transform: translateY(0); } \
to { opacity: 0; transform: translateY(-20px); } } \
.scroll-to-top:hover { transform: translateY(-2px); box-shadow: 0 6px 20px rgba(0,0,0,0.3); }";

thread_local! {
    static INITIALIZED: Cell<bool> = const { Cell::new(false) };
}

/// Wires the page-wide behaviors once. Later calls only replace the config.
pub fn init_responsive(config: WebConfig) -> Result<()> {
    set_config(config.clone());

    if INITIALIZED.with(|done| done.replace(true)) {
        return Ok(());
    }

    inject_styles()?;

    let nav = NavMenu::find();
    if let Some(nav) = &nav {
        nav.wire()?;
    }

    let dropdowns = init_dropdowns()?;
    wire_layout(&config)?;
    wire_swipe(nav.clone(), config.swipe_threshold_px)?;
    wire_modals()?;
    wire_existing_alerts()?;
    init_scroll_to_top()?;
    wire_group_search()?;
    wire_page_events(nav, dropdowns)?;
    init_title_notifier();

    info!("Responsive layout initialized");
    Ok(())
}

fn inject_styles() -> Result<()> {
    let document = document()?;
    let style = document.create_element("style")?;
    style.set_text_content(Some(ANIMATIONS_CSS));

    if let Some(head) = document.head() {
        head.append_child(&style)?;
    }
    Ok(())
}

/// The resize listener reads the current config each time it fires, so a
/// later `init_responsive` call takes effect.
fn wire_layout(initial: &WebConfig) -> Result<()> {
    update_editor_layout(initial);

    let debounced = Rc::new(RefCell::new(Debounced::new(initial.resize_debounce_ms)));

    listen(&window()?.into(), "resize", move |_| {
        let mut debounced = debounced.borrow_mut();
        debounced.set_delay(config().resize_debounce_ms);

        if let Err(e) = debounced.call(|| update_editor_layout(&config())) {
            warn!("Could not schedule layout update: {}", e);
        }
    })
}

fn wire_swipe(nav: Option<NavMenu>, threshold: f64) -> Result<()> {
    let document = document()?;
    let detector = Rc::new(RefCell::new(SwipeDetector::new(threshold)));

    let on_start = detector.clone();
    listen(&document, "touchstart", move |event: Event| {
        let Some(touch) = event
            .dyn_ref::<TouchEvent>()
            .and_then(|e| e.touches().get(0))
        else {
            return;
        };
        on_start
            .borrow_mut()
            .touch_start(touch.client_x() as f64, touch.client_y() as f64);
    })?;

    listen(&document, "touchend", move |event: Event| {
        let Some(touch) = event
            .dyn_ref::<TouchEvent>()
            .and_then(|e| e.changed_touches().get(0))
        else {
            return;
        };

        let swiped_left = {
            let mut detector = detector.borrow_mut();
            detector.set_threshold(config().swipe_threshold_px);
            detector.touch_end(touch.client_x() as f64, touch.client_y() as f64)
        };

        if let Some(nav) = nav.as_ref().filter(|nav| swiped_left && nav.is_open()) {
            nav.close();
        }
    })
}

fn wire_page_events(nav: Option<NavMenu>, dropdowns: Dropdowns) -> Result<()> {
    let document = document()?;

    let on_click_nav = nav.clone();
    let on_click_dropdowns = dropdowns.clone();
    listen(&document, "click", move |event| {
        if let Some(nav) = &on_click_nav {
            nav.close_on_outside_click(&event);
        }
        close_on_outside_click(&on_click_dropdowns, &event);
    })?;

    listen(&document, "keydown", move |event| {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };

        if handle_shortcut(event) {
            return;
        }

        if event.key() == "Escape" {
            dropdowns.close_all();
            if let Some(nav) = &nav {
                nav.close();
            }
            close_all_modals();
            close_members_panel();
        }
    })
}
