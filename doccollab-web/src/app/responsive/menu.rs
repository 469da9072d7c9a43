use web_sys::{Element, Event, Node};

use crate::utils::{
    Result,
    dom::{element_by_id, listen, query, query_all_in, target_element},
};

const ACTIVE: &str = "active";
const OPEN: &str = "open";

/// The collapsible navigation of small screens: `#navToggle` and `#navMenu`.
#[derive(Clone)]
pub struct NavMenu {
    toggle: Element,
    menu: Element,
}

impl NavMenu {
    /// `None` when the page has no mobile navigation.
    pub fn find() -> Option<Self> {
        Some(Self {
            toggle: element_by_id("navToggle")?,
            menu: element_by_id("navMenu")?,
        })
    }

    pub fn is_open(&self) -> bool {
        self.menu.class_list().contains(ACTIVE)
    }

    pub fn toggle(&self) {
        let _ = self.menu.class_list().toggle(ACTIVE);
        let _ = self.toggle.class_list().toggle(ACTIVE);
    }

    pub fn close(&self) {
        let _ = self.menu.class_list().remove_1(ACTIVE);
        let _ = self.toggle.class_list().remove_1(ACTIVE);
    }

    fn contains_target(&self, event: &Event) -> bool {
        let Some(target) = target_element(event) else {
            return false;
        };
        let node: &Node = &target;

        self.toggle.contains(Some(node)) || self.menu.contains(Some(node))
    }

    /// Closes the menu when a page click lands outside it.
    pub fn close_on_outside_click(&self, event: &Event) {
        if !self.contains_target(event) {
            self.close();
        }
    }

    pub fn wire(&self) -> Result<()> {
        let nav = self.clone();
        listen(&self.toggle, "click", move |_| nav.toggle())?;

        for link in query_all_in(&self.menu, ".nav-link") {
            let nav = self.clone();
            listen(&link, "click", move |_| nav.close())?;
        }

        Ok(())
    }
}

/// Shows or hides the chat sidebar on small screens.
pub fn toggle_sidebar() {
    if let Some(sidebar) = query(".chat-sidebar") {
        let _ = sidebar.class_list().toggle(OPEN);
    }
}

pub fn toggle_members_panel() {
    if let Some(panel) = element_by_id("membersPanel") {
        let _ = panel.class_list().toggle(OPEN);
    }
}

pub fn close_members_panel() {
    if let Some(panel) = element_by_id("membersPanel") {
        let _ = panel.class_list().remove_1(OPEN);
    }
}
