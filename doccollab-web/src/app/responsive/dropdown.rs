use std::cell::RefCell;
use std::rc::Rc;

use log::warn;
use web_sys::Element;

use crate::utils::{
    Result,
    dom::{closest, listen, query_all, set_styles, target_element},
};

/// Open state of every `.dropdown` on the page, by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropdownSet {
    open: Vec<bool>,
}

impl DropdownSet {
    pub fn new(count: usize) -> Self {
        Self {
            open: vec![false; count],
        }
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open.get(index).copied().unwrap_or(false)
    }

    pub fn open_count(&self) -> usize {
        self.open.iter().filter(|open| **open).count()
    }

    pub fn hover_enter(&mut self, index: usize) {
        if let Some(open) = self.open.get_mut(index) {
            *open = true;
        }
    }

    pub fn hover_leave(&mut self, index: usize) {
        if let Some(open) = self.open.get_mut(index) {
            *open = false;
        }
    }

    /// Flips one dropdown and closes all the others.
    pub fn toggle(&mut self, index: usize) {
        let was_open = self.is_open(index);
        self.close_all();
        if let Some(open) = self.open.get_mut(index) {
            *open = !was_open;
        }
    }

    pub fn close_all(&mut self) {
        self.open.iter_mut().for_each(|open| *open = false);
    }
}

/// Inline styles of a dropdown menu.
pub fn menu_styles(open: bool) -> [(&'static str, &'static str); 3] {
    if open {
        [
            ("opacity", "1"),
            ("visibility", "visible"),
            ("transform", "translateY(0)"),
        ]
    } else {
        [
            ("opacity", "0"),
            ("visibility", "hidden"),
            ("transform", "translateY(-10px)"),
        ]
    }
}

/// Dropdowns found on the page with their shared open state.
#[derive(Clone)]
pub struct Dropdowns {
    menus: Rc<Vec<Element>>,
    state: Rc<RefCell<DropdownSet>>,
}

impl Dropdowns {
    fn sync(&self) {
        let state = self.state.borrow();
        for (index, menu) in self.menus.iter().enumerate() {
            if let Err(e) = set_styles(menu, &menu_styles(state.is_open(index))) {
                warn!("Could not style dropdown menu: {}", e);
            }
        }
    }

    fn update(&self, f: impl FnOnce(&mut DropdownSet)) {
        f(&mut self.state.borrow_mut());
        self.sync();
    }

    pub fn close_all(&self) {
        self.update(DropdownSet::close_all);
    }
}

/// Wires hover, click-to-toggle and click-outside for every `.dropdown` that has
/// both a toggle and a menu.
pub fn init_dropdowns() -> Result<Dropdowns> {
    let mut roots = Vec::new();
    let mut toggles = Vec::new();
    let mut menus = Vec::new();

    for dropdown in query_all(".dropdown") {
        let toggle = dropdown.query_selector(".dropdown-toggle").ok().flatten();
        let menu = dropdown.query_selector(".dropdown-menu").ok().flatten();
        if let (Some(toggle), Some(menu)) = (toggle, menu) {
            roots.push(dropdown);
            toggles.push(toggle);
            menus.push(menu);
        }
    }

    let dropdowns = Dropdowns {
        state: Rc::new(RefCell::new(DropdownSet::new(menus.len()))),
        menus: Rc::new(menus),
    };

    for (index, (root, toggle)) in roots.iter().zip(&toggles).enumerate() {
        let on_enter = dropdowns.clone();
        listen(root, "mouseenter", move |_| {
            on_enter.update(|set| set.hover_enter(index))
        })?;

        let on_leave = dropdowns.clone();
        listen(root, "mouseleave", move |_| {
            on_leave.update(|set| set.hover_leave(index))
        })?;

        let on_click = dropdowns.clone();
        listen(toggle, "click", move |event| {
            event.prevent_default();
            event.stop_propagation();
            on_click.update(|set| set.toggle(index));
        })?;
    }

    Ok(dropdowns)
}

/// True when a page click landed outside every dropdown.
pub fn is_outside_dropdowns(target: Option<&Element>) -> bool {
    target.and_then(|t| closest(t, ".dropdown")).is_none()
}

pub fn close_on_outside_click(dropdowns: &Dropdowns, event: &web_sys::Event) {
    if is_outside_dropdowns(target_element(event).as_ref()) {
        dropdowns.close_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_closes_siblings() {
        let mut set = DropdownSet::new(3);
        set.toggle(0);
        set.toggle(2);

        assert!(!set.is_open(0));
        assert!(set.is_open(2));
        assert_eq!(set.open_count(), 1);

        set.toggle(2);
        assert_eq!(set.open_count(), 0);
    }

    #[test]
    fn hover_opens_and_closes() {
        let mut set = DropdownSet::new(2);
        set.hover_enter(1);
        assert!(set.is_open(1));

        set.hover_leave(1);
        assert!(!set.is_open(1));
    }

    #[test]
    fn close_all_and_out_of_range() {
        let mut set = DropdownSet::new(2);
        set.hover_enter(0);
        set.hover_enter(1);
        set.toggle(7);
        assert_eq!(set.open_count(), 0);

        set.hover_enter(0);
        set.close_all();
        assert!(!set.is_open(0));
        assert!(!set.is_open(9));
    }

    #[test]
    fn menu_style_values() {
        assert_eq!(menu_styles(true)[2], ("transform", "translateY(0)"));
        assert_eq!(menu_styles(false)[1], ("visibility", "hidden"));
    }
}
