use log::{debug, warn};

use crate::app::config::WebConfig;
use crate::utils::dom::{query, set_styles, window};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
}

impl Breakpoint {
    pub fn from_width(width: f64, config: &WebConfig) -> Self {
        if width <= config.mobile_max_width {
            Breakpoint::Mobile
        } else if width <= config.tablet_max_width {
            Breakpoint::Tablet
        } else {
            Breakpoint::Desktop
        }
    }
}

/// Grid of `.editor-container` and the `order` of its three panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutSpec {
    pub columns: &'static str,
    pub rows: &'static str,
    pub height: &'static str,
    /// Sidebar, editor and PDF panel.
    pub order: [&'static str; 3],
}

pub const PANELS: [&str; 3] = [".sidebar", ".editor-panel", ".pdf-panel"];

impl LayoutSpec {
    pub fn for_breakpoint(breakpoint: Breakpoint) -> Self {
        match breakpoint {
            Breakpoint::Mobile => LayoutSpec {
                columns: "1fr",
                rows: "auto auto auto",
                height: "auto",
                order: ["1", "2", "3"],
            },
            Breakpoint::Tablet => LayoutSpec {
                columns: "250px 1fr 350px",
                rows: "1fr",
                height: "calc(100vh - 120px)",
                order: ["0", "0", "0"],
            },
            Breakpoint::Desktop => LayoutSpec {
                columns: "300px 1fr 400px",
                rows: "1fr",
                height: "calc(100vh - 120px)",
                order: ["0", "0", "0"],
            },
        }
    }
}

/// Applies the layout matching the current window width.
pub fn update_editor_layout(config: &WebConfig) {
    let Some(container) = query(".editor-container") else {
        return;
    };

    let width = match window().map(|w| w.inner_width()) {
        Ok(Ok(width)) => width.as_f64().unwrap_or_default(),
        _ => return,
    };

    let breakpoint = Breakpoint::from_width(width, config);
    let spec = LayoutSpec::for_breakpoint(breakpoint);
    debug!("Editor layout {:?} for width {}", breakpoint, width);

    let applied = set_styles(
        &container,
        &[
            ("grid-template-columns", spec.columns),
            ("grid-template-rows", spec.rows),
            ("height", spec.height),
        ],
    );
    if let Err(e) = applied {
        warn!("Could not apply editor layout: {}", e);
        return;
    }

    for (selector, order) in PANELS.iter().zip(spec.order) {
        if let Ok(Some(panel)) = container.query_selector(selector) {
            let _ = set_styles(&panel, &[("order", order)]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoints_are_inclusive() {
        let config = WebConfig::default();

        assert_eq!(Breakpoint::from_width(320.0, &config), Breakpoint::Mobile);
        assert_eq!(Breakpoint::from_width(768.0, &config), Breakpoint::Mobile);
        assert_eq!(Breakpoint::from_width(769.0, &config), Breakpoint::Tablet);
        assert_eq!(Breakpoint::from_width(1024.0, &config), Breakpoint::Tablet);
        assert_eq!(Breakpoint::from_width(1025.0, &config), Breakpoint::Desktop);
    }

    #[test]
    fn mobile_stacks_panels_in_order() {
        let spec = LayoutSpec::for_breakpoint(Breakpoint::Mobile);

        assert_eq!(spec.columns, "1fr");
        assert_eq!(spec.rows, "auto auto auto");
        assert_eq!(spec.order, ["1", "2", "3"]);
    }

    #[test]
    fn wider_layouts_reset_order() {
        let tablet = LayoutSpec::for_breakpoint(Breakpoint::Tablet);
        let desktop = LayoutSpec::for_breakpoint(Breakpoint::Desktop);

        assert_eq!(tablet.columns, "250px 1fr 350px");
        assert_eq!(desktop.columns, "300px 1fr 400px");
        assert_eq!(desktop.height, "calc(100vh - 120px)");
        assert_eq!(tablet.order, ["0"; 3]);
    }

    #[test]
    fn custom_breakpoints() {
        let config = WebConfig {
            mobile_max_width: 600.0,
            ..WebConfig::default()
        };
        assert_eq!(Breakpoint::from_width(700.0, &config), Breakpoint::Tablet);
    }
}
