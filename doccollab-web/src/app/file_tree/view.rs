use doccollab_protocol::{FileId, FolderId};
use log::error;
use web_sys::Element;

use super::{FileAction, FolderAction, ToolbarAction, TreeEvent};
use crate::utils::dom::{closest, query_all_in, window};

/// Where the file tree draws itself.
pub trait TreeView {
    /// Replaces the widget markup.
    fn render(&self, html: &str);

    /// Moves the selection highlight without a full re-render.
    fn set_selected(&self, file_id: FileId);

    fn set_collapsed(&self, folder_id: FolderId, collapsed: bool);

    fn open_in_new_tab(&self, url: &str);

    fn navigate(&self, url: &str);
}

/// Renders into a container element of the page.
pub struct DomTreeView {
    container: Element,
}

impl DomTreeView {
    pub fn new(container: Element) -> Self {
        Self { container }
    }

    pub fn container(&self) -> &Element {
        &self.container
    }
}

impl TreeView for DomTreeView {
    fn render(&self, html: &str) {
        self.container.set_inner_html(html);
    }

    fn set_selected(&self, file_id: FileId) {
        for item in query_all_in(&self.container, ".file-tree-item.file") {
            let _ = item.class_list().remove_1("selected");
        }

        let selector = format!(r#"[data-file-id="{}"]"#, file_id);
        if let Ok(Some(item)) = self.container.query_selector(&selector) {
            let _ = item.class_list().add_1("selected");
        }
    }

    fn set_collapsed(&self, folder_id: FolderId, collapsed: bool) {
        let selector = format!(r#".file-tree-item.folder[data-folder-id="{}"]"#, folder_id);
        if let Ok(Some(item)) = self.container.query_selector(&selector) {
            let _ = item.class_list().toggle_with_force("collapsed", collapsed);
        }
    }

    fn open_in_new_tab(&self, url: &str) {
        let opened = window().map_err(|e| e.to_string()).and_then(|w| {
            w.open_with_url_and_target(url, "_blank")
                .map_err(|e| format!("{:?}", e))
        });

        if let Err(e) = opened {
            error!("Could not open {}: {}", url, e);
        }
    }

    fn navigate(&self, url: &str) {
        let navigated = window()
            .map_err(|e| e.to_string())
            .and_then(|w| w.location().set_href(url).map_err(|e| format!("{:?}", e)));

        if let Err(e) = navigated {
            error!("Could not navigate to {}: {}", url, e);
        }
    }
}

fn data_id(item: &Element, attribute: &str) -> Option<u64> {
    item.get_attribute(attribute)?.parse().ok()
}

/// Decodes a click inside the widget. Action buttons win over toolbar buttons,
/// which win over selecting a file or toggling a folder.
pub fn decode_click(target: &Element) -> Option<TreeEvent> {
    if let Some(button) = closest(target, ".file-tree-item-actions [data-action]") {
        let action = button.get_attribute("data-action")?;
        let item = closest(&button, ".file-tree-item")?;

        if let Some(file_id) = data_id(&item, "data-file-id") {
            return Some(TreeEvent::File(action.parse::<FileAction>().ok()?, file_id));
        }
        let folder_id = data_id(&item, "data-folder-id")?;
        return Some(TreeEvent::Folder(action.parse::<FolderAction>().ok()?, folder_id));
    }

    // Padding around the action buttons neither selects nor toggles.
    if closest(target, ".file-tree-item-actions").is_some() {
        return None;
    }

    if let Some(button) = closest(target, ".file-tree-actions button[id]") {
        return ToolbarAction::from_button_id(&button.id()).map(TreeEvent::Toolbar);
    }

    if let Some(item) = closest(target, ".file-tree-item.file") {
        return data_id(&item, "data-file-id").map(TreeEvent::SelectFile);
    }

    let content = closest(target, ".file-tree-item-content")?;
    let folder = closest(&content, ".file-tree-item.folder")?;
    data_id(&folder, "data-folder-id").map(TreeEvent::ToggleFolder)
}
