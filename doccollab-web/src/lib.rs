use std::rc::Rc;

use doccollab_client::DocCollabClient;
use doccollab_protocol::{FileEntry, Folder};
use log::{debug, error, info, warn};
use wasm_bindgen::{JsCast, prelude::*};
use wasm_bindgen_futures::{future_to_promise, spawn_local};
use web_sys::{Element, Event};

pub mod app;
pub mod utils;

use app::{
    WebConfig, config_or_page,
    dialogs::BrowserDialogs,
    file_tree::{
        FileTreeManager,
        view::{DomTreeView, decode_click},
    },
    notifications::{self, Severity},
    responsive::{self, menu, modal},
    title,
};
use utils::{WebError, dom::{element_by_id, target_element}};

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

#[wasm_bindgen(start)]
pub fn start() {
    init_panic_hook();
    wasm_logger::init(wasm_logger::Config::new(log::Level::Info));

    info!("Starting DocCollab web client");
}

type BrowserFileTree = FileTreeManager<DocCollabClient, BrowserDialogs, DomTreeView>;

/// The project file tree widget, rendered into a container element.
#[wasm_bindgen]
pub struct FileTree {
    manager: Rc<BrowserFileTree>,
    container: Element,
    on_click: Closure<dyn FnMut(Event)>,
}

#[wasm_bindgen]
impl FileTree {
    /// `config` is optional; without it the page-wide settings apply.
    #[wasm_bindgen(constructor)]
    pub fn new(project_id: u32, container_id: &str, config: JsValue) -> Result<FileTree, JsValue> {
        let container = element_by_id(container_id)
            .ok_or_else(|| WebError::MissingElement(container_id.to_string()))?;

        let base = config_or_page(config)?.resolve_api_base()?;
        let client = DocCollabClient::new(&base, project_id as u64)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let manager = Rc::new(FileTreeManager::new(
            client,
            BrowserDialogs,
            DomTreeView::new(container.clone()),
        ));

        let on_click = {
            let manager = manager.clone();
            Closure::wrap(Box::new(move |event: Event| {
                let Some(tree_event) = target_element(&event).and_then(|t| decode_click(&t)) else {
                    return;
                };

                debug!("File tree event {:?}", tree_event);
                let manager = manager.clone();
                spawn_local(async move {
                    let outcome = manager.dispatch(tree_event).await;
                    debug!("{:?} finished: {:?}", tree_event, outcome);
                });
            }) as Box<dyn FnMut(Event)>)
        };

        container.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;

        let loader = manager.clone();
        spawn_local(async move {
            if let Err(e) = loader.init().await {
                error!("Initial file listing failed: {}", e);
            }
        });

        Ok(FileTree {
            manager,
            container,
            on_click,
        })
    }

    #[wasm_bindgen(getter, js_name = projectId)]
    pub fn project_id(&self) -> u32 {
        self.manager.project_id() as u32
    }

    #[wasm_bindgen(getter, js_name = apiBase)]
    pub fn api_base(&self) -> String {
        self.manager.api().base().to_string()
    }

    /// Fetches the listing again. The promise rejects when the request fails.
    pub fn reload(&self) -> js_sys::Promise {
        let manager = self.manager.clone();
        future_to_promise(async move {
            manager
                .load_files()
                .await
                .map(|_| JsValue::UNDEFINED)
                .map_err(|e| JsValue::from_str(&e.to_string()))
        })
    }

    #[wasm_bindgen(js_name = selectFile)]
    pub fn select_file(&self, file_id: u32) -> bool {
        self.manager.select_file(file_id as u64)
    }

    /// `callback(file)` runs after a file is selected.
    #[wasm_bindgen(js_name = onFileSelect)]
    pub fn on_file_select(&self, callback: js_sys::Function) {
        self.manager
            .set_on_file_select(move |file| call_with(&callback, file));
    }

    #[wasm_bindgen(js_name = onFileCreate)]
    pub fn on_file_create(&self, callback: js_sys::Function) {
        self.manager
            .set_on_file_create(move |file: &FileEntry| call_with(&callback, file));
    }

    #[wasm_bindgen(js_name = onFolderCreate)]
    pub fn on_folder_create(&self, callback: js_sys::Function) {
        self.manager
            .set_on_folder_create(move |folder: &Folder| call_with(&callback, folder));
    }
}

impl Drop for FileTree {
    fn drop(&mut self) {
        let _ = self
            .container
            .remove_event_listener_with_callback("click", self.on_click.as_ref().unchecked_ref());
    }
}

fn call_with<T: serde::Serialize>(callback: &js_sys::Function, value: &T) {
    match serde_wasm_bindgen::to_value(value) {
        Ok(arg) => {
            if let Err(e) = callback.call1(&JsValue::NULL, &arg) {
                error!("File tree callback threw: {:?}", e);
            }
        }
        Err(e) => error!("Could not pass value to callback: {}", e),
    }
}

#[wasm_bindgen(js_name = showToast)]
pub fn show_toast(message: &str, kind: Option<String>, title: Option<String>) -> Result<(), JsValue> {
    let severity = kind
        .as_deref()
        .map(|k| {
            k.parse::<Severity>().unwrap_or_else(|e| {
                warn!("{}, using info", e);
                Severity::Info
            })
        })
        .unwrap_or_default();

    notifications::show_toast(message, severity, title.as_deref())?;
    Ok(())
}

#[wasm_bindgen(js_name = showAlert)]
pub fn show_alert(message: &str, kind: Option<String>) -> Result<(), JsValue> {
    notifications::show_alert(message, kind.as_deref().unwrap_or("info"))?;
    Ok(())
}

#[wasm_bindgen(js_name = notifyNewMessage)]
pub fn notify_new_message() -> Result<(), JsValue> {
    title::notify_new_message()?;
    Ok(())
}

#[wasm_bindgen(js_name = resetTitle)]
pub fn reset_title() -> Result<(), JsValue> {
    title::reset_title()?;
    Ok(())
}

#[wasm_bindgen(js_name = formatTimestamp)]
pub fn format_timestamp(iso: &str) -> String {
    app::format::format_timestamp(iso)
}

#[wasm_bindgen(js_name = showModal)]
pub fn show_modal(id: &str) -> Result<(), JsValue> {
    modal::show_modal(id)?;
    Ok(())
}

#[wasm_bindgen(js_name = hideModal)]
pub fn hide_modal(id: &str) {
    modal::hide_modal(id);
}

#[wasm_bindgen(js_name = toggleSidebar)]
pub fn toggle_sidebar() {
    menu::toggle_sidebar();
}

#[wasm_bindgen(js_name = toggleMembersPanel)]
pub fn toggle_members_panel() {
    menu::toggle_members_panel();
}

/// Wires navigation, dropdowns, layout, modals and the other page behaviors.
/// `config` is an optional object of `WebConfig` overrides.
#[wasm_bindgen(js_name = initResponsive)]
pub fn init_responsive(config: JsValue) -> Result<(), JsValue> {
    let config = WebConfig::from_js(config)?;
    responsive::init_responsive(config)?;
    Ok(())
}
