use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use js_sys::Uint8Array;
use log::{debug, error, warn};
use wasm_bindgen::{JsCast, prelude::Closure};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, HtmlInputElement};

use crate::utils::dom::{document, window};

/// A file chosen by the user, already read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub name: String,
    pub data: Vec<u8>,
}

/// User interaction the file tree needs from its host.
#[async_trait(?Send)]
pub trait Dialogs {
    /// `None` when the user cancels.
    async fn prompt(&self, message: &str, default: Option<&str>) -> Option<String>;

    async fn confirm(&self, message: &str) -> bool;

    async fn alert(&self, message: &str);

    /// Lets the user choose files matching `accept`; empty when cancelled.
    async fn pick_files(&self, accept: &str, multiple: bool) -> Vec<PickedFile>;
}

/// `window.prompt/confirm/alert` and a hidden file input.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserDialogs;

#[async_trait(?Send)]
impl Dialogs for BrowserDialogs {
    async fn prompt(&self, message: &str, default: Option<&str>) -> Option<String> {
        let window = window().ok()?;
        let answer = match default {
            Some(default) => window.prompt_with_message_and_default(message, default),
            None => window.prompt_with_message(message),
        };

        answer.unwrap_or_else(|e| {
            error!("prompt failed: {:?}", e);
            None
        })
    }

    async fn confirm(&self, message: &str) -> bool {
        match window() {
            Ok(window) => window.confirm_with_message(message).unwrap_or(false),
            Err(_) => false,
        }
    }

    async fn alert(&self, message: &str) {
        if let Ok(window) = window() {
            if let Err(e) = window.alert_with_message(message) {
                error!("alert failed: {:?}", e);
            }
        }
    }

    async fn pick_files(&self, accept: &str, multiple: bool) -> Vec<PickedFile> {
        let input = match create_file_input(accept, multiple) {
            Some(input) => input,
            None => return Vec::new(),
        };

        let (tx, rx) = oneshot::channel::<()>();
        let tx = Rc::new(RefCell::new(Some(tx)));

        let on_done = {
            let tx = tx.clone();
            Closure::wrap(Box::new(move |_: Event| {
                if let Some(tx) = tx.borrow_mut().take() {
                    let _ = tx.send(());
                }
            }) as Box<dyn FnMut(Event)>)
        };

        // Browsers without a `cancel` event leave the future pending until the
        // input is dropped.
        for event_name in ["change", "cancel"] {
            if let Err(e) =
                input.add_event_listener_with_callback(event_name, on_done.as_ref().unchecked_ref())
            {
                warn!("Could not listen for {}: {:?}", event_name, e);
            }
        }

        input.click();

        if rx.await.is_err() {
            return Vec::new();
        }

        let Some(list) = input.files() else {
            return Vec::new();
        };

        let mut picked = Vec::with_capacity(list.length() as usize);
        for file in (0..list.length()).filter_map(|i| list.get(i)) {
            match JsFuture::from(file.array_buffer()).await {
                Ok(buffer) => picked.push(PickedFile {
                    name: file.name(),
                    data: Uint8Array::new(&buffer).to_vec(),
                }),
                Err(e) => error!("Failed to read {}: {:?}", file.name(), e),
            }
        }

        debug!("Picked {} file(s)", picked.len());
        drop(on_done);
        picked
    }
}

fn create_file_input(accept: &str, multiple: bool) -> Option<HtmlInputElement> {
    let input = document()
        .ok()?
        .create_element("input")
        .ok()?
        .dyn_into::<HtmlInputElement>()
        .ok()?;

    input.set_type("file");
    input.set_accept(accept);
    input.set_multiple(multiple);

    Some(input)
}
