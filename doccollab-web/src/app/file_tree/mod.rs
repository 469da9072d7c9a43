use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::str::FromStr;

use doccollab_client::{ProjectApi, error::ClientError};
use doccollab_protocol::{FileEntry, FileId, Folder, FolderId, ProjectId};
use log::{debug, error, info, warn};

use crate::app::dialogs::{Dialogs, PickedFile};

pub mod render;
pub mod tree;
pub mod view;


use render::{RenderState, render_file_tree};
use tree::{ProjectTree, TreeError, build_tree};
use view::TreeView;

/// Extensions offered by the upload picker.
pub const UPLOAD_ACCEPT: &str = ".tex,.bib,.png,.jpg,.jpeg,.pdf,.txt,.md";

/// How a user gesture ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    /// The user dismissed a dialog; nothing was sent.
    Cancelled,
    /// The request failed; carries the message shown to the user.
    Failed(String),
    Unsupported,
    /// The target no longer exists.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    Copy,
    Rename,
    Download,
    Delete,
}

impl FromStr for FileAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "copy" => Ok(Self::Copy),
            "rename" => Ok(Self::Rename),
            "download" => Ok(Self::Download),
            "delete" => Ok(Self::Delete),
            other => Err(format!("unknown file action: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderAction {
    Rename,
    Delete,
}

impl FromStr for FolderAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rename" => Ok(Self::Rename),
            "delete" => Ok(Self::Delete),
            other => Err(format!("unknown folder action: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    NewFile,
    NewFolder,
    Upload,
    DownloadProject,
}

impl ToolbarAction {
    pub fn from_button_id(id: &str) -> Option<Self> {
        match id {
            "newFileBtn" => Some(Self::NewFile),
            "newFolderBtn" => Some(Self::NewFolder),
            "uploadFileBtn" => Some(Self::Upload),
            "downloadProjectBtn" => Some(Self::DownloadProject),
            _ => None,
        }
    }
}

/// A user gesture inside the widget, decoded from the DOM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEvent {
    Toolbar(ToolbarAction),
    File(FileAction, FileId),
    Folder(FolderAction, FolderId),
    SelectFile(FileId),
    ToggleFolder(FolderId),
}

/// Suggested name for a copy: `main.tex` becomes `main_copy.tex`.
pub fn default_copy_name(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}_copy.{}", stem, ext),
        _ => format!("{}_copy", name),
    }
}

type FileCallback = Rc<dyn Fn(&FileEntry)>;
type FolderCallback = Rc<dyn Fn(&Folder)>;

#[derive(Default)]
struct TreeState {
    files: Vec<FileEntry>,
    folders: Vec<Folder>,
    selected_file: Option<FileId>,
    collapsed: HashSet<FolderId>,
}

#[derive(Default)]
struct Callbacks {
    on_file_select: Option<FileCallback>,
    on_file_create: Option<FileCallback>,
    on_folder_create: Option<FolderCallback>,
}

/// The project file tree: server listing in, markup out, user gestures turned
/// into REST calls followed by a full reload.
pub struct FileTreeManager<A, D, V> {
    api: A,
    dialogs: D,
    view: V,
    state: RefCell<TreeState>,
    callbacks: RefCell<Callbacks>,
}

impl<A, D, V> FileTreeManager<A, D, V>
where
    A: ProjectApi,
    D: Dialogs,
    V: TreeView,
{
    pub fn new(api: A, dialogs: D, view: V) -> Self {
        Self {
            api,
            dialogs,
            view,
            state: RefCell::new(TreeState::default()),
            callbacks: RefCell::new(Callbacks::default()),
        }
    }

    pub fn project_id(&self) -> ProjectId {
        self.api.project_id()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn dialogs(&self) -> &D {
        &self.dialogs
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn files(&self) -> Vec<FileEntry> {
        self.state.borrow().files.clone()
    }

    pub fn folders(&self) -> Vec<Folder> {
        self.state.borrow().folders.clone()
    }

    pub fn selected_file(&self) -> Option<FileEntry> {
        let state = self.state.borrow();
        let id = state.selected_file?;
        state.files.iter().find(|f| f.id == id).cloned()
    }

    pub fn set_on_file_select(&self, callback: impl Fn(&FileEntry) + 'static) {
        self.callbacks.borrow_mut().on_file_select = Some(Rc::new(callback));
    }

    pub fn set_on_file_create(&self, callback: impl Fn(&FileEntry) + 'static) {
        self.callbacks.borrow_mut().on_file_create = Some(Rc::new(callback));
    }

    pub fn set_on_folder_create(&self, callback: impl Fn(&Folder) + 'static) {
        self.callbacks.borrow_mut().on_folder_create = Some(Rc::new(callback));
    }

    fn file(&self, file_id: FileId) -> Option<FileEntry> {
        self.state
            .borrow()
            .files
            .iter()
            .find(|f| f.id == file_id)
            .cloned()
    }

    fn folder(&self, folder_id: FolderId) -> Option<Folder> {
        self.state
            .borrow()
            .folders
            .iter()
            .find(|f| f.id == folder_id)
            .cloned()
    }

    pub async fn init(&self) -> Result<(), ClientError> {
        self.load_files().await
    }

    /// Fetches the listing and re-renders. On failure the previous state stays.
    pub async fn load_files(&self) -> Result<(), ClientError> {
        match self.api.list_files().await {
            Ok(listing) => {
                {
                    let mut state = self.state.borrow_mut();
                    state.files = listing.files;
                    state.folders = listing.folders;

                    let selected = state.selected_file;
                    if selected.is_some_and(|id| !state.files.iter().any(|f| f.id == id)) {
                        state.selected_file = None;
                    }

                    let folder_ids: HashSet<FolderId> = state.folders.iter().map(|f| f.id).collect();
                    state.collapsed.retain(|id| folder_ids.contains(id));
                }

                self.render();
                Ok(())
            }
            Err(e) => {
                error!("Failed to load files of project {}: {}", self.project_id(), e);
                Err(e)
            }
        }
    }

    pub fn build_tree(&self) -> Result<ProjectTree, TreeError> {
        let state = self.state.borrow();
        build_tree(&state.files, &state.folders)
    }

    pub fn render(&self) {
        let html = {
            let state = self.state.borrow();
            let tree = build_tree(&state.files, &state.folders);
            if let Err(e) = &tree {
                error!("Cannot render project {}: {}", self.project_id(), e);
            }

            render_file_tree(
                &tree,
                RenderState {
                    selected: state.selected_file,
                    collapsed: &state.collapsed,
                },
            )
        };

        self.view.render(&html);
    }

    /// Selects a file and notifies the selection callback. Unknown ids are ignored.
    pub fn select_file(&self, file_id: FileId) -> bool {
        let Some(file) = self.file(file_id) else {
            debug!("Ignoring selection of unknown file {}", file_id);
            return false;
        };

        self.state.borrow_mut().selected_file = Some(file_id);
        self.view.set_selected(file_id);

        let callback = self.callbacks.borrow().on_file_select.clone();
        if let Some(callback) = callback {
            callback(&file);
        }

        true
    }

    /// Flips the collapsed state of a folder and returns the new state.
    pub fn toggle_folder(&self, folder_id: FolderId) -> bool {
        let collapsed = {
            let mut state = self.state.borrow_mut();
            if state.collapsed.remove(&folder_id) {
                false
            } else {
                state.collapsed.insert(folder_id);
                true
            }
        };

        self.view.set_collapsed(folder_id, collapsed);
        collapsed
    }

    pub async fn dispatch(&self, event: TreeEvent) -> ActionOutcome {
        match event {
            TreeEvent::Toolbar(ToolbarAction::NewFile) => self.show_new_file_dialog().await,
            TreeEvent::Toolbar(ToolbarAction::NewFolder) => self.show_new_folder_dialog().await,
            TreeEvent::Toolbar(ToolbarAction::Upload) => {
                let outcomes = self.show_upload_dialog().await;
                if outcomes.is_empty() {
                    ActionOutcome::Cancelled
                } else {
                    // First failure wins.
                    outcomes
                        .into_iter()
                        .find(|o| *o != ActionOutcome::Completed)
                        .unwrap_or(ActionOutcome::Completed)
                }
            }
            TreeEvent::Toolbar(ToolbarAction::DownloadProject) => self.download_project(),
            TreeEvent::File(action, file_id) => self.handle_file_action(action, file_id).await,
            TreeEvent::Folder(action, folder_id) => {
                self.handle_folder_action(action, folder_id).await
            }
            TreeEvent::SelectFile(file_id) => {
                if self.select_file(file_id) {
                    ActionOutcome::Completed
                } else {
                    ActionOutcome::Ignored
                }
            }
            TreeEvent::ToggleFolder(folder_id) => {
                self.toggle_folder(folder_id);
                ActionOutcome::Completed
            }
        }
    }

    pub async fn handle_file_action(&self, action: FileAction, file_id: FileId) -> ActionOutcome {
        if self.file(file_id).is_none() {
            return ActionOutcome::Ignored;
        }

        match action {
            FileAction::Copy => self.copy_file(file_id).await,
            FileAction::Rename => self.rename_file(file_id).await,
            FileAction::Download => self.download_file(file_id),
            FileAction::Delete => self.delete_file(file_id).await,
        }
    }

    pub async fn handle_folder_action(
        &self,
        action: FolderAction,
        folder_id: FolderId,
    ) -> ActionOutcome {
        match action {
            FolderAction::Rename => self.rename_folder(folder_id).await,
            FolderAction::Delete => self.delete_folder(folder_id).await,
        }
    }

    async fn prompt_name(&self, message: &str, default: Option<&str>) -> Option<String> {
        let answer = self.dialogs.prompt(message, default).await?;
        let answer = answer.trim();

        if answer.is_empty() {
            None
        } else {
            Some(answer.to_string())
        }
    }

    pub async fn show_new_file_dialog(&self) -> ActionOutcome {
        match self.prompt_name("File name (e.g. chapter1.tex):", None).await {
            Some(name) => self.create_file(&name, "").await,
            None => ActionOutcome::Cancelled,
        }
    }

    pub async fn show_new_folder_dialog(&self) -> ActionOutcome {
        match self.prompt_name("Folder name (e.g. images):", None).await {
            Some(name) => self.create_folder(&name, None).await,
            None => ActionOutcome::Cancelled,
        }
    }

    pub async fn show_upload_dialog(&self) -> Vec<ActionOutcome> {
        let picked = self.dialogs.pick_files(UPLOAD_ACCEPT, true).await;
        self.upload_files(picked).await
    }

    async fn report_failure(&self, action: &str, err: ClientError) -> ActionOutcome {
        let message = if err.is_rejection() {
            format!("{}: {}", action, err)
        } else {
            action.to_string()
        };

        error!("{}: {}", action, err);
        self.dialogs.alert(&message).await;
        ActionOutcome::Failed(message)
    }

    async fn reload(&self) {
        // Failures are logged by load_files; the mutation itself succeeded.
        let _ = self.load_files().await;
    }

    pub async fn create_file(&self, name: &str, content: &str) -> ActionOutcome {
        match self.api.create_file(name, content).await {
            Ok(created) => {
                info!("Created file {}", name);
                self.reload().await;

                let callback = self.callbacks.borrow().on_file_create.clone();
                if let (Some(callback), Some(file)) = (callback, created) {
                    callback(&file);
                }

                ActionOutcome::Completed
            }
            Err(e) => self.report_failure("Error creating file", e).await,
        }
    }

    pub async fn create_folder(&self, name: &str, parent_id: Option<FolderId>) -> ActionOutcome {
        match self.api.create_folder(name, parent_id).await {
            Ok(created) => {
                info!("Created folder {}", name);
                self.reload().await;

                let callback = self.callbacks.borrow().on_folder_create.clone();
                if let (Some(callback), Some(folder)) = (callback, created) {
                    callback(&folder);
                }

                ActionOutcome::Completed
            }
            Err(e) => self.report_failure("Error creating folder", e).await,
        }
    }

    pub async fn upload_file(&self, name: &str, data: Vec<u8>) -> ActionOutcome {
        match self.api.upload_file(name, data).await {
            Ok(()) => {
                info!("Uploaded {}", name);
                self.reload().await;
                self.dialogs
                    .alert(&format!("File \"{}\" uploaded successfully!", name))
                    .await;
                ActionOutcome::Completed
            }
            Err(e) => self.report_failure("Error uploading file", e).await,
        }
    }

    /// Uploads one after the other; a failure does not stop the rest.
    pub async fn upload_files(&self, files: Vec<PickedFile>) -> Vec<ActionOutcome> {
        let mut outcomes = Vec::with_capacity(files.len());

        for file in files {
            outcomes.push(self.upload_file(&file.name, file.data).await);
        }

        outcomes
    }

    pub async fn copy_file(&self, file_id: FileId) -> ActionOutcome {
        let Some(file) = self.file(file_id) else {
            return ActionOutcome::Ignored;
        };

        let default = default_copy_name(&file.name);
        let Some(new_name) = self.prompt_name("Name of the copy:", Some(&default)).await else {
            return ActionOutcome::Cancelled;
        };

        match self.api.copy_file(file_id, &new_name).await {
            Ok(()) => {
                info!("Copied {} to {}", file.name, new_name);
                self.reload().await;
                ActionOutcome::Completed
            }
            Err(e) => self.report_failure("Error copying file", e).await,
        }
    }

    pub async fn rename_file(&self, file_id: FileId) -> ActionOutcome {
        let Some(file) = self.file(file_id) else {
            return ActionOutcome::Ignored;
        };

        let new_name = match self.prompt_name("New name:", Some(&file.name)).await {
            Some(name) if name != file.name => name,
            _ => return ActionOutcome::Cancelled,
        };

        match self.api.rename_file(file_id, &new_name).await {
            Ok(()) => {
                info!("Renamed {} to {}", file.name, new_name);
                self.reload().await;
                ActionOutcome::Completed
            }
            Err(e) => self.report_failure("Error renaming file", e).await,
        }
    }

    pub fn download_file(&self, file_id: FileId) -> ActionOutcome {
        if self.file(file_id).is_none() {
            return ActionOutcome::Ignored;
        }

        match self.api.file_url(file_id) {
            Ok(url) => {
                self.view.open_in_new_tab(url.as_str());
                ActionOutcome::Completed
            }
            Err(e) => {
                error!("No download URL for file {}: {}", file_id, e);
                ActionOutcome::Failed(e.to_string())
            }
        }
    }

    pub async fn delete_file(&self, file_id: FileId) -> ActionOutcome {
        let Some(file) = self.file(file_id) else {
            return ActionOutcome::Ignored;
        };

        let question = format!("Do you really want to delete \"{}\"?", file.name);
        if !self.dialogs.confirm(&question).await {
            return ActionOutcome::Cancelled;
        }

        match self.api.delete_file(file_id).await {
            Ok(()) => {
                info!("Deleted {}", file.name);
                self.reload().await;
                ActionOutcome::Completed
            }
            Err(e) => self.report_failure("Error deleting file", e).await,
        }
    }

    /// The server has no folder rename route; the gesture is acknowledged and
    /// reported as unsupported.
    pub async fn rename_folder(&self, folder_id: FolderId) -> ActionOutcome {
        let Some(folder) = self.folder(folder_id) else {
            return ActionOutcome::Ignored;
        };

        match self.prompt_name("New name:", Some(&folder.name)).await {
            Some(name) if name != folder.name => {}
            _ => return ActionOutcome::Cancelled,
        }

        warn!("Folder rename requested for {} but is not supported", folder_id);
        self.dialogs
            .alert("Renaming folders is not supported yet")
            .await;
        ActionOutcome::Unsupported
    }

    pub async fn delete_folder(&self, folder_id: FolderId) -> ActionOutcome {
        let Some(folder) = self.folder(folder_id) else {
            return ActionOutcome::Ignored;
        };

        let question = format!(
            "Do you really want to delete the folder \"{}\" and all its contents?",
            folder.name
        );
        if !self.dialogs.confirm(&question).await {
            return ActionOutcome::Cancelled;
        }

        match self.api.delete_folder(folder_id).await {
            Ok(()) => {
                info!("Deleted folder {}", folder.name);
                self.reload().await;
                ActionOutcome::Completed
            }
            Err(e) => self.report_failure("Error deleting folder", e).await,
        }
    }

    pub fn download_project(&self) -> ActionOutcome {
        match self.api.download_url() {
            Ok(url) => {
                self.view.navigate(url.as_str());
                ActionOutcome::Completed
            }
            Err(e) => {
                error!("No download URL for project {}: {}", self.project_id(), e);
                ActionOutcome::Failed(e.to_string())
            }
        }
    }
}
