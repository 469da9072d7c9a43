use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ProjectId = u64;
pub type FileId = u64;
pub type FolderId = u64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("{0}")]
    Rejected(String),
}

// --- Data Model ---

/// A file stored in a project, as listed by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileEntry {
    pub id: FileId,
    pub name: String,
    /// File extension without the leading dot (`tex`, `bib`, `png`, ...).
    #[serde(rename = "type", default)]
    pub file_type: String,
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub folder_id: Option<FolderId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<FolderId>,
}

// --- Requests ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateFileRequest {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateFolderRequest {
    pub name: String,
    pub parent_id: Option<FolderId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CopyFileRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenameFileRequest {
    pub name: String,
}

/// Name of the multipart field carrying an uploaded file.
pub const UPLOAD_FIELD: &str = "file";

// --- Responses ---

/// Every response is wrapped in `{success, error?, ...payload}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            error: None,
            data,
        }
    }

    /// Turns `success:false` into an error carrying the server message verbatim.
    pub fn into_result(self) -> Result<T, ProtocolError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(ProtocolError::Rejected(
                self.error.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListFilesResponse {
    #[serde(default)]
    pub files: Vec<FileEntry>,
    #[serde(default)]
    pub folders: Vec<Folder>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateFileResponse {
    #[serde(default)]
    pub file: Option<FileEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateFolderResponse {
    #[serde(default)]
    pub folder: Option<Folder>,
}

/// Payload of endpoints that only acknowledge.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ack {}

// --- Endpoints ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// The REST routes of a project, relative to the server origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ListFiles(ProjectId),
    CreateFile(ProjectId),
    CreateFolder(ProjectId),
    Upload(ProjectId),
    CopyFile(ProjectId, FileId),
    RenameFile(ProjectId, FileId),
    DownloadFile(ProjectId, FileId),
    DeleteFile(ProjectId, FileId),
    DeleteFolder(ProjectId, FolderId),
    DownloadProject(ProjectId),
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Self::ListFiles(_) | Self::DownloadFile(..) | Self::DownloadProject(_) => Method::Get,
            Self::CreateFile(_) | Self::CreateFolder(_) | Self::Upload(_) | Self::CopyFile(..) => {
                Method::Post
            }
            Self::RenameFile(..) => Method::Put,
            Self::DeleteFile(..) | Self::DeleteFolder(..) => Method::Delete,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::ListFiles(project) => format!("/api/project/{}/files", project),
            Self::CreateFile(project) => format!("/api/project/{}/file", project),
            Self::CreateFolder(project) => format!("/api/project/{}/folder", project),
            Self::Upload(project) => format!("/api/project/{}/upload", project),
            Self::CopyFile(project, file) => {
                format!("/api/project/{}/file/{}/copy", project, file)
            }
            Self::RenameFile(project, file)
            | Self::DownloadFile(project, file)
            | Self::DeleteFile(project, file) => {
                format!("/api/project/{}/file/{}", project, file)
            }
            Self::DeleteFolder(project, folder) => {
                format!("/api/project/{}/folder/{}", project, folder)
            }
            Self::DownloadProject(project) => format!("/api/project/{}/download", project),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_response_parses_listing() {
        let json = r#"{
            "success": true,
            "files": [{"id": 1, "name": "a.tex", "type": "tex", "version": 3, "folder_id": null}],
            "folders": [{"id": 7, "name": "img", "parent_id": null}]
        }"#;

        let response: ApiResponse<ListFilesResponse> = serde_json::from_str(json).unwrap();
        let listing = response.into_result().unwrap();

        assert_eq!(listing.files.len(), 1);
        assert_eq!(listing.files[0].file_type, "tex");
        assert_eq!(listing.files[0].version, 3);
        assert_eq!(listing.files[0].folder_id, None);
        assert_eq!(listing.folders[0].id, 7);
    }

    #[test]
    fn failed_response_carries_server_message() {
        let json = r#"{"success": false, "error": "name exists"}"#;
        let response: ApiResponse<CreateFileResponse> = serde_json::from_str(json).unwrap();

        assert_eq!(
            response.into_result(),
            Err(ProtocolError::Rejected("name exists".to_string()))
        );
    }

    #[test]
    fn failure_without_message_is_still_an_error() {
        let response: ApiResponse<Ack> = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(response.into_result().is_err());
    }

    #[test]
    fn missing_optional_fields_default() {
        let file: FileEntry = serde_json::from_str(r#"{"id": 2, "name": "notes"}"#).unwrap();
        assert_eq!(file.file_type, "");
        assert_eq!(file.version, 0);
        assert_eq!(file.folder_id, None);
    }

    #[test]
    fn folder_request_serializes_null_parent() {
        let body = serde_json::to_value(CreateFolderRequest {
            name: "figures".to_string(),
            parent_id: None,
        })
        .unwrap();

        assert_eq!(body, serde_json::json!({"name": "figures", "parent_id": null}));
    }

    #[test]
    fn endpoints_match_routes() {
        assert_eq!(Endpoint::ListFiles(4).path(), "/api/project/4/files");
        assert_eq!(Endpoint::CopyFile(4, 9).path(), "/api/project/4/file/9/copy");
        assert_eq!(Endpoint::RenameFile(4, 9).method(), Method::Put);
        assert_eq!(Endpoint::DeleteFile(4, 9).method(), Method::Delete);
        assert_eq!(Endpoint::DeleteFolder(4, 2).path(), "/api/project/4/folder/2");
        assert_eq!(Endpoint::DownloadProject(4).path(), "/api/project/4/download");
    }
}
