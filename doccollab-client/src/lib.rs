use async_trait::async_trait;
use log::{debug, info};
pub use url::Url;

use doccollab_protocol::{
    Ack, CopyFileRequest, CreateFileRequest, CreateFileResponse, CreateFolderRequest,
    CreateFolderResponse, Endpoint, FileEntry, FileId, Folder, FolderId, ListFilesResponse,
    ProjectId, RenameFileRequest,
};

pub mod error;
mod request;
mod response;

use crate::error::ClientError;

/// The REST operations available on one project.
///
/// The browser widget talks to the server only through this trait, so tests can
/// substitute an in-memory implementation.
#[async_trait(?Send)]
pub trait ProjectApi {
    fn project_id(&self) -> ProjectId;

    async fn list_files(&self) -> Result<ListFilesResponse, ClientError>;

    async fn create_file(&self, name: &str, content: &str) -> Result<Option<FileEntry>, ClientError>;

    async fn create_folder(
        &self,
        name: &str,
        parent_id: Option<FolderId>,
    ) -> Result<Option<Folder>, ClientError>;

    async fn upload_file(&self, file_name: &str, data: Vec<u8>) -> Result<(), ClientError>;

    async fn copy_file(&self, file_id: FileId, new_name: &str) -> Result<(), ClientError>;

    async fn rename_file(&self, file_id: FileId, new_name: &str) -> Result<(), ClientError>;

    async fn delete_file(&self, file_id: FileId) -> Result<(), ClientError>;

    async fn delete_folder(&self, folder_id: FolderId) -> Result<(), ClientError>;

    /// Absolute URL serving the raw content of a file.
    fn file_url(&self, file_id: FileId) -> Result<Url, ClientError>;

    /// Absolute URL serving the whole project as a ZIP archive.
    fn download_url(&self) -> Result<Url, ClientError>;
}

/// HTTP client for the project endpoints of a DocCollab server.
#[derive(Clone, Debug)]
pub struct DocCollabClient {
    http: reqwest::Client,
    base: Url,
    project_id: ProjectId,
}

impl DocCollabClient {
    /// Creates a client rooted at `base` (usually the page origin).
    pub fn new(base: &str, project_id: ProjectId) -> Result<Self, ClientError> {
        let base = Url::parse(base)?;
        info!("DocCollab client for project {} at {}", project_id, base);

        Ok(Self {
            http: reqwest::Client::new(),
            base,
            project_id,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url, ClientError> {
        Ok(self.base.join(&endpoint.path())?)
    }
}

#[async_trait(?Send)]
impl ProjectApi for DocCollabClient {
    fn project_id(&self) -> ProjectId {
        self.project_id
    }

    async fn list_files(&self) -> Result<ListFilesResponse, ClientError> {
        let listing: ListFilesResponse = self
            .send_empty(Endpoint::ListFiles(self.project_id))
            .await?;
        debug!(
            "Listed {} files and {} folders",
            listing.files.len(),
            listing.folders.len()
        );
        Ok(listing)
    }

    async fn create_file(&self, name: &str, content: &str) -> Result<Option<FileEntry>, ClientError> {
        let body = CreateFileRequest {
            name: name.to_string(),
            content: content.to_string(),
        };
        let created: CreateFileResponse = self
            .send_json(Endpoint::CreateFile(self.project_id), &body)
            .await?;
        Ok(created.file)
    }

    async fn create_folder(
        &self,
        name: &str,
        parent_id: Option<FolderId>,
    ) -> Result<Option<Folder>, ClientError> {
        let body = CreateFolderRequest {
            name: name.to_string(),
            parent_id,
        };
        let created: CreateFolderResponse = self
            .send_json(Endpoint::CreateFolder(self.project_id), &body)
            .await?;
        Ok(created.folder)
    }

    async fn upload_file(&self, file_name: &str, data: Vec<u8>) -> Result<(), ClientError> {
        let _: Ack = self
            .send_multipart(Endpoint::Upload(self.project_id), file_name, data)
            .await?;
        Ok(())
    }

    async fn copy_file(&self, file_id: FileId, new_name: &str) -> Result<(), ClientError> {
        let body = CopyFileRequest {
            name: new_name.to_string(),
        };
        let _: Ack = self
            .send_json(Endpoint::CopyFile(self.project_id, file_id), &body)
            .await?;
        Ok(())
    }

    async fn rename_file(&self, file_id: FileId, new_name: &str) -> Result<(), ClientError> {
        let body = RenameFileRequest {
            name: new_name.to_string(),
        };
        let _: Ack = self
            .send_json(Endpoint::RenameFile(self.project_id, file_id), &body)
            .await?;
        Ok(())
    }

    async fn delete_file(&self, file_id: FileId) -> Result<(), ClientError> {
        let _: Ack = self
            .send_empty(Endpoint::DeleteFile(self.project_id, file_id))
            .await?;
        Ok(())
    }

    async fn delete_folder(&self, folder_id: FolderId) -> Result<(), ClientError> {
        let _: Ack = self
            .send_empty(Endpoint::DeleteFolder(self.project_id, folder_id))
            .await?;
        Ok(())
    }

    fn file_url(&self, file_id: FileId) -> Result<Url, ClientError> {
        self.endpoint_url(Endpoint::DownloadFile(self.project_id, file_id))
    }

    fn download_url(&self) -> Result<Url, ClientError> {
        self.endpoint_url(Endpoint::DownloadProject(self.project_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_joined_to_the_origin() {
        let client = DocCollabClient::new("https://docs.example.org/editor/", 12).unwrap();

        assert_eq!(
            client.file_url(5).unwrap().as_str(),
            "https://docs.example.org/api/project/12/file/5"
        );
        assert_eq!(
            client.download_url().unwrap().as_str(),
            "https://docs.example.org/api/project/12/download"
        );
    }

    #[test]
    fn invalid_base_is_rejected() {
        let result = DocCollabClient::new("not a url", 1);
        assert!(matches!(result, Err(ClientError::UrlParseError(_))));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let client = DocCollabClient::new("http://127.0.0.1:9", 1).unwrap();

        let err = client.list_files().await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
        assert!(!err.is_rejection());
    }
}
