use doccollab_protocol::{Endpoint, Method, UPLOAD_FIELD};
use log::debug;
use serde::{Serialize, de::DeserializeOwned};

use crate::{DocCollabClient, error::ClientError, response::decode_response};

impl DocCollabClient {
    fn request_builder(&self, endpoint: Endpoint) -> Result<reqwest::RequestBuilder, ClientError> {
        let url = self.endpoint_url(endpoint)?;
        debug!("{:?} {}", endpoint.method(), url);

        let builder = match endpoint.method() {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
            Method::Put => self.http.put(url),
            Method::Delete => self.http.delete(url),
        };

        Ok(builder)
    }

    /// Sends a request without a body and decodes the response envelope.
    pub(crate) async fn send_empty<T>(&self, endpoint: Endpoint) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let response = self.request_builder(endpoint)?.send().await?;
        decode_response(response).await
    }

    /// Sends a JSON body and decodes the response envelope.
    pub(crate) async fn send_json<B, T>(&self, endpoint: Endpoint, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request_builder(endpoint)?.json(body).send().await?;
        decode_response(response).await
    }

    /// Sends one file as the multipart `file` field.
    pub(crate) async fn send_multipart<T>(
        &self,
        endpoint: Endpoint,
        file_name: &str,
        data: Vec<u8>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let mime = mime_guess::from_path(file_name).first_or_octet_stream();
        let part = reqwest::multipart::Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str(mime.essence_str())?;
        let form = reqwest::multipart::Form::new().part(UPLOAD_FIELD, part);

        let response = self.request_builder(endpoint)?.multipart(form).send().await?;
        decode_response(response).await
    }
}
