use doccollab_protocol::ApiResponse;
use log::{trace, warn};
use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// Reads the body of a response and unwraps its `{success, error?}` envelope.
pub(crate) async fn decode_response<T>(response: reqwest::Response) -> Result<T, ClientError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let body = response.text().await?;
    trace!("Response {}: {}", status, body);

    decode_body(status.as_u16(), &body)
}

/// The envelope is honored whatever the status code; a body that is not an
/// envelope is reported as the HTTP status when the status is an error.
pub(crate) fn decode_body<T>(status: u16, body: &str) -> Result<T, ClientError>
where
    T: DeserializeOwned,
{
    match serde_json::from_str::<ApiResponse<T>>(body) {
        Ok(envelope) => Ok(envelope.into_result()?),
        Err(e) if !(200..300).contains(&status) => {
            warn!("Unparseable error response ({}): {}", status, e);
            Err(ClientError::HttpStatus(status))
        }
        Err(e) => Err(ClientError::DeserializationError(e)),
    }
}

#[cfg(test)]
mod tests {
    use doccollab_protocol::{Ack, CreateFileResponse, ListFilesResponse};

    use super::*;

    #[test]
    fn rejection_keeps_server_message() {
        let err = decode_body::<CreateFileResponse>(200, r#"{"success":false,"error":"name exists"}"#)
            .unwrap_err();

        assert!(err.is_rejection());
        assert_eq!(err.to_string(), "name exists");
    }

    #[test]
    fn rejection_with_error_status_still_uses_envelope() {
        let err = decode_body::<Ack>(404, r#"{"success":false,"error":"File not found"}"#).unwrap_err();
        assert_eq!(err.to_string(), "File not found");
    }

    #[test]
    fn html_error_page_maps_to_status() {
        let err = decode_body::<Ack>(500, "<html>Internal Server Error</html>").unwrap_err();
        assert!(matches!(err, ClientError::HttpStatus(500)));
    }

    #[test]
    fn garbage_with_ok_status_is_a_decoding_error() {
        let err = decode_body::<Ack>(200, "not json").unwrap_err();
        assert!(matches!(err, ClientError::DeserializationError(_)));
    }

    #[test]
    fn listing_is_unwrapped() {
        let listing = decode_body::<ListFilesResponse>(
            200,
            r#"{"success":true,"files":[{"id":1,"name":"a.tex","type":"tex","version":1}],"folders":[]}"#,
        )
        .unwrap();

        assert_eq!(listing.files[0].name, "a.tex");
        assert!(listing.folders.is_empty());
    }
}
