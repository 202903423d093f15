//! Error types for backend calls.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors surfaced to the user when a backend call fails.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-success HTTP status, with the server's `detail` message if any
    #[error("Error API: {status}{}", detail_suffix(.detail))]
    Status {
        /// HTTP status code
        status: u16,
        /// `detail` field of the error body
        detail: Option<String>,
    },

    /// Response body did not match the expected shape
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Upload rejected before sending
    #[error("Unsupported file '{file_name}'")]
    UnsupportedFile {
        /// Name of the rejected file
        file_name: String,
    },
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(" ({d})"))
        .unwrap_or_default()
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Decode a response body, turning non-2xx statuses into [`ApiError::Status`].
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    if !(200..300).contains(&status) {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail);
        return Err(ApiError::Status { status, detail });
    }
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChatResponse;

    #[test]
    fn test_error_status_keeps_detail() {
        let err = decode_response::<ChatResponse>(404, r#"{"detail":"Imagen no encontrada"}"#)
            .unwrap_err();
        match &err {
            ApiError::Status { status, detail } => {
                assert_eq!(*status, 404);
                assert_eq!(detail.as_deref(), Some("Imagen no encontrada"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(err.to_string(), "Error API: 404 (Imagen no encontrada)");
    }

    #[test]
    fn test_error_status_without_body() {
        let err = decode_response::<ChatResponse>(500, "Internal Server Error").unwrap_err();
        assert_eq!(err.to_string(), "Error API: 500");
    }

    #[test]
    fn test_bad_body_is_decode_error() {
        let err = decode_response::<ChatResponse>(200, "{").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
