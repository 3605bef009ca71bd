//! API error type and mapping from service errors to HTTP statuses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use digest_foundation::Error;
use serde_json::json;
use tracing::error;

/// Error returned by handlers, rendered as `{"detail": "..."}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    /// Create a 400 Bad Request error.
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    /// Create a 500 Internal Server Error.
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        if err.is_client_error() {
            return Self::bad_request(err.detail());
        }
        error!("Request failed: {}", err);
        Self::internal(err.detail())
    }
}

/// Body extraction failures keep axum's status (400 for bad syntax, 415 for
/// a missing content type, 422 for the wrong shape) but use the JSON body
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use digest_foundation::ConnectAttempt;

    #[test]
    fn test_validation_maps_to_400() {
        let err = ApiError::from(Error::validation("Content cannot be empty"));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.detail, "Content cannot be empty");
    }

    #[test]
    fn test_runtime_unavailable_maps_to_500() {
        let err = ApiError::from(Error::RuntimeUnavailable {
            attempts: vec![ConnectAttempt::new("unix:///var/run/docker.sock", "refused")],
        });
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.detail.starts_with("Docker is not running"));
    }

    #[test]
    fn test_response_uses_detail_body() {
        let response = ApiError::bad_request("nope").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_json_rejection_keeps_status() {
        let rejection = Json::<serde_json::Value>::from_bytes(b"{not json").unwrap_err();
        let err = ApiError::from(rejection);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(!err.detail.is_empty());

        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Body {
            content: String,
        }
        let rejection = Json::<Body>::from_bytes(br#"{"text":"x"}"#).unwrap_err();
        let err = ApiError::from(rejection);
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.detail.contains("content"));
    }
}
