use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use study_hub_core::StoreError;
use tracing::error;

/// A [`StoreError`] on its way out as an HTTP response with a
/// `{"error": "..."}` body.
#[derive(Debug)]
pub struct ApiError(pub StoreError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::InvalidParent(_) | StoreError::Validation(_) => StatusCode::BAD_REQUEST,
            StoreError::Forbidden(_) | StoreError::PathTraversal(_) => StatusCode::FORBIDDEN,
            StoreError::Cycle { .. } => StatusCode::CONFLICT,
            StoreError::UploadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            StoreError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            StoreError::Io(_) | StoreError::Corrupt(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(StoreError::Validation(rejection.body_text()))
    }
}

impl ApiError {
    /// Map a multipart failure. A body cut off by the request limit reports
    /// the upload cap that limit was derived from.
    pub fn multipart(err: MultipartError, limit: u64) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self(StoreError::UploadTooLarge { limit })
        } else {
            Self(StoreError::Validation(format!(
                "invalid multipart payload: {}",
                err.body_text()
            )))
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
