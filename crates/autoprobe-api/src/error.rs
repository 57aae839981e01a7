//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use autoprobe_runtime::ControllerError;

/// Errors returned by handlers, rendered as `{status: "error", message}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ControllerError> for ApiError {
    fn from(e: ControllerError) -> Self {
        let message = e.to_string();
        match e {
            ControllerError::AlreadyRunning | ControllerError::NotInitialized => {
                ApiError::Conflict(message)
            }
            ControllerError::NotFound(_) => ApiError::NotFound(message),
            ControllerError::InvalidPath(_) | ControllerError::Init(_) => {
                ApiError::BadRequest(message)
            }
            ControllerError::Driver(_) | ControllerError::Io(_) => ApiError::Internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "status": "error",
            "message": self.to_string(),
        });
        (self.status_code(), Json(body)).into_response()
    }
}
