use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pipeline::{ErrorClass, PipelineError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request fields (422).
    #[error("{0}")]
    Validation(String),
    /// Input present but unusable (400).
    #[error("{0}")]
    BadRequest(String),
    /// Anything that went wrong on our side (500).
    #[error("{0}")]
    Internal(String),
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        let msg = err.to_string();
        match err.class() {
            ErrorClass::Validation => ApiError::Validation(msg),
            ErrorClass::BadInput => ApiError::BadRequest(msg),
            ErrorClass::Internal => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, %status, "request rejected");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
