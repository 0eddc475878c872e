use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use voxform_transcription::TranscriptionError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Provider(String),
    Timeout(String),
    JobFailed(String),
    Internal(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {msg}"),
            ApiError::Provider(msg) => write!(f, "Provider error: {msg}"),
            ApiError::Timeout(msg) => write!(f, "Timeout: {msg}"),
            ApiError::JobFailed(msg) => write!(f, "Job failed: {msg}"),
            ApiError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Provider(msg) => (StatusCode::BAD_GATEWAY, "provider_error", msg),
            ApiError::Timeout(msg) => (StatusCode::GATEWAY_TIMEOUT, "timeout", msg),
            ApiError::JobFailed(msg) => (StatusCode::BAD_GATEWAY, "job_failed", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<TranscriptionError> for ApiError {
    fn from(err: TranscriptionError) -> Self {
        match &err {
            TranscriptionError::Validation(msg) => ApiError::BadRequest(msg.clone()),
            TranscriptionError::Configuration(msg) => ApiError::Internal(msg.clone()),
            TranscriptionError::Provider { .. } => ApiError::Provider(err.to_string()),
            TranscriptionError::Timeout { .. } => ApiError::Timeout(err.to_string()),
            TranscriptionError::JobFailed { .. } => ApiError::JobFailed(err.to_string()),
        }
    }
}
