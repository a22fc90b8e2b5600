//! Error taxonomy and its mapping onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failures turning a base64 payload into a model input. Always client-caused.
#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("cannot decode image: {0}")]
    Decode(#[from] image::ImageError),
}

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("failed to load model from {path}: {message}")]
    Load { path: String, message: String },

    #[error("forward pass failed: {0}")]
    Run(String),

    #[error("model produced {actual} scores, expected {expected}")]
    OutputShape { expected: usize, actual: usize },

    #[error("model produced no usable scores")]
    EmptyOutput,

    #[error("model produced a non-finite score at index {index}")]
    NonFinite { index: usize },
}

/// Errors from the remote text-generation service. These never reach the
/// caller of `/predict`; they are folded into placeholder text.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("request failed: {0}")]
    Request(reqwest::Error),

    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("no completion in response")]
    Empty,

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for LlmError {
    // The URL may carry credentials in its query string.
    fn from(err: reqwest::Error) -> Self {
        LlmError::Request(err.without_url())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Image processing error: {0}")]
    BadImage(#[from] PreprocessError),

    #[error("Prediction error: {0}")]
    Prediction(#[from] InferenceError),

    #[error("Invalid request body: {message}")]
    InvalidBody { status: StatusCode, message: String },

    #[error("Error processing request: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadImage(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidBody { status, .. } => *status,
            ApiError::Prediction(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "rejected request");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
