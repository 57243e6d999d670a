//! Error types for validation, the shortening exchange and the history store,
//! plus their mapping onto HTTP responses at the handler boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message shown when the service fails without saying why
pub const GENERIC_FAILURE: &str = "Request failed";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid URL (e.g., https://example.com)")]
    InvalidUrl,

    #[error("Expiry must be one of 1, 6, 12, 24, 48, 72 or 168 hours (got {0})")]
    UnsupportedExpiry(u32),

    #[error("Invalid request body: {0}")]
    MalformedBody(String),

    #[error("Invalid history position: {0}")]
    InvalidPosition(String),
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{0}")]
    RequestFailed(String),

    #[error("malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("history storage error: {0}")]
    Database(#[from] redb::Error),

    #[error("history encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("no history entry at position {index} (history holds {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Everything a handler can fail with
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("A shortening request is already in progress")]
    SubmissionInProgress,

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(e) => (StatusCode::BAD_REQUEST, "validation_error", e.to_string()),
            AppError::Client(ClientError::RequestFailed(message)) => {
                (StatusCode::BAD_GATEWAY, "request_failed", message.clone())
            }
            AppError::Client(ClientError::Network(_)) => (
                StatusCode::BAD_GATEWAY,
                "network_error",
                "Could not reach the shortening service".to_string(),
            ),
            AppError::Client(ClientError::MalformedResponse(_)) => (
                StatusCode::BAD_GATEWAY,
                "malformed_response",
                "Something went wrong".to_string(),
            ),
            AppError::Store(StoreError::IndexOutOfRange { .. }) => {
                (StatusCode::NOT_FOUND, "not_found", self.to_string())
            }
            AppError::Store(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "Could not save history".to_string(),
            ),
            AppError::SubmissionInProgress => (StatusCode::CONFLICT, "busy", self.to_string()),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Something went wrong".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::warn!(error = %self, code, "request failed");
        }

        (status, Json(json!({ "error": message, "code": code }))).into_response()
    }
}
