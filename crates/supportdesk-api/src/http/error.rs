//! Application error type mapping to HTTP status codes and envelope format.
//!
//! The service taxonomy maps one-to-one onto status codes: validation
//! failures are 400, storage failures are 500, completion provider
//! failures are 502. Provider failures are surfaced to the caller rather
//! than degraded server-side; clients choose their own fallback behavior.

use axum::response::{IntoResponse, Response};

use supportdesk_types::error::ChatError;

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Service-level chat errors (validation, persistence, completion).
    Chat(ChatError),
    /// Generic internal error.
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = match &self {
            AppError::Chat(ChatError::Validation(msg)) => ("VALIDATION_ERROR", msg.clone()),
            AppError::Chat(ChatError::Persistence(e)) => ("PERSISTENCE_ERROR", e.to_string()),
            AppError::Chat(ChatError::Completion(e)) => ("COMPLETION_ERROR", e.to_string()),
            AppError::Internal(msg) => ("INTERNAL_ERROR", msg.clone()),
        };

        ApiResponse::error(code, &message).into_response()
    }
}
