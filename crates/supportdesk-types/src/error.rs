use thiserror::Error;

use crate::llm::CompletionError;

/// Errors from session store operations (used by trait definitions in
/// supportdesk-core).
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),
}

/// Service-level error taxonomy surfaced to callers.
///
/// Nothing here is retried automatically; the HTTP layer maps each variant
/// to a distinct status code.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Completion(#[from] CompletionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_error_display() {
        let err = PersistenceError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_chat_error_wraps_persistence() {
        let err: ChatError = PersistenceError::Connection.into();
        assert_eq!(err.to_string(), "database connection error");
        assert!(matches!(err, ChatError::Persistence(_)));
    }

    #[test]
    fn test_chat_error_wraps_completion() {
        let err: ChatError = CompletionError::AuthenticationFailed.into();
        assert!(matches!(err, ChatError::Completion(_)));
    }

    #[test]
    fn test_chat_error_validation_display() {
        let err = ChatError::Validation("query must not be empty".to_string());
        assert!(err.to_string().contains("query must not be empty"));
    }
}
