//! Completion provider request/response types.
//!
//! These types model the data shapes for the external text-completion
//! collaborator: role-tagged messages in, one completion string out.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::turn::TurnRole;

/// Role of a message in a completion conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

impl From<TurnRole> for MessageRole {
    fn from(role: TurnRole) -> Self {
        match role {
            TurnRole::User => MessageRole::User,
            TurnRole::Assistant => MessageRole::Assistant,
        }
    }
}

/// A single message in a completion conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

/// Request to a completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Response from a completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub content: String,
    pub model: String,
    pub usage: Usage,
}

/// Token usage for a completion request/response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Errors from completion provider operations.
///
/// Surfaced to the caller unretried; the caller decides degradation policy.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("provider overloaded: {0}")]
    Overloaded(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("completion timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
