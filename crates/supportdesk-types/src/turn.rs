//! Conversation turn types.
//!
//! A session is an ordered, append-only sequence of turns identified by an
//! opaque client-supplied `session_id` string. Sessions are created
//! implicitly on first message and are never explicitly deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Speaker role of a conversation turn.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (role IN ('user', 'assistant'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::User => write!(f, "user"),
            TurnRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for TurnRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(TurnRole::User),
            "assistant" => Ok(TurnRole::Assistant),
            other => Err(format!("invalid turn role: '{other}'")),
        }
    }
}

/// A single message within a session.
///
/// Immutable once written. Ordering is insertion order and is preserved
/// on read; no turn is ever edited or removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
    /// Stamped at append time by the service; absent on turns constructed
    /// before persistence.
    pub created_at: Option<DateTime<Utc>>,
}

impl Turn {
    /// Build a user turn stamped with the current time.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
            created_at: Some(Utc::now()),
        }
    }

    /// Build an assistant turn stamped with the current time.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
            created_at: Some(Utc::now()),
        }
    }
}

/// Aggregate view of one session, for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub turn_count: u64,
    pub last_activity: Option<DateTime<Utc>>,
}
