//! TurnRepository trait definition.
//!
//! Append-only persistence for session turn logs. Uses native async fn in
//! traits (RPITIT, Rust 2024 edition); the SQLite implementation lives in
//! supportdesk-infra (`SqliteTurnRepository`).

use supportdesk_types::error::PersistenceError;
use supportdesk_types::turn::{SessionSummary, Turn};

/// Repository trait for session turn persistence.
///
/// One physical record per turn, ordered by a monotonic insertion counter;
/// appends are never edited or removed, so concurrent writers to the same
/// session need no locking beyond the storage engine's own insert
/// serialization.
pub trait TurnRepository: Send + Sync {
    /// Durably record one turn for a session. Storage failures propagate;
    /// nothing fails silently.
    fn append(
        &self,
        session_id: &str,
        turn: &Turn,
    ) -> impl std::future::Future<Output = Result<(), PersistenceError>> + Send;

    /// Read the full turn sequence for a session, in append order.
    ///
    /// Returns the empty sequence for an unknown session id (not an error).
    fn read(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Turn>, PersistenceError>> + Send;

    /// List known sessions, most recently active first.
    fn list_sessions(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<SessionSummary>, PersistenceError>> + Send;

    /// Count distinct sessions.
    fn count_sessions(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, PersistenceError>> + Send;

    /// Count turns across all sessions.
    fn count_turns(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, PersistenceError>> + Send;
}
