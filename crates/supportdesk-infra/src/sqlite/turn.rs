//! SQLite turn repository implementation.
//!
//! Implements `TurnRepository` from `supportdesk-core` using sqlx with
//! split read/write pools. One row per turn; the `seq` AUTOINCREMENT
//! column is the monotonic insertion counter that fixes read order, so
//! appends need no read-before-write and no per-session locking.

use chrono::{DateTime, Utc};
use sqlx::Row;

use supportdesk_core::session::repository::TurnRepository;
use supportdesk_types::error::PersistenceError;
use supportdesk_types::turn::{SessionSummary, Turn, TurnRole};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `TurnRepository`.
pub struct SqliteTurnRepository {
    pool: DatabasePool,
}

impl SqliteTurnRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

/// Internal row type for mapping SQLite rows to domain Turn.
struct TurnRow {
    role: String,
    content: String,
    created_at: Option<String>,
}

impl TurnRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_turn(self) -> Result<Turn, PersistenceError> {
        let role: TurnRole = self
            .role
            .parse()
            .map_err(|e: String| PersistenceError::Query(e))?;
        let created_at = self.created_at.as_deref().map(parse_datetime).transpose()?;

        Ok(Turn {
            role,
            content: self.content,
            created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, PersistenceError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| PersistenceError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

// ---------------------------------------------------------------------------
// TurnRepository implementation
// ---------------------------------------------------------------------------

impl TurnRepository for SqliteTurnRepository {
    async fn append(&self, session_id: &str, turn: &Turn) -> Result<(), PersistenceError> {
        sqlx::query(
            "INSERT INTO turns (session_id, role, content, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(session_id)
        .bind(turn.role.to_string())
        .bind(&turn.content)
        .bind(turn.created_at.as_ref().map(format_datetime))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| PersistenceError::Query(e.to_string()))?;

        Ok(())
    }

    async fn read(&self, session_id: &str) -> Result<Vec<Turn>, PersistenceError> {
        let rows = sqlx::query(
            "SELECT role, content, created_at FROM turns WHERE session_id = ? ORDER BY seq ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| PersistenceError::Query(e.to_string()))?;

        let mut turns = Vec::with_capacity(rows.len());
        for row in &rows {
            let turn_row =
                TurnRow::from_row(row).map_err(|e| PersistenceError::Query(e.to_string()))?;
            turns.push(turn_row.into_turn()?);
        }

        Ok(turns)
    }

    async fn list_sessions(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<SessionSummary>, PersistenceError> {
        let mut sql = String::from(
            "SELECT session_id, COUNT(*) AS turn_count, MAX(created_at) AS last_activity
             FROM turns GROUP BY session_id ORDER BY MAX(seq) DESC",
        );

        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| PersistenceError::Query(e.to_string()))?;

        let mut sessions = Vec::with_capacity(rows.len());
        for row in &rows {
            let session_id: String = row
                .try_get("session_id")
                .map_err(|e| PersistenceError::Query(e.to_string()))?;
            let turn_count: i64 = row
                .try_get("turn_count")
                .map_err(|e| PersistenceError::Query(e.to_string()))?;
            let last_activity: Option<String> = row
                .try_get("last_activity")
                .map_err(|e| PersistenceError::Query(e.to_string()))?;

            sessions.push(SessionSummary {
                session_id,
                turn_count: turn_count as u64,
                last_activity: last_activity.as_deref().map(parse_datetime).transpose()?,
            });
        }

        Ok(sessions)
    }

    async fn count_sessions(&self) -> Result<u64, PersistenceError> {
        let row = sqlx::query("SELECT COUNT(DISTINCT session_id) AS cnt FROM turns")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| PersistenceError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| PersistenceError::Query(e.to_string()))?;

        Ok(count as u64)
    }

    async fn count_turns(&self) -> Result<u64, PersistenceError> {
        let row = sqlx::query("SELECT COUNT(*) AS cnt FROM turns")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| PersistenceError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| PersistenceError::Query(e.to_string()))?;

        Ok(count as u64)
    }
}
