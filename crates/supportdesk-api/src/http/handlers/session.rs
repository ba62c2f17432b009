//! Session read endpoints.
//!
//! Endpoints:
//! - GET /api/v1/sessions                - List known sessions
//! - GET /api/v1/sessions/{id}/turns     - Full turn sequence for a session

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Query parameters for session listing.
#[derive(Debug, Deserialize)]
pub struct SessionListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// GET /api/v1/sessions - List known sessions, most recently active first.
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<SessionListQuery>,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let sessions = state
        .chat_service
        .sessions(Some(query.limit), Some(query.offset))
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let sessions_json: Vec<serde_json::Value> = sessions
        .iter()
        .map(|s| serde_json::to_value(s).unwrap_or_default())
        .collect();

    let resp = ApiResponse::success(sessions_json, request_id, elapsed)
        .with_link("self", "/api/v1/sessions");

    Ok(Json(resp))
}

/// GET /api/v1/sessions/{id}/turns - Full turn sequence for a session.
///
/// An unknown session id yields an empty list, not an error.
pub async fn get_turns(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let turns = state.chat_service.history(&session_id).await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let turns_json: Vec<serde_json::Value> = turns
        .iter()
        .map(|t| serde_json::to_value(t).unwrap_or_default())
        .collect();

    let resp = ApiResponse::success(turns_json, request_id, elapsed)
        .with_link("self", &format!("/api/v1/sessions/{session_id}/turns"))
        .with_link("sessions", "/api/v1/sessions");

    Ok(Json(resp))
}
