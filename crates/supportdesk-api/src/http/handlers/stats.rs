//! Aggregate statistics endpoint.
//!
//! GET /api/v1/stats - Session and turn counts.

use std::time::Instant;

use axum::extract::State;
use axum::Json;

use supportdesk_core::session::repository::TurnRepository;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/stats - Aggregate counts.
pub async fn get_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let repo = state.chat_service.repo();
    let total_sessions = repo
        .count_sessions()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to count sessions: {e}")))?;
    let total_turns = repo
        .count_turns()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to count turns: {e}")))?;

    let elapsed = start.elapsed().as_millis() as u64;

    let data = serde_json::json!({
        "total_sessions": total_sessions,
        "total_turns": total_turns,
        "provider": state.config.provider.kind.to_string(),
        "model": state.config.provider.model,
    });

    let resp = ApiResponse::success(data, request_id, elapsed)
        .with_link("self", "/api/v1/stats")
        .with_link("sessions", "/api/v1/sessions");

    Ok(Json(resp))
}
