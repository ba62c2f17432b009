//! Chat endpoint.
//!
//! POST /api/v1/chat
//!
//! Accepts a session id and a user message, runs the resolver pipeline
//! (triggers -> FAQ -> completion fallback), persists both turns, and
//! returns the reply with its escalation flag.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for the chat endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Opaque client-supplied session key; the session is created
    /// implicitly on first message.
    pub session_id: String,
    /// The customer's message.
    pub query: String,
}

/// Response payload for the chat endpoint.
#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub escalated: bool,
}

/// POST /api/v1/chat - Handle one conversation turn.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ApiResponse<ChatReply>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let outcome = state
        .chat_service
        .handle_message(&body.session_id, &body.query)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let reply = ChatReply {
        response: outcome.response,
        escalated: outcome.escalated,
    };

    let resp = ApiResponse::success(reply, request_id, elapsed)
        .with_link("self", "/api/v1/chat")
        .with_link(
            "turns",
            &format!("/api/v1/sessions/{}/turns", body.session_id),
        );

    Ok(Json(resp))
}
