//! Route handlers.

use super::AppState;
use super::error::ApiError;
use super::types::{ChatRequest, ChatResponse, HealthResponse, HistoryMessage, HistoryResponse};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use relay_application::{RelayChatError, RelayChatInput};
use relay_domain::SessionId;

/// `POST /chat` - relay one message and return the model's reply.
///
/// Without a `session_id` a new session is started and its id returned, so
/// the caller can continue the conversation.
pub async fn post_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::invalid_input(rejection.body_text()))?;

    let mut input = RelayChatInput::new(request.message.unwrap_or_default());
    if let Some(session_id) = request.session_id {
        input = input.with_session_id(session_id);
    }

    let output = state.use_case.execute(input).await?;
    Ok(Json(ChatResponse {
        reply: output.reply,
        session_id: output.session_id.to_string(),
    }))
}

/// `GET /chat/{session_id}/history` - ordered messages of one session.
pub async fn get_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let session_id = SessionId::new(session_id).map_err(RelayChatError::from)?;
    let messages = state.use_case.history(session_id.as_str()).await?;
    Ok(Json(HistoryResponse {
        session_id: session_id.to_string(),
        messages: messages.into_iter().map(HistoryMessage::from).collect(),
    }))
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
