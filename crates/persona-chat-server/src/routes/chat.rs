//! Chat Routes - Persona chat relay

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};

use persona_chat::ChatError;

use crate::models::{ChatErrorBody, ChatReply, ChatRequest};
use crate::AppState;

/// Relay a chat message to the model
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Model reply", body = ChatReply),
        (status = 500, description = "Configuration or provider error", body = ChatErrorBody)
    ),
    tag = "Chat"
)]
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, (StatusCode, Json<ChatErrorBody>)> {
    let Json(mut payload) = payload.map_err(|rejection| {
        tracing::warn!("Malformed chat request: {}", rejection.body_text());
        error_body(format!("서버 에러: {}", rejection.body_text()))
    })?;
    let history = payload.turns();

    state
        .relay
        .handle_chat(&payload.message, &history, payload.mode())
        .await
        .map(|text| Json(ChatReply { text }))
        .map_err(|err: ChatError| error_body(err.to_string()))
}

fn error_body(error: String) -> (StatusCode, Json<ChatErrorBody>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ChatErrorBody { error }),
    )
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/chat", post(chat))
}
