//! Chat HTTP handler: the message-submitted event.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::llm::{Message, ModelId};
use crate::response;
use crate::server::AppState;
use crate::session::Session;

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
    pub model: ModelId,
    /// The conversation so far; the client owns the running log.
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Serialize)]
pub struct SendMessageResponse {
    pub messages: Vec<Message>,
}

/// POST /api/v1/chat
///
/// Appends the user message, invokes the selected provider with the full
/// log, and returns the updated log. Provider failures come back as
/// transcript content; only an invalid model selection is an HTTP error.
pub async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> Response {
    let mut session = Session::with_messages(req.messages, req.model);

    match session.send(&state.providers, &req.text).await {
        Ok(()) => (
            StatusCode::OK,
            Json(SendMessageResponse {
                messages: session.into_messages(),
            }),
        )
            .into_response(),
        Err(e) => response::bad_request(e.to_string()).into_response(),
    }
}
