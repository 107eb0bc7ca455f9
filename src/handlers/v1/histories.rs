//! Chat history HTTP handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::llm::{Message, ModelId};
use crate::response;
use crate::server::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct SaveHistoryRequest {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub model: Option<ModelId>,
}

#[derive(Serialize)]
pub struct SaveHistoryResponse {
    /// `null` when the log was empty and nothing was saved.
    pub id: Option<String>,
}

#[derive(Serialize)]
pub struct HistorySummary {
    pub id: String,
    pub title: String,
}

#[derive(Serialize)]
pub struct LoadHistoryResponse {
    pub messages: Vec<Message>,
    pub model: Option<ModelId>,
}

#[derive(Serialize)]
pub struct DeleteHistoryResponse {
    pub deleted: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/histories — the new-chat event flushes the finished log here.
pub async fn save_history(
    State(state): State<AppState>,
    Json(req): Json<SaveHistoryRequest>,
) -> Response {
    match state.histories.save(&req.messages, req.model).await {
        Ok(id) => (StatusCode::OK, Json(SaveHistoryResponse { id })).into_response(),
        Err(e) => {
            response::internal_error(format!("Failed to save chat history: {e}")).into_response()
        }
    }
}

/// GET /api/v1/histories
pub async fn list_histories(State(state): State<AppState>) -> Json<Vec<HistorySummary>> {
    let histories = state
        .histories
        .list()
        .await
        .into_iter()
        .map(|(id, title)| HistorySummary { id, title })
        .collect();
    Json(histories)
}

/// GET /api/v1/histories/{history_id}
///
/// Always 200: a missing or unreadable record is an empty log with no model,
/// matching the store's soft-fail contract.
pub async fn load_history(
    State(state): State<AppState>,
    Path(history_id): Path<String>,
) -> Json<LoadHistoryResponse> {
    let (messages, model) = state.histories.load(&history_id).await;
    Json(LoadHistoryResponse { messages, model })
}

/// DELETE /api/v1/histories/{history_id}
pub async fn delete_history(
    State(state): State<AppState>,
    Path(history_id): Path<String>,
) -> Json<DeleteHistoryResponse> {
    let deleted = state.histories.delete(&history_id).await;
    Json(DeleteHistoryResponse { deleted })
}
