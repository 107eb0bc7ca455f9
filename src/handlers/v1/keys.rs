//! Credential HTTP handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::credentials::ApiKeys;
use crate::response;
use crate::server::AppState;

#[derive(Serialize)]
pub struct SaveKeysResponse {
    pub message: &'static str,
}

/// GET /api/v1/keys
pub async fn get_keys(State(state): State<AppState>) -> Json<ApiKeys> {
    Json(state.credentials.current().await)
}

/// PUT /api/v1/keys
///
/// The client always submits the full set; all three provider secrets are
/// replaced together.
pub async fn save_keys(State(state): State<AppState>, Json(keys): Json<ApiKeys>) -> Response {
    match state.credentials.save(keys).await {
        Ok(message) => (StatusCode::OK, Json(SaveKeysResponse { message })).into_response(),
        Err(e) => {
            response::internal_error(format!("Failed to save API keys: {e}")).into_response()
        }
    }
}
