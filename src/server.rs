use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::timeout::TimeoutLayer;

use crate::credentials::CredentialStore;
use crate::handlers;
use crate::history::HistoryStore;
use crate::llm::ProviderRegistry;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub providers: ProviderRegistry,
    pub credentials: CredentialStore,
    pub histories: HistoryStore,
}

pub fn build_app(state: AppState, request_timeout_secs: u64) -> Router {
    let api_v1 = Router::new()
        .route("/models", get(handlers::v1::list_models))
        .route("/chat", post(handlers::v1::send_message))
        .route(
            "/histories",
            get(handlers::v1::list_histories).post(handlers::v1::save_history),
        )
        .route(
            "/histories/{history_id}",
            get(handlers::v1::load_history).delete(handlers::v1::delete_history),
        )
        .route(
            "/keys",
            get(handlers::v1::get_keys).put(handlers::v1::save_keys),
        )
        .with_state(state);

    Router::new()
        .route("/livez", get(handlers::livez))
        .route("/readyz", get(handlers::readyz))
        .nest("/api/v1", api_v1)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(request_timeout_secs),
        ))
}
