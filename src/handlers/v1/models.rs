//! Model catalog HTTP handler.

use axum::Json;
use serde::Serialize;

use crate::llm::{Provider, available_models};

#[derive(Serialize)]
pub struct ProviderModels {
    pub provider: Provider,
    pub models: Vec<&'static str>,
}

/// GET /api/v1/models
pub async fn list_models() -> Json<Vec<ProviderModels>> {
    let catalog = available_models()
        .into_iter()
        .map(|(provider, models)| ProviderModels {
            provider,
            models: models.to_vec(),
        })
        .collect();
    Json(catalog)
}
