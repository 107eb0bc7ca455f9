//! OpenAI-compatible LLM provider.
//!
//! Works with OpenAI itself and with Google's OpenAI-compatible Gemini
//! endpoint, which speak the same chat-completions format.

use async_trait::async_trait;
use reqwest::Client;

use super::error::LlmError;
use super::provider::LlmProvider;
use super::types::{ChatRequest, ChatResponse};

/// OpenAI-compatible provider.
#[derive(Debug)]
pub struct OpenAiCompatibleProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiCompatibleProvider {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut req = self
            .client
            .post(&url)
            .header("Content-Type", "application/json");

        if let Some(ref key) = self.api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }

        let response = req.json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, message });
        }

        Ok(response.json().await?)
    }
}
