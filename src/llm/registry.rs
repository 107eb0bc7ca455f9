//! Provider registry: the model catalog and capability resolution.

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::anthropic::AnthropicProvider;
use super::openai::OpenAiCompatibleProvider;
use super::provider::{LlmProvider, ModelId, Provider};
use crate::credentials::SharedKeys;

/// Selectable models per provider. Fixed at build time; changing the catalog
/// means redeploying.
const GEMINI_MODELS: &[&str] = &[
    "gemini-2.0-flash",
    "gemini-1.5-pro",
    "gemini-1.5-flash",
    "gemini-pro",
    "gemini-pro-vision",
];

const CLAUDE_MODELS: &[&str] = &[
    "claude-3-opus-20240229",
    "claude-3-sonnet-20240229",
    "claude-3-haiku-20240307",
];

const OPENAI_MODELS: &[&str] = &["gpt-4o", "gpt-4-turbo", "gpt-3.5-turbo"];

/// The full model catalog, in provider declaration order.
pub fn available_models() -> [(Provider, &'static [&'static str]); 3] {
    [
        (Provider::Gemini, GEMINI_MODELS),
        (Provider::Claude, CLAUDE_MODELS),
        (Provider::Openai, OPENAI_MODELS),
    ]
}

fn models_for(provider: Provider) -> &'static [&'static str] {
    match provider {
        Provider::Gemini => GEMINI_MODELS,
        Provider::Claude => CLAUDE_MODELS,
        Provider::Openai => OPENAI_MODELS,
    }
}

/// Base URLs for each provider's API. Gemini is reached through Google's
/// OpenAI-compatible endpoint, so it shares a client with OpenAI.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderEndpoints {
    #[serde(default = "default_openai_url")]
    pub openai: String,
    #[serde(default = "default_gemini_url")]
    pub gemini: String,
    #[serde(default = "default_anthropic_url")]
    pub anthropic: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            openai: default_openai_url(),
            gemini: default_gemini_url(),
            anthropic: default_anthropic_url(),
        }
    }
}

fn default_openai_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_gemini_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/openai".to_string()
}

fn default_anthropic_url() -> String {
    "https://api.anthropic.com".to_string()
}

/// Registry of LLM providers over the fixed provider set.
///
/// Providers are constructed per resolution with the credential current at
/// that moment, so a key saved mid-session takes effect on the next send.
#[derive(Clone)]
pub struct ProviderRegistry {
    keys: SharedKeys,
    endpoints: ProviderEndpoints,
}

impl ProviderRegistry {
    pub fn new(keys: SharedKeys, endpoints: ProviderEndpoints) -> Self {
        Self { keys, endpoints }
    }

    /// Resolve a model selection to an invocable provider.
    ///
    /// Fails only on configuration errors (a model name outside the catalog).
    /// A missing credential still resolves; the API call then fails and the
    /// caller decides how to surface it.
    pub async fn resolve(&self, model: &ModelId) -> Result<Arc<dyn LlmProvider>, RegistryError> {
        if !models_for(model.provider).contains(&model.name.as_str()) {
            return Err(RegistryError::UnknownModel {
                provider: model.provider,
                name: model.name.clone(),
            });
        }

        let api_key = self
            .keys
            .read()
            .await
            .for_provider(model.provider)
            .to_string();
        debug!(model = %model, "resolved provider");

        let provider: Arc<dyn LlmProvider> = match model.provider {
            Provider::Gemini => Arc::new(OpenAiCompatibleProvider::new(
                self.endpoints.gemini.clone(),
                non_empty(api_key),
            )),
            Provider::Openai => Arc::new(OpenAiCompatibleProvider::new(
                self.endpoints.openai.clone(),
                non_empty(api_key),
            )),
            Provider::Claude => Arc::new(AnthropicProvider::new(
                self.endpoints.anthropic.clone(),
                api_key,
            )),
        };

        Ok(provider)
    }
}

fn non_empty(key: String) -> Option<String> {
    if key.is_empty() { None } else { Some(key) }
}

/// Configuration errors from model selection.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown provider '{0}'")]
    UnknownProvider(String),

    #[error("model '{name}' is not available for provider '{provider}'")]
    UnknownModel { provider: Provider, name: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::ApiKeys;

    fn test_registry() -> ProviderRegistry {
        ProviderRegistry::new(ApiKeys::default().into_shared(), ProviderEndpoints::default())
    }

    #[test]
    fn catalog_covers_every_provider() {
        let catalog = available_models();
        assert_eq!(catalog.len(), Provider::ALL.len());
        for (provider, models) in catalog {
            assert!(
                !models.is_empty(),
                "provider {provider} has no selectable models"
            );
        }
    }

    #[tokio::test]
    async fn resolve_known_models() {
        let registry = test_registry();
        for (provider, models) in available_models() {
            let model = ModelId::new(provider, models[0]);
            assert!(registry.resolve(&model).await.is_ok());
        }
    }

    #[tokio::test]
    async fn resolve_rejects_unknown_model() {
        let registry = test_registry();
        let model = ModelId::new(Provider::Claude, "gpt-4o");
        let err = registry.resolve(&model).await.unwrap_err();
        assert!(
            matches!(err, RegistryError::UnknownModel { provider, ref name }
                if provider == Provider::Claude && name == "gpt-4o")
        );
    }

    #[tokio::test]
    async fn resolve_with_empty_key_still_succeeds() {
        // An unconfigured key is a runtime failure at call time, not a
        // resolution failure.
        let registry = test_registry();
        let model = ModelId::new(Provider::Openai, "gpt-4o");
        assert!(registry.resolve(&model).await.is_ok());
    }

    #[test]
    fn endpoint_defaults() {
        let endpoints = ProviderEndpoints::default();
        assert!(endpoints.openai.starts_with("https://api.openai.com"));
        assert!(endpoints.gemini.contains("generativelanguage"));
        assert!(endpoints.anthropic.starts_with("https://api.anthropic.com"));
    }
}
