//! Provider identifiers and the capability trait implementations bind to.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::LlmError;
use super::registry::RegistryError;
use super::types::{ChatRequest, ChatResponse};

/// The fixed set of hosted providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    Claude,
    Openai,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Gemini, Provider::Claude, Provider::Openai];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::Claude => "claude",
            Provider::Openai => "openai",
        }
    }

    /// The credential key this provider's client authenticates with.
    pub fn credential_key(&self) -> &'static str {
        match self {
            Provider::Gemini => "GOOGLE_API_KEY",
            Provider::Claude => "ANTHROPIC_API_KEY",
            Provider::Openai => "OPENAI_API_KEY",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gemini" => Ok(Provider::Gemini),
            "claude" => Ok(Provider::Claude),
            "openai" => Ok(Provider::Openai),
            other => Err(RegistryError::UnknownProvider(other.to_string())),
        }
    }
}

/// A (provider, model name) pair identifying one selectable backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelId {
    pub provider: Provider,
    pub name: String,
}

impl ModelId {
    pub fn new(provider: Provider, name: impl Into<String>) -> Self {
        Self {
            provider,
            name: name.into(),
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.name)
    }
}

/// Trait for LLM providers with different API formats.
#[async_trait]
pub trait LlmProvider: Send + Sync + fmt::Debug {
    /// Make a chat completion request.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, LlmError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_str_roundtrip() {
        for provider in Provider::ALL {
            assert_eq!(provider.as_str().parse::<Provider>().unwrap(), provider);
        }
    }

    #[test]
    fn provider_from_str_unknown() {
        let err = "mistral".parse::<Provider>().unwrap_err();
        assert!(matches!(err, RegistryError::UnknownProvider(name) if name == "mistral"));
    }

    #[test]
    fn provider_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&Provider::Claude).unwrap(),
            "\"claude\""
        );
        assert_eq!(
            serde_json::from_str::<Provider>("\"gemini\"").unwrap(),
            Provider::Gemini
        );
        assert!(serde_json::from_str::<Provider>("\"cohere\"").is_err());
    }

    #[test]
    fn model_id_display() {
        let id = ModelId::new(Provider::Openai, "gpt-4o");
        assert_eq!(id.to_string(), "openai:gpt-4o");
    }
}
