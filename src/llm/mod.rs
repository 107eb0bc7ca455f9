//! LLM provider clients for chat completions.

mod anthropic;
mod error;
mod openai;
mod provider;
mod registry;
mod types;

pub use anthropic::AnthropicProvider;
pub use error::LlmError;
pub use openai::OpenAiCompatibleProvider;
pub use provider::{LlmProvider, ModelId, Provider};
pub use registry::{ProviderEndpoints, ProviderRegistry, RegistryError, available_models};
pub use types::{ChatRequest, ChatResponse, Choice, Message, Role, Usage};
