//! Conversation session: the append-and-reply workflow.

use std::sync::Arc;

use tracing::warn;

use crate::llm::{ChatRequest, LlmProvider, Message, ModelId, ProviderRegistry, RegistryError};

/// Remediation hint appended to transcript error messages.
pub const ERROR_HINT: &str = "Try checking your API keys or selecting a different model.";

/// One chat session: the ordered message log plus the selected model.
///
/// The model selection is session state only; it is not recorded on
/// individual messages.
#[derive(Debug, Clone)]
pub struct Session {
    messages: Vec<Message>,
    model: ModelId,
}

impl Session {
    pub fn new(model: ModelId) -> Self {
        Self::with_messages(Vec::new(), model)
    }

    /// Resume a session from an existing log, e.g. one loaded from history.
    pub fn with_messages(messages: Vec<Message>, model: ModelId) -> Self {
        Self { messages, model }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn model(&self) -> &ModelId {
        &self.model
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    /// Append a user message and obtain the assistant reply.
    ///
    /// Empty or whitespace-only input is a no-op. The provider is invoked
    /// with the entire ordered log; there is no truncation or context-window
    /// management. A provider failure is recovered here: the log gains the
    /// user message plus a synthetic assistant message carrying the error
    /// text, and the call still succeeds. Only a model selection outside the
    /// catalog is a hard error.
    pub async fn send(
        &mut self,
        registry: &ProviderRegistry,
        user_text: &str,
    ) -> Result<(), RegistryError> {
        if user_text.trim().is_empty() {
            return Ok(());
        }

        let provider = registry.resolve(&self.model).await?;

        let mut request_messages = self.messages.clone();
        request_messages.push(Message::user(user_text));

        let request = ChatRequest {
            model: self.model.name.clone(),
            messages: request_messages,
            temperature: None,
            max_tokens: None,
        };

        self.messages.push(Message::user(user_text));
        self.messages.push(invoke(provider, request).await);
        Ok(())
    }
}

/// Invoke the provider capability, translating any failure into a synthetic
/// assistant message so the conversation keeps going.
async fn invoke(provider: Arc<dyn LlmProvider>, request: ChatRequest) -> Message {
    match provider.chat(request).await {
        Ok(response) => {
            let content = response
                .choices
                .first()
                .map(|c| c.message.content.clone())
                .unwrap_or_default();
            Message::assistant(content)
        }
        Err(e) => {
            warn!(error = %e, "LLM request failed");
            Message::assistant(format!("Error: {e}\n\n{ERROR_HINT}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::ApiKeys;
    use crate::llm::{
        ChatResponse, Choice, LlmError, Provider, ProviderEndpoints, Role,
    };
    use async_trait::async_trait;

    #[derive(Debug)]
    struct EchoProvider;

    #[async_trait]
    impl LlmProvider for EchoProvider {
        async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
            let last = request.messages.last().cloned().unwrap();
            Ok(ChatResponse {
                id: "test".to_string(),
                choices: vec![Choice {
                    index: 0,
                    message: Message::assistant(format!("echo: {}", last.content)),
                    finish_reason: Some("stop".to_string()),
                }],
                usage: None,
            })
        }
    }

    #[derive(Debug)]
    struct FailingProvider;

    #[async_trait]
    impl LlmProvider for FailingProvider {
        async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse, LlmError> {
            Err(LlmError::Api {
                status: 401,
                message: "invalid api key".to_string(),
            })
        }
    }

    fn request_for(messages: Vec<Message>) -> ChatRequest {
        ChatRequest {
            model: "gpt-4o".to_string(),
            messages,
            temperature: None,
            max_tokens: None,
        }
    }

    fn test_registry() -> ProviderRegistry {
        ProviderRegistry::new(ApiKeys::default().into_shared(), ProviderEndpoints::default())
    }

    /// Registry whose providers all point at an unroutable local port, so
    /// every invocation fails fast without network access.
    fn unreachable_registry() -> ProviderRegistry {
        let endpoints = ProviderEndpoints {
            openai: "http://127.0.0.1:9/v1".to_string(),
            gemini: "http://127.0.0.1:9/v1".to_string(),
            anthropic: "http://127.0.0.1:9".to_string(),
        };
        ProviderRegistry::new(ApiKeys::default().into_shared(), endpoints)
    }

    #[tokio::test]
    async fn empty_input_is_identity() {
        let registry = test_registry();
        let model = ModelId::new(Provider::Openai, "gpt-4o");
        let mut session =
            Session::with_messages(vec![Message::user("Hi"), Message::assistant("Hello!")], model);

        session.send(&registry, "").await.unwrap();
        session.send(&registry, "   \n\t").await.unwrap();

        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[0].content, "Hi");
    }

    #[tokio::test]
    async fn unknown_model_fails_fast() {
        let registry = test_registry();
        let mut session = Session::new(ModelId::new(Provider::Gemini, "gpt-4o"));
        let err = session.send(&registry, "Hello").await.unwrap_err();
        assert!(matches!(err, RegistryError::UnknownModel { .. }));
        // Nothing appended on configuration errors.
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn successful_invoke_appends_user_then_assistant() {
        let reply = invoke(Arc::new(EchoProvider), request_for(vec![Message::user("Hello")])).await;
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.content, "echo: Hello");
    }

    #[tokio::test]
    async fn provider_failure_becomes_transcript_text() {
        let reply = invoke(
            Arc::new(FailingProvider),
            request_for(vec![Message::user("Hi")]),
        )
        .await;
        assert_eq!(reply.role, Role::Assistant);
        assert!(reply.content.starts_with("Error:"));
        assert!(reply.content.contains("invalid api key"));
        assert!(reply.content.contains(ERROR_HINT));
    }

    #[tokio::test]
    async fn send_over_unreachable_endpoint_recovers_in_transcript() {
        let registry = unreachable_registry();
        let mut session = Session::new(ModelId::new(Provider::Openai, "gpt-4o"));

        session.send(&registry, "Hi").await.unwrap();

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], Message::user("Hi"));
        assert_eq!(messages[1].role, Role::Assistant);
        assert!(messages[1].content.contains("Error:"));
        assert!(messages[1].content.contains(ERROR_HINT));
    }

    #[tokio::test]
    async fn send_preserves_prior_messages_in_order() {
        let registry = unreachable_registry();
        let prior = vec![
            Message::user("first"),
            Message::assistant("first reply"),
        ];
        let mut session = Session::with_messages(
            prior.clone(),
            ModelId::new(Provider::Claude, "claude-3-haiku-20240307"),
        );

        session.send(&registry, "second").await.unwrap();

        let messages = session.messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(&messages[..2], &prior[..]);
        assert_eq!(messages[2], Message::user("second"));
        assert_eq!(messages[3].role, Role::Assistant);
    }
}
