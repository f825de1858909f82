use super::parse::parse_completion;
use super::prompt::{build_question_prompt, SYSTEM_PROMPT};
use super::{Completion, CompletionError, CompletionService};
use crate::llm::{ChatMessage, LLMClient, LLMRequest};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

const DEFAULT_TEMPERATURE: f32 = 0.0;
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// [`CompletionService`] backed by an [`LLMClient`]
pub struct LlmCompletionService {
    client: Arc<dyn LLMClient>,
    temperature: f32,
    max_tokens: u32,
}

impl LlmCompletionService {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self {
            client,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl CompletionService for LlmCompletionService {
    async fn resolve(&self, question: &str, context: &str) -> Result<Completion, CompletionError> {
        let request = LLMRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_question_prompt(question, context)),
        ])
        .with_temperature(self.temperature)
        .with_max_tokens(self.max_tokens);

        let response = self.client.chat(request).await?;

        debug!(
            client = self.client.name(),
            model = self.client.model_info().as_deref().unwrap_or("default"),
            response_time_ms = response.response_time.as_millis() as u64,
            chars = response.content.len(),
            "Completion received"
        );

        Ok(parse_completion(&response.content))
    }

    fn name(&self) -> &str {
        self.client.name()
    }
}
