//! Completion service boundary
//!
//! The answer resolver never talks to an LLM directly. It asks a
//! [`CompletionService`] to resolve one question against the transcript and
//! gets back raw answer text, a confidence label and a success flag. The
//! service is also where transport failures are sorted into transient
//! (worth another attempt) and permanent.

mod parse;
mod prompt;
mod service;

pub use parse::{extract_json_object, parse_completion};
pub use prompt::{build_question_prompt, SYSTEM_PROMPT};
pub use service::LlmCompletionService;

use crate::llm::BackendError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw result of one completion call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    /// Answer text as produced by the model
    pub answer: String,
    /// Confidence label as produced by the model (High/Medium/Low/Unknown or anything else)
    pub confidence_label: String,
    /// Where in the transcript the answer was found
    pub source_reference: String,
    /// Whether the model reports having found relevant evidence
    pub succeeded: bool,
}

impl Completion {
    pub fn new(
        answer: impl Into<String>,
        confidence_label: impl Into<String>,
        succeeded: bool,
    ) -> Self {
        Self {
            answer: answer.into(),
            confidence_label: confidence_label.into(),
            source_reference: String::new(),
            succeeded,
        }
    }

    pub fn with_source_reference(mut self, source_reference: impl Into<String>) -> Self {
        self.source_reference = source_reference.into();
        self
    }
}

/// Failure of a completion call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    /// Network trouble, timeouts, rate limits, overloaded upstream
    #[error("transient completion failure: {0}")]
    Transient(String),

    /// Malformed request, bad credentials, unknown model
    #[error("permanent completion failure: {0}")]
    Permanent(String),
}

impl CompletionError {
    pub fn is_transient(&self) -> bool {
        matches!(self, CompletionError::Transient(_))
    }
}

impl From<BackendError> for CompletionError {
    fn from(err: BackendError) -> Self {
        if err.is_transient() {
            CompletionError::Transient(err.to_string())
        } else {
            CompletionError::Permanent(err.to_string())
        }
    }
}

/// Resolves a single question against a context document
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn resolve(&self, question: &str, context: &str) -> Result<Completion, CompletionError>;

    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_mapping() {
        let transient: CompletionError = BackendError::TimeoutError { seconds: 10 }.into();
        assert!(transient.is_transient());

        let permanent: CompletionError = BackendError::AuthenticationError {
            message: "bad key".to_string(),
        }
        .into();
        assert_eq!(
            permanent,
            CompletionError::Permanent("Authentication failed: bad key".to_string())
        );
    }

    #[test]
    fn test_completion_builder() {
        let completion =
            Completion::new("PostgreSQL", "High", true).with_source_reference("Alice");
        assert_eq!(completion.source_reference, "Alice");
        assert!(completion.succeeded);
    }
}
