use super::outcome::{Confidence, QuestionOutcome};
use crate::completion::{CompletionError, CompletionService};
use crate::progress::{ProgressEvent, ProgressHandler};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Bounded retry budget for a single question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum attempts, including the first one
    pub limit: u32,
    /// Delay before the first retry
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(limit: u32, backoff: Duration) -> Self {
        Self {
            limit: limit.max(1),
            backoff,
        }
    }

    /// Delay after failed attempt number `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.backoff.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(1000))
    }
}

/// Turns one question into exactly one [`QuestionOutcome`]
///
/// Transient completion failures, including calls that exceed the per-call
/// timeout, are retried up to the policy limit. Permanent failures and
/// exhausted budgets degrade to an `Unknown` outcome instead of an error.
pub struct AnswerResolver {
    service: Arc<dyn CompletionService>,
    policy: RetryPolicy,
    call_timeout: Duration,
    progress: Option<Arc<dyn ProgressHandler>>,
}

impl AnswerResolver {
    pub fn new(service: Arc<dyn CompletionService>, policy: RetryPolicy, call_timeout: Duration) -> Self {
        Self {
            service,
            policy,
            call_timeout,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: Option<Arc<dyn ProgressHandler>>) -> Self {
        self.progress = progress;
        self
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub async fn resolve(&self, index: usize, question: &str, transcript: &str) -> QuestionOutcome {
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(
                question_index = index,
                attempt,
                limit = self.policy.limit,
                "Completion attempt"
            );

            let error = match self.call(question, transcript).await {
                Ok(completion) => {
                    let confidence = Confidence::from_label(&completion.confidence_label);
                    return QuestionOutcome::classify(
                        question,
                        completion.answer,
                        confidence,
                        completion.source_reference,
                        completion.succeeded,
                        attempt,
                    );
                }
                Err(error) => error,
            };

            if !error.is_transient() {
                warn!(question_index = index, error = %error, "Permanent completion failure");
                return QuestionOutcome::unresolved(question, attempt, error.to_string());
            }

            if attempt >= self.policy.limit {
                warn!(
                    question_index = index,
                    attempts = attempt,
                    error = %error,
                    "Retry budget exhausted"
                );
                return QuestionOutcome::unresolved(
                    question,
                    attempt,
                    format!("retry budget exhausted: {}", error),
                );
            }

            let delay = self.policy.delay_for(attempt);
            self.emit(ProgressEvent::RetryScheduled {
                index,
                attempt,
                delay,
                error: error.to_string(),
            });
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    async fn call(
        &self,
        question: &str,
        transcript: &str,
    ) -> Result<crate::completion::Completion, CompletionError> {
        match tokio::time::timeout(self.call_timeout, self.service.resolve(question, transcript))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(CompletionError::Transient(format!(
                "completion timed out after {}ms",
                self.call_timeout.as_millis()
            ))),
        }
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(handler) = &self.progress {
            handler.on_progress(&event);
        }
    }
}
