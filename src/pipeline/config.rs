use crate::input::QuestionSelector;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_RETRY_LIMIT: u32 = 3;
pub const DEFAULT_OUTPUT_PATH: &str = "output/filled_questionnaire.json";

/// Explicit configuration for one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum completion attempts per question
    pub retry_limit: u32,
    /// Delay before the first retry, doubled for each following one
    pub retry_backoff: Duration,
    /// Upper bound on a single completion call
    pub call_timeout: Duration,
    pub question_selector: QuestionSelector,
    pub output_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            retry_limit: DEFAULT_RETRY_LIMIT,
            retry_backoff: Duration::from_millis(1000),
            call_timeout: Duration::from_secs(60),
            question_selector: QuestionSelector::default(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retry_limit(mut self, retry_limit: u32) -> Self {
        self.retry_limit = retry_limit.max(1);
        self
    }

    pub fn with_retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn with_question_selector(mut self, question_selector: QuestionSelector) -> Self {
        self.question_selector = question_selector;
        self
    }

    pub fn with_output_path(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = output_path.into();
        self
    }
}
