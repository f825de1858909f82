//! Configuration management for transcript-qa
//!
//! Settings are read from `TQA_*` environment variables with defaults. The
//! pipeline itself never touches the environment: [`QaConfig::pipeline_config`]
//! turns the loaded settings into an explicit [`PipelineConfig`].
//!
//! # Environment Variables
//!
//! - `TQA_PROVIDER`: ollama|openai|claude|gemini|grok|groq - default: "openai"
//! - `TQA_MODEL`: model name - default: "gpt-4o-mini" ("qwen2.5:7b" for Ollama)
//! - `TQA_API_BASE_URL`: custom OpenAI-compatible endpoint (read by the client)
//! - `TQA_REQUEST_TIMEOUT`: per-call timeout in seconds - default: "60"
//! - `TQA_RETRY_LIMIT`: attempts per question - default: "3"
//! - `TQA_RETRY_BACKOFF_MS`: first retry delay - default: "1000"
//! - `TQA_TEMPERATURE`: sampling temperature - default: "0.0"
//! - `TQA_MAX_TOKENS`: completion token cap - default: "1024"
//! - `TQA_QUESTION_COLUMN`: question column header - default: "Question"
//! - `TQA_SHEET`: question sheet name - default: first sheet
//! - `TQA_OUTPUT`: report destination - default: "output/filled_questionnaire.json"
//! - `TQA_LOG_LEVEL`: logging level - default: "info"
//!
//! Provider credentials use the variables genai reads itself (`OPENAI_API_KEY`,
//! `ANTHROPIC_API_KEY`, `OLLAMA_HOST`, ...).

use crate::completion::LlmCompletionService;
use crate::input::QuestionSelector;
use crate::llm::{GenAIClient, LLMClient};
use crate::pipeline::{PipelineConfig, DEFAULT_OUTPUT_PATH};
use genai::adapter::AdapterKind;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_OLLAMA_MODEL: &str = "qwen2.5:7b";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
const DEFAULT_RETRY_LIMIT: u32 = 3;
const DEFAULT_RETRY_BACKOFF_MS: u64 = 1000;
const DEFAULT_TEMPERATURE: f32 = 0.0;
const DEFAULT_MAX_TOKENS: u32 = 1024;
const DEFAULT_QUESTION_COLUMN: &str = "Question";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid provider: {0}. Valid options: ollama, openai, claude, gemini, grok, groq")]
    InvalidProvider(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Parses a provider name as accepted by `TQA_PROVIDER` and `--backend`
pub fn parse_provider(name: &str) -> Result<AdapterKind, ConfigError> {
    match name.trim().to_lowercase().as_str() {
        "ollama" => Ok(AdapterKind::Ollama),
        "openai" => Ok(AdapterKind::OpenAI),
        "claude" | "anthropic" => Ok(AdapterKind::Anthropic),
        "gemini" => Ok(AdapterKind::Gemini),
        "grok" | "xai" => Ok(AdapterKind::Xai),
        "groq" => Ok(AdapterKind::Groq),
        _ => Err(ConfigError::InvalidProvider(name.to_string())),
    }
}

/// Model used when `TQA_MODEL` is not set
pub fn default_model(provider: AdapterKind) -> &'static str {
    match provider {
        AdapterKind::Ollama => DEFAULT_OLLAMA_MODEL,
        _ => DEFAULT_OPENAI_MODEL,
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

/// Runtime settings for a questionnaire run
#[derive(Debug, Clone)]
pub struct QaConfig {
    pub provider: AdapterKind,
    pub model: String,
    pub request_timeout_secs: u64,
    /// Completion attempts per question, including the first
    pub retry_limit: u32,
    pub retry_backoff_ms: u64,
    pub temperature: f32,
    pub max_tokens: u32,
    pub question_column: String,
    pub sheet: Option<String>,
    pub output_path: PathBuf,
    pub log_level: String,
}

impl Default for QaConfig {
    /// Loads from `TQA_*` variables; unparsable values fall back to defaults
    fn default() -> Self {
        let provider = env::var("TQA_PROVIDER")
            .ok()
            .and_then(|s| parse_provider(&s).ok())
            .unwrap_or(AdapterKind::OpenAI);

        let model = env::var("TQA_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| default_model(provider).to_string());

        Self {
            provider,
            model,
            request_timeout_secs: env_parse("TQA_REQUEST_TIMEOUT")
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            retry_limit: env_parse("TQA_RETRY_LIMIT").unwrap_or(DEFAULT_RETRY_LIMIT),
            retry_backoff_ms: env_parse("TQA_RETRY_BACKOFF_MS").unwrap_or(DEFAULT_RETRY_BACKOFF_MS),
            temperature: env_parse("TQA_TEMPERATURE").unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: env_parse("TQA_MAX_TOKENS").unwrap_or(DEFAULT_MAX_TOKENS),
            question_column: env::var("TQA_QUESTION_COLUMN")
                .unwrap_or_else(|_| DEFAULT_QUESTION_COLUMN.to_string()),
            sheet: env::var("TQA_SHEET").ok().filter(|s| !s.trim().is_empty()),
            output_path: env::var("TQA_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_PATH)),
            log_level: env::var("TQA_LOG_LEVEL")
                .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
                .to_lowercase(),
        }
    }
}

impl QaConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 600 {
            return Err(ConfigError::ValidationFailed(format!(
                "Request timeout must be between 1 and 600 seconds, got {}",
                self.request_timeout_secs
            )));
        }

        if !(1..=10).contains(&self.retry_limit) {
            return Err(ConfigError::ValidationFailed(format!(
                "Retry limit must be between 1 and 10, got {}",
                self.retry_limit
            )));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationFailed(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationFailed(
                "Max tokens must be at least 1".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("Model name is empty".to_string()));
        }

        if self.question_column.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Question column is empty".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn question_selector(&self) -> QuestionSelector {
        let selector = QuestionSelector::new(self.question_column.clone());
        match &self.sheet {
            Some(sheet) => selector.with_sheet(sheet.clone()),
            None => selector,
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new()
            .with_retry_limit(self.retry_limit)
            .with_retry_backoff(Duration::from_millis(self.retry_backoff_ms))
            .with_call_timeout(self.request_timeout())
            .with_question_selector(self.question_selector())
            .with_output_path(self.output_path.clone())
    }

    /// genai-backed client for the configured provider and model
    pub fn create_client(&self) -> Arc<dyn LLMClient> {
        Arc::new(GenAIClient::new(
            self.provider,
            self.model.clone(),
            self.request_timeout(),
        ))
    }

    pub fn completion_service(&self, client: Arc<dyn LLMClient>) -> LlmCompletionService {
        LlmCompletionService::new(client)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
    }

    pub fn to_display_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();

        map.insert("provider".to_string(), self.provider.as_str().to_string());
        map.insert("model".to_string(), self.model.clone());
        map.insert(
            "request_timeout_secs".to_string(),
            self.request_timeout_secs.to_string(),
        );
        map.insert("retry_limit".to_string(), self.retry_limit.to_string());
        map.insert(
            "retry_backoff_ms".to_string(),
            self.retry_backoff_ms.to_string(),
        );
        map.insert("temperature".to_string(), self.temperature.to_string());
        map.insert("max_tokens".to_string(), self.max_tokens.to_string());
        map.insert("question_column".to_string(), self.question_column.clone());
        if let Some(ref sheet) = self.sheet {
            map.insert("sheet".to_string(), sheet.clone());
        }
        map.insert(
            "output_path".to_string(),
            self.output_path.display().to_string(),
        );
        map.insert("log_level".to_string(), self.log_level.clone());

        map
    }
}

impl fmt::Display for QaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Transcript QA Configuration:")?;
        writeln!(f, "  Provider: {}", self.provider.as_str())?;
        writeln!(f, "  Model: {}", self.model)?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(
            f,
            "  Retry Limit: {} (backoff {}ms)",
            self.retry_limit, self.retry_backoff_ms
        )?;
        writeln!(f, "  Temperature: {}", self.temperature)?;
        writeln!(f, "  Max Tokens: {}", self.max_tokens)?;
        writeln!(f, "  Question Column: {}", self.question_column)?;
        if let Some(ref sheet) = self.sheet {
            writeln!(f, "  Sheet: {}", sheet)?;
        }
        writeln!(f, "  Output: {}", self.output_path.display())?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
