//! LLM client abstraction layer
//!
//! This module provides a trait-based abstraction for LLM communication,
//! allowing the genai-backed client and the scripted mock to be used
//! interchangeably by the completion service.

mod client;
mod error;
mod genai;
mod mock;
mod types;

pub use self::genai::GenAIClient;
pub use client::LLMClient;
pub use error::{classify_provider_error, BackendError};
pub use mock::{MockLLMClient, MockResponse};
pub use types::{ChatMessage, LLMRequest, LLMResponse, MessageRole};
