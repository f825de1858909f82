//! transcript-qa - LLM-assisted questionnaire completion from transcripts
//!
//! Given a free-text meeting transcript and a list of questions about a
//! software system, this library asks a language model to answer every
//! question from transcript evidence, classifies each answer's confidence and
//! writes a reviewable report.
//!
//! # Core Concepts
//!
//! - **Inputs**: a transcript and a question source, each a file locator,
//!   inline content, or both ([`input`])
//! - **Completion service**: resolves one question against the transcript and
//!   separates transient from permanent failures ([`completion`], [`llm`])
//! - **Pipeline**: Load → Resolve → Aggregate over a single state, stopping at
//!   the first failing stage ([`pipeline`])
//! - **Report**: a workbook of answers, a summary and the unanswered
//!   questions ([`output`])
//!
//! # Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use transcript_qa::fs::RealFileSystem;
//! use transcript_qa::input::{InputDescriptor, InputKind, InputRegistry};
//! use transcript_qa::pipeline::PipelineOrchestrator;
//! use transcript_qa::QaConfig;
//!
//! # async fn example() {
//! let config = QaConfig::default();
//! let completion = Arc::new(config.completion_service(config.create_client()));
//! let orchestrator = PipelineOrchestrator::with_file_system(
//!     config.pipeline_config(),
//!     completion,
//!     Arc::new(RealFileSystem),
//! );
//!
//! let run = orchestrator
//!     .run(InputRegistry::for_run(
//!         InputDescriptor::file(InputKind::Text, "meeting.txt"),
//!         InputDescriptor::file(InputKind::QuestionSheet, "questions.json"),
//!     ))
//!     .await;
//! println!("{}", run.result().message);
//! # }
//! ```

pub mod cli;
pub mod completion;
pub mod config;
pub mod fs;
pub mod input;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod util;

pub use completion::{Completion, CompletionError, CompletionService, LlmCompletionService};
pub use config::{ConfigError, QaConfig};
pub use llm::{BackendError, GenAIClient, LLMClient, MockLLMClient, MockResponse};
pub use pipeline::{
    Confidence, PipelineConfig, PipelineError, PipelineOrchestrator, PipelineRun, QaResults,
    QuestionOutcome, RunPhase, RunResult, Summary,
};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
