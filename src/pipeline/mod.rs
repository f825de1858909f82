//! Question-answering pipeline
//!
//! A run moves through three fixed stages over a single [`PipelineState`]:
//!
//! - **Load** reads the transcript and the question list from the declared inputs
//! - **Resolve** asks the completion service about each question, retrying
//!   transient failures within a bounded budget
//! - **Aggregate** summarises the outcomes and writes the report
//!
//! Any stage error moves the run to [`RunPhase::Failed`] and later stages are
//! skipped. Successful runs end in [`RunPhase::End`].

mod config;
mod error;
mod orchestrator;
mod outcome;
mod resolver;
mod stages;
mod state;

pub use config::{PipelineConfig, DEFAULT_OUTPUT_PATH, DEFAULT_RETRY_LIMIT};
pub use error::PipelineError;
pub use orchestrator::{PipelineOrchestrator, PipelineRun, RunResult};
pub use outcome::{
    Confidence, ConfidenceHistogram, QaResults, QuestionOutcome, Summary, PROCESSING_COMPLETED,
};
pub use resolver::{AnswerResolver, RetryPolicy};
pub use stages::{AggregateStage, LoadStage, ResolveStage, Stage};
pub use state::{PipelineState, RunPhase};
