//! Shared helpers for pipeline integration tests
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use transcript_qa::fs::{FileSystem, MockFileSystem};
use transcript_qa::input::{InputDescriptor, InputKind, InputRegistry};
use transcript_qa::llm::{BackendError, MockLLMClient, MockResponse};
use transcript_qa::output::{FileReportWriter, ReportError, ReportWriter};
use transcript_qa::pipeline::{PipelineConfig, PipelineOrchestrator, QuestionOutcome, Summary};
use transcript_qa::progress::{ProgressEvent, ProgressHandler};
use transcript_qa::LlmCompletionService;

pub const REPORT_PATH: &str = "/out/report.json";

/// Config with no backoff so retry tests run instantly
pub fn fast_config() -> PipelineConfig {
    PipelineConfig::new()
        .with_retry_backoff(Duration::ZERO)
        .with_call_timeout(Duration::from_secs(2))
        .with_output_path(REPORT_PATH)
}

pub fn inline_inputs(transcript: &str, questions: &[&str]) -> InputRegistry {
    InputRegistry::for_run(
        InputDescriptor::inline(InputKind::Text, transcript),
        InputDescriptor::inline(InputKind::QuestionSheet, questions.join("\n")),
    )
}

pub fn file_inputs(transcript: impl Into<PathBuf>, questions: impl Into<PathBuf>) -> InputRegistry {
    InputRegistry::for_run(
        InputDescriptor::file(InputKind::Text, transcript),
        InputDescriptor::file(InputKind::QuestionSheet, questions),
    )
}

pub fn transient() -> MockResponse {
    MockResponse::error(BackendError::NetworkError {
        message: "connection reset by peer".to_string(),
    })
}

/// Orchestrator over a mock LLM and an arbitrary file system
pub fn orchestrator(
    llm: Arc<MockLLMClient>,
    fs: Arc<dyn FileSystem>,
    config: PipelineConfig,
) -> PipelineOrchestrator {
    let completion = Arc::new(LlmCompletionService::new(llm));
    PipelineOrchestrator::with_file_system(config, completion, fs)
}

/// Orchestrator over a mock LLM and an in-memory file system
pub fn mock_orchestrator(llm: Arc<MockLLMClient>) -> (PipelineOrchestrator, Arc<MockFileSystem>) {
    let fs = Arc::new(MockFileSystem::new());
    (orchestrator(llm, fs.clone(), fast_config()), fs)
}

/// Records progress events by name
#[derive(Default)]
pub struct EventRecorder {
    events: Mutex<Vec<String>>,
}

impl EventRecorder {
    pub fn names(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressHandler for EventRecorder {
    fn on_progress(&self, event: &ProgressEvent) {
        let name = match event {
            ProgressEvent::Started { .. } => "started".to_string(),
            ProgressEvent::StageStarted { stage } => format!("stage:{}", stage),
            ProgressEvent::StageComplete { stage, .. } => format!("done:{}", stage),
            ProgressEvent::QuestionStarted { index, .. } => format!("question:{}", index),
            ProgressEvent::QuestionResolved { index, .. } => format!("resolved:{}", index),
            ProgressEvent::RetryScheduled { index, attempt, .. } => {
                format!("retry:{}:{}", index, attempt)
            }
            ProgressEvent::Completed { .. } => "completed".to_string(),
            ProgressEvent::Failed { stage, .. } => format!("failed:{}", stage),
        };
        self.events.lock().unwrap().push(name);
    }
}

/// Report writer that counts calls and delegates to a file writer
pub struct CountingWriter {
    inner: FileReportWriter,
    calls: Mutex<usize>,
}

impl CountingWriter {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            inner: FileReportWriter::new(fs),
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl ReportWriter for CountingWriter {
    fn write_report(
        &self,
        outcomes: &[QuestionOutcome],
        summary: &Summary,
        destination: &Path,
        template: Option<&Path>,
    ) -> Result<(), ReportError> {
        *self.calls.lock().unwrap() += 1;
        self.inner
            .write_report(outcomes, summary, destination, template)
    }
}
