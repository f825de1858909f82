use super::config::PipelineConfig;
use super::error::PipelineError;
use super::outcome::QaResults;
use super::resolver::{AnswerResolver, RetryPolicy};
use super::stages::{AggregateStage, LoadStage, ResolveStage, Stage};
use super::state::{PipelineState, RunPhase};
use crate::completion::CompletionService;
use crate::fs::FileSystem;
use crate::input::{
    FileQuestionReader, FsTranscriptReader, InputRegistry, QuestionSourceReader, TranscriptReader,
};
use crate::output::{FileReportWriter, NarrativeComposer, ReportWriter, TextNarrativeComposer};
use crate::progress::{ProgressEvent, ProgressHandler};
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

/// Caller-facing result of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub success: bool,
    pub message: String,
    /// Present whenever the outcomes were computed, even if persisting them failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<QaResults>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    pub run_id: String,
}

/// Finished run: the final state plus run bookkeeping
#[derive(Debug)]
pub struct PipelineRun {
    pub run_id: Uuid,
    pub state: PipelineState,
    pub elapsed: Duration,
}

impl PipelineRun {
    pub fn phase(&self) -> RunPhase {
        self.state.phase()
    }

    pub fn succeeded(&self) -> bool {
        self.state.phase() == RunPhase::End
    }

    pub fn error(&self) -> Option<&PipelineError> {
        self.state.failure()
    }

    pub fn results(&self) -> Option<&QaResults> {
        self.state.results.as_ref()
    }

    pub fn result(&self) -> RunResult {
        let run_id = self.run_id.to_string();
        let data = self.state.results.clone();

        match self.state.failure() {
            Some(err) => RunResult {
                success: false,
                message: format!("{} stage failed: {}", err.stage(), err),
                data,
                errors: vec![err.to_string()],
                run_id,
            },
            None => RunResult {
                success: true,
                message: self
                    .state
                    .narrative
                    .clone()
                    .unwrap_or_else(|| "Question answering complete".to_string()),
                data,
                errors: Vec::new(),
                run_id,
            },
        }
    }
}

/// Sequences Load → Resolve → Aggregate over one [`PipelineState`]
///
/// A stage error or panic moves the run to `Failed` and no later stage is
/// invoked. Each call to [`PipelineOrchestrator::run`] owns a fresh state.
pub struct PipelineOrchestrator {
    config: PipelineConfig,
    completion: Arc<dyn CompletionService>,
    transcript_reader: Arc<dyn TranscriptReader>,
    question_reader: Arc<dyn QuestionSourceReader>,
    writer: Arc<dyn ReportWriter>,
    narrative: Option<Arc<dyn NarrativeComposer>>,
    progress_handler: Option<Arc<dyn ProgressHandler>>,
}

impl PipelineOrchestrator {
    pub fn new(
        config: PipelineConfig,
        completion: Arc<dyn CompletionService>,
        transcript_reader: Arc<dyn TranscriptReader>,
        question_reader: Arc<dyn QuestionSourceReader>,
        writer: Arc<dyn ReportWriter>,
    ) -> Self {
        Self {
            config,
            completion,
            transcript_reader,
            question_reader,
            writer,
            narrative: None,
            progress_handler: None,
        }
    }

    /// File-backed readers and writer plus the text narrative
    pub fn with_file_system(
        config: PipelineConfig,
        completion: Arc<dyn CompletionService>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self::new(
            config,
            completion,
            Arc::new(FsTranscriptReader::new(fs.clone())),
            Arc::new(FileQuestionReader::new(fs.clone())),
            Arc::new(FileReportWriter::new(fs)),
        )
        .with_narrative(Arc::new(TextNarrativeComposer))
    }

    pub fn with_narrative(mut self, narrative: Arc<dyn NarrativeComposer>) -> Self {
        self.narrative = Some(narrative);
        self
    }

    pub fn with_progress(mut self, handler: Arc<dyn ProgressHandler>) -> Self {
        self.progress_handler = Some(handler);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub async fn run(&self, inputs: InputRegistry) -> PipelineRun {
        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline_run", run_id = %run_id);
        self.execute(run_id, inputs).instrument(span).await
    }

    async fn execute(&self, run_id: Uuid, inputs: InputRegistry) -> PipelineRun {
        let start = Instant::now();
        let mut state = PipelineState::new(inputs, self.config.retry_limit);

        info!(
            completion = self.completion.name(),
            retry_limit = state.retry_limit(),
            "Starting questionnaire run"
        );
        self.emit(ProgressEvent::Started {
            run_id: run_id.to_string(),
        });

        for stage in self.stages() {
            let name = stage.name();
            self.emit(ProgressEvent::StageStarted {
                stage: name.to_string(),
            });

            let stage_start = Instant::now();
            let outcome = AssertUnwindSafe(stage.execute(&mut state))
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| {
                    Err(PipelineError::Unexpected {
                        stage: name.to_string(),
                        message: panic_message(payload.as_ref()),
                    })
                });

            if let Err(err) = outcome {
                error!(stage = name, error = %err, "Stage failed");
                self.emit(ProgressEvent::Failed {
                    stage: name.to_string(),
                    error: err.to_string(),
                });
                state.fail(err);
                break;
            }

            let phase = state.advance();
            debug!(stage = name, phase = %phase, "Stage complete");
            self.emit(ProgressEvent::StageComplete {
                stage: name.to_string(),
                duration: stage_start.elapsed(),
            });
        }

        if !state.is_failed() {
            state.advance();
            let (answered, total) = state
                .results
                .as_ref()
                .and_then(|r| r.summary.as_ref())
                .map(|s| (s.answered, s.total))
                .unwrap_or_default();
            info!(answered, total, "Run complete");
            self.emit(ProgressEvent::Completed {
                answered,
                total,
                total_time: start.elapsed(),
            });
        }

        PipelineRun {
            run_id,
            state,
            elapsed: start.elapsed(),
        }
    }

    fn stages(&self) -> Vec<Box<dyn Stage>> {
        let resolver = AnswerResolver::new(
            self.completion.clone(),
            RetryPolicy::new(self.config.retry_limit, self.config.retry_backoff),
            self.config.call_timeout,
        )
        .with_progress(self.progress_handler.clone());

        vec![
            Box::new(LoadStage::new(
                self.transcript_reader.clone(),
                self.question_reader.clone(),
                self.config.question_selector.clone(),
            )),
            Box::new(ResolveStage::new(resolver, self.progress_handler.clone())),
            Box::new(AggregateStage::new(
                self.writer.clone(),
                self.narrative.clone(),
                self.config.output_path.clone(),
            )),
        ]
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(handler) = &self.progress_handler {
            handler.on_progress(&event);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "stage panicked".to_string()
    }
}
