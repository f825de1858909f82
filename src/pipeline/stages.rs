use super::error::PipelineError;
use super::outcome::{QaResults, Summary};
use super::resolver::AnswerResolver;
use super::state::PipelineState;
use crate::input::{
    parse_question_lines, InputDescriptor, QuestionSelector, QuestionSourceReader, ReadError,
    TranscriptReader, QUESTIONS_INPUT, TRANSCRIPT_INPUT,
};
use crate::output::{NarrativeComposer, ReportWriter};
use crate::progress::{ProgressEvent, ProgressHandler};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One step of the fixed Load → Resolve → Aggregate sequence
#[async_trait]
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    async fn execute(&self, state: &mut PipelineState) -> Result<(), PipelineError>;
}

/// Reads the transcript and the question list into the state
pub struct LoadStage {
    transcript_reader: Arc<dyn TranscriptReader>,
    question_reader: Arc<dyn QuestionSourceReader>,
    selector: QuestionSelector,
}

impl LoadStage {
    pub fn new(
        transcript_reader: Arc<dyn TranscriptReader>,
        question_reader: Arc<dyn QuestionSourceReader>,
        selector: QuestionSelector,
    ) -> Self {
        Self {
            transcript_reader,
            question_reader,
            selector,
        }
    }

    /// File contents when the locator resolves, inline content otherwise
    fn resolve_input<T>(
        name: &str,
        input: Option<&InputDescriptor>,
        read_file: impl FnOnce(&std::path::Path) -> Result<T, ReadError>,
        from_inline: impl FnOnce(&str) -> T,
    ) -> Result<T, PipelineError> {
        let input = input.ok_or_else(|| PipelineError::InputLoadError {
            name: name.to_string(),
            message: "input not declared".to_string(),
        })?;

        if let Some(path) = input.path() {
            match read_file(path) {
                Ok(value) => return Ok(value),
                Err(ReadError::NotFound(path)) => match input.content() {
                    Some(content) => {
                        debug!(input = name, path = %path.display(), "File missing, using inline content");
                        return Ok(from_inline(content));
                    }
                    None => {
                        return Err(PipelineError::InputNotFound {
                            name: name.to_string(),
                            path,
                        })
                    }
                },
                Err(err) => {
                    return Err(PipelineError::InputLoadError {
                        name: name.to_string(),
                        message: err.to_string(),
                    })
                }
            }
        }

        input
            .content()
            .map(from_inline)
            .ok_or_else(|| PipelineError::InputLoadError {
                name: name.to_string(),
                message: "neither a file locator nor inline content was supplied".to_string(),
            })
    }
}

#[async_trait]
impl Stage for LoadStage {
    fn name(&self) -> &'static str {
        "load"
    }

    async fn execute(&self, state: &mut PipelineState) -> Result<(), PipelineError> {
        let transcript = Self::resolve_input(
            TRANSCRIPT_INPUT,
            state.inputs().get(TRANSCRIPT_INPUT),
            |path| self.transcript_reader.read_text(path),
            str::to_string,
        )?;

        let questions = Self::resolve_input(
            QUESTIONS_INPUT,
            state.inputs().get(QUESTIONS_INPUT),
            |path| self.question_reader.read_questions(path, &self.selector),
            parse_question_lines,
        )?;

        info!(
            transcript_chars = transcript.len(),
            questions = questions.len(),
            "Inputs loaded"
        );

        state.transcript = transcript;
        state.questions = questions;
        Ok(())
    }
}

/// Produces one outcome per question, in question order
pub struct ResolveStage {
    resolver: AnswerResolver,
    progress: Option<Arc<dyn ProgressHandler>>,
}

impl ResolveStage {
    pub fn new(resolver: AnswerResolver, progress: Option<Arc<dyn ProgressHandler>>) -> Self {
        Self { resolver, progress }
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(handler) = &self.progress {
            handler.on_progress(&event);
        }
    }
}

#[async_trait]
impl Stage for ResolveStage {
    fn name(&self) -> &'static str {
        "resolve"
    }

    async fn execute(&self, state: &mut PipelineState) -> Result<(), PipelineError> {
        if state.questions.is_empty() {
            return Err(PipelineError::MissingPrerequisite(
                "no questions to resolve".to_string(),
            ));
        }
        if state.transcript.trim().is_empty() {
            return Err(PipelineError::MissingPrerequisite(
                "transcript is empty".to_string(),
            ));
        }

        let total = state.questions.len();
        let mut outcomes = Vec::with_capacity(total);
        let mut extra_attempts = 0;

        for (index, question) in state.questions.iter().enumerate() {
            self.emit(ProgressEvent::QuestionStarted {
                index,
                total,
                question: question.clone(),
            });

            let outcome = self
                .resolver
                .resolve(index, question, &state.transcript)
                .await;
            extra_attempts += outcome.attempts().saturating_sub(1);

            self.emit(ProgressEvent::QuestionResolved {
                index,
                total,
                confidence: outcome.confidence().to_string(),
                answered: outcome.is_answered(),
                attempts: outcome.attempts(),
            });
            outcomes.push(outcome);
        }

        let results = QaResults::completed(outcomes);
        info!(
            total,
            unanswered = results.unanswered.len(),
            retries = extra_attempts,
            "Questions resolved"
        );

        state.retries_consumed += extra_attempts;
        state.results = Some(results);
        Ok(())
    }
}

/// Summarises the outcomes and persists the report
///
/// The summary is stored before the report is written, so it stays available
/// when the write fails.
pub struct AggregateStage {
    writer: Arc<dyn ReportWriter>,
    narrative: Option<Arc<dyn NarrativeComposer>>,
    output_path: PathBuf,
}

impl AggregateStage {
    pub fn new(
        writer: Arc<dyn ReportWriter>,
        narrative: Option<Arc<dyn NarrativeComposer>>,
        output_path: PathBuf,
    ) -> Self {
        Self {
            writer,
            narrative,
            output_path,
        }
    }
}

#[async_trait]
impl Stage for AggregateStage {
    fn name(&self) -> &'static str {
        "aggregate"
    }

    async fn execute(&self, state: &mut PipelineState) -> Result<(), PipelineError> {
        let template = state
            .inputs()
            .get(QUESTIONS_INPUT)
            .and_then(|input| input.path())
            .map(|path| path.to_path_buf());

        let results = state.results.as_mut().ok_or_else(|| {
            PipelineError::MissingPrerequisite("no resolved questions to aggregate".to_string())
        })?;

        let summary = Summary::from_outcomes(&results.outcomes);
        results.summary = Some(summary.clone());
        info!(
            total = summary.total,
            answered = summary.answered,
            answer_rate = format!("{:.1}", summary.answer_rate()),
            "Summary computed"
        );

        self.writer
            .write_report(
                &results.outcomes,
                &summary,
                &self.output_path,
                template.as_deref(),
            )
            .map_err(|err| {
                warn!(path = %self.output_path.display(), error = %err, "Report write failed");
                PipelineError::OutputWriteError {
                    path: self.output_path.clone(),
                    message: err.to_string(),
                }
            })?;

        state.report_path = Some(self.output_path.clone());
        state.narrative = self
            .narrative
            .as_ref()
            .map(|composer| composer.compose(&summary, Some(&self.output_path)));
        Ok(())
    }
}
