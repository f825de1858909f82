use super::error::PipelineError;
use super::outcome::QaResults;
use crate::input::InputRegistry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Position of a run in the Load → Resolve → Aggregate sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Start,
    Loaded,
    Resolved,
    Aggregated,
    End,
    Failed,
}

impl RunPhase {
    /// Phase reached when the current stage succeeds; `None` once terminal
    pub fn next(self) -> Option<RunPhase> {
        match self {
            RunPhase::Start => Some(RunPhase::Loaded),
            RunPhase::Loaded => Some(RunPhase::Resolved),
            RunPhase::Resolved => Some(RunPhase::Aggregated),
            RunPhase::Aggregated => Some(RunPhase::End),
            RunPhase::End | RunPhase::Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RunPhase::End | RunPhase::Failed)
    }

    /// Only phases with a stage still ahead of them can fail
    pub fn can_fail(self) -> bool {
        matches!(self, RunPhase::Start | RunPhase::Loaded | RunPhase::Resolved)
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Start => "start",
            RunPhase::Loaded => "loaded",
            RunPhase::Resolved => "resolved",
            RunPhase::Aggregated => "aggregated",
            RunPhase::End => "end",
            RunPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// The single mutable record threaded through the stages of one run
#[derive(Debug)]
pub struct PipelineState {
    inputs: InputRegistry,
    pub transcript: String,
    pub questions: Vec<String>,
    retry_limit: u32,
    /// Extra completion attempts spent across all questions
    pub retries_consumed: u32,
    pub results: Option<QaResults>,
    pub narrative: Option<String>,
    pub report_path: Option<PathBuf>,
    phase: RunPhase,
    failure: Option<PipelineError>,
}

impl PipelineState {
    pub fn new(inputs: InputRegistry, retry_limit: u32) -> Self {
        Self {
            inputs,
            transcript: String::new(),
            questions: Vec::new(),
            retry_limit: retry_limit.max(1),
            retries_consumed: 0,
            results: None,
            narrative: None,
            report_path: None,
            phase: RunPhase::Start,
            failure: None,
        }
    }

    pub fn inputs(&self) -> &InputRegistry {
        &self.inputs
    }

    pub fn retry_limit(&self) -> u32 {
        self.retry_limit
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn failure(&self) -> Option<&PipelineError> {
        self.failure.as_ref()
    }

    pub fn is_failed(&self) -> bool {
        self.phase == RunPhase::Failed
    }

    /// Moves to the next phase; terminal phases stay where they are
    pub fn advance(&mut self) -> RunPhase {
        if let Some(next) = self.phase.next() {
            self.phase = next;
        }
        self.phase
    }

    /// Records a fatal stage error and enters `Failed`
    ///
    /// Returns `false` without touching the state when the run is already
    /// terminal or past the last fallible stage.
    pub fn fail(&mut self, error: PipelineError) -> bool {
        if !self.phase.can_fail() {
            return false;
        }
        self.phase = RunPhase::Failed;
        self.failure = Some(error);
        true
    }
}
