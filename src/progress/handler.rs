//! Progress handler trait and events

use std::time::Duration;

/// Events emitted while a run moves through its stages
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Run started
    Started { run_id: String },

    /// A stage is about to run
    StageStarted { stage: String },

    /// A stage returned successfully
    StageComplete { stage: String, duration: Duration },

    /// Resolution of one question began
    QuestionStarted {
        index: usize,
        total: usize,
        question: String,
    },

    /// A question received its final outcome
    QuestionResolved {
        index: usize,
        total: usize,
        confidence: String,
        answered: bool,
        attempts: u32,
    },

    /// A transient failure will be retried after `delay`
    RetryScheduled {
        index: usize,
        attempt: u32,
        delay: Duration,
        error: String,
    },

    /// Run reached `End`
    Completed {
        answered: usize,
        total: usize,
        total_time: Duration,
    },

    /// Run reached `Failed`
    Failed { stage: String, error: String },
}

/// Trait for handling progress events during a run
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
