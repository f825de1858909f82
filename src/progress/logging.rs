//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { run_id } => {
                info!(run_id = %run_id, "Starting questionnaire run");
            }
            ProgressEvent::StageStarted { stage } => {
                info!(stage = %stage, "Starting stage");
            }
            ProgressEvent::StageComplete { stage, duration } => {
                info!(
                    stage = %stage,
                    duration_ms = duration.as_millis(),
                    "Stage complete"
                );
            }
            ProgressEvent::QuestionStarted {
                index,
                total,
                question,
            } => {
                debug!(
                    progress = format!("{}/{}", index + 1, total),
                    question = %question,
                    "Resolving question"
                );
            }
            ProgressEvent::QuestionResolved {
                index,
                total,
                confidence,
                answered,
                attempts,
            } => {
                if *answered {
                    debug!(
                        progress = format!("{}/{}", index + 1, total),
                        confidence = %confidence,
                        attempts,
                        "Question answered"
                    );
                } else {
                    info!(
                        progress = format!("{}/{}", index + 1, total),
                        confidence = %confidence,
                        attempts,
                        "Question left unanswered"
                    );
                }
            }
            ProgressEvent::RetryScheduled {
                index,
                attempt,
                delay,
                error,
            } => {
                warn!(
                    question_index = index,
                    attempt,
                    delay_ms = delay.as_millis(),
                    error = %error,
                    "Transient completion failure, retrying"
                );
            }
            ProgressEvent::Completed {
                answered,
                total,
                total_time,
            } => {
                info!(
                    answered,
                    total,
                    total_time_ms = total_time.as_millis(),
                    "Run complete"
                );
            }
            ProgressEvent::Failed { stage, error } => {
                warn!(stage = %stage, error = %error, "Run failed");
            }
        }
    }
}
