//! Terminal progress bar handler

use super::{ProgressEvent, ProgressHandler};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const BAR_TEMPLATE: &str = "{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}";

/// Draws question progress with indicatif
///
/// indicatif hides the bar on its own when stderr is not a terminal, so this
/// handler is safe to install unconditionally.
pub struct BarHandler {
    bar: ProgressBar,
}

impl BarHandler {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }
}

impl Default for BarHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressHandler for BarHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::StageStarted { stage } => {
                self.bar.set_message(stage.clone());
            }
            ProgressEvent::QuestionStarted { index, total, .. } => {
                self.bar.set_length(*total as u64);
                self.bar.set_position(*index as u64);
                self.bar.set_message(format!("question {}", index + 1));
            }
            ProgressEvent::QuestionResolved { index, .. } => {
                self.bar.set_position(*index as u64 + 1);
            }
            ProgressEvent::RetryScheduled { index, attempt, .. } => {
                self.bar
                    .set_message(format!("question {} (retry {})", index + 1, attempt));
            }
            ProgressEvent::Completed {
                answered, total, ..
            } => {
                self.bar
                    .finish_with_message(format!("{}/{} answered", answered, total));
            }
            ProgressEvent::Failed { stage, .. } => {
                self.bar.abandon_with_message(format!("{} failed", stage));
            }
            ProgressEvent::Started { .. } | ProgressEvent::StageComplete { .. } => {}
        }
    }
}
