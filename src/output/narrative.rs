use super::workbook::format_answer_rate;
use crate::pipeline::{Confidence, Summary};
use std::fmt::Write;
use std::path::Path;

/// Formats a run summary for terminal and log display
pub trait NarrativeComposer: Send + Sync {
    fn compose(&self, summary: &Summary, output_path: Option<&Path>) -> String;
}

/// Plain-text completion message
#[derive(Debug, Default, Clone, Copy)]
pub struct TextNarrativeComposer;

impl NarrativeComposer for TextNarrativeComposer {
    fn compose(&self, summary: &Summary, output_path: Option<&Path>) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Question-Answering Analysis Complete!");
        let _ = writeln!(out);
        let _ = writeln!(out, "Summary:");
        let _ = writeln!(out, "- Total Questions: {}", summary.total);
        let _ = writeln!(out, "- Answered Questions: {}", summary.answered);
        let _ = writeln!(out, "- Unanswered Questions: {}", summary.unanswered());
        let _ = writeln!(out, "- Answer Rate: {}", format_answer_rate(summary));

        if let Some(path) = output_path {
            let _ = writeln!(out);
            let _ = writeln!(out, "Output saved to: {}", path.display());
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Confidence Distribution:");
        for level in Confidence::ALL {
            let _ = writeln!(out, "- {}: {}", level, summary.confidence.count(level));
        }

        out
    }
}
