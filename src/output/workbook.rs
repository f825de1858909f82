use crate::pipeline::{Confidence, QuestionOutcome, Summary};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ANSWERS_SHEET: &str = "Answers";
pub const SUMMARY_SHEET: &str = "Summary";
pub const UNANSWERED_SHEET: &str = "Unanswered Questions";

const ANSWER_COLUMNS: [&str; 5] = ["Question", "Answer", "Confidence", "Source Reference", "Status"];
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_on: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
}

/// One sheet: a header row plus data rows of the same width
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportSheet {
    fn new(name: &str, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Value of `column` in every row, top to bottom
    pub fn column(&self, column: &str) -> Vec<&str> {
        let Some(index) = self.columns.iter().position(|c| c == column) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter_map(|row| row.get(index))
            .map(String::as_str)
            .collect()
    }
}

/// Reviewable questionnaire report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWorkbook {
    pub metadata: ReportMetadata,
    pub sheets: Vec<ReportSheet>,
}

impl ReportWorkbook {
    pub fn build(
        outcomes: &[QuestionOutcome],
        summary: &Summary,
        template: Option<PathBuf>,
        generated_on: NaiveDateTime,
    ) -> Self {
        let generated_on = generated_on.format(TIMESTAMP_FORMAT).to_string();

        let mut answers = ReportSheet::new(ANSWERS_SHEET, &ANSWER_COLUMNS);
        for outcome in outcomes {
            let status = if outcome.is_answered() {
                "Answered"
            } else {
                "Not Answered"
            };
            answers.push(vec![
                outcome.question().to_string(),
                outcome.answer().to_string(),
                outcome.confidence().to_string(),
                outcome.source_reference().to_string(),
                status.to_string(),
            ]);
        }

        let mut sheets = vec![answers, summary_sheet(summary, &generated_on)];

        let unanswered: Vec<&QuestionOutcome> =
            outcomes.iter().filter(|o| !o.is_answered()).collect();
        if !unanswered.is_empty() {
            let mut sheet = ReportSheet::new(UNANSWERED_SHEET, &[UNANSWERED_SHEET]);
            for outcome in unanswered {
                sheet.push(vec![outcome.question().to_string()]);
            }
            sheets.push(sheet);
        }

        Self {
            metadata: ReportMetadata {
                generated_on,
                template,
            },
            sheets,
        }
    }

    pub fn sheet(&self, name: &str) -> Option<&ReportSheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// Answer rate as shown in reports: one decimal place, or `0%` for an empty run
pub fn format_answer_rate(summary: &Summary) -> String {
    if summary.total == 0 {
        "0%".to_string()
    } else {
        format!("{:.1}%", summary.answer_rate())
    }
}

fn summary_sheet(summary: &Summary, generated_on: &str) -> ReportSheet {
    let mut sheet = ReportSheet::new(SUMMARY_SHEET, &["Metric", "Value"]);
    let mut metric = |label: &str, value: String| sheet.push(vec![label.to_string(), value]);

    metric("Total Questions", summary.total.to_string());
    metric("Answered Questions", summary.answered.to_string());
    metric("Unanswered Questions", summary.unanswered().to_string());
    metric("Answer Rate", format_answer_rate(summary));
    for level in Confidence::ALL {
        metric(
            &format!("{} Confidence", level),
            summary.confidence.count(level).to_string(),
        );
    }
    metric("Generated On", generated_on.to_string());

    sheet
}
