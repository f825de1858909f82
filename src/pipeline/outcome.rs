use serde::{Deserialize, Serialize};
use std::fmt;

/// How well an answer is grounded in the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
    Unknown,
}

impl Confidence {
    pub const ALL: [Confidence; 4] = [
        Confidence::High,
        Confidence::Medium,
        Confidence::Low,
        Confidence::Unknown,
    ];

    /// Parses a model-supplied label; anything unrecognised degrades to `Unknown`
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "high" => Confidence::High,
            "medium" => Confidence::Medium,
            "low" => Confidence::Low,
            _ => Confidence::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
            Confidence::Low => "Low",
            Confidence::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved answer for one question
///
/// Built once during Resolve and never changed afterwards, so the fields are
/// private and only exposed through getters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    question: String,
    answer: String,
    confidence: Confidence,
    #[serde(default)]
    source_reference: String,
    is_answered: bool,
    attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl QuestionOutcome {
    /// Classifies a usable completion
    ///
    /// The outcome counts as answered only when the model claimed an answer,
    /// the confidence is not `Unknown` and the answer text is not blank.
    pub fn classify(
        question: impl Into<String>,
        answer: impl Into<String>,
        confidence: Confidence,
        source_reference: impl Into<String>,
        model_answered: bool,
        attempts: u32,
    ) -> Self {
        let answer = answer.into().trim().to_string();
        let is_answered = model_answered && confidence != Confidence::Unknown && !answer.is_empty();

        Self {
            question: question.into(),
            answer,
            confidence,
            source_reference: source_reference.into(),
            is_answered,
            attempts,
            error: None,
        }
    }

    /// Outcome for a question that produced no usable completion
    pub fn unresolved(question: impl Into<String>, attempts: u32, error: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: String::new(),
            confidence: Confidence::Unknown,
            source_reference: String::new(),
            is_answered: false,
            attempts,
            error: Some(error.into()),
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    pub fn source_reference(&self) -> &str {
        &self.source_reference
    }

    pub fn is_answered(&self) -> bool {
        self.is_answered
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Outcome count per confidence level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceHistogram {
    #[serde(rename = "High")]
    pub high: usize,
    #[serde(rename = "Medium")]
    pub medium: usize,
    #[serde(rename = "Low")]
    pub low: usize,
    #[serde(rename = "Unknown")]
    pub unknown: usize,
}

impl ConfidenceHistogram {
    pub fn record(&mut self, confidence: Confidence) {
        match confidence {
            Confidence::High => self.high += 1,
            Confidence::Medium => self.medium += 1,
            Confidence::Low => self.low += 1,
            Confidence::Unknown => self.unknown += 1,
        }
    }

    pub fn count(&self, confidence: Confidence) -> usize {
        match confidence {
            Confidence::High => self.high,
            Confidence::Medium => self.medium,
            Confidence::Low => self.low,
            Confidence::Unknown => self.unknown,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low + self.unknown
    }
}

pub const PROCESSING_COMPLETED: &str = "completed";

/// Aggregate view over all outcomes of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub answered: usize,
    pub confidence: ConfidenceHistogram,
    pub processing_status: String,
}

impl Summary {
    pub fn from_outcomes(outcomes: &[QuestionOutcome]) -> Self {
        let mut confidence = ConfidenceHistogram::default();
        for outcome in outcomes {
            confidence.record(outcome.confidence());
        }

        Self {
            total: outcomes.len(),
            answered: outcomes.iter().filter(|o| o.is_answered()).count(),
            confidence,
            processing_status: PROCESSING_COMPLETED.to_string(),
        }
    }

    pub fn unanswered(&self) -> usize {
        self.total - self.answered
    }

    /// Percentage of answered questions; 0 for an empty run
    pub fn answer_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.answered as f64 / self.total as f64 * 100.0
    }
}

/// Structured results of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaResults {
    pub outcomes: Vec<QuestionOutcome>,
    pub unanswered: Vec<String>,
    pub processing_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
}

impl QaResults {
    /// Results of a completed Resolve stage, before aggregation
    pub fn completed(outcomes: Vec<QuestionOutcome>) -> Self {
        let unanswered = outcomes
            .iter()
            .filter(|o| !o.is_answered())
            .map(|o| o.question().to_string())
            .collect();

        Self {
            outcomes,
            unanswered,
            processing_status: PROCESSING_COMPLETED.to_string(),
            summary: None,
        }
    }

    pub fn answered(&self) -> impl Iterator<Item = &QuestionOutcome> {
        self.outcomes.iter().filter(|o| o.is_answered())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        high = { "High", Confidence::High },
        lower = { "medium", Confidence::Medium },
        padded = { "  LOW ", Confidence::Low },
        unknown = { "Unknown", Confidence::Unknown },
        garbage = { "very sure", Confidence::Unknown },
        empty = { "", Confidence::Unknown },
    )]
    fn test_confidence_from_label(label: &str, expected: Confidence) {
        assert_eq!(Confidence::from_label(label), expected);
    }

    #[test]
    fn test_classify_requires_known_confidence() {
        let outcome = QuestionOutcome::classify("Q?", "Maybe", Confidence::Unknown, "", true, 1);
        assert!(!outcome.is_answered());
    }

    #[test]
    fn test_classify_requires_answer_text() {
        let outcome = QuestionOutcome::classify("Q?", "   ", Confidence::High, "", true, 1);
        assert!(!outcome.is_answered());
        assert_eq!(outcome.answer(), "");
    }

    #[test]
    fn test_classify_respects_model_flag() {
        let outcome = QuestionOutcome::classify(
            "Q?",
            "Not discussed",
            Confidence::Low,
            "",
            false,
            1,
        );
        assert!(!outcome.is_answered());
    }

    #[test]
    fn test_classify_answered() {
        let outcome = QuestionOutcome::classify(
            "What database is used?",
            "PostgreSQL",
            Confidence::High,
            "Opening remarks",
            true,
            2,
        );
        assert!(outcome.is_answered());
        assert_eq!(outcome.attempts(), 2);
        assert_eq!(outcome.source_reference(), "Opening remarks");
        assert!(outcome.error().is_none());
    }

    #[test]
    fn test_unresolved() {
        let outcome = QuestionOutcome::unresolved("Q?", 3, "timed out");
        assert_eq!(outcome.confidence(), Confidence::Unknown);
        assert!(!outcome.is_answered());
        assert_eq!(outcome.error(), Some("timed out"));
    }

    #[test]
    fn test_summary_counts_every_outcome() {
        let outcomes = vec![
            QuestionOutcome::classify("a", "x", Confidence::High, "", true, 1),
            QuestionOutcome::classify("b", "y", Confidence::Medium, "", true, 1),
            QuestionOutcome::classify("c", "", Confidence::Low, "", true, 1),
            QuestionOutcome::unresolved("d", 3, "boom"),
        ];

        let summary = Summary::from_outcomes(&outcomes);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.answered, 2);
        assert_eq!(summary.unanswered(), 2);
        assert_eq!(summary.confidence.total(), summary.total);
        assert_eq!(summary.confidence.count(Confidence::Unknown), 1);
        assert_eq!(summary.answer_rate(), 50.0);
        assert_eq!(summary.processing_status, "completed");
        assert_eq!(summary, Summary::from_outcomes(&outcomes));
    }

    #[test]
    fn test_empty_summary_rate() {
        let summary = Summary::from_outcomes(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.answer_rate(), 0.0);
    }

    #[test]
    fn test_histogram_serializes_level_names() {
        let mut histogram = ConfidenceHistogram::default();
        histogram.record(Confidence::High);
        let json = serde_json::to_value(histogram).unwrap();
        assert_eq!(json["High"], 1);
        assert_eq!(json["Unknown"], 0);
    }

    #[test]
    fn test_results_partition_unanswered() {
        let results = QaResults::completed(vec![
            QuestionOutcome::classify("a", "x", Confidence::High, "", true, 1),
            QuestionOutcome::unresolved("b", 1, "permanent"),
        ]);
        assert_eq!(results.unanswered, vec!["b".to_string()]);
        assert_eq!(results.answered().count(), 1);
        assert!(results.summary.is_none());
    }
}
