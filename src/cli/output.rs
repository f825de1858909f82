//! Output formatting for run results and configuration
//!
//! JSON and YAML output serialise the [`RunResult`] as-is for scripting. The
//! human format prints the narrative, any errors and the unanswered questions.

use anyhow::{Context, Result};
use std::collections::BTreeMap;

use crate::config::QaConfig;
use crate::pipeline::RunResult;

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_run(&self, result: &RunResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(result).context("Failed to serialize run result to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(result).context("Failed to serialize run result to YAML")
            }
            OutputFormat::Human => Ok(self.format_run_human(result)),
        }
    }

    pub fn format_config(&self, config: &QaConfig) -> Result<String> {
        // Sorted so the output is stable between invocations
        let config_map: BTreeMap<String, String> = config.to_display_map().into_iter().collect();
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&config_map)
                .context("Failed to serialize config to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(&config_map).context("Failed to serialize config to YAML")
            }
            OutputFormat::Human => Ok(format!("{}\n{}\n\n{}", "transcript-qa Configuration", RULE, config)),
        }
    }

    fn format_run_human(&self, result: &RunResult) -> String {
        let mut output = String::new();

        if result.success {
            output.push_str("\u{2713} Questionnaire Run Complete\n");
        } else {
            output.push_str("\u{2717} Questionnaire Run Failed\n");
        }
        output.push_str(RULE);
        output.push_str("\n\n");

        output.push_str(result.message.trim_end());
        output.push('\n');

        if !result.errors.is_empty() {
            output.push_str("\nErrors:\n");
            for error in &result.errors {
                output.push_str(&format!("\u{2022} {}\n", error));
            }
        }

        if let Some(data) = &result.data {
            if !result.success {
                if let Some(summary) = &data.summary {
                    output.push_str(&format!(
                        "\nComputed before failure: {}/{} questions answered\n",
                        summary.answered, summary.total
                    ));
                }
            }
            if !data.unanswered.is_empty() {
                output.push_str("\nUnanswered Questions:\n");
                for question in &data.unanswered {
                    output.push_str(&format!("\u{2022} {}\n", question));
                }
            }
        }

        output.push_str(&format!("\nRun ID: {}\n", result.run_id));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{Confidence, QaResults, QuestionOutcome, Summary};

    fn sample(success: bool) -> RunResult {
        let mut data = QaResults::completed(vec![
            QuestionOutcome::classify("What database?", "PostgreSQL", Confidence::High, "", true, 1),
            QuestionOutcome::unresolved("How many users?", 3, "timeout"),
        ]);
        data.summary = Some(Summary::from_outcomes(&data.outcomes));

        RunResult {
            success,
            message: if success {
                "Question-Answering Analysis Complete!".to_string()
            } else {
                "aggregate stage failed: denied".to_string()
            },
            data: Some(data),
            errors: if success {
                Vec::new()
            } else {
                vec!["denied".to_string()]
            },
            run_id: "run-1".to_string(),
        }
    }

    #[test]
    fn test_human_success() {
        let text = OutputFormatter::new(OutputFormat::Human)
            .format_run(&sample(true))
            .unwrap();
        assert!(text.contains("Questionnaire Run Complete"));
        assert!(text.contains("\u{2022} How many users?"));
        assert!(text.contains("Run ID: run-1"));
        assert!(!text.contains("Errors:"));
    }

    #[test]
    fn test_human_failure_shows_partial_summary() {
        let text = OutputFormatter::new(OutputFormat::Human)
            .format_run(&sample(false))
            .unwrap();
        assert!(text.contains("Questionnaire Run Failed"));
        assert!(text.contains("\u{2022} denied"));
        assert!(text.contains("Computed before failure: 1/2 questions answered"));
    }

    #[test]
    fn test_json_round_trip() {
        let result = sample(true);
        let json = OutputFormatter::new(OutputFormat::Json)
            .format_run(&result)
            .unwrap();
        let parsed: RunResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_yaml_output() {
        let yaml = OutputFormatter::new(OutputFormat::Yaml)
            .format_run(&sample(true))
            .unwrap();
        assert!(yaml.contains("success: true"));
        assert!(yaml.contains("run_id: run-1"));
    }
}
