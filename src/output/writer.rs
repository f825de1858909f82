use super::workbook::ReportWorkbook;
use crate::fs::FileSystem;
use crate::pipeline::{QuestionOutcome, Summary};
use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to serialize report: {0}")]
    Serialize(String),

    #[error("Failed to write {path}: {message}")]
    Io { path: PathBuf, message: String },
}

/// Persists the reviewable questionnaire report
pub trait ReportWriter: Send + Sync {
    /// Writes one row per outcome, in the order given
    fn write_report(
        &self,
        outcomes: &[QuestionOutcome],
        summary: &Summary,
        destination: &Path,
        template: Option<&Path>,
    ) -> Result<(), ReportError>;
}

/// Serialised report format, chosen from the destination extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Yaml,
}

impl ReportFormat {
    pub fn for_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("yaml") | Some("yml") => ReportFormat::Yaml,
            _ => ReportFormat::Json,
        }
    }

    pub fn render(self, workbook: &ReportWorkbook) -> Result<String, ReportError> {
        match self {
            ReportFormat::Json => serde_json::to_string_pretty(workbook)
                .map_err(|e| ReportError::Serialize(e.to_string())),
            ReportFormat::Yaml => {
                serde_yaml::to_string(workbook).map_err(|e| ReportError::Serialize(e.to_string()))
            }
        }
    }
}

/// [`ReportWriter`] that renders a [`ReportWorkbook`] onto a [`FileSystem`]
pub struct FileReportWriter {
    fs: Arc<dyn FileSystem>,
}

impl FileReportWriter {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl ReportWriter for FileReportWriter {
    fn write_report(
        &self,
        outcomes: &[QuestionOutcome],
        summary: &Summary,
        destination: &Path,
        template: Option<&Path>,
    ) -> Result<(), ReportError> {
        let workbook = ReportWorkbook::build(
            outcomes,
            summary,
            template.map(Path::to_path_buf),
            Local::now().naive_local(),
        );
        let rendered = ReportFormat::for_path(destination).render(&workbook)?;

        let io_error = |e: anyhow::Error| ReportError::Io {
            path: destination.to_path_buf(),
            message: format!("{:#}", e),
        };

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() && !self.fs.exists(parent) {
                self.fs.create_dir_all(parent).map_err(io_error)?;
            }
        }
        self.fs
            .write_string(destination, &rendered)
            .map_err(io_error)?;

        info!(
            path = %destination.display(),
            rows = outcomes.len(),
            "Report written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use crate::output::workbook::ANSWERS_SHEET;
    use crate::pipeline::Confidence;
    use yare::parameterized;

    fn outcomes() -> Vec<QuestionOutcome> {
        vec![QuestionOutcome::classify(
            "What database is used?",
            "PostgreSQL",
            Confidence::High,
            "",
            true,
            1,
        )]
    }

    #[parameterized(
        json = { "out/report.json", ReportFormat::Json },
        yaml = { "out/report.yaml", ReportFormat::Yaml },
        yml_upper = { "out/report.YML", ReportFormat::Yaml },
        no_extension = { "out/report", ReportFormat::Json },
    )]
    fn test_format_for_path(path: &str, expected: ReportFormat) {
        assert_eq!(ReportFormat::for_path(Path::new(path)), expected);
    }

    #[test]
    fn test_writes_json_workbook() {
        let fs = Arc::new(MockFileSystem::new());
        let writer = FileReportWriter::new(fs.clone());
        let outcomes = outcomes();
        let summary = Summary::from_outcomes(&outcomes);

        writer
            .write_report(
                &outcomes,
                &summary,
                Path::new("/out/report.json"),
                Some(Path::new("/in/aif.json")),
            )
            .unwrap();

        let written = fs.contents("/out/report.json").unwrap();
        let workbook: ReportWorkbook = serde_json::from_str(&written).unwrap();
        assert_eq!(
            workbook.sheet(ANSWERS_SHEET).unwrap().column("Answer"),
            vec!["PostgreSQL"]
        );
        assert_eq!(
            workbook.metadata.template,
            Some(PathBuf::from("/in/aif.json"))
        );
    }

    #[test]
    fn test_writes_yaml_workbook() {
        let fs = Arc::new(MockFileSystem::new());
        let writer = FileReportWriter::new(fs.clone());
        let outcomes = outcomes();
        let summary = Summary::from_outcomes(&outcomes);

        writer
            .write_report(&outcomes, &summary, Path::new("/out/report.yaml"), None)
            .unwrap();

        let written = fs.contents("/out/report.yaml").unwrap();
        let workbook: ReportWorkbook = serde_yaml::from_str(&written).unwrap();
        assert_eq!(workbook.sheets.len(), 2);
        assert!(workbook.metadata.template.is_none());
    }

    #[test]
    fn test_unwritable_destination() {
        let fs = Arc::new(MockFileSystem::new());
        fs.deny_writes("/readonly");
        let writer = FileReportWriter::new(fs);
        let outcomes = outcomes();
        let summary = Summary::from_outcomes(&outcomes);

        let err = writer
            .write_report(
                &outcomes,
                &summary,
                Path::new("/readonly/report.json"),
                None,
            )
            .unwrap_err();

        assert!(matches!(err, ReportError::Io { path, .. } if path == Path::new("/readonly/report.json")));
    }
}
