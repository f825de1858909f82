//! Question source reading
//!
//! Question sources are tabular documents. JSON and YAML files may hold a
//! plain list of questions, a list of rows keyed by column name, or a
//! workbook of named sheets of rows. Any other file is read as one question
//! per non-empty line.

use super::ReadError;
use crate::fs::FileSystem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Column headers tried after the configured one
const COLUMN_ALIASES: [&str; 4] = ["Questions", "Question", "questions", "QUESTION"];

const DEFAULT_QUESTION_COLUMN: &str = "Question";

/// Which column (and optionally which sheet) holds the questions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSelector {
    pub column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
}

impl Default for QuestionSelector {
    fn default() -> Self {
        Self {
            column: DEFAULT_QUESTION_COLUMN.to_string(),
            sheet: None,
        }
    }
}

impl QuestionSelector {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            sheet: None,
        }
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }
}

/// Reads an ordered list of questions from a question source
#[cfg_attr(test, mockall::automock)]
pub trait QuestionSourceReader: Send + Sync {
    fn read_questions(
        &self,
        path: &Path,
        selector: &QuestionSelector,
    ) -> Result<Vec<String>, ReadError>;
}

type Row = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Deserialize)]
struct Sheet {
    name: String,
    #[serde(default)]
    rows: Vec<Row>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QuestionDocument {
    Workbook { sheets: Vec<Sheet> },
    Questions(Vec<String>),
    Rows(Vec<Row>),
}

/// Splits free text into questions, one per non-empty line
pub fn parse_question_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// [`QuestionSourceReader`] for JSON, YAML and plain-text files
pub struct FileQuestionReader {
    fs: Arc<dyn FileSystem>,
}

impl FileQuestionReader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    fn decode(path: &Path, content: &str) -> Result<Option<QuestionDocument>, ReadError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);

        let decoded = match extension.as_deref() {
            Some("json") => serde_json::from_str(content).map_err(|e| e.to_string()),
            Some("yaml") | Some("yml") => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            _ => return Ok(None),
        };

        decoded.map(Some).map_err(|message| ReadError::Decode {
            path: path.to_path_buf(),
            message,
        })
    }
}

impl QuestionSourceReader for FileQuestionReader {
    fn read_questions(
        &self,
        path: &Path,
        selector: &QuestionSelector,
    ) -> Result<Vec<String>, ReadError> {
        if !self.fs.is_file(path) {
            return Err(ReadError::NotFound(path.to_path_buf()));
        }

        let content = self.fs.read_to_string(path).map_err(|e| ReadError::Io {
            path: path.to_path_buf(),
            message: format!("{:#}", e),
        })?;

        let questions = match Self::decode(path, &content)? {
            None => parse_question_lines(&content),
            Some(QuestionDocument::Questions(list)) => list
                .iter()
                .map(|q| q.trim())
                .filter(|q| !q.is_empty())
                .map(str::to_string)
                .collect(),
            Some(QuestionDocument::Rows(rows)) => select_column(path, &rows, &selector.column)?,
            Some(QuestionDocument::Workbook { sheets }) => {
                let rows = select_sheet(path, &sheets, selector.sheet.as_deref())?;
                select_column(path, rows, &selector.column)?
            }
        };

        debug!(
            path = %path.display(),
            count = questions.len(),
            "Questions read"
        );
        Ok(questions)
    }
}

fn select_sheet<'a>(
    path: &Path,
    sheets: &'a [Sheet],
    wanted: Option<&str>,
) -> Result<&'a [Row], ReadError> {
    let Some(wanted) = wanted else {
        return Ok(sheets.first().map(|s| s.rows.as_slice()).unwrap_or(&[]));
    };

    sheets
        .iter()
        .find(|s| s.name == wanted)
        .or_else(|| sheets.iter().find(|s| s.name.eq_ignore_ascii_case(wanted)))
        .map(|s| s.rows.as_slice())
        .ok_or_else(|| ReadError::SheetNotFound {
            path: path.to_path_buf(),
            sheet: wanted.to_string(),
        })
}

fn select_column(path: &Path, rows: &[Row], column: &str) -> Result<Vec<String>, ReadError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let header = std::iter::once(column)
        .chain(COLUMN_ALIASES)
        .find(|candidate| rows.iter().any(|row| row.contains_key(*candidate)))
        .ok_or_else(|| ReadError::ColumnNotFound {
            path: path.to_path_buf(),
            column: column.to_string(),
        })?;

    Ok(rows
        .iter()
        .filter_map(|row| row.get(header))
        .filter_map(cell_text)
        .collect())
}

fn cell_text(cell: &serde_json::Value) -> Option<String> {
    let text = match cell {
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    fn reader_with(path: &str, content: &str) -> FileQuestionReader {
        let fs = Arc::new(MockFileSystem::new());
        fs.add_file(path, content);
        FileQuestionReader::new(fs)
    }

    #[test]
    fn test_plain_text_lines() {
        let reader = reader_with(
            "/q/questions.txt",
            "What database is used?\n\n  How is it deployed?  \n",
        );
        let questions = reader
            .read_questions(Path::new("/q/questions.txt"), &QuestionSelector::default())
            .unwrap();

        assert_eq!(
            questions,
            vec!["What database is used?", "How is it deployed?"]
        );
    }

    #[test]
    fn test_json_list() {
        let reader = reader_with("/q/questions.json", r#"["A?", " ", "B?"]"#);
        let questions = reader
            .read_questions(Path::new("/q/questions.json"), &QuestionSelector::default())
            .unwrap();

        assert_eq!(questions, vec!["A?", "B?"]);
    }

    #[test]
    fn test_json_rows_with_configured_column() {
        let reader = reader_with(
            "/q/aif.json",
            r#"[
                {"Id": 1, "Prompt": "Which OS?"},
                {"Id": 2, "Prompt": null},
                {"Id": 3, "Prompt": "Which region?"}
            ]"#,
        );
        let questions = reader
            .read_questions(Path::new("/q/aif.json"), &QuestionSelector::new("Prompt"))
            .unwrap();

        assert_eq!(questions, vec!["Which OS?", "Which region?"]);
    }

    #[test]
    fn test_column_alias_fallback() {
        let reader = reader_with("/q/aif.json", r#"[{"Questions": "Which OS?"}]"#);
        let questions = reader
            .read_questions(Path::new("/q/aif.json"), &QuestionSelector::new("Prompt"))
            .unwrap();

        assert_eq!(questions, vec!["Which OS?"]);
    }

    #[test]
    fn test_missing_column() {
        let reader = reader_with("/q/aif.json", r#"[{"Topic": "Networking"}]"#);
        let err = reader
            .read_questions(Path::new("/q/aif.json"), &QuestionSelector::new("Prompt"))
            .unwrap_err();

        assert_eq!(
            err,
            ReadError::ColumnNotFound {
                path: "/q/aif.json".into(),
                column: "Prompt".to_string(),
            }
        );
    }

    #[test]
    fn test_yaml_workbook_named_sheet() {
        let reader = reader_with(
            "/q/aif.yaml",
            r#"
sheets:
  - name: Cover
    rows:
      - Title: Assessment
  - name: Infrastructure
    rows:
      - Question: How many servers?
      - Question: 42
      - Question: ""
"#,
        );
        let selector = QuestionSelector::default().with_sheet("infrastructure");
        let questions = reader
            .read_questions(Path::new("/q/aif.yaml"), &selector)
            .unwrap();

        assert_eq!(questions, vec!["How many servers?", "42"]);
    }

    #[test]
    fn test_workbook_defaults_to_first_sheet() {
        let reader = reader_with(
            "/q/aif.json",
            r#"{"sheets": [{"name": "Main", "rows": [{"Question": "First?"}]}, {"name": "Other", "rows": [{"Question": "Second?"}]}]}"#,
        );
        let questions = reader
            .read_questions(Path::new("/q/aif.json"), &QuestionSelector::default())
            .unwrap();

        assert_eq!(questions, vec!["First?"]);
    }

    #[test]
    fn test_missing_sheet() {
        let reader = reader_with("/q/aif.json", r#"{"sheets": []}"#);
        let selector = QuestionSelector::default().with_sheet("Security");
        let err = reader
            .read_questions(Path::new("/q/aif.json"), &selector)
            .unwrap_err();

        assert!(matches!(err, ReadError::SheetNotFound { sheet, .. } if sheet == "Security"));
    }

    #[test]
    fn test_undecodable_json() {
        let reader = reader_with("/q/aif.json", r#"{"not": "a question document"}"#);
        let err = reader
            .read_questions(Path::new("/q/aif.json"), &QuestionSelector::default())
            .unwrap_err();

        assert!(matches!(err, ReadError::Decode { .. }));
    }

    #[test]
    fn test_missing_file() {
        let reader = FileQuestionReader::new(Arc::new(MockFileSystem::new()));
        let err = reader
            .read_questions(Path::new("/q/none.json"), &QuestionSelector::default())
            .unwrap_err();

        assert_eq!(err, ReadError::NotFound("/q/none.json".into()));
    }
}
