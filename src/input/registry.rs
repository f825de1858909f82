use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Logical name of the transcript input
pub const TRANSCRIPT_INPUT: &str = "transcript";

/// Logical name of the question source input
pub const QUESTIONS_INPUT: &str = "questions";

/// Declared content kind of an input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// Free text, read as-is
    Text,
    /// Tabular question source (rows of cells, optionally grouped in sheets)
    QuestionSheet,
}

/// Reference to one external input artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDescriptor {
    pub kind: InputKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl InputDescriptor {
    pub fn file(kind: InputKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: Some(path.into()),
            content: None,
        }
    }

    pub fn inline(kind: InputKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            path: None,
            content: Some(content.into()),
        }
    }

    /// Adds inline content used when the file locator does not resolve
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

/// Named inputs of a single run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRegistry {
    inputs: BTreeMap<String, InputDescriptor>,
}

impl InputRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the two inputs every question-answering run needs
    pub fn for_run(transcript: InputDescriptor, questions: InputDescriptor) -> Self {
        Self::new()
            .with_input(TRANSCRIPT_INPUT, transcript)
            .with_input(QUESTIONS_INPUT, questions)
    }

    pub fn with_input(mut self, name: impl Into<String>, descriptor: InputDescriptor) -> Self {
        self.inputs.insert(name.into(), descriptor);
        self
    }

    pub fn get(&self, name: &str) -> Option<&InputDescriptor> {
        self.inputs.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InputDescriptor)> {
        self.inputs.iter().map(|(name, input)| (name.as_str(), input))
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}
