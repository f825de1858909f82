use std::path::PathBuf;
use thiserror::Error;

/// Fatal failure of a pipeline stage
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("Input '{name}' not found at {path}")]
    InputNotFound { name: String, path: PathBuf },

    #[error("Failed to load input '{name}': {message}")]
    InputLoadError { name: String, message: String },

    #[error("Missing prerequisite: {0}")]
    MissingPrerequisite(String),

    #[error("Failed to write report to {path}: {message}")]
    OutputWriteError { path: PathBuf, message: String },

    #[error("Unexpected failure in {stage} stage: {message}")]
    Unexpected { stage: String, message: String },
}

impl PipelineError {
    /// Name of the stage that raised this error
    pub fn stage(&self) -> &str {
        match self {
            PipelineError::InputNotFound { .. } | PipelineError::InputLoadError { .. } => "load",
            PipelineError::MissingPrerequisite(_) => "resolve",
            PipelineError::OutputWriteError { .. } => "aggregate",
            PipelineError::Unexpected { stage, .. } => stage,
        }
    }
}
