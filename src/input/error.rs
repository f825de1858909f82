use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading transcript or question inputs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("Sheet '{sheet}' not found in {path}")]
    SheetNotFound { path: PathBuf, sheet: String },

    #[error("Column '{column}' not found in {path}")]
    ColumnNotFound { path: PathBuf, column: String },
}
