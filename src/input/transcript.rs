use super::ReadError;
use crate::fs::FileSystem;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Reads a transcript document into text
#[cfg_attr(test, mockall::automock)]
pub trait TranscriptReader: Send + Sync {
    fn read_text(&self, path: &Path) -> Result<String, ReadError>;
}

/// [`TranscriptReader`] for UTF-8 text files
pub struct FsTranscriptReader {
    fs: Arc<dyn FileSystem>,
}

impl FsTranscriptReader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl TranscriptReader for FsTranscriptReader {
    fn read_text(&self, path: &Path) -> Result<String, ReadError> {
        if !self.fs.is_file(path) {
            return Err(ReadError::NotFound(path.to_path_buf()));
        }

        let text = self.fs.read_to_string(path).map_err(|e| ReadError::Io {
            path: path.to_path_buf(),
            message: format!("{:#}", e),
        })?;

        let text = text.strip_prefix('\u{feff}').unwrap_or(&text).to_string();
        debug!(path = %path.display(), chars = text.len(), "Transcript read");
        Ok(text)
    }
}
