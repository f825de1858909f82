use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// In-memory file system used by tests
///
/// Paths registered with [`MockFileSystem::deny_writes`] reject writes, which
/// lets tests exercise unwritable report destinations without touching disk.
pub struct MockFileSystem {
    files: RwLock<HashMap<PathBuf, String>>,
    dirs: RwLock<HashSet<PathBuf>>,
    read_only: RwLock<HashSet<PathBuf>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
            dirs: RwLock::new(HashSet::new()),
            read_only: RwLock::new(HashSet::new()),
        }
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            self.dirs.write().unwrap().insert(parent.to_path_buf());
        }
        self.files.write().unwrap().insert(path, content.to_string());
    }

    /// Makes every write at or below `path` fail
    pub fn deny_writes(&self, path: impl AsRef<Path>) {
        self.read_only
            .write()
            .unwrap()
            .insert(path.as_ref().to_path_buf());
    }

    /// Returns the contents written to `path`, if any
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.read().unwrap().get(path.as_ref()).cloned()
    }

    fn is_denied(&self, path: &Path) -> bool {
        self.read_only
            .read()
            .unwrap()
            .iter()
            .any(|denied| path.starts_with(denied))
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.read().unwrap().contains_key(path) || self.dirs.read().unwrap().contains(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.read().unwrap().contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.files
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("File not found: {:?}", path))
    }

    fn write_string(&self, path: &Path, contents: &str) -> Result<()> {
        if self.is_denied(path) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        self.files
            .write()
            .unwrap()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        if self.is_denied(path) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        self.dirs.write().unwrap().insert(path.to_path_buf());
        Ok(())
    }
}
