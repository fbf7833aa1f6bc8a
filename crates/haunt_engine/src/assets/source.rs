//! Byte sources the asset server reads from

use std::collections::HashMap;
use std::path::PathBuf;

use crate::assets::AssetError;

/// Where asset bytes come from
///
/// Sources are shared with loader threads, so they must be thread-safe.
pub trait AssetSource: Send + Sync {
    /// Read the full contents of the asset at `path`
    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError>;
}

/// Reads assets from a directory on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    /// Create a source rooted at `root`; asset paths are resolved relative to it
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for FileSource {
    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let full_path = self.root.join(path.trim_start_matches('/'));
        if !full_path.exists() {
            return Err(AssetError::NotFound(full_path.display().to_string()));
        }
        Ok(std::fs::read(&full_path)?)
    }
}

/// In-memory asset table, useful for embedded resources and tests
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bytes under a path
    pub fn insert(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(path.into(), bytes);
    }

    /// Builder-style [`MemorySource::insert`]
    #[must_use]
    pub fn with(mut self, path: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(path, bytes);
        self
    }
}

impl AssetSource for MemorySource {
    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(path.to_string()))
    }
}
