//! Local cache backing the sync client.
//!
//! Access is synchronous and uncoordinated: two clients sharing a cache file
//! overwrite each other's state.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::models::Project;

/// What the client keeps between sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheDocument {
    pub projects: Vec<Project>,
    /// Slugs of records created locally that the server has not accepted yet
    #[serde(default)]
    pub pending: Vec<String>,
}

/// Cache failure.
#[derive(Debug)]
pub enum CacheError {
    Io(std::io::Error),
    Corrupt(serde_json::Error),
}

impl std::fmt::Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheError::Io(err) => write!(f, "cache I/O error: {}", err),
            CacheError::Corrupt(err) => write!(f, "cache content is unreadable: {}", err),
        }
    }
}

impl std::error::Error for CacheError {}

impl From<std::io::Error> for CacheError {
    fn from(err: std::io::Error) -> Self {
        CacheError::Io(err)
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Corrupt(err)
    }
}

/// Storage for the client's cached copy of the collection.
pub trait ProjectCache: Send + Sync {
    /// `Ok(None)` when nothing has been cached yet.
    fn load(&self) -> Result<Option<CacheDocument>, CacheError>;
    fn save(&self, document: &CacheDocument) -> Result<(), CacheError>;
}

/// Cache kept in a JSON file.
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProjectCache for FileCache {
    fn load(&self) -> Result<Option<CacheDocument>, CacheError> {
        let content = match std::fs::read(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_slice(&content)?))
    }

    fn save(&self, document: &CacheDocument) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_vec(document)?)?;
        Ok(())
    }
}

/// In-process cache holding the serialized document.
#[derive(Debug, Default)]
pub struct MemoryCache {
    raw: Mutex<Option<String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from arbitrary cached text, which need not be valid.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ProjectCache for MemoryCache {
    fn load(&self) -> Result<Option<CacheDocument>, CacheError> {
        match self.raw() {
            None => Ok(None),
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        }
    }

    fn save(&self, document: &CacheDocument) -> Result<(), CacheError> {
        let raw = serde_json::to_string(document)?;
        *self
            .raw
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(raw);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::storage::starter_projects;

    #[test]
    fn test_file_cache_missing_then_saved() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path().join("nested").join("cache.json"));
        assert!(cache.load().unwrap().is_none());

        let document = CacheDocument {
            projects: starter_projects(),
            pending: vec!["ecocycle".to_string()],
        };
        cache.save(&document).unwrap();
        assert_eq!(cache.load().unwrap(), Some(document));
    }

    #[test]
    fn test_corrupt_cache_reports_error() {
        let cache = MemoryCache::with_raw("[not json");
        assert!(matches!(cache.load(), Err(CacheError::Corrupt(_))));
    }

    #[test]
    fn test_pending_defaults_to_empty() {
        let cache = MemoryCache::with_raw(r#"{"projects":[]}"#);
        let document = cache.load().unwrap().unwrap();
        assert!(document.pending.is_empty());
    }
}
