//! In-memory storage backend.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::store::backend::{StorageBackend, StorageError};

/// Keeps files in a map. Used by tests and dry runs.
///
/// Writes to a path registered with [`MemoryBackend::fail_writes_to`] return
/// [`StorageError::Write`] without touching the stored contents.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    files: Mutex<BTreeMap<PathBuf, String>>,
    failing: Mutex<BTreeSet<PathBuf>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a file directly, bypassing failure injection.
    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files
            .lock()
            .expect("memory backend mutex poisoned")
            .insert(path.into(), contents.into());
    }

    pub fn remove(&self, path: &Path) -> Option<String> {
        self.files
            .lock()
            .expect("memory backend mutex poisoned")
            .remove(path)
    }

    pub fn contents(&self, path: &Path) -> Option<String> {
        self.files
            .lock()
            .expect("memory backend mutex poisoned")
            .get(path)
            .cloned()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.files
            .lock()
            .expect("memory backend mutex poisoned")
            .keys()
            .cloned()
            .collect()
    }

    /// Make every subsequent write to `path` fail.
    pub fn fail_writes_to(&self, path: impl Into<PathBuf>) {
        self.failing
            .lock()
            .expect("memory backend mutex poisoned")
            .insert(path.into());
    }

    pub fn clear_failures(&self) {
        self.failing
            .lock()
            .expect("memory backend mutex poisoned")
            .clear();
    }
}

impl StorageBackend for MemoryBackend {
    fn exists(&self, path: &Path) -> bool {
        self.files
            .lock()
            .expect("memory backend mutex poisoned")
            .contains_key(path)
    }

    fn read(&self, path: &Path) -> Result<String, StorageError> {
        self.contents(path).ok_or_else(|| StorageError::NotFound {
            path: path.to_path_buf(),
        })
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), StorageError> {
        let failing = self
            .failing
            .lock()
            .expect("memory backend mutex poisoned")
            .contains(path);
        if failing {
            return Err(StorageError::Write {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::Other, "injected write failure"),
            });
        }
        self.insert(path, contents);
        Ok(())
    }

    fn create_dir_all(&self, _path: &Path) -> Result<(), StorageError> {
        Ok(())
    }
}
