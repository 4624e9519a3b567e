//! Byte-level file access used by the config store.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The file does not exist.
    #[error("{} does not exist", .path.display())]
    NotFound { path: PathBuf },

    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    /// The file could not be written or replaced.
    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    /// A directory could not be created.
    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

/// Named-file storage. Paths are opaque keys to the store.
pub trait StorageBackend: Send + Sync {
    /// Returns true if a file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Read the whole file as UTF-8 text.
    fn read(&self, path: &Path) -> Result<String, StorageError>;

    /// Replace the whole file with `contents`.
    fn write(&self, path: &Path, contents: &str) -> Result<(), StorageError>;

    /// Create `path` and any missing parents.
    fn create_dir_all(&self, path: &Path) -> Result<(), StorageError>;
}

impl<B: StorageBackend + ?Sized> StorageBackend for Arc<B> {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn read(&self, path: &Path) -> Result<String, StorageError> {
        (**self).read(path)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), StorageError> {
        (**self).write(path, contents)
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), StorageError> {
        (**self).create_dir_all(path)
    }
}

/// Local filesystem backend.
///
/// Writes go to a temporary file in the target's directory which is then
/// renamed over the target, so readers never observe a half-written file.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsBackend;

impl FsBackend {
    pub fn new() -> Self {
        Self
    }
}

impl StorageBackend for FsBackend {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> Result<String, StorageError> {
        fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound {
                path: path.to_path_buf(),
            },
            _ => StorageError::Read {
                path: path.to_path_buf(),
                source,
            },
        })
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), StorageError> {
        let write_err = |source: io::Error| StorageError::Write {
            path: path.to_path_buf(),
            source,
        };

        // A symlinked file is updated through its link: the temp file goes
        // next to the resolved target and replaces that, leaving the link.
        let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(contents.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;

        // Temp files are created owner-only; keep the target readable the
        // way a plain overwrite would.
        let permissions = match fs::metadata(&target) {
            Ok(meta) => Some(meta.permissions()),
            Err(_) => default_permissions(),
        };
        if let Some(permissions) = permissions {
            tmp.as_file().set_permissions(permissions).map_err(write_err)?;
        }

        tmp.persist(&target).map_err(|e| write_err(e.error))?;
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), StorageError> {
        fs::create_dir_all(path).map_err(|source| StorageError::CreateDir {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}
