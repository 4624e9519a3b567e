//! Where the dynamic configuration lives on disk.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::StorageConfig;

/// The active storage representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// Everything in one document.
    Monolithic,
    /// One document per entity kind under the split directory.
    Split,
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageMode::Monolithic => write!(f, "monolithic"),
            StorageMode::Split => write!(f, "split"),
        }
    }
}

/// The three files of split storage, in write order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitFile {
    Routers,
    Services,
    Middlewares,
}

impl SplitFile {
    pub const ALL: [SplitFile; 3] = [SplitFile::Routers, SplitFile::Services, SplitFile::Middlewares];

    pub fn file_name(self) -> &'static str {
        match self {
            SplitFile::Routers => "routers.yml",
            SplitFile::Services => "services.yml",
            SplitFile::Middlewares => "middlewares.yml",
        }
    }
}

/// Paths of the monolithic document and the split directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    dynamic_file: PathBuf,
    config_dir: PathBuf,
}

impl StorageLayout {
    pub fn new(dynamic_file: impl Into<PathBuf>, config_dir: impl Into<PathBuf>) -> Self {
        Self {
            dynamic_file: dynamic_file.into(),
            config_dir: config_dir.into(),
        }
    }

    /// Layout rooted at `root`: `root/dynamic.yml` and `root/config/`.
    pub fn under(root: &Path) -> Self {
        Self::new(root.join("dynamic.yml"), root.join("config"))
    }

    pub fn dynamic_file(&self) -> &Path {
        &self.dynamic_file
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn split_path(&self, file: SplitFile) -> PathBuf {
        self.config_dir.join(file.file_name())
    }
}

impl Default for StorageLayout {
    fn default() -> Self {
        Self::from(&StorageConfig::default())
    }
}

impl From<&StorageConfig> for StorageLayout {
    fn from(config: &StorageConfig) -> Self {
        Self::new(&config.dynamic_file_path, &config.config_path)
    }
}
