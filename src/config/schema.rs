//! Settings schema definitions.
//!
//! All types derive Serde traits and carry defaults, so an empty settings
//! file (or none at all) yields a working editor.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root settings for the editor.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Where the dynamic configuration is stored.
    pub storage: StorageConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Storage locations.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Monolithic document path (env: `DYNAMIC_FILE_PATH`).
    pub dynamic_file_path: PathBuf,

    /// Directory of the split files (env: `CONFIG_PATH`).
    pub config_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dynamic_file_path: PathBuf::from("./dynamic.yml"),
            config_path: PathBuf::from("./config"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
