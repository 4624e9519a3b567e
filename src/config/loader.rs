//! Settings loading: TOML file, then environment, then validation.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::EditorConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `storage.dynamic_file_path`.
pub const ENV_DYNAMIC_FILE_PATH: &str = "DYNAMIC_FILE_PATH";
/// Environment variable overriding `storage.config_path`.
pub const ENV_CONFIG_PATH: &str = "CONFIG_PATH";
/// Environment variable overriding `observability.log_level`.
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// Error type for settings loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load settings from an optional TOML file plus process environment.
pub fn load_config(path: Option<&Path>) -> Result<EditorConfig, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// Same as [`load_config`] with an explicit environment lookup.
pub fn load_config_with<F>(path: Option<&Path>, env: F) -> Result<EditorConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            toml::from_str(&content)?
        }
        None => EditorConfig::default(),
    };

    apply_env_overrides(&mut config, env);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay non-empty environment values onto `config`.
pub fn apply_env_overrides<F>(config: &mut EditorConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    let set = |key: &str| env(key).filter(|value| !value.trim().is_empty());

    if let Some(value) = set(ENV_DYNAMIC_FILE_PATH) {
        config.storage.dynamic_file_path = PathBuf::from(value);
    }
    if let Some(value) = set(ENV_CONFIG_PATH) {
        config.storage.config_path = PathBuf::from(value);
    }
    if let Some(value) = set(ENV_LOG_LEVEL) {
        config.observability.log_level = value;
    }
}
