//! Settings validation.
//!
//! # Responsibilities
//! - Semantic checks serde cannot express
//! - Report every problem at once, not just the first
//!
//! # Design Decisions
//! - Pure function: EditorConfig → Result<(), Vec<ValidationError>>
//! - Runs after environment overrides, before the store is built

use std::fmt;

use crate::config::schema::EditorConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate settings, collecting all errors.
pub fn validate_config(config: &EditorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let storage = &config.storage;

    if storage.dynamic_file_path.as_os_str().is_empty() {
        errors.push(ValidationError {
            field: "storage.dynamic_file_path",
            message: "must not be empty".into(),
        });
    }
    if storage.config_path.as_os_str().is_empty() {
        errors.push(ValidationError {
            field: "storage.config_path",
            message: "must not be empty".into(),
        });
    }
    if !storage.config_path.as_os_str().is_empty() && storage.config_path == storage.dynamic_file_path {
        errors.push(ValidationError {
            field: "storage.config_path",
            message: "must differ from storage.dynamic_file_path".into(),
        });
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError {
            field: "observability.log_level",
            message: format!("unknown level '{}'", config.observability.log_level),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
