//! Editor settings subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML, optional)
//!     → loader.rs (parse & deserialize, defaults for missing keys)
//!     → environment overrides (DYNAMIC_FILE_PATH, CONFIG_PATH, LOG_LEVEL)
//!     → validation.rs (semantic checks)
//!     → EditorConfig → StorageLayout + logging
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so the editor runs with no settings file
//! - Environment wins over the file, the file wins over defaults
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{EditorConfig, LogFormat, ObservabilityConfig, StorageConfig};
