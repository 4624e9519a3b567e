//! Dynamic routing configuration editor.
//!
//! Reads, edits and rewrites a reverse proxy's dynamic configuration
//! (routers, services, middlewares), stored either as one `dynamic.yml` or
//! split into `config/{routers,services,middlewares}.yml`.

pub mod config;
pub mod dynamic;
pub mod entities;
pub mod observability;
pub mod store;

pub use config::EditorConfig;
pub use dynamic::DynamicConfig;
pub use entities::EntityError;
pub use store::{ConfigStore, PersistenceError, StorageLayout, StorageMode};
