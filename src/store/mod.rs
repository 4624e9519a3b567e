//! Persistence subsystem for the dynamic configuration.
//!
//! # Data Flow
//! ```text
//! load():
//!     detect_mode()            (any of config/{routers,services,middlewares}.yml present?)
//!     → Monolithic: read dynamic.yml → parse → DynamicConfig   (failure → empty document)
//!     → Split:      read each split file → parse its section    (failure → empty section)
//!
//! save(doc):
//!     detect_mode()            (re-evaluated, not the mode seen at load)
//!     → Monolithic: render → overwrite dynamic.yml
//!     → Split:      render 3 sections → overwrite routers, services, middlewares in order
//!
//! split(doc):
//!     create config dir → write 3 sections unconditionally → mode is now Split
//! ```
//!
//! # Design Decisions
//! - Mode is derived from file presence on every call, never cached
//! - Split files win over a coexisting monolithic file
//! - Reads are fail-soft, writes are not; nothing is retried
//! - Each file write is atomic (temp file + rename); the split set is not
//! - Read-modify-write cycles through one store are serialized; other
//!   processes still race with last-writer-wins

pub mod backend;
pub mod codec;
pub mod config_store;
pub mod layout;
pub mod memory;

use std::path::PathBuf;

use thiserror::Error;

pub use backend::{FsBackend, StorageBackend, StorageError};
pub use config_store::{ConfigStore, StoreStatus};
pub use layout::{SplitFile, StorageLayout, StorageMode};
pub use memory::MemoryBackend;

/// A save or split could not be completed.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to serialize {}: {source}", .path.display())]
    Serialize { path: PathBuf, source: serde_yaml::Error },

    #[error(transparent)]
    Storage(#[from] StorageError),
}
