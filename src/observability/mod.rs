//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! store / entities produce:
//!     → tracing events (mode detection, fail-soft reads, writes, splits)
//!
//! Consumers:
//!     → logging.rs subscriber (stderr, pretty or JSON)
//! ```

pub mod logging;

pub use logging::init_logging;
