//! Dynamic configuration document model.
//!
//! # Data Flow
//! ```text
//! dynamic.yml / config/*.yml (YAML)
//!     → store (read + parse, fail-soft per file)
//!     → DynamicConfig (routers, services, middlewares, serversTransports)
//!     → entity accessors (upsert / delete by name)
//!     → store (serialize + overwrite)
//! ```
//!
//! # Design Decisions
//! - Field names follow the proxy's camelCase keys so files stay loadable by it
//! - Maps are ordered (`BTreeMap`) so serialization is deterministic
//! - Absent optional fields are skipped on write, never emitted as `null`
//! - Middleware is an enum; on disk it is a mapping with exactly one key
//! - `serversTransports` is carried as opaque YAML and never interpreted
//! - Keys the model has no field for are kept in `extra` maps, so a save
//!   never drops what the proxy understands but this crate does not

pub mod document;
pub mod middleware;
pub mod router;
pub mod service;

pub use document::{DynamicConfig, Envelope, Extra, Transports};
pub use middleware::{
    ErrorPage, Headers, Middleware, MiddlewareShapeError, RateLimit, RedirectRegex, StatusMatch,
};
pub use router::{Router, RouterTls, TlsOptions};
pub use service::{HealthCheck, LoadBalancer, Server, Service};
