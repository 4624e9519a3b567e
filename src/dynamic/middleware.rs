//! Middleware definitions.
//!
//! On disk a middleware is a mapping with exactly one key naming its kind:
//!
//! ```yaml
//! api-limit:
//!   rateLimit:
//!     average: 100
//!     burst: 50
//! ```
//!
//! Four kinds are typed. Any other kind (`stripPrefix`, `basicAuth`, plugins)
//! and any typed kind whose body does not fit its struct is carried as
//! [`Middleware::Other`] and written back exactly as read. Only a mapping with
//! zero or several keys is rejected.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_yaml::{Number, Value};
use thiserror::Error;

use crate::dynamic::document::Extra;

/// A request/response transformation. One behavior per instance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, Value>")]
pub enum Middleware {
    Errors(ErrorPage),
    RateLimit(RateLimit),
    Headers(Headers),
    RedirectRegex(RedirectRegex),
    /// Kept verbatim under its own key.
    Other { kind: String, config: Value },
}

impl Middleware {
    /// The on-disk key for this middleware's kind.
    pub fn kind(&self) -> &str {
        match self {
            Middleware::Errors(_) => "errors",
            Middleware::RateLimit(_) => "rateLimit",
            Middleware::Headers(_) => "headers",
            Middleware::RedirectRegex(_) => "redirectRegex",
            Middleware::Other { kind, .. } => kind,
        }
    }

    fn from_entry(kind: String, config: Value) -> Self {
        let typed = match kind.as_str() {
            "errors" => serde_yaml::from_value(config.clone()).ok().map(Middleware::Errors),
            "rateLimit" => serde_yaml::from_value(config.clone()).ok().map(Middleware::RateLimit),
            "headers" => serde_yaml::from_value(config.clone()).ok().map(Middleware::Headers),
            "redirectRegex" => serde_yaml::from_value(config.clone())
                .ok()
                .map(Middleware::RedirectRegex),
            _ => None,
        };
        typed.unwrap_or(Middleware::Other { kind, config })
    }
}

/// Serve an error page from another service for matching statuses.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ErrorPage {
    pub query: String,
    pub service: String,
    pub status: Vec<StatusMatch>,

    #[serde(flatten)]
    pub extra: Extra,
}

/// One `status` entry: a bare code (`404`) or a code/range string
/// (`"500-599"`). The written form is kept.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum StatusMatch {
    Code(u16),
    Range(String),
}

impl From<u16> for StatusMatch {
    fn from(code: u16) -> Self {
        StatusMatch::Code(code)
    }
}

impl From<&str> for StatusMatch {
    fn from(range: &str) -> Self {
        StatusMatch::Range(range.to_string())
    }
}

impl fmt::Display for StatusMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMatch::Code(code) => write!(f, "{}", code),
            StatusMatch::Range(range) => f.write_str(range),
        }
    }
}

/// Request rate limit. Values are kept as written, integer or not.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RateLimit {
    pub average: Number,
    pub burst: Number,

    /// `period`, `sourceCriterion`, ...
    #[serde(flatten)]
    pub extra: Extra,
}

impl RateLimit {
    pub fn new(average: u64, burst: u64) -> Self {
        Self {
            average: average.into(),
            burst: burst.into(),
            extra: Extra::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Headers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_request_headers: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_response_headers: Option<BTreeMap<String, String>>,

    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RedirectRegex {
    pub permanent: bool,
    pub regex: String,
    pub replacement: String,

    #[serde(flatten)]
    pub extra: Extra,
}

/// Raised when a middleware mapping names zero or several kinds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MiddlewareShapeError {
    #[error("middleware must define exactly one kind")]
    Empty,

    #[error("middleware defines several kinds at once: {0:?}")]
    Ambiguous(Vec<String>),
}

impl TryFrom<BTreeMap<String, Value>> for Middleware {
    type Error = MiddlewareShapeError;

    fn try_from(fields: BTreeMap<String, Value>) -> Result<Self, Self::Error> {
        if fields.len() > 1 {
            return Err(MiddlewareShapeError::Ambiguous(fields.into_keys().collect()));
        }
        let (kind, config) = fields.into_iter().next().ok_or(MiddlewareShapeError::Empty)?;
        Ok(Middleware::from_entry(kind, config))
    }
}

impl Serialize for Middleware {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Middleware::Errors(m) => map.serialize_entry(self.kind(), m)?,
            Middleware::RateLimit(m) => map.serialize_entry(self.kind(), m)?,
            Middleware::Headers(m) => map.serialize_entry(self.kind(), m)?,
            Middleware::RedirectRegex(m) => map.serialize_entry(self.kind(), m)?,
            Middleware::Other { kind, config } => map.serialize_entry(kind, config)?,
        }
        map.end()
    }
}
