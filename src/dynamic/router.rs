//! Router definitions.

use serde::{Deserialize, Serialize};

use crate::dynamic::document::Extra;

/// Matches requests on a set of entry points and forwards them to a service.
///
/// # Example
///
/// ```yaml
/// app-router:
///   entryPoints: [websecure]
///   rule: Host(`app.example.com`)
///   service: app
///   tls:
///     certResolver: letsencrypt
///   middlewares: [secure-headers]
///   priority: 10
/// ```
///
/// Keys without a field here (`priority`, `observability`, ...) are kept in
/// `extra` and written back as found.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Router {
    /// Entry points this router listens on, in order.
    pub entry_points: Vec<String>,

    /// Matching expression, kept as written.
    pub rule: String,

    /// Name of the target service. Not checked against `services`.
    pub service: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<RouterTls>,

    /// Middleware chain by name, in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middlewares: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: Extra,
}

/// `tls: true` or `tls: { certResolver: ... }`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RouterTls {
    Enabled(bool),
    Options(TlsOptions),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TlsOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_resolver: Option<String>,

    /// `domains`, `options` and the like.
    #[serde(flatten)]
    pub extra: Extra,
}
