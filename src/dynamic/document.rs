//! Root document definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::dynamic::{Middleware, Router, Service};

/// Opaque transport definitions, preserved verbatim.
pub type Transports = BTreeMap<String, serde_yaml::Value>;

/// Keys this crate does not model, carried through untouched.
pub type Extra = BTreeMap<String, serde_yaml::Value>;

/// The dynamic configuration as the editor sees it.
///
/// The three primary maps are always present; a missing or `null` section
/// in a file deserializes to an empty map. Anything else found under `http`
/// lands in `extra`, and top-level sections beside `http` (`tcp`, `udp`,
/// `tls`) land in `other_sections`, so a save writes them back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicConfig {
    /// Routers by name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub routers: BTreeMap<String, Router>,

    /// Services by name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub services: BTreeMap<String, Service>,

    /// Middlewares by name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub middlewares: BTreeMap<String, Middleware>,

    /// Server transports, written alongside services.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servers_transports: Option<Transports>,

    /// Other keys under `http`.
    #[serde(flatten)]
    pub extra: Extra,

    /// Top-level sections beside `http`. Filled and written by the codec.
    #[serde(skip)]
    pub other_sections: Extra,
}

impl DynamicConfig {
    /// True when the document holds nothing at all.
    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
            && self.services.is_empty()
            && self.middlewares.is_empty()
            && self.servers_transports.as_ref().map_or(true, |t| t.is_empty())
            && self.extra.is_empty()
            && self.other_sections.is_empty()
    }
}

/// The `{ http: ... }` wrapper every file on disk uses.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(bound(deserialize = "T: Default + Deserialize<'de>"))]
pub struct Envelope<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub http: T,

    /// Top-level keys other than `http`.
    #[serde(flatten)]
    pub extra: Extra,
}

impl<T> Envelope<T> {
    pub fn new(http: T) -> Self {
        Self {
            http,
            extra: Extra::new(),
        }
    }
}

/// Treat an explicit YAML `null` the same as a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
