//! YAML encoding of the monolithic document and the split sections.
//!
//! Every file uses the `{ http: ... }` envelope. Split files carry only
//! their own section; `services.yml` also carries `serversTransports`, any
//! other `http` keys and the top-level sections beside `http` (`tcp`,
//! `udp`, ...). Such leftovers found in the other two split files are
//! picked up on load and move to `services.yml` on the next save.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::dynamic::document::null_as_default;
use crate::dynamic::{DynamicConfig, Envelope, Extra, Middleware, Router, Service, Transports};
use crate::store::layout::SplitFile;

/// `http` keys owned by one of the split files.
const SECTION_KEYS: [&str; 4] = ["routers", "services", "middlewares", "serversTransports"];

#[derive(Debug, Default, Deserialize)]
struct RoutersSection {
    #[serde(default, deserialize_with = "null_as_default")]
    routers: BTreeMap<String, Router>,
    #[serde(flatten)]
    extra: Extra,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServicesSection {
    #[serde(default, deserialize_with = "null_as_default")]
    services: BTreeMap<String, Service>,
    #[serde(default)]
    servers_transports: Option<Transports>,
    #[serde(flatten)]
    extra: Extra,
}

#[derive(Debug, Default, Deserialize)]
struct MiddlewaresSection {
    #[serde(default, deserialize_with = "null_as_default")]
    middlewares: BTreeMap<String, Middleware>,
    #[serde(flatten)]
    extra: Extra,
}

#[derive(Serialize)]
struct RoutersRef<'a> {
    routers: &'a BTreeMap<String, Router>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ServicesRef<'a> {
    services: &'a BTreeMap<String, Service>,
    #[serde(skip_serializing_if = "Option::is_none")]
    servers_transports: Option<&'a Transports>,
    #[serde(flatten)]
    extra: &'a Extra,
}

#[derive(Serialize)]
struct MiddlewaresRef<'a> {
    middlewares: &'a BTreeMap<String, Middleware>,
}

/// Parse an enveloped file. Empty or comment-only input yields the default.
fn parse_envelope<T>(text: &str) -> Result<Envelope<T>, serde_yaml::Error>
where
    T: Default + DeserializeOwned,
{
    let value: serde_yaml::Value = serde_yaml::from_str(text)?;
    if value.is_null() {
        return Ok(Envelope::default());
    }
    serde_yaml::from_value(value)
}

/// Keep leftovers from a split file, minus keys another split file owns.
fn absorb(doc: &mut DynamicConfig, mut http_extra: Extra, sections: Extra) {
    http_extra.retain(|key, _| !SECTION_KEYS.contains(&key.as_str()));
    doc.extra.extend(http_extra);
    doc.other_sections.extend(sections);
}

/// Parse the monolithic document.
pub fn parse_document(text: &str) -> Result<DynamicConfig, serde_yaml::Error> {
    let envelope: Envelope<DynamicConfig> = parse_envelope(text)?;
    let mut doc = envelope.http;
    doc.other_sections = envelope.extra;
    Ok(doc)
}

/// Render the monolithic document.
pub fn render_document(doc: &DynamicConfig) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(&Envelope {
        http: doc,
        extra: doc.other_sections.clone(),
    })
}

/// Parse one split file and store its section into `doc`.
///
/// On error `doc` is left untouched.
pub fn parse_section(file: SplitFile, text: &str, doc: &mut DynamicConfig) -> Result<(), serde_yaml::Error> {
    match file {
        SplitFile::Routers => {
            let envelope: Envelope<RoutersSection> = parse_envelope(text)?;
            doc.routers = envelope.http.routers;
            absorb(doc, envelope.http.extra, envelope.extra);
        }
        SplitFile::Services => {
            let envelope: Envelope<ServicesSection> = parse_envelope(text)?;
            doc.services = envelope.http.services;
            doc.servers_transports = envelope.http.servers_transports;
            absorb(doc, envelope.http.extra, envelope.extra);
        }
        SplitFile::Middlewares => {
            let envelope: Envelope<MiddlewaresSection> = parse_envelope(text)?;
            doc.middlewares = envelope.http.middlewares;
            absorb(doc, envelope.http.extra, envelope.extra);
        }
    }
    Ok(())
}

/// Render the part of `doc` that belongs in `file`.
pub fn render_section(file: SplitFile, doc: &DynamicConfig) -> Result<String, serde_yaml::Error> {
    match file {
        SplitFile::Routers => serde_yaml::to_string(&Envelope::new(RoutersRef {
            routers: &doc.routers,
        })),
        SplitFile::Services => serde_yaml::to_string(&Envelope {
            http: ServicesRef {
                services: &doc.services,
                servers_transports: doc.servers_transports.as_ref(),
                extra: &doc.extra,
            },
            extra: doc.other_sections.clone(),
        }),
        SplitFile::Middlewares => serde_yaml::to_string(&Envelope::new(MiddlewaresRef {
            middlewares: &doc.middlewares,
        })),
    }
}
