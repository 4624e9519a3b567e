//! Service definitions.

use serde::{Deserialize, Serialize};

use crate::dynamic::document::Extra;

/// A named backend, normally reached through a load balancer.
///
/// Other service kinds the proxy knows (`weighted`, `mirroring`, `failover`)
/// have no `loadBalancer`; their body stays in `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_balancer: Option<LoadBalancer>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl Service {
    /// A load-balanced service over the given server URLs.
    pub fn with_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            load_balancer: Some(LoadBalancer {
                servers: urls.into_iter().map(Server::new).collect(),
                ..LoadBalancer::default()
            }),
            extra: Extra::new(),
        }
    }

    /// Upstream servers, empty for services that are not load balancers.
    pub fn servers(&self) -> &[Server] {
        self.load_balancer.as_ref().map(|lb| lb.servers.as_slice()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancer {
    /// Upstream servers, in order.
    #[serde(default)]
    pub servers: Vec<Server>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheck>,

    /// Name of an entry in `serversTransports`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servers_transport: Option<String>,

    /// `passHostHeader`, `sticky`, `responseForwarding`, ...
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Server {
    pub url: String,

    #[serde(flatten)]
    pub extra: Extra,
}

impl Server {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            extra: Extra::new(),
        }
    }
}

/// Active health check settings. Durations are kept as written (`"10s"`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct HealthCheck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    #[serde(flatten)]
    pub extra: Extra,
}
