//! Router + service creation in a single write.

use serde::Deserialize;

use crate::dynamic::{Extra, Router, RouterTls, Service};
use crate::entities::EntityError;
use crate::store::{ConfigStore, StorageBackend};

/// A router whose target service is decided by the caller.
///
/// Any `service` given in the payload is ignored by
/// [`ConfigStore::create_router_with_service`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterTemplate {
    pub entry_points: Vec<String>,
    pub rule: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub tls: Option<RouterTls>,
    #[serde(default)]
    pub middlewares: Option<Vec<String>>,
    /// `priority` and other router keys, passed through.
    #[serde(flatten)]
    pub extra: Extra,
}

impl RouterTemplate {
    /// Build the router pointing at `service`.
    pub fn bind(self, service: &str) -> Router {
        Router {
            entry_points: self.entry_points,
            rule: self.rule,
            service: service.to_string(),
            tls: self.tls,
            middlewares: self.middlewares,
            extra: self.extra,
        }
    }
}

impl From<Router> for RouterTemplate {
    fn from(router: Router) -> Self {
        Self {
            entry_points: router.entry_points,
            rule: router.rule,
            service: Some(router.service),
            tls: router.tls,
            middlewares: router.middlewares,
            extra: router.extra,
        }
    }
}

/// Payload for creating a router together with its service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterServiceRequest {
    pub router_name: String,
    pub service_name: String,
    pub router: RouterTemplate,
    pub service: Service,
}

impl<B: StorageBackend> ConfigStore<B> {
    /// Upsert the service, then the router pointing at it, in one save.
    ///
    /// The router's `service` is always `request.service_name`.
    pub fn create_router_with_service(&self, request: RouterServiceRequest) -> Result<Router, EntityError> {
        let RouterServiceRequest {
            router_name,
            service_name,
            router,
            service,
        } = request;

        if let Some(given) = router.service.as_deref().filter(|given| *given != service_name) {
            tracing::debug!(given = %given, service = %service_name, "Overriding router service");
        }
        let router = router.bind(&service_name);

        self.modify(|doc| {
            doc.services.insert(service_name.clone(), service);
            doc.routers.insert(router_name.clone(), router.clone());
        })?;

        tracing::info!(router = %router_name, service = %service_name, "Router and service created");
        Ok(router)
    }
}
