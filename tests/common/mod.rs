//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use dynconf::dynamic::{
    DynamicConfig, ErrorPage, Headers, HealthCheck, Middleware, RateLimit, Router, RouterTls, Service,
    TlsOptions,
};
use dynconf::store::{ConfigStore, SplitFile, StorageLayout};
use tempfile::TempDir;

/// A filesystem-backed store rooted in a fresh temporary directory.
pub struct TestStore {
    pub dir: TempDir,
    pub store: ConfigStore,
}

impl TestStore {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = ConfigStore::open(StorageLayout::under(dir.path()));
        Self { dir, store }
    }

    pub fn dynamic_file(&self) -> PathBuf {
        self.store.layout().dynamic_file().to_path_buf()
    }

    pub fn split_path(&self, file: SplitFile) -> PathBuf {
        self.store.layout().split_path(file)
    }

    /// Contents of every split file, in write order.
    pub fn split_contents(&self) -> Vec<String> {
        SplitFile::ALL
            .iter()
            .map(|file| fs::read_to_string(self.split_path(*file)).expect("split file present"))
            .collect()
    }

    pub fn write(&self, path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }
}

pub fn router(service: &str, rule: &str) -> Router {
    Router {
        entry_points: vec!["web".into()],
        rule: rule.into(),
        service: service.into(),
        tls: None,
        middlewares: None,
        ..Router::default()
    }
}

/// A document touching every section and every optional shape.
pub fn sample_document() -> DynamicConfig {
    let mut doc = DynamicConfig::default();

    doc.routers.insert("api".into(), router("api-svc", "Host(`api.test`)"));
    doc.routers.insert(
        "secure".into(),
        Router {
            entry_points: vec!["websecure".into()],
            rule: "Host(`secure.test`) && PathPrefix(`/v1`)".into(),
            service: "api-svc".into(),
            tls: Some(RouterTls::Options(TlsOptions {
                cert_resolver: Some("letsencrypt".into()),
                ..TlsOptions::default()
            })),
            middlewares: Some(vec!["limit".into(), "hdrs".into()]),
            ..Router::default()
        },
    );

    let mut api = Service::with_urls(["http://10.0.0.1:8080", "http://10.0.0.2:8080"]);
    if let Some(lb) = api.load_balancer.as_mut() {
        lb.health_check = Some(HealthCheck {
            path: Some("/health".into()),
            interval: Some("10s".into()),
            ..HealthCheck::default()
        });
        lb.servers_transport = Some("insecure".into());
    }
    doc.services.insert("api-svc".into(), api);

    doc.middlewares
        .insert("limit".into(), Middleware::RateLimit(RateLimit::new(100, 50)));
    doc.middlewares.insert(
        "hdrs".into(),
        Middleware::Headers(Headers {
            custom_request_headers: Some([("X-Env".to_string(), "test".to_string())].into()),
            ..Headers::default()
        }),
    );
    doc.middlewares.insert(
        "oops".into(),
        Middleware::Errors(ErrorPage {
            query: "/{status}.html".into(),
            service: "pages".into(),
            status: vec!["500-599".into()],
            ..ErrorPage::default()
        }),
    );

    let transport: serde_yaml::Value = serde_yaml::from_str("insecureSkipVerify: true").unwrap();
    doc.servers_transports = Some([("insecure".to_string(), transport)].into());

    doc
}

/// A hand-written dynamic file in the shape operators keep next to the
/// proxy, full of keys and kinds the typed model leaves opaque.
pub const HAND_WRITTEN_DYNAMIC: &str = r#"# Managed partly by hand.
http:
  routers:
    api:
      entryPoints: [websecure]
      rule: Host(`api.example.com`) && PathPrefix(`/v1`)
      service: api-svc
      priority: 10
      middlewares: [strip, limit, errors]
      tls:
        certResolver: letsencrypt
        domains:
          - main: example.com
            sans: ["*.example.com"]
    dashboard:
      entryPoints: [web]
      rule: Host(`traefik.localhost`)
      service: api@internal
      middlewares: [auth]
  services:
    api-svc:
      loadBalancer:
        passHostHeader: true
        servers:
          - url: http://10.0.0.1:8080
            weight: 3
          - url: http://10.0.0.2:8080
        healthCheck:
          path: /health
          interval: 10s
          scheme: http
        sticky:
          cookie:
            name: api_affinity
    canary:
      weighted:
        services:
          - name: api-svc
            weight: 90
          - name: api-next
            weight: 10
  middlewares:
    strip:
      stripPrefix:
        prefixes: [/v1]
    auth:
      basicAuth:
        users: ["admin:$apr1$H6uskkkW$IgXLP6ewTrSuBkTrqE8wj/"]
    limit:
      rateLimit:
        average: 100
        burst: 50
        period: 1m
    errors:
      errors:
        status: [404, "500-599"]
        service: pages
        query: /{status}.html
    secure:
      headers:
        stsSeconds: 31536000
        customResponseHeaders:
          X-Frame-Options: DENY
  serversTransports:
    insecure:
      insecureSkipVerify: true
tcp:
  routers:
    db:
      entryPoints: [postgres]
      rule: HostSNI(`*`)
      service: db
  services:
    db:
      loadBalancer:
        servers:
          - address: 10.0.0.5:5432
"#;
