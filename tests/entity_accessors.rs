//! Entity accessors and combined router + service creation.

use std::collections::BTreeMap;

use dynconf::dynamic::{Middleware, RedirectRegex, RouterTls, Service};
use dynconf::entities::{EntityError, RouterServiceRequest, RouterTemplate};
use dynconf::store::{SplitFile, StorageMode};

mod common;

use common::{router, sample_document, TestStore};

#[test]
fn test_router_upsert_roundtrip_and_full_replace() {
    let t = TestStore::new();
    let mut a = router("svc-a", "Host(`a.test`)");
    a.tls = Some(RouterTls::Enabled(true));
    a.middlewares = Some(vec!["limit".into()]);

    t.store.routers().save("r1", a.clone()).unwrap();
    assert_eq!(t.store.routers().get("r1").unwrap(), a);

    // B has no tls and no middlewares: nothing from A may survive.
    let b = router("svc-b", "Path(`/b`)");
    t.store.routers().save("r1", b.clone()).unwrap();
    let stored = t.store.routers().get("r1").unwrap();
    assert_eq!(stored, b);
    assert!(stored.tls.is_none());
    assert!(stored.middlewares.is_none());
}

#[test]
fn test_delete_missing_is_a_noop() {
    let t = TestStore::new();
    let doc = sample_document();
    t.store.save(&doc).unwrap();

    assert!(!t.store.routers().delete("nonexistent").unwrap());
    assert!(!t.store.services().delete("nonexistent").unwrap());
    assert!(!t.store.middlewares().delete("nonexistent").unwrap());

    assert_eq!(t.store.load(), doc);
}

#[test]
fn test_delete_on_empty_storage_does_not_fail() {
    let t = TestStore::new();
    assert!(!t.store.routers().delete("ghost").unwrap());
    assert!(t.store.load().routers.is_empty());
}

#[test]
fn test_delete_removes_only_named_entry() {
    let t = TestStore::new();
    t.store.save(&sample_document()).unwrap();

    assert!(t.store.middlewares().delete("limit").unwrap());

    let remaining = t.store.middlewares().all();
    assert!(!remaining.contains_key("limit"));
    assert!(remaining.contains_key("hdrs"));
    assert!(remaining.contains_key("oops"));
    assert_eq!(t.store.routers().all().len(), 2);
}

#[test]
fn test_get_missing_is_not_found_not_io() {
    let t = TestStore::new();
    let err = t.store.services().get("absent").unwrap_err();
    assert!(matches!(err, EntityError::NotFound { kind: "service", .. }));
    assert_eq!(err.to_string(), "service 'absent' not found");
}

#[test]
fn test_combined_create_overrides_router_service() {
    let t = TestStore::new();
    let request = RouterServiceRequest {
        router_name: "app-router".into(),
        service_name: "app-service".into(),
        router: RouterTemplate::from(router("something-else", "Host(`app.test`)")),
        service: Service::with_urls(["http://app:3000"]),
    };

    t.store.create_router_with_service(request).unwrap();

    let stored = t.store.routers().get("app-router").unwrap();
    assert_eq!(stored.service, "app-service");
    assert!(t.store.services().get("app-service").is_ok());
    assert!(t.store.services().get("something-else").is_err());
}

#[test]
fn test_combined_create_in_split_mode_writes_both_files() {
    let t = TestStore::new();
    t.store.split_current().unwrap();

    let request: RouterServiceRequest = serde_json::from_value(serde_json::json!({
        "routerName": "app-router",
        "serviceName": "app",
        "router": { "entryPoints": ["web"], "rule": "Host(`app.test`)" },
        "service": { "loadBalancer": { "servers": [{ "url": "http://app:3000" }] } }
    }))
    .unwrap();
    t.store.create_router_with_service(request).unwrap();

    assert_eq!(t.store.detect_mode(), StorageMode::Split);
    assert!(!t.dynamic_file().exists());
    let files = t.split_contents();
    assert!(files[0].contains("app-router"));
    assert!(files[1].contains("http://app:3000"));
}

#[test]
fn test_accessors_follow_split_mode() {
    let t = TestStore::new();
    t.store.save(&sample_document()).unwrap();
    t.store.split_current().unwrap();

    t.store
        .middlewares()
        .save(
            "to-https",
            Middleware::RedirectRegex(RedirectRegex {
                permanent: true,
                regex: "^http://(.*)".into(),
                replacement: "https://${1}".into(),
                ..RedirectRegex::default()
            }),
        )
        .unwrap();

    let middlewares = std::fs::read_to_string(t.split_path(SplitFile::Middlewares)).unwrap();
    assert!(middlewares.contains("to-https"));
    assert!(middlewares.contains("redirectRegex"));
    assert_eq!(t.store.middlewares().all().len(), 4);
}

#[test]
fn test_service_then_split_scenario() {
    let t = TestStore::new();
    let svc1 = Service::with_urls(["http://a:80"]);

    t.store.services().save("svc1", svc1.clone()).unwrap();
    let expected = BTreeMap::from([("svc1".to_string(), svc1)]);
    assert_eq!(t.store.services().all(), expected);

    t.store.split(&t.store.load()).unwrap();

    for file in SplitFile::ALL {
        assert!(t.split_path(file).is_file());
    }
    assert_eq!(t.store.services().all(), expected);
}

#[test]
fn test_concurrent_saves_through_one_store_are_not_lost() {
    let t = TestStore::new();

    std::thread::scope(|scope| {
        for i in 0..8 {
            let store = &t.store;
            scope.spawn(move || {
                store
                    .services()
                    .save(&format!("svc{}", i), Service::with_urls([format!("http://b{}:80", i)]))
                    .unwrap();
            });
        }
    });

    assert_eq!(t.store.services().all().len(), 8);
}
