//! Integration tests for the capability registry and lazy assets.

#![allow(clippy::arithmetic_side_effects)]

use std::sync::Arc;

use proem_service::{Asset, AssetManager, CapabilityId, ServiceError};
use proem_test::{BuildCounter, StubRequest, StubRouteManager, test_composer};

fn counted_route_manager(counter: &BuildCounter) -> Asset {
    let counter = counter.clone();
    Asset::new(CapabilityId::ROUTE_MANAGER, move || {
        counter.hit();
        StubRouteManager::default()
    })
}

#[test]
fn set_makes_capability_visible_both_ways() {
    let capabilities = [
        CapabilityId::ROUTE_MANAGER,
        CapabilityId::REQUEST,
        CapabilityId::RESPONSE,
        CapabilityId::new("Session"),
    ];

    for capability in capabilities {
        let mut assets = AssetManager::new();
        assert!(!assets.provides(&capability));

        assets.set("thing", Asset::from_value(capability.clone(), 7_u32));

        assert!(assets.provides(&capability));
        assert!(assets.provides_named("thing", &capability));
        assert!(!assets.provides_named("other", &capability));
    }
}

#[test]
fn multi_capability_asset_is_indexed_for_each() {
    let mut assets = AssetManager::new();
    let asset = Asset::builder()
        .named("exchange")
        .provides(CapabilityId::REQUEST)
        .provides(CapabilityId::RESPONSE)
        .value(StubRequest::default());
    assets.set("exchange", asset);

    assert!(assets.provides_named("exchange", &CapabilityId::REQUEST));
    assert!(assets.provides_named("exchange", &CapabilityId::RESPONSE));
    assert_eq!(
        assets.providers(&CapabilityId::RESPONSE).collect::<Vec<_>>(),
        vec!["exchange"]
    );
}

#[test]
fn overwrite_is_last_write_wins() -> anyhow::Result<()> {
    let mut assets = AssetManager::new();
    let first = Asset::from_value(CapabilityId::REQUEST, 1_u8);
    let second = Asset::from_value(CapabilityId::RESPONSE, 2_u8);

    assets.set("n", first.clone());
    let replaced = assets.set("n", second.clone());

    assert!(replaced.is_some_and(|old| old.same_as(&first)));
    assert!(assets.get("n")?.same_as(&second));
    assert!(assets.provides_named("n", &CapabilityId::RESPONSE));
    assert!(!assets.provides_named("n", &CapabilityId::REQUEST));
    assert!(!assets.provides(&CapabilityId::REQUEST));
    Ok(())
}

#[test]
fn missing_name_is_lookup_error_not_default() {
    let assets = AssetManager::new();
    let err = assets.get("routeManager").unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, ServiceError::NotFound { ref name } if name == "routeManager"));
}

#[test]
fn get_builds_once_and_memoizes() {
    let counter = BuildCounter::new();
    let asset = counted_route_manager(&counter);

    assert!(!asset.is_built());
    assert_eq!(counter.count(), 0);

    let a = asset.get();
    let b = asset.get();

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(counter.count(), 1);
    assert!(asset.is_built());
}

#[test]
fn concurrent_get_builds_once() {
    let counter = BuildCounter::new();
    let asset = counted_route_manager(&counter);

    std::thread::scope(|scope| {
        for _ in 0..8 {
            let asset = asset.clone();
            scope.spawn(move || {
                let value = asset.get_as::<StubRouteManager>();
                assert!(value.is_some());
            });
        }
    });

    assert_eq!(counter.count(), 1);
}

#[test]
fn provides_check_does_not_build() {
    let counter = BuildCounter::new();
    let mut assets = AssetManager::new();
    assets.set("routeManager", counted_route_manager(&counter));

    assert!(assets.provides(&CapabilityId::ROUTE_MANAGER));
    assert!(assets.provides_named("routeManager", &CapabilityId::ROUTE_MANAGER));
    assert_eq!(counter.count(), 0);
}

#[test]
fn cloned_registries_share_assets_not_names() -> anyhow::Result<()> {
    let counter = BuildCounter::new();
    let mut template = AssetManager::new();
    template.set("routeManager", counted_route_manager(&counter));

    let mut first = template.clone();
    let second = template.clone();
    first.remove("routeManager");

    assert!(!first.has("routeManager"));
    assert!(second.has("routeManager"));

    let _ = second.get("routeManager")?.get();
    let _ = template.get("routeManager")?.get();
    assert_eq!(counter.count(), 1);
    Ok(())
}

#[test]
fn typed_resolution() -> anyhow::Result<()> {
    let counter = BuildCounter::new();
    let composer = test_composer(&counter);
    let mut assets = AssetManager::new();
    assets.set("request", composer.compose(&CapabilityId::REQUEST, false)?);

    let request = assets.resolve_as::<StubRequest>(&CapabilityId::REQUEST)?;
    assert_eq!(request.path, "/");

    let err = assets
        .resolve_as::<StubRouteManager>(&CapabilityId::REQUEST)
        .unwrap_err();
    assert!(matches!(err, ServiceError::TypeMismatch { .. }));
    Ok(())
}

#[test]
fn composer_without_binding_fails() {
    let composer = test_composer(&BuildCounter::new());
    let err = composer
        .compose(&CapabilityId::new("Session"), true)
        .unwrap_err();
    assert!(matches!(err, ServiceError::Composition { .. }));
}
