//! Integration tests for a single stage's inbound and outbound behaviour.

#![allow(clippy::arithmetic_side_effects)]

use std::sync::Arc;

use proem_filter::{FilterError, FilterStage, bootstrap};
use proem_service::{Asset, AssetComposer, AssetManager, CapabilityId};
use proem_signal::{EVENT_MANAGER, SignalBus, SignalError};
use proem_test::{
    BuildCounter, CallLog, FailingListener, OverrideListener, RecordingListener, StubRequest,
    StubRouteManager, test_assets_with_bus, test_composer,
};

fn custom_router() -> Asset {
    Asset::from_value(
        CapabilityId::ROUTE_MANAGER,
        StubRouteManager {
            routes: vec!["/custom".to_owned()],
        },
    )
}

#[test]
fn default_installed_without_bus() -> anyhow::Result<()> {
    let counter = BuildCounter::new();
    let stage = bootstrap::request(&test_composer(&counter));
    let mut assets = AssetManager::new();
    assert!(!assets.provides(&CapabilityId::REQUEST));

    stage.inbound(&mut assets)?;

    assert!(assets.provides(&CapabilityId::REQUEST));
    assert!(assets.provides_named("request", &CapabilityId::REQUEST));
    let request = assets.get_as::<StubRequest>("request")?;
    assert_eq!(request.path, "/");
    Ok(())
}

#[test]
fn lazy_and_eager_defaults() -> anyhow::Result<()> {
    let counter = BuildCounter::new();
    let composer = test_composer(&counter);
    let mut assets = AssetManager::new();

    bootstrap::response(&composer).inbound(&mut assets)?;
    assert_eq!(counter.count(), 0);
    assert!(!assets.get("response")?.is_built());

    bootstrap::route(&composer).inbound(&mut assets)?;
    assert_eq!(counter.count(), 1);
    assert!(assets.get("routeManager")?.is_built());
    Ok(())
}

#[test]
fn valid_override_wins() -> anyhow::Result<()> {
    let counter = BuildCounter::new();
    let (mut assets, bus) = test_assets_with_bus();
    let router = custom_router();
    bus.attach(
        "pre.in.route",
        Arc::new(OverrideListener::new("routeManagerAsset", router.clone())),
    );

    bootstrap::route(&test_composer(&counter)).inbound(&mut assets)?;

    assert!(assets.get("routeManager")?.same_as(&router));
    let resolved = assets.resolve_as::<StubRouteManager>(&CapabilityId::ROUTE_MANAGER)?;
    assert_eq!(resolved.routes, vec!["/custom"]);
    assert_eq!(counter.count(), 0);
    Ok(())
}

#[test]
fn override_without_capability_is_ignored() -> anyhow::Result<()> {
    let counter = BuildCounter::new();
    let (mut assets, bus) = test_assets_with_bus();
    let impostor = Asset::from_value(CapabilityId::RESPONSE, StubRouteManager::default());
    bus.attach(
        "pre.in.route",
        Arc::new(OverrideListener::new("routeManagerAsset", impostor.clone())),
    );

    bootstrap::route(&test_composer(&counter)).inbound(&mut assets)?;

    let installed = assets.get("routeManager")?;
    assert!(!installed.same_as(&impostor));
    assert_eq!(installed.label(), "RouteManager");
    assert_eq!(counter.count(), 1);
    Ok(())
}

/// Attach a listener that offers `router` only when the registry it sees
/// has no route manager yet.
fn override_when_unprovided(bus: &SignalBus, router: Asset) {
    bus.on("pre.in.route", move |event| {
        let provided = event
            .assets()
            .is_some_and(|snapshot| snapshot.provides(&CapabilityId::ROUTE_MANAGER));
        if !provided {
            event.set_asset("routeManagerAsset", router.clone());
        }
        Ok(())
    });
}

#[test]
fn listener_consults_registry_before_overriding() -> anyhow::Result<()> {
    let counter = BuildCounter::new();
    let (mut assets, bus) = test_assets_with_bus();
    let existing = custom_router();
    assets.set("legacyRouter", existing.clone());
    override_when_unprovided(&bus, custom_router());

    bootstrap::route(&test_composer(&counter)).inbound(&mut assets)?;

    assert!(!assets.has("routeManager"));
    assert_eq!(
        assets.providers(&CapabilityId::ROUTE_MANAGER).collect::<Vec<_>>(),
        vec!["legacyRouter"]
    );
    assert_eq!(counter.count(), 0);
    Ok(())
}

#[test]
fn listener_overrides_when_registry_lacks_capability() -> anyhow::Result<()> {
    let counter = BuildCounter::new();
    let (mut assets, bus) = test_assets_with_bus();
    let router = custom_router();
    override_when_unprovided(&bus, router.clone());

    bootstrap::route(&test_composer(&counter)).inbound(&mut assets)?;

    assert!(assets.get("routeManager")?.same_as(&router));
    assert_eq!(counter.count(), 0);
    Ok(())
}

#[test]
fn override_under_wrong_key_is_ignored() -> anyhow::Result<()> {
    let (mut assets, bus) = test_assets_with_bus();
    let router = custom_router();
    bus.attach(
        "pre.in.route",
        Arc::new(OverrideListener::new("routerAsset", router.clone())),
    );

    bootstrap::route(&test_composer(&BuildCounter::new())).inbound(&mut assets)?;

    assert!(!assets.get("routeManager")?.same_as(&router));
    Ok(())
}

#[test]
fn later_listener_sees_and_replaces_earlier_override() -> anyhow::Result<()> {
    let (mut assets, bus) = test_assets_with_bus();
    let first = custom_router();
    let second = custom_router();
    bus.attach(
        "pre.in.*",
        Arc::new(OverrideListener::new("routeManagerAsset", first)),
    );
    bus.attach(
        "pre.in.route",
        Arc::new(OverrideListener::new("routeManagerAsset", second.clone())),
    );

    bootstrap::route(&test_composer(&BuildCounter::new())).inbound(&mut assets)?;

    assert!(assets.get("routeManager")?.same_as(&second));
    Ok(())
}

#[test]
fn missing_bus_skips_signals() -> anyhow::Result<()> {
    let log = CallLog::new();
    let orphan = SignalBus::new();
    orphan.attach("*", Arc::new(RecordingListener::new("orphan", &log)));
    orphan.attach("*", Arc::new(FailingListener::new("must not run")));

    let stage = bootstrap::response(&test_composer(&BuildCounter::new()));
    let mut assets = AssetManager::new();
    stage.inbound(&mut assets)?;
    stage.outbound(&mut assets)?;

    assert!(log.is_empty());
    assert!(assets.provides(&CapabilityId::RESPONSE));
    Ok(())
}

#[test]
fn event_manager_without_capability_is_not_a_bus() -> anyhow::Result<()> {
    let mut assets = AssetManager::new();
    assets.set(
        EVENT_MANAGER,
        Asset::from_value(CapabilityId::new("Logger"), "not a bus".to_owned()),
    );

    let stage = bootstrap::response(&test_composer(&BuildCounter::new()));
    stage.inbound(&mut assets)?;
    stage.outbound(&mut assets)?;
    Ok(())
}

#[test]
fn signal_names_follow_convention() -> anyhow::Result<()> {
    let log = CallLog::new();
    let (mut assets, bus) = test_assets_with_bus();
    bus.attach("*", Arc::new(RecordingListener::new("all", &log)));

    let stage = bootstrap::response(&test_composer(&BuildCounter::new()));
    stage.inbound(&mut assets)?;
    stage.outbound(&mut assets)?;

    assert_eq!(
        log.entries(),
        [
            "all:pre.in.response",
            "all:post.in.response",
            "all:pre.out.response",
            "all:post.out.response",
        ]
    );
    Ok(())
}

#[test]
fn failing_listener_aborts_before_install() {
    let log = CallLog::new();
    let (mut assets, bus) = test_assets_with_bus();
    bus.attach("pre.in.request", Arc::new(FailingListener::new("denied")));
    bus.attach("pre.in.request", Arc::new(RecordingListener::new("late", &log)));

    let err = bootstrap::request(&test_composer(&BuildCounter::new()))
        .inbound(&mut assets)
        .unwrap_err();

    assert!(matches!(
        err,
        FilterError::Signal(SignalError::ListenerFailed { ref listener, .. }) if listener == "failing"
    ));
    assert!(log.is_empty());
    assert!(!assets.provides(&CapabilityId::REQUEST));
}

#[test]
fn missing_binding_is_fatal() {
    let stage = bootstrap::route(&AssetComposer::default());
    let err = stage.inbound(&mut AssetManager::new()).unwrap_err();
    assert!(err.is_composition());
}
