//! Fixtures for the bootstrap services.

use proem_service::{AssetComposer, AssetManager, Bindings, CapabilityId};
use proem_signal::SignalBus;
use tracing_subscriber::EnvFilter;

use crate::mocks::BuildCounter;

/// Stand-in route manager.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StubRouteManager {
    /// Registered route patterns.
    pub routes: Vec<String>,
}

/// Stand-in request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubRequest {
    /// Request path.
    pub path: String,
}

impl Default for StubRequest {
    fn default() -> Self {
        Self {
            path: "/".to_owned(),
        }
    }
}

/// Stand-in response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubResponse {
    /// Status code.
    pub status: u16,
    /// Body.
    pub body: String,
}

impl Default for StubResponse {
    fn default() -> Self {
        Self {
            status: 200,
            body: String::new(),
        }
    }
}

/// Bindings for the three bootstrap capabilities. Every default
/// constructor bumps `counter`.
#[must_use]
pub fn test_bindings(counter: &BuildCounter) -> Bindings {
    let mut bindings = Bindings::new();
    let (routes, requests, responses) = (counter.clone(), counter.clone(), counter.clone());
    bindings
        .bind(CapabilityId::ROUTE_MANAGER, move || {
            routes.hit();
            StubRouteManager::default()
        })
        .bind(CapabilityId::REQUEST, move || {
            requests.hit();
            StubRequest::default()
        })
        .bind(CapabilityId::RESPONSE, move || {
            responses.hit();
            StubResponse::default()
        });
    bindings
}

/// A composer over [`test_bindings`].
#[must_use]
pub fn test_composer(counter: &BuildCounter) -> AssetComposer {
    AssetComposer::new(test_bindings(counter))
}

/// An asset manager with a fresh signal bus installed under the event
/// manager name, and a handle to that bus.
#[must_use]
pub fn test_assets_with_bus() -> (AssetManager, SignalBus) {
    let bus = SignalBus::new();
    let mut assets = AssetManager::new();
    bus.clone().install(&mut assets);
    (assets, bus)
}

/// Install a test-writer subscriber honouring `RUST_LOG`. Safe to call from
/// every test; only the first call installs.
pub fn init_test_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
