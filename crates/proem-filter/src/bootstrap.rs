//! The default bootstrap stages.

use proem_config::SignalsSection;
use proem_service::{AssetComposer, AssetManager, CapabilityId};
use proem_signal::SignalBus;

use crate::asset_stage::AssetStage;
use crate::chain::FilterChain;
use crate::error::{FilterError, FilterResult};

/// Name of the response stage.
pub const RESPONSE: &str = "response";
/// Name of the request stage.
pub const REQUEST: &str = "request";
/// Name of the route stage.
pub const ROUTE: &str = "route";

/// Stage names in default chain order.
pub const DEFAULT_STAGES: [&str; 3] = [RESPONSE, REQUEST, ROUTE];

/// Installs a [`CapabilityId::RESPONSE`] asset under `response`.
#[must_use]
pub fn response(composer: &AssetComposer) -> AssetStage {
    AssetStage::new(
        RESPONSE,
        "response",
        CapabilityId::RESPONSE,
        composer.clone(),
    )
}

/// Installs a [`CapabilityId::REQUEST`] asset under `request`.
#[must_use]
pub fn request(composer: &AssetComposer) -> AssetStage {
    AssetStage::new(REQUEST, "request", CapabilityId::REQUEST, composer.clone())
}

/// Installs a [`CapabilityId::ROUTE_MANAGER`] asset under `routeManager`.
///
/// The default route manager is built eagerly.
#[must_use]
pub fn route(composer: &AssetComposer) -> AssetStage {
    AssetStage::new(
        ROUTE,
        "routeManager",
        CapabilityId::ROUTE_MANAGER,
        composer.clone(),
    )
    .eager(true)
}

/// Look up a bootstrap stage by name.
///
/// # Errors
///
/// Returns [`FilterError::UnknownStage`] for names outside [`DEFAULT_STAGES`].
pub fn stage_by_name(name: &str, composer: &AssetComposer) -> FilterResult<AssetStage> {
    match name {
        RESPONSE => Ok(response(composer)),
        REQUEST => Ok(request(composer)),
        ROUTE => Ok(route(composer)),
        other => Err(FilterError::UnknownStage(other.to_owned())),
    }
}

/// The response, request, route chain.
#[must_use]
pub fn default_chain(composer: &AssetComposer) -> FilterChain {
    FilterChain::new()
        .with_stage(response(composer))
        .with_stage(request(composer))
        .with_stage(route(composer))
}

/// A template registry for [`FilterChain::dispatch`].
///
/// Holds `bus` under the event manager name when signals are enabled, and
/// is empty otherwise so every stage skips its signals.
#[must_use]
pub fn template_assets(signals: &SignalsSection, bus: &SignalBus) -> AssetManager {
    let mut assets = AssetManager::new();
    if signals.enabled {
        bus.clone().install(&mut assets);
    }
    assets
}
