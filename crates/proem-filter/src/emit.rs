//! Signal emission around stage phases.

use proem_service::{Asset, AssetManager, CapabilityId};
use proem_signal::{Event, SignalBus};
use tracing::{debug, trace};

use crate::error::FilterResult;
use crate::point::HookPoint;

/// Trigger the signal for `point` on `stage`, if a bus is registered.
///
/// The bus is looked up under the conventional event manager name. When it
/// is missing the signal is skipped and `Ok(None)` is returned. Otherwise
/// the event carries a snapshot of `assets` for listeners to inspect and
/// the completion inspects the event after every listener has run and
/// returns the override decision, which is handed back to the stage to
/// apply. The asset manager is never touched from inside the bus.
///
/// # Errors
///
/// Propagates listener failures and a mistyped event manager asset.
pub fn emit_hook<F>(
    assets: &AssetManager,
    stage: &str,
    point: HookPoint,
    completion: F,
) -> FilterResult<Option<Asset>>
where
    F: FnOnce(&Event) -> Option<Asset>,
{
    let Some(bus) = SignalBus::locate(assets)? else {
        trace!(stage, hook = %point, "No signal bus registered, skipping");
        return Ok(None);
    };

    let event = Event::new(point.signal_name(stage))
        .with_target(stage)
        .with_method(point.method_name())
        .with_assets(assets.clone());

    Ok(bus.trigger(event, completion)?)
}

/// Pick the override asset a listener attached under `key`.
///
/// The asset is accepted only if it claims `capability`; anything else under
/// the key is ignored.
#[must_use]
pub fn accept_override(event: &Event, key: &str, capability: &CapabilityId) -> Option<Asset> {
    let asset = event.asset(key)?;
    if asset.provides(capability) {
        Some(asset.clone())
    } else {
        debug!(
            signal = %event.name(),
            key,
            capability = %capability,
            "Ignoring override that does not provide the capability"
        );
        None
    }
}
