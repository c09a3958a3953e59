//! Signal bus for delivering events to listeners.

use proem_service::{Asset, AssetManager, CapabilityId};
use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::error::{ListenerError, SignalError, SignalResult};
use crate::event::Event;
use crate::listener::{FnListener, ListenerId, ListenerRegistry, SignalListener, SignalPattern};

/// Conventional asset name under which the bus is registered.
pub const EVENT_MANAGER: &str = "eventManager";

/// Synchronous signal bus.
///
/// Clones share one listener registry, so a bus can be registered once at
/// startup and handed to every request's asset manager.
///
/// **WARNING:** Storing a clone of the bus inside one of its own listeners
/// creates an `Arc` reference cycle. Listeners that need to trigger further
/// signals should receive the bus another way.
#[derive(Debug, Clone, Default)]
pub struct SignalBus {
    listeners: Arc<ListenerRegistry>,
}

impl SignalBus {
    /// Create a bus with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared listener registry.
    #[must_use]
    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Register a listener for signals matching `pattern`.
    pub fn attach(
        &self,
        pattern: impl Into<SignalPattern>,
        listener: Arc<dyn SignalListener>,
    ) -> ListenerId {
        self.listeners.register(pattern, listener)
    }

    /// Register a closure for signals matching `pattern`.
    pub fn on<F>(&self, pattern: impl Into<SignalPattern>, handler: F) -> ListenerId
    where
        F: Fn(&mut Event) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        let pattern = pattern.into();
        let name = format!("fn:{pattern}");
        self.attach(pattern, Arc::new(FnListener::new(name, handler)))
    }

    /// Remove a listener.
    pub fn detach(&self, id: ListenerId) -> bool {
        self.listeners.unregister(id)
    }

    /// Deliver `event` to every matching listener, then run `completion`.
    ///
    /// Listeners run in registration order on the calling thread and see
    /// each other's payload changes. The completion receives the final event
    /// and its return value is handed back to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::ListenerFailed`] for the first listener that
    /// fails. Remaining listeners and the completion are skipped.
    pub fn trigger<F, R>(&self, mut event: Event, completion: F) -> SignalResult<R>
    where
        F: FnOnce(&Event) -> R,
    {
        let listeners = self.listeners.matching(event.name());
        trace!(
            signal = %event.name(),
            event_id = %event.metadata().event_id,
            listener_count = listeners.len(),
            "Triggering signal"
        );

        for listener in &listeners {
            trace!(signal = %event.name(), listener = listener.name(), "Delivering signal");
            if let Err(source) = listener.on_signal(&mut event) {
                warn!(
                    signal = %event.name(),
                    listener = listener.name(),
                    error = %source,
                    "Listener failed, aborting delivery"
                );
                return Err(SignalError::ListenerFailed {
                    signal: event.name().to_owned(),
                    listener: listener.name().to_owned(),
                    source,
                });
            }
        }

        debug!(
            signal = %event.name(),
            delivered = listeners.len(),
            "Signal delivered"
        );

        Ok(completion(&event))
    }

    /// Deliver `event` without a completion and return it.
    ///
    /// # Errors
    ///
    /// Same as [`trigger`](Self::trigger).
    pub fn emit(&self, event: Event) -> SignalResult<Event> {
        self.trigger(event, Event::clone)
    }

    /// Wrap the bus as an asset satisfying [`CapabilityId::SIGNAL_MANAGER`].
    #[must_use]
    pub fn into_asset(self) -> Asset {
        Asset::builder()
            .named(EVENT_MANAGER)
            .provides(CapabilityId::SIGNAL_MANAGER)
            .value(self)
    }

    /// Register the bus under [`EVENT_MANAGER`].
    pub fn install(self, assets: &mut AssetManager) {
        assets.set(EVENT_MANAGER, self.into_asset());
    }

    /// Find the bus registered in `assets`.
    ///
    /// Returns `Ok(None)` when nothing under [`EVENT_MANAGER`] claims the
    /// signal manager capability; callers skip signalling in that case.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::Service`] if the registered asset claims the
    /// capability but does not hold a `SignalBus`.
    pub fn locate(assets: &AssetManager) -> SignalResult<Option<Arc<Self>>> {
        if !assets.provides_named(EVENT_MANAGER, &CapabilityId::SIGNAL_MANAGER) {
            return Ok(None);
        }
        Ok(Some(assets.get_as::<Self>(EVENT_MANAGER)?))
    }
}
