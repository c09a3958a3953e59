//! Proem Signal - Synchronous signal bus for the Proem filter chain.
//!
//! This crate provides:
//! - Events carrying a mutable payload of assets and JSON parameters
//! - Listeners registered against exact names, prefixes, or every signal
//! - A bus whose `trigger` runs listeners in order, then a completion
//!
//! # Architecture
//!
//! The listener list is shared by every clone of a [`SignalBus`] and is
//! meant to be filled at startup. Each `trigger` builds nothing itself: the
//! caller hands over a fresh [`Event`], listeners mutate it in registration
//! order, and the completion callback inspects the result and returns a
//! value to the caller. The event is dropped afterwards.
//!
//! Listener failures are not caught. The first failing listener aborts
//! delivery and the completion does not run.
//!
//! # Example
//!
//! ```rust
//! use proem_service::{Asset, CapabilityId};
//! use proem_signal::{Event, SignalBus};
//!
//! let bus = SignalBus::new();
//! bus.on("pre.in.route", |event| {
//!     event.set_asset(
//!         "routeManagerAsset",
//!         Asset::new(CapabilityId::ROUTE_MANAGER, || "custom router"),
//!     );
//!     Ok(())
//! });
//!
//! let found = bus
//!     .trigger(Event::new("pre.in.route"), |event| {
//!         event.asset("routeManagerAsset").is_some()
//!     })
//!     .unwrap();
//! assert!(found);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod bus;
mod error;
mod event;
mod listener;

pub use bus::{EVENT_MANAGER, SignalBus};
pub use error::{ListenerError, SignalError, SignalResult};
pub use event::{Event, EventMetadata, EventValue};
pub use listener::{FnListener, ListenerId, ListenerRegistry, SignalListener, SignalPattern};
