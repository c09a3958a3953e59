//! Proem Service - Capability-query service container.
//!
//! This crate provides:
//! - Typed capability identifiers naming the contracts an asset satisfies
//! - Lazily-built, memoized assets tagged with their capabilities
//! - The asset manager (capability registry) answering provision queries
//! - The asset composer building default assets from a binding table
//!
//! # Capability Model
//!
//! Stages never ask the registry for a concrete type. They ask whether
//! *something* satisfies a contract, and install a default through the
//! composer when nothing does. Satisfaction is declared by the asset,
//! never inferred from the value it builds.
//!
//! # Example
//!
//! ```
//! use proem_service::{Asset, AssetComposer, AssetManager, Bindings, CapabilityId};
//!
//! #[derive(Debug, Default)]
//! struct RouteManager;
//!
//! let mut bindings = Bindings::new();
//! bindings.bind(CapabilityId::ROUTE_MANAGER, RouteManager::default);
//! let composer = AssetComposer::new(bindings);
//!
//! let mut assets = AssetManager::new();
//! assert!(!assets.provides(&CapabilityId::ROUTE_MANAGER));
//!
//! let asset = composer.compose(&CapabilityId::ROUTE_MANAGER, true).unwrap();
//! assets.set("routeManager", asset);
//!
//! assert!(assets.provides(&CapabilityId::ROUTE_MANAGER));
//! assert!(assets.provides_named("routeManager", &CapabilityId::ROUTE_MANAGER));
//! assert!(assets.get_as::<RouteManager>("routeManager").is_ok());
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod asset;
mod capability;
mod composer;
mod error;
mod manager;

pub use asset::{Asset, AssetBuilder, AssetState, AssetValue};
pub use capability::CapabilityId;
pub use composer::{AssetComposer, Bindings};
pub use error::{ServiceError, ServiceResult};
pub use manager::AssetManager;
