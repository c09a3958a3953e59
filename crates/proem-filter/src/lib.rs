//! Proem Filter - Staged request pipeline with pre/post signals.
//!
//! This crate provides the bootstrap filter chain: an ordered list of named
//! stages, each with an inbound and an outbound phase, run against one
//! request's [`AssetManager`](proem_service::AssetManager).
//!
//! # Hook Points
//!
//! Every stage may trigger four signals on the bus registered in the asset
//! manager, named `{phase}.{direction}.{stage}`:
//! - `pre.in.<stage>` before the stage's inbound work
//! - `post.in.<stage>` after it
//! - `pre.out.<stage>` before the stage's outbound work
//! - `post.out.<stage>` after it
//!
//! A listener on `pre.in.<stage>` can offer an override asset on the event
//! payload. The stage installs it only if it claims the stage's capability,
//! and otherwise falls back to a default built by the composer.
//!
//! # Bootstrap Stages
//!
//! | stage      | asset name     | override key        | capability     |
//! |------------|----------------|---------------------|----------------|
//! | `response` | `response`     | `responseAsset`     | `Response`     |
//! | `request`  | `request`      | `requestAsset`      | `Request`      |
//! | `route`    | `routeManager` | `routeManagerAsset` | `RouteManager` |
//!
//! # Example
//!
//! ```rust
//! use proem_filter::{FilterChain, bootstrap};
//! use proem_service::{AssetComposer, AssetManager, Bindings, CapabilityId};
//!
//! let mut bindings = Bindings::new();
//! bindings
//!     .bind(CapabilityId::RESPONSE, String::new)
//!     .bind(CapabilityId::REQUEST, String::new)
//!     .bind(CapabilityId::ROUTE_MANAGER, Vec::<String>::new);
//!
//! let chain = bootstrap::default_chain(&AssetComposer::new(bindings));
//! let mut assets = AssetManager::new();
//! chain.run(&mut assets).unwrap();
//!
//! assert!(assets.provides(&CapabilityId::ROUTE_MANAGER));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod asset_stage;
pub mod bootstrap;
pub mod chain;
pub mod emit;
pub mod error;
pub mod point;
pub mod stage;

pub use asset_stage::AssetStage;
pub use chain::{ChainReport, FilterChain, StageVisit};
pub use emit::{accept_override, emit_hook};
pub use error::{FilterError, FilterResult};
pub use point::{Direction, HookPoint, Phase};
pub use stage::{FilterStage, StageState};
