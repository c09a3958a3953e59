//! Proem Test - Shared test utilities.
//!
//! This crate provides stage and listener doubles plus fixtures that can be
//! used across Proem crates as a dev-dependency.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! proem-test.workspace = true
//! ```
//!
//! ```rust,ignore
//! use proem_test::{CallLog, RecordingStage};
//! use proem_filter::FilterChain;
//!
//! let log = CallLog::new();
//! let chain = FilterChain::new()
//!     .with_stage(RecordingStage::new("S1", &log))
//!     .with_stage(RecordingStage::new("S2", &log));
//! chain.run(&mut proem_service::AssetManager::new()).unwrap();
//! assert_eq!(log.entries(), ["S1.in", "S2.in", "S2.out", "S1.out"]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
