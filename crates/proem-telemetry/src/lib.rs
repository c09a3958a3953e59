//! Proem Telemetry - Logging setup and request correlation.
//!
//! This crate provides:
//! - Configurable logging setup with multiple formats and targets
//! - Request context for correlating one request's events
//!
//! # Example
//!
//! ```rust,no_run
//! use proem_telemetry::{LogConfig, LogFormat, setup_logging, RequestContext};
//!
//! # fn main() -> Result<(), proem_telemetry::TelemetryError> {
//! let config = LogConfig::new("debug")
//!     .with_format(LogFormat::Pretty)
//!     .with_directive("proem_signal=trace");
//!
//! setup_logging(&config)?;
//!
//! let ctx = RequestContext::new("filter_chain").with_operation("run");
//! let _guard = ctx.enter();
//! tracing::info!("Processing request");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod context;
mod error;
mod logging;

pub use context::{RequestContext, RequestGuard};
pub use error::{TelemetryError, TelemetryResult};
pub use logging::{LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging};
