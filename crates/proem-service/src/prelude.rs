//! Prelude module - commonly used types for convenient import.
//!
//! Use `use proem_service::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```
//! use proem_service::prelude::*;
//!
//! let mut assets = AssetManager::new();
//! assets.set("response", Asset::new(CapabilityId::RESPONSE, || String::from("ok")));
//!
//! assert!(assets.provides(&CapabilityId::RESPONSE));
//! ```

// Errors
pub use crate::{ServiceError, ServiceResult};

// Capabilities
pub use crate::CapabilityId;

// Assets
pub use crate::{Asset, AssetBuilder, AssetState, AssetValue};

// Registry and composition
pub use crate::{AssetComposer, AssetManager, Bindings};
