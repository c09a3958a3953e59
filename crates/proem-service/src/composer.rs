//! Default asset composition.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::asset::{Asset, BuildFn, erase};
use crate::capability::CapabilityId;
use crate::error::{ServiceError, ServiceResult};

/// Binding table from capability to the constructor of its default
/// implementation.
///
/// Populated at startup, then shared read-only by every composer.
#[derive(Default, Clone)]
pub struct Bindings {
    builders: HashMap<CapabilityId, BuildFn>,
}

impl Bindings {
    /// Create an empty binding table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a default constructor to a capability.
    ///
    /// A later binding for the same capability replaces the earlier one.
    pub fn bind<T, F>(&mut self, capability: CapabilityId, builder: F) -> &mut Self
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.builders.insert(capability, erase(builder));
        self
    }

    /// Check whether a capability has a default constructor.
    #[must_use]
    pub fn is_bound(&self, capability: &CapabilityId) -> bool {
        self.builders.contains_key(capability)
    }

    /// Bound capabilities, in no particular order.
    pub fn capabilities(&self) -> impl Iterator<Item = &CapabilityId> {
        self.builders.keys()
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.builders.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.builders.keys().map(CapabilityId::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("Bindings").field("capabilities", &keys).finish()
    }
}

/// Builds default assets for capabilities nobody else supplied.
#[derive(Debug, Clone, Default)]
pub struct AssetComposer {
    bindings: Arc<Bindings>,
}

impl AssetComposer {
    /// Create a composer over a binding table.
    #[must_use]
    pub fn new(bindings: Bindings) -> Self {
        Self {
            bindings: Arc::new(bindings),
        }
    }

    /// The binding table this composer resolves against.
    #[must_use]
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Check whether [`compose`](Self::compose) would succeed.
    #[must_use]
    pub fn can_compose(&self, capability: &CapabilityId) -> bool {
        self.bindings.is_bound(capability)
    }

    /// Build the default asset for a capability.
    ///
    /// The asset declares `capability` and is labelled with it. When `eager`
    /// is set the value is constructed before returning.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Composition`] if no binding exists.
    pub fn compose(&self, capability: &CapabilityId, eager: bool) -> ServiceResult<Asset> {
        let builder =
            self.bindings
                .builders
                .get(capability)
                .ok_or_else(|| ServiceError::Composition {
                    capability: capability.clone(),
                })?;

        let asset = Asset::from_parts(
            capability.to_string(),
            std::iter::once(capability.clone()).collect(),
            Arc::clone(builder),
        );

        if eager {
            let _ = asset.get();
        }

        debug!(capability = %capability, eager, "Composed default asset");

        Ok(asset)
    }
}
