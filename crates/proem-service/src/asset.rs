//! Lazily-built assets.
//!
//! An [`Asset`] wraps a deferred constructor together with the set of
//! capabilities it claims. The constructor runs on the first call to
//! [`Asset::get`] and never again; every later call returns the same value.

use std::any::{Any, type_name};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::capability::CapabilityId;

/// Type-erased value produced by an asset's builder.
pub type AssetValue = Arc<dyn Any + Send + Sync>;

/// Deferred zero-argument constructor shared by assets and bindings.
pub(crate) type BuildFn = Arc<dyn Fn() -> AssetValue + Send + Sync>;

/// Wrap a typed constructor as a type-erased [`BuildFn`].
pub(crate) fn erase<T, F>(builder: F) -> BuildFn
where
    T: Any + Send + Sync,
    F: Fn() -> T + Send + Sync + 'static,
{
    Arc::new(move || Arc::new(builder()) as AssetValue)
}

/// Construction state of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetState {
    /// The builder has not run yet.
    Pending,
    /// The value has been built and memoized.
    Built,
}

/// A lazily-constructed value tagged with the capabilities it satisfies.
///
/// `Asset` is a cheap handle: clones share the same memoization cell, so a
/// value built through one clone is visible through every other. The
/// capability set is fixed when the asset is created.
#[derive(Clone)]
pub struct Asset {
    inner: Arc<AssetInner>,
}

struct AssetInner {
    label: String,
    capabilities: BTreeSet<CapabilityId>,
    cell: OnceLock<AssetValue>,
    builder: BuildFn,
}

impl Asset {
    /// Create an asset satisfying a single capability.
    #[must_use]
    pub fn new<T, F>(capability: CapabilityId, builder: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::builder().provides(capability).build(builder)
    }

    /// Create an already-built asset around an existing value.
    #[must_use]
    pub fn from_value<T>(capability: CapabilityId, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self::builder().provides(capability).value(value)
    }

    /// Start building an asset with several capabilities or a label.
    #[must_use]
    pub fn builder() -> AssetBuilder {
        AssetBuilder::default()
    }

    pub(crate) fn from_parts(
        label: String,
        capabilities: BTreeSet<CapabilityId>,
        builder: BuildFn,
    ) -> Self {
        Self {
            inner: Arc::new(AssetInner {
                label,
                capabilities,
                cell: OnceLock::new(),
                builder,
            }),
        }
    }

    /// Human-readable label. Empty for anonymous assets.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// Check whether this asset claims a capability.
    ///
    /// Never triggers construction.
    #[must_use]
    pub fn provides(&self, capability: &CapabilityId) -> bool {
        self.inner.capabilities.contains(capability)
    }

    /// Capabilities this asset claims, in sorted order.
    pub fn capabilities(&self) -> impl Iterator<Item = &CapabilityId> {
        self.inner.capabilities.iter()
    }

    /// Current construction state.
    #[must_use]
    pub fn state(&self) -> AssetState {
        if self.inner.cell.get().is_some() {
            AssetState::Built
        } else {
            AssetState::Pending
        }
    }

    /// Whether the underlying value has been built.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.state() == AssetState::Built
    }

    /// Get the underlying value, building it on first access.
    ///
    /// Concurrent callers block until the first builder invocation finishes;
    /// the builder never runs twice for the same asset.
    #[must_use]
    pub fn get(&self) -> AssetValue {
        Arc::clone(self.inner.cell.get_or_init(|| {
            tracing::trace!(asset = %self.inner.label, "Building asset");
            (self.inner.builder)()
        }))
    }

    /// Get the underlying value as a concrete type.
    ///
    /// Returns `None` if the built value is of another type.
    #[must_use]
    pub fn get_as<T>(&self) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.get().downcast::<T>().ok()
    }

    /// Identity comparison: `true` if both handles refer to the same asset.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Asset")
            .field("label", &self.inner.label)
            .field("capabilities", &self.inner.capabilities)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Builder for assets with a label or several capabilities.
#[derive(Debug, Default)]
#[must_use]
pub struct AssetBuilder {
    label: String,
    capabilities: BTreeSet<CapabilityId>,
}

impl AssetBuilder {
    /// Set the asset's label.
    pub fn named(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Declare a capability the asset satisfies.
    pub fn provides(mut self, capability: CapabilityId) -> Self {
        self.capabilities.insert(capability);
        self
    }

    /// Finish with a deferred constructor.
    pub fn build<T, F>(self, builder: F) -> Asset
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Asset::from_parts(self.label, self.capabilities, erase(builder))
    }

    /// Finish with an existing value. The asset starts out built.
    pub fn value<T>(self, value: T) -> Asset
    where
        T: Any + Send + Sync,
    {
        let value: AssetValue = Arc::new(value);
        let label = if self.label.is_empty() {
            type_name::<T>().to_owned()
        } else {
            self.label
        };
        let cloned = Arc::clone(&value);
        let asset = Asset::from_parts(
            label,
            self.capabilities,
            Arc::new(move || Arc::clone(&cloned)),
        );
        // A fresh cell cannot already be set.
        let _ = asset.inner.cell.set(value);
        asset
    }
}
