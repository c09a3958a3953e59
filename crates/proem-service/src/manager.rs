//! The asset manager: a capability registry over named assets.
//!
//! Assets are stored by name. A derived index maps every capability to the
//! names of the assets claiming it, so both the qualified and unqualified
//! provision queries are map lookups.

use std::any::{Any, type_name};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use tracing::trace;

use crate::asset::Asset;
use crate::capability::CapabilityId;
use crate::error::{ServiceError, ServiceResult};

/// Registry of named assets answering capability queries.
///
/// One manager serves one in-flight request. A host that wants shared
/// defaults keeps a template manager and clones it per request; clones share
/// asset instances but not the name map.
#[derive(Debug, Clone, Default)]
pub struct AssetManager {
    assets: BTreeMap<String, Asset>,
    index: HashMap<CapabilityId, BTreeSet<String>>,
}

impl AssetManager {
    /// Create an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the asset registered under `name`.
    ///
    /// Replacement is a plain overwrite: the previous asset's capabilities
    /// no longer answer for `name`. Returns the replaced asset, if any.
    pub fn set(&mut self, name: impl Into<String>, asset: Asset) -> Option<Asset> {
        let name = name.into();
        let previous = self.remove(&name);

        for capability in asset.capabilities() {
            self.index
                .entry(capability.clone())
                .or_default()
                .insert(name.clone());
        }

        trace!(name = %name, replaced = previous.is_some(), "Registered asset");
        self.assets.insert(name, asset);
        previous
    }

    /// Remove the asset registered under `name`.
    pub fn remove(&mut self, name: &str) -> Option<Asset> {
        let asset = self.assets.remove(name)?;
        for capability in asset.capabilities() {
            if let Some(names) = self.index.get_mut(capability) {
                names.remove(name);
                if names.is_empty() {
                    self.index.remove(capability);
                }
            }
        }
        Some(asset)
    }

    /// Get the asset registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if nothing is registered there.
    pub fn get(&self, name: &str) -> ServiceResult<&Asset> {
        self.assets.get(name).ok_or_else(|| ServiceError::NotFound {
            name: name.to_owned(),
        })
    }

    /// Get the built value of the asset under `name` as a concrete type.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for a missing name and
    /// [`ServiceError::TypeMismatch`] if the value has another type.
    pub fn get_as<T>(&self, name: &str) -> ServiceResult<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.get(name)?
            .get_as::<T>()
            .ok_or_else(|| ServiceError::TypeMismatch {
                name: name.to_owned(),
                expected: type_name::<T>(),
            })
    }

    /// Whether an asset is registered under `name`.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.assets.contains_key(name)
    }

    /// Whether any registered asset satisfies `capability`.
    #[must_use]
    pub fn provides(&self, capability: &CapabilityId) -> bool {
        self.index.contains_key(capability)
    }

    /// Whether the asset under `name` exists and satisfies `capability`.
    ///
    /// A missing name answers `false`.
    #[must_use]
    pub fn provides_named(&self, name: &str, capability: &CapabilityId) -> bool {
        self.assets
            .get(name)
            .is_some_and(|asset| asset.provides(capability))
    }

    /// Names of all assets satisfying `capability`, in name order.
    pub fn providers(&self, capability: &CapabilityId) -> impl Iterator<Item = &str> {
        self.index
            .get(capability)
            .into_iter()
            .flat_map(|names| names.iter().map(String::as_str))
    }

    /// The first asset (in name order) satisfying `capability`.
    #[must_use]
    pub fn resolve(&self, capability: &CapabilityId) -> Option<&Asset> {
        self.providers(capability)
            .next()
            .and_then(|name| self.assets.get(name))
    }

    /// Resolve a capability and downcast the built value.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if nothing provides the capability
    /// and [`ServiceError::TypeMismatch`] if the value has another type.
    pub fn resolve_as<T>(&self, capability: &CapabilityId) -> ServiceResult<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let asset = self.resolve(capability).ok_or_else(|| ServiceError::NotFound {
            name: capability.to_string(),
        })?;
        asset.get_as::<T>().ok_or_else(|| ServiceError::TypeMismatch {
            name: capability.to_string(),
            expected: type_name::<T>(),
        })
    }

    /// Registered names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.assets.keys().map(String::as_str)
    }

    /// Number of registered assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether no assets are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
