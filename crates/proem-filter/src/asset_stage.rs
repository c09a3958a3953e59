//! A stage that guarantees one capability is installed.

use proem_service::{AssetComposer, AssetManager, CapabilityId};
use tracing::{debug, info};

use crate::emit::{accept_override, emit_hook};
use crate::error::FilterResult;
use crate::point::HookPoint;
use crate::stage::FilterStage;

/// Stage that makes sure an asset providing its capability exists by the
/// end of its inbound phase.
///
/// Inbound runs four steps:
/// 1. trigger `pre.in.<name>`; a listener may attach an override under the
///    stage's override key
/// 2. install the override under the asset name if it claims the capability
/// 3. if nothing provides the capability now, install the composer default
/// 4. trigger `post.in.<name>`
///
/// Outbound only triggers `pre.out.<name>` and `post.out.<name>`.
#[derive(Debug, Clone)]
pub struct AssetStage {
    name: String,
    asset_name: String,
    capability: CapabilityId,
    override_key: String,
    eager: bool,
    hooks: Vec<HookPoint>,
    composer: AssetComposer,
}

impl AssetStage {
    /// Create a stage installing `capability` under `asset_name`.
    ///
    /// The override key defaults to `{asset_name}Asset`, the default asset
    /// is built lazily, and all four hook points fire.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        asset_name: impl Into<String>,
        capability: CapabilityId,
        composer: AssetComposer,
    ) -> Self {
        let asset_name = asset_name.into();
        Self {
            name: name.into(),
            override_key: format!("{asset_name}Asset"),
            asset_name,
            capability,
            eager: false,
            hooks: HookPoint::ALL.to_vec(),
            composer,
        }
    }

    /// Set the payload key listeners use to offer an override.
    #[must_use]
    pub fn with_override_key(mut self, key: impl Into<String>) -> Self {
        self.override_key = key.into();
        self
    }

    /// Build the default asset immediately instead of on first use.
    #[must_use]
    pub fn eager(mut self, eager: bool) -> Self {
        self.eager = eager;
        self
    }

    /// Restrict which hook points fire.
    #[must_use]
    pub fn with_hooks(mut self, hooks: impl IntoIterator<Item = HookPoint>) -> Self {
        self.hooks = hooks.into_iter().collect();
        self
    }

    /// Conventional asset name.
    #[must_use]
    pub fn asset_name(&self) -> &str {
        &self.asset_name
    }

    /// Capability this stage installs.
    #[must_use]
    pub fn capability(&self) -> &CapabilityId {
        &self.capability
    }

    /// Payload key for overrides.
    #[must_use]
    pub fn override_key(&self) -> &str {
        &self.override_key
    }

    /// Whether defaults are built eagerly.
    #[must_use]
    pub fn is_eager(&self) -> bool {
        self.eager
    }

    /// Whether `point` fires for this stage.
    #[must_use]
    pub fn fires(&self, point: HookPoint) -> bool {
        self.hooks.contains(&point)
    }

    fn signal(&self, assets: &AssetManager, point: HookPoint) -> FilterResult<()> {
        if self.fires(point) {
            emit_hook(assets, &self.name, point, |_| None)?;
        }
        Ok(())
    }
}

impl FilterStage for AssetStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn guarantees(&self) -> Option<&CapabilityId> {
        Some(&self.capability)
    }

    fn inbound(&self, assets: &mut AssetManager) -> FilterResult<()> {
        if self.fires(HookPoint::PreIn) {
            let decision = emit_hook(assets, &self.name, HookPoint::PreIn, |event| {
                accept_override(event, &self.override_key, &self.capability)
            })?;

            if let Some(asset) = decision {
                info!(
                    stage = %self.name,
                    asset = %self.asset_name,
                    capability = %self.capability,
                    "Installing override asset"
                );
                assets.set(self.asset_name.as_str(), asset);
            }
        }

        if !assets.provides(&self.capability) {
            let asset = self.composer.compose(&self.capability, self.eager)?;
            debug!(
                stage = %self.name,
                asset = %self.asset_name,
                capability = %self.capability,
                "Installing default asset"
            );
            assets.set(self.asset_name.as_str(), asset);
        }

        self.signal(assets, HookPoint::PostIn)
    }

    fn outbound(&self, assets: &mut AssetManager) -> FilterResult<()> {
        self.signal(assets, HookPoint::PreOut)?;
        self.signal(assets, HookPoint::PostOut)
    }
}
