//! The filter chain driver.

use proem_config::ChainSection;
use proem_service::{AssetComposer, AssetManager};
use proem_telemetry::RequestContext;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::bootstrap;
use crate::error::{FilterError, FilterResult};
use crate::point::Direction;
use crate::stage::{FilterStage, StageState};

/// One stage call recorded during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageVisit {
    /// Stage name.
    pub stage: String,
    /// Which phase was called.
    pub direction: Direction,
}

impl StageVisit {
    fn new(stage: &str, direction: Direction) -> Self {
        Self {
            stage: stage.to_owned(),
            direction,
        }
    }
}

impl fmt::Display for StageVisit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.stage, self.direction)
    }
}

/// Outcome of a completed chain run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainReport {
    /// Correlation id of the request span.
    pub request_id: Uuid,
    /// Stage calls in the order they happened.
    pub visits: Vec<StageVisit>,
    /// Final state of every stage, in chain order.
    pub states: Vec<StageState>,
}

/// Ordered list of stages driven in, then out.
#[derive(Clone, Default)]
pub struct FilterChain {
    stages: Vec<Arc<dyn FilterStage>>,
}

impl FilterChain {
    /// Create an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the chain described by configuration.
    ///
    /// Stage names are resolved against the bootstrap stages and the
    /// `eager` table overrides each stage's default build policy.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnknownStage`] for an unrecognized name.
    pub fn from_config(section: &ChainSection, composer: &AssetComposer) -> FilterResult<Self> {
        let mut chain = Self::new();
        for name in &section.stages {
            let mut stage = bootstrap::stage_by_name(name, composer)?;
            if let Some(&eager) = section.eager.get(name) {
                stage = stage.eager(eager);
            }
            chain.push(stage);
        }
        Ok(chain)
    }

    /// Append a stage.
    #[must_use]
    pub fn with_stage(mut self, stage: impl FilterStage + 'static) -> Self {
        self.push(stage);
        self
    }

    /// Append a stage.
    pub fn push(&mut self, stage: impl FilterStage + 'static) {
        self.stages.push(Arc::new(stage));
    }

    /// Append an already shared stage.
    pub fn push_shared(&mut self, stage: Arc<dyn FilterStage>) {
        self.stages.push(stage);
    }

    /// Stage names in chain order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the chain has no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage's inbound phase front-to-back, then every outbound
    /// phase back-to-front, against one request's assets.
    ///
    /// After each inbound call the stage's guaranteed capability, if any, is
    /// checked. The first error stops the run.
    ///
    /// # Errors
    ///
    /// Returns the first stage error, or [`FilterError::ContractUnsatisfied`]
    /// when a stage leaves its capability unprovided.
    pub fn run(&self, assets: &mut AssetManager) -> FilterResult<ChainReport> {
        let ctx = RequestContext::new("filter_chain").with_operation("run");
        let _guard = ctx.enter();

        let mut states = vec![StageState::Unstarted; self.stages.len()];
        let mut visits = Vec::with_capacity(self.stages.len().saturating_mul(2));

        for (stage, state) in self.stages.iter().zip(states.iter_mut()) {
            debug!(stage = stage.name(), "Running inbound");
            stage.inbound(assets).inspect_err(|e| {
                warn!(stage = stage.name(), error = %e, "Inbound failed, aborting chain");
            })?;

            if let Some(capability) = stage.guarantees()
                && !assets.provides(capability)
            {
                return Err(FilterError::ContractUnsatisfied {
                    stage: stage.name().to_owned(),
                    capability: capability.clone(),
                });
            }

            *state = state.advance(stage.name(), StageState::InCompleted)?;
            visits.push(StageVisit::new(stage.name(), Direction::In));
        }

        for (stage, state) in self.stages.iter().zip(states.iter_mut()).rev() {
            debug!(stage = stage.name(), "Running outbound");
            stage.outbound(assets).inspect_err(|e| {
                warn!(stage = stage.name(), error = %e, "Outbound failed, aborting chain");
            })?;

            *state = state.advance(stage.name(), StageState::OutCompleted)?;
            visits.push(StageVisit::new(stage.name(), Direction::Out));
        }

        info!(
            request_id = %ctx.request_id(),
            stages = self.stages.len(),
            "Filter chain completed"
        );

        Ok(ChainReport {
            request_id: ctx.request_id(),
            visits,
            states,
        })
    }

    /// Run the chain on a fresh copy of `template` and return it.
    ///
    /// The template is left untouched, so one template can serve any number
    /// of requests.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub fn dispatch(&self, template: &AssetManager) -> FilterResult<(AssetManager, ChainReport)> {
        let mut assets = template.clone();
        let report = self.run(&mut assets)?;
        Ok((assets, report))
    }
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain")
            .field("stages", &self.stage_names())
            .finish()
    }
}
