//! The filter stage contract.

use proem_service::{AssetManager, CapabilityId};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FilterError, FilterResult};

/// One named unit of the two-phase pipeline.
///
/// Stages are built once when the chain is assembled and then called for
/// every request. They hold no per-request state: everything a stage reads
/// or writes goes through the asset manager it is handed.
///
/// The chain calls `inbound` on every stage front-to-back, then `outbound`
/// back-to-front. A stage may assume its own `inbound` has run, and that
/// every later stage has finished both phases, by the time its `outbound`
/// is called.
pub trait FilterStage: Send + Sync {
    /// Stage name, used in signal names.
    fn name(&self) -> &str;

    /// Capability this stage guarantees is provided once `inbound` returns.
    fn guarantees(&self) -> Option<&CapabilityId> {
        None
    }

    /// Called on the way into the chain.
    ///
    /// # Errors
    ///
    /// Any error aborts the chain for this request.
    fn inbound(&self, assets: &mut AssetManager) -> FilterResult<()>;

    /// Called on the way out of the chain.
    ///
    /// # Errors
    ///
    /// Any error aborts the chain for this request.
    fn outbound(&self, assets: &mut AssetManager) -> FilterResult<()>;
}

/// Progress of one stage within one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageState {
    /// Neither phase has run.
    #[default]
    Unstarted,
    /// `inbound` has completed.
    InCompleted,
    /// `outbound` has completed.
    OutCompleted,
}

impl StageState {
    /// Move to `to`, allowing only `Unstarted -> InCompleted -> OutCompleted`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidTransition`] for any other move.
    pub fn advance(self, stage: &str, to: Self) -> FilterResult<Self> {
        match (self, to) {
            (Self::Unstarted, Self::InCompleted) | (Self::InCompleted, Self::OutCompleted) => Ok(to),
            (from, to) => Err(FilterError::InvalidTransition {
                stage: stage.to_owned(),
                from,
                to,
            }),
        }
    }
}

impl fmt::Display for StageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unstarted => write!(f, "unstarted"),
            Self::InCompleted => write!(f, "in_completed"),
            Self::OutCompleted => write!(f, "out_completed"),
        }
    }
}
