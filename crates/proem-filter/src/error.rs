//! Filter chain error types.

use proem_service::{CapabilityId, ServiceError};
use proem_signal::SignalError;
use thiserror::Error;

use crate::stage::StageState;

/// Errors that abort a filter chain run.
#[derive(Debug, Error)]
pub enum FilterError {
    /// Asset lookup or default composition failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A listener failed while a stage was signalling.
    #[error(transparent)]
    Signal(#[from] SignalError),

    /// A stage was driven out of order.
    #[error("stage {stage} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Stage name.
        stage: String,
        /// State the stage was in.
        from: StageState,
        /// State that was requested.
        to: StageState,
    },

    /// A stage finished its inbound phase without installing the capability
    /// it guarantees.
    #[error("stage {stage} did not install capability {capability}")]
    ContractUnsatisfied {
        /// Stage name.
        stage: String,
        /// The missing capability.
        capability: CapabilityId,
    },

    /// A configured stage name has no implementation.
    #[error("unknown filter stage: {0}")]
    UnknownStage(String),
}

impl FilterError {
    /// Whether the error came from a missing default binding.
    #[must_use]
    pub fn is_composition(&self) -> bool {
        matches!(self, Self::Service(ServiceError::Composition { .. }))
    }
}

/// Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;
