//! Service container error types.

use thiserror::Error;

use crate::capability::CapabilityId;

/// Errors raised by the asset manager and the asset composer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No asset is registered under the requested name.
    #[error("asset not found: {name}")]
    NotFound {
        /// The name that was looked up.
        name: String,
    },

    /// The composer has no default binding for the capability.
    #[error("no default binding for capability {capability}")]
    Composition {
        /// The capability that could not be composed.
        capability: CapabilityId,
    },

    /// The asset was found but its built value is of another type.
    #[error("asset {name} does not hold a value of type {expected}")]
    TypeMismatch {
        /// Name of the asset (or capability, for capability lookups).
        name: String,
        /// Rust type name that was requested.
        expected: &'static str,
    },
}

impl ServiceError {
    /// Returns `true` for lookup failures on a missing name.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for service container operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
