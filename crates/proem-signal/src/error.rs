//! Signal bus error types.

use proem_service::ServiceError;
use thiserror::Error;

/// Failure reported by a listener.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ListenerError {
    message: String,
}

impl ListenerError {
    /// Create a listener error with a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors that can occur while delivering a signal.
#[derive(Debug, Error)]
pub enum SignalError {
    /// A listener failed; later listeners and the completion did not run.
    #[error("listener {listener} failed on {signal}: {source}")]
    ListenerFailed {
        /// Signal being delivered.
        signal: String,
        /// Name of the failing listener.
        listener: String,
        /// The listener's failure.
        #[source]
        source: ListenerError,
    },

    /// The registered signal manager could not be retrieved.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Result type for signal operations.
pub type SignalResult<T> = Result<T, SignalError>;
