//! Request correlation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::Span;
use tracing::span::EnteredSpan;
use uuid::Uuid;

/// Identity of one unit of work, carried into a `tracing` span so every
/// event logged while it is entered can be correlated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Unique id of this request.
    pub request_id: Uuid,
    /// Request this one was spawned from, if any.
    pub parent_id: Option<Uuid>,
    /// Component handling the request.
    pub component: String,
    /// Operation within the component.
    pub operation: Option<String>,
    /// When the context was created.
    pub started_at: DateTime<Utc>,
}

impl RequestContext {
    /// Create a context with a fresh request id.
    #[must_use]
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            parent_id: None,
            component: component.into(),
            operation: None,
            started_at: Utc::now(),
        }
    }

    /// Name the operation.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Create a context for work spawned from this one.
    #[must_use]
    pub fn child(&self, component: impl Into<String>) -> Self {
        Self {
            parent_id: Some(self.request_id),
            ..Self::new(component)
        }
    }

    /// The request id.
    #[must_use]
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Milliseconds since the context was created.
    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        Utc::now()
            .signed_duration_since(self.started_at)
            .num_milliseconds()
    }

    /// A span carrying this context's fields.
    #[must_use]
    pub fn span(&self) -> Span {
        tracing::info_span!(
            "request",
            request_id = %self.request_id,
            parent_id = ?self.parent_id,
            component = %self.component,
            operation = self.operation.as_deref(),
        )
    }

    /// Enter a new span for this context until the guard is dropped.
    #[must_use]
    pub fn enter(&self) -> RequestGuard {
        RequestGuard {
            _entered: self.span().entered(),
        }
    }
}

/// Keeps a request span entered. Exits it on drop.
#[derive(Debug)]
pub struct RequestGuard {
    _entered: EnteredSpan,
}
