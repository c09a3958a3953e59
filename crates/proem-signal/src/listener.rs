//! Listener registration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

use crate::error::ListenerError;
use crate::event::Event;

/// Handler invoked synchronously for each matching signal.
pub trait SignalListener: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &str {
        "anonymous"
    }

    /// Handle a signal. The event may be mutated freely.
    ///
    /// # Errors
    ///
    /// A returned error aborts delivery of this signal.
    fn on_signal(&self, event: &mut Event) -> Result<(), ListenerError>;
}

/// Listener backed by a closure.
pub struct FnListener<F> {
    name: String,
    handler: F,
}

impl<F> FnListener<F>
where
    F: Fn(&mut Event) -> Result<(), ListenerError> + Send + Sync,
{
    /// Create a named closure listener.
    pub fn new(name: impl Into<String>, handler: F) -> Self {
        Self {
            name: name.into(),
            handler,
        }
    }
}

impl<F> SignalListener for FnListener<F>
where
    F: Fn(&mut Event) -> Result<(), ListenerError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn on_signal(&self, event: &mut Event) -> Result<(), ListenerError> {
        (self.handler)(event)
    }
}

impl<F> fmt::Debug for FnListener<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnListener")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Which signals a listener receives.
///
/// Parsed from a string: `*` matches everything, a trailing `*` matches by
/// prefix (`pre.in.*`), anything else must match exactly. Wildcards in the
/// middle of a pattern are treated literally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SignalPattern {
    /// Every signal.
    Any,
    /// Signals whose name starts with the prefix.
    Prefix(String),
    /// One signal name.
    Exact(String),
}

impl SignalPattern {
    /// Check a signal name against this pattern.
    #[must_use]
    pub fn matches(&self, signal: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Prefix(prefix) => signal.starts_with(prefix.as_str()),
            Self::Exact(name) => signal == name,
        }
    }
}

impl From<&str> for SignalPattern {
    fn from(pattern: &str) -> Self {
        if pattern == "*" {
            Self::Any
        } else if let Some(prefix) = pattern.strip_suffix('*') {
            Self::Prefix(prefix.to_owned())
        } else {
            Self::Exact(pattern.to_owned())
        }
    }
}

impl From<String> for SignalPattern {
    fn from(pattern: String) -> Self {
        Self::from(pattern.as_str())
    }
}

impl From<SignalPattern> for String {
    fn from(pattern: SignalPattern) -> Self {
        pattern.to_string()
    }
}

impl fmt::Display for SignalPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "*"),
            Self::Prefix(prefix) => write!(f, "{prefix}*"),
            Self::Exact(name) => write!(f, "{name}"),
        }
    }
}

/// Handle returned by registration, used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

struct Entry {
    id: ListenerId,
    pattern: SignalPattern,
    listener: Arc<dyn SignalListener>,
}

/// Ordered list of listeners shared by every clone of a bus.
///
/// Registration is expected at startup. Dispatch reads a snapshot, so a
/// listener may register or unregister from inside `on_signal` without
/// deadlocking.
pub struct ListenerRegistry {
    entries: RwLock<Vec<Entry>>,
    next_id: AtomicU64,
}

impl ListenerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Register a listener. Delivery follows registration order.
    pub fn register(
        &self,
        pattern: impl Into<SignalPattern>,
        listener: Arc<dyn SignalListener>,
    ) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let pattern = pattern.into();
        debug!(listener = listener.name(), pattern = %pattern, "Registering listener");

        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Entry {
                id,
                pattern,
                listener,
            });
        id
    }

    /// Remove a listener. Returns `false` if the id was unknown.
    pub fn unregister(&self, id: ListenerId) -> bool {
        // Drop the removed listener after releasing the lock: its destructor
        // may itself touch the registry.
        let removed = {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            entries
                .iter()
                .position(|entry| entry.id == id)
                .map(|index| entries.remove(index))
        };
        removed.is_some()
    }

    /// Listeners matching `signal`, in registration order.
    #[must_use]
    pub fn matching(&self, signal: &str) -> Vec<Arc<dyn SignalListener>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|entry| entry.pattern.matches(signal))
            .map(|entry| Arc::clone(&entry.listener))
            .collect()
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no listeners are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every listener.
    pub fn clear(&self) {
        let drained: Vec<Entry> = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        drop(drained);
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(name: &str) -> Arc<dyn SignalListener> {
        Arc::new(FnListener::new(name, |_event: &mut Event| Ok(())))
    }

    #[test]
    fn test_pattern_parsing() {
        assert_eq!(SignalPattern::from("*"), SignalPattern::Any);
        assert_eq!(
            SignalPattern::from("pre.in.*"),
            SignalPattern::Prefix("pre.in.".to_owned())
        );
        assert_eq!(
            SignalPattern::from("post.out.route"),
            SignalPattern::Exact("post.out.route".to_owned())
        );
    }

    #[test]
    fn test_pattern_matching() {
        assert!(SignalPattern::Any.matches("anything"));
        assert!(SignalPattern::from("pre.in.*").matches("pre.in.route"));
        assert!(!SignalPattern::from("pre.in.*").matches("post.in.route"));
        assert!(SignalPattern::from("pre.in.route").matches("pre.in.route"));
        assert!(!SignalPattern::from("pre.in.route").matches("pre.in.routes"));
        // Middle wildcards are literal.
        assert!(!SignalPattern::from("pre.*.route").matches("pre.in.route"));
    }

    #[test]
    fn test_pattern_display_round_trips_through_serde() {
        let json = serde_json::to_string(&SignalPattern::from("pre.*")).unwrap();
        assert_eq!(json, "\"pre.*\"");
        let parsed: SignalPattern = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, SignalPattern::Prefix("pre.".to_owned()));
    }

    #[test]
    fn test_matching_preserves_registration_order() {
        let registry = ListenerRegistry::new();
        registry.register("pre.in.route", noop("exact"));
        registry.register("*", noop("any"));
        registry.register("post.*", noop("post"));
        registry.register("pre.*", noop("prefix"));

        let names: Vec<String> = registry
            .matching("pre.in.route")
            .iter()
            .map(|l| l.name().to_owned())
            .collect();
        assert_eq!(names, vec!["exact", "any", "prefix"]);
    }

    #[test]
    fn test_unregister() {
        let registry = ListenerRegistry::new();
        let id = registry.register("*", noop("a"));
        registry.register("*", noop("b"));

        assert!(registry.unregister(id));
        assert!(!registry.unregister(id));
        assert_eq!(registry.len(), 1);

        registry.clear();
        assert!(registry.is_empty());
    }
}
