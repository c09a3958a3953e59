//! Stage and listener doubles.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use proem_filter::{FilterError, FilterResult, FilterStage};
use proem_service::{Asset, AssetManager, CapabilityId, ServiceError};
use proem_signal::{Event, ListenerError, SignalListener};
use tracing::debug;

/// Shared, ordered record of calls.
///
/// Uses `std::sync::Mutex` so it can be cloned into listeners and stages.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn record(&self, entry: impl Into<String>) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push(entry.into());
        }
    }

    /// Snapshot of all entries in order.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all entries.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.clear();
        }
    }
}

/// A stage that records `{name}.in` and `{name}.out` and can be told to fail.
#[derive(Debug, Clone)]
pub struct RecordingStage {
    name: String,
    log: CallLog,
    fail_inbound: bool,
    fail_outbound: bool,
    installs: Option<(String, CapabilityId)>,
}

impl RecordingStage {
    /// Create a stage recording into `log`.
    #[must_use]
    pub fn new(name: impl Into<String>, log: &CallLog) -> Self {
        Self {
            name: name.into(),
            log: log.clone(),
            fail_inbound: false,
            fail_outbound: false,
            installs: None,
        }
    }

    /// Fail the inbound phase after recording it.
    #[must_use]
    pub fn failing_inbound(mut self) -> Self {
        self.fail_inbound = true;
        self
    }

    /// Fail the outbound phase after recording it.
    #[must_use]
    pub fn failing_outbound(mut self) -> Self {
        self.fail_outbound = true;
        self
    }

    /// Install an asset providing `capability` under `name` on inbound and
    /// guarantee the capability.
    #[must_use]
    pub fn installing(mut self, name: impl Into<String>, capability: CapabilityId) -> Self {
        self.installs = Some((name.into(), capability));
        self
    }

    /// The stage fails as if an asset it depends on were missing.
    fn failure(&self, direction: &str) -> FilterError {
        let name = format!("{}.{direction}.required", self.name);
        debug!(stage = %self.name, missing = %name, "Recording stage failing");
        FilterError::Service(ServiceError::NotFound { name })
    }
}

impl FilterStage for RecordingStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn guarantees(&self) -> Option<&CapabilityId> {
        self.installs.as_ref().map(|(_, capability)| capability)
    }

    fn inbound(&self, assets: &mut AssetManager) -> FilterResult<()> {
        self.log.record(format!("{}.in", self.name));
        if self.fail_inbound {
            return Err(self.failure("in"));
        }
        if let Some((name, capability)) = &self.installs {
            let owner = self.name.clone();
            assets.set(name.as_str(), Asset::new(capability.clone(), move || owner.clone()));
        }
        Ok(())
    }

    fn outbound(&self, _assets: &mut AssetManager) -> FilterResult<()> {
        self.log.record(format!("{}.out", self.name));
        if self.fail_outbound {
            return Err(self.failure("out"));
        }
        Ok(())
    }
}

/// A listener that records `{tag}:{signal}` for every signal it sees.
#[derive(Debug, Clone)]
pub struct RecordingListener {
    tag: String,
    log: CallLog,
}

impl RecordingListener {
    /// Create a listener recording into `log`.
    #[must_use]
    pub fn new(tag: impl Into<String>, log: &CallLog) -> Self {
        Self {
            tag: tag.into(),
            log: log.clone(),
        }
    }
}

impl SignalListener for RecordingListener {
    fn name(&self) -> &str {
        &self.tag
    }

    fn on_signal(&self, event: &mut Event) -> Result<(), ListenerError> {
        self.log.record(format!("{}:{}", self.tag, event.name()));
        Ok(())
    }
}

/// A listener that attaches a fixed asset under a payload key.
#[derive(Debug, Clone)]
pub struct OverrideListener {
    key: String,
    asset: Asset,
}

impl OverrideListener {
    /// Offer `asset` under `key`.
    #[must_use]
    pub fn new(key: impl Into<String>, asset: Asset) -> Self {
        Self {
            key: key.into(),
            asset,
        }
    }

    /// The offered asset.
    #[must_use]
    pub fn asset(&self) -> &Asset {
        &self.asset
    }
}

impl SignalListener for OverrideListener {
    fn name(&self) -> &str {
        "override"
    }

    fn on_signal(&self, event: &mut Event) -> Result<(), ListenerError> {
        event.set_asset(self.key.clone(), self.asset.clone());
        Ok(())
    }
}

/// A listener that always fails.
#[derive(Debug, Clone)]
pub struct FailingListener {
    message: String,
}

impl FailingListener {
    /// Fail with `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl SignalListener for FailingListener {
    fn name(&self) -> &str {
        "failing"
    }

    fn on_signal(&self, _event: &mut Event) -> Result<(), ListenerError> {
        Err(ListenerError::new(self.message.clone()))
    }
}

/// Counts how many times default constructors ran.
#[derive(Debug, Clone, Default)]
pub struct BuildCounter {
    count: Arc<AtomicUsize>,
}

impl BuildCounter {
    /// Create a counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one build.
    pub fn hit(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    /// Builds so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}
