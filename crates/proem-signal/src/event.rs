//! Signal events.

use chrono::{DateTime, Utc};
use proem_service::{Asset, AssetManager};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Diagnostic metadata attached to every event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique identifier for this event.
    pub event_id: Uuid,
    /// When the event was created.
    pub timestamp: DateTime<Utc>,
    /// Object that triggered the event (usually a stage name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Method that triggered the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl EventMetadata {
    /// Create fresh metadata with no target or method.
    #[must_use]
    pub fn new() -> Self {
        Self {
            event_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            target: None,
            method: None,
        }
    }
}

impl Default for EventMetadata {
    fn default() -> Self {
        Self::new()
    }
}

/// A payload entry.
#[derive(Debug, Clone)]
pub enum EventValue {
    /// An asset, typically an override offered by a listener.
    Asset(Asset),
    /// A plain JSON parameter.
    Json(serde_json::Value),
}

impl EventValue {
    /// The contained asset, if this entry is one.
    #[must_use]
    pub fn as_asset(&self) -> Option<&Asset> {
        match self {
            Self::Asset(asset) => Some(asset),
            Self::Json(_) => None,
        }
    }

    /// The contained JSON value, if this entry is one.
    #[must_use]
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Asset(_) => None,
        }
    }
}

impl From<Asset> for EventValue {
    fn from(asset: Asset) -> Self {
        Self::Asset(asset)
    }
}

impl From<serde_json::Value> for EventValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

/// A named signal with a mutable payload.
///
/// Built fresh for each trigger and discarded once the completion has run.
#[derive(Debug, Clone)]
pub struct Event {
    name: String,
    metadata: EventMetadata,
    payload: BTreeMap<String, EventValue>,
    assets: Option<AssetManager>,
}

impl Event {
    /// Create an event for the named signal.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: EventMetadata::new(),
            payload: BTreeMap::new(),
            assets: None,
        }
    }

    /// Record the originating object.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.metadata.target = Some(target.into());
        self
    }

    /// Record the originating method.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.metadata.method = Some(method.into());
        self
    }

    /// Add a JSON parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.set_param(key, value);
        self
    }

    /// Attach a snapshot of the registry the emitting stage is working on.
    ///
    /// Listeners can inspect it but changes never reach the stage.
    #[must_use]
    pub fn with_assets(mut self, assets: AssetManager) -> Self {
        self.assets = Some(assets);
        self
    }

    /// The signal name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Diagnostic metadata.
    #[must_use]
    pub fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }

    /// Registry snapshot taken when the event was emitted, if any.
    #[must_use]
    pub fn assets(&self) -> Option<&AssetManager> {
        self.assets.as_ref()
    }

    /// Attach an asset under `key`, replacing any previous entry.
    pub fn set_asset(&mut self, key: impl Into<String>, asset: Asset) {
        self.payload.insert(key.into(), EventValue::Asset(asset));
    }

    /// Attach a JSON parameter under `key`, replacing any previous entry.
    pub fn set_param(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.payload.insert(key.into(), EventValue::Json(value));
    }

    /// The entry under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&EventValue> {
        self.payload.get(key)
    }

    /// The asset under `key`. `None` if absent or not an asset.
    #[must_use]
    pub fn asset(&self, key: &str) -> Option<&Asset> {
        self.payload.get(key).and_then(EventValue::as_asset)
    }

    /// The JSON parameter under `key`. `None` if absent or not JSON.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&serde_json::Value> {
        self.payload.get(key).and_then(EventValue::as_json)
    }

    /// Whether anything is stored under `key`.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.payload.contains_key(key)
    }

    /// Remove and return the entry under `key`.
    pub fn remove(&mut self, key: &str) -> Option<EventValue> {
        self.payload.remove(key)
    }

    /// Payload keys, in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.payload.keys().map(String::as_str)
    }
}
