//! Capability identifiers.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Token naming a contract an asset may claim to satisfy.
///
/// Capability identifiers are compared by their string form. No structural
/// typing is implied: an asset satisfies a capability because it says so.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityId(Cow<'static, str>);

impl CapabilityId {
    /// The signal bus contract.
    pub const SIGNAL_MANAGER: Self = Self::from_static("SignalManager");
    /// The route manager contract.
    pub const ROUTE_MANAGER: Self = Self::from_static("RouteManager");
    /// The inbound request object contract.
    pub const REQUEST: Self = Self::from_static("Request");
    /// The outbound response object contract.
    pub const RESPONSE: Self = Self::from_static("Response");

    /// Create a capability identifier from a static string.
    #[must_use]
    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    /// Create a capability identifier from any string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for CapabilityId {
    fn from(id: &'static str) -> Self {
        Self::from_static(id)
    }
}

impl From<String> for CapabilityId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl AsRef<str> for CapabilityId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_and_owned_compare_equal() {
        assert_eq!(CapabilityId::new("RouteManager"), CapabilityId::ROUTE_MANAGER);
        assert_ne!(CapabilityId::REQUEST, CapabilityId::RESPONSE);
    }

    #[test]
    fn test_display() {
        assert_eq!(CapabilityId::SIGNAL_MANAGER.to_string(), "SignalManager");
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&CapabilityId::RESPONSE).unwrap();
        assert_eq!(json, "\"Response\"");

        let parsed: CapabilityId = serde_json::from_str("\"Custom\"").unwrap();
        assert_eq!(parsed, CapabilityId::new("Custom"));
    }
}
