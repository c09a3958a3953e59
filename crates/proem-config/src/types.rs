//! Configuration types.
//!
//! Every struct implements [`Default`] with the same values as the embedded
//! `defaults.toml`, so a bare `[section]` header produces a working
//! configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
    /// Filter chain composition.
    pub chain: ChainSection,
    /// Signal bus installation.
    pub signals: SignalsSection,
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging and tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, `"json"`, or `"full"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["proem_signal=trace"]`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// ChainSection
// ---------------------------------------------------------------------------

/// Which stages run, in order, and how their defaults are built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainSection {
    /// Stage names, front-to-back.
    pub stages: Vec<String>,
    /// Per-stage override of the eager build policy for default assets.
    /// Stages not listed keep their built-in policy.
    pub eager: HashMap<String, bool>,
}

impl Default for ChainSection {
    fn default() -> Self {
        Self {
            stages: vec![
                "response".to_owned(),
                "request".to_owned(),
                "route".to_owned(),
            ],
            eager: HashMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// SignalsSection
// ---------------------------------------------------------------------------

/// Signal bus settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalsSection {
    /// Install a signal bus in each request's asset manager. When `false`,
    /// stages run without emitting any signals.
    pub enabled: bool,
}

impl Default for SignalsSection {
    fn default() -> Self {
        Self { enabled: true }
    }
}
