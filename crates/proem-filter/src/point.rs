//! Hook points and signal naming.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a signal fires before or after a stage's own work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Before the stage's work.
    Pre,
    /// After the stage's work.
    Post,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pre => write!(f, "pre"),
            Self::Post => write!(f, "post"),
        }
    }
}

/// Which half of the chain a call belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Front-to-back pass.
    In,
    /// Back-to-front pass.
    Out,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In => write!(f, "in"),
            Self::Out => write!(f, "out"),
        }
    }
}

/// One of the four signal points around a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPoint {
    /// Before inbound work.
    PreIn,
    /// After inbound work.
    PostIn,
    /// Before outbound work.
    PreOut,
    /// After outbound work.
    PostOut,
}

impl HookPoint {
    /// All hook points, in firing order for one stage.
    pub const ALL: [Self; 4] = [Self::PreIn, Self::PostIn, Self::PreOut, Self::PostOut];

    /// The phase component.
    #[must_use]
    pub fn phase(self) -> Phase {
        match self {
            Self::PreIn | Self::PreOut => Phase::Pre,
            Self::PostIn | Self::PostOut => Phase::Post,
        }
    }

    /// The direction component.
    #[must_use]
    pub fn direction(self) -> Direction {
        match self {
            Self::PreIn | Self::PostIn => Direction::In,
            Self::PreOut | Self::PostOut => Direction::Out,
        }
    }

    /// Signal name for a stage: `{phase}.{direction}.{stage}`.
    #[must_use]
    pub fn signal_name(self, stage: &str) -> String {
        format!("{self}.{stage}")
    }

    /// Method name recorded on the event for diagnostics.
    #[must_use]
    pub fn method_name(self) -> &'static str {
        match self {
            Self::PreIn => "pre_in",
            Self::PostIn => "post_in",
            Self::PreOut => "pre_out",
            Self::PostOut => "post_out",
        }
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.phase(), self.direction())
    }
}
