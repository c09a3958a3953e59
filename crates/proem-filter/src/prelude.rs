//! Prelude module - commonly used types for convenient import.
//!
//! Use `use proem_filter::prelude::*;` to import all essential types.

pub use crate::bootstrap;
pub use crate::{
    AssetStage, ChainReport, Direction, FilterChain, FilterError, FilterResult, FilterStage,
    HookPoint, Phase, StageState, StageVisit, accept_override, emit_hook,
};
