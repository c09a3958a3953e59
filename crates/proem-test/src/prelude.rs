//! Prelude module - commonly used test utilities.

pub use crate::fixtures::{
    StubRequest, StubResponse, StubRouteManager, init_test_tracing, test_assets_with_bus,
    test_bindings, test_composer,
};
pub use crate::mocks::{
    BuildCounter, CallLog, FailingListener, OverrideListener, RecordingListener, RecordingStage,
};
