//! Prelude module - commonly used types for convenient import.
//!
//! Use `use proem_signal::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust
//! use proem_signal::prelude::*;
//!
//! let bus = SignalBus::new();
//! bus.on("post.out.*", |_event| Ok(()));
//!
//! let event = bus.emit(Event::new("post.out.response")).unwrap();
//! assert_eq!(event.name(), "post.out.response");
//! ```

// Signal bus
pub use crate::{EVENT_MANAGER, SignalBus};

// Events
pub use crate::{Event, EventMetadata, EventValue};

// Listener system
pub use crate::{FnListener, ListenerId, ListenerRegistry, SignalListener, SignalPattern};

// Errors
pub use crate::{ListenerError, SignalError, SignalResult};
