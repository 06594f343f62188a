//! Topic-based event bus for match events.
//!
//! Events drained from the engine are published to specific topics, and
//! consumers subscribe only to the topics they need.

mod bus;

pub use bus::{Event, EventBus, Topic};
