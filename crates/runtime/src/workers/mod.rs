//! Worker tasks that back the runtime orchestration.
//!
//! The match worker owns the session and executes commands received over
//! its channel, publishing drained events to the bus.

mod simulation;

pub use simulation::{MatchWorker, Request};
