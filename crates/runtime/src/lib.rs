//! Runtime orchestration for a two-player tactics match.
//!
//! This crate wires together oracle access, the match session, and a worker
//! task into a cohesive runtime API. Hosts embed [`Runtime`] to seed a match,
//! submit commands, and subscribe to events through [`MatchHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, builder and configuration
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`session`] is the synchronous shell around the engine (wire decoding,
//!   queues, command log, checkpoints)
//! - [`oracle`] bundles the read-only content the engine consults
//! - [`logging`] installs the tracing subscriber
pub mod api;
pub mod events;
pub mod logging;
pub mod oracle;
pub mod runtime;
pub mod session;

mod workers;

pub use api::{MatchHandle, Result, RuntimeError};
pub use events::{Event, EventBus, Topic};
pub use logging::init_logging;
pub use oracle::OracleBundle;
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use session::{
    Checkpoint, CommandLog, InboundQueues, LogEntry, LogOutcome, MatchSession, Reply,
    state_digest,
};
