//! High-level runtime orchestrator.
//!
//! The runtime owns the match worker, wires up request/event channels, and
//! exposes a builder-based API for hosts to seed and drive a match.

use std::env;

use tokio::task::JoinHandle;

use tactics_core::{MatchConfig, MatchState, Unit};

use crate::api::{MatchHandle, Result, RuntimeError};
use crate::events::EventBus;
use crate::oracle::OracleBundle;
use crate::session::{CommandLog, MatchSession};
use crate::workers::{MatchWorker, Request};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub match_config: MatchConfig,
    /// Capacity of each event topic channel.
    pub event_buffer_size: usize,
    /// Capacity of the worker request channel.
    pub command_buffer_size: usize,
    /// Keep an in-memory log of processed commands (default: true)
    pub enable_command_log: bool,
    /// Most recent commands the log retains.
    pub command_log_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            match_config: MatchConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            enable_command_log: true,
            command_log_capacity: CommandLog::DEFAULT_CAPACITY,
        }
    }
}

impl RuntimeConfig {
    /// Construct runtime configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TACTICS_COMMAND_BUFFER` - request channel capacity (default: 32)
    /// - `TACTICS_EVENT_BUFFER` - per-topic event capacity (default: 100)
    /// - `TACTICS_COMMAND_LOG` - `true`/`false` (default: true)
    /// - `TACTICS_COMMAND_LOG_CAPACITY` - entries the log retains (default: 4096)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(size) = read_env::<usize>("TACTICS_COMMAND_BUFFER") {
            config.command_buffer_size = size.max(1);
        }
        if let Some(size) = read_env::<usize>("TACTICS_EVENT_BUFFER") {
            config.event_buffer_size = size.max(1);
        }
        if let Some(enabled) = read_env::<bool>("TACTICS_COMMAND_LOG") {
            config.enable_command_log = enabled;
        }
        if let Some(capacity) = read_env::<usize>("TACTICS_COMMAND_LOG_CAPACITY") {
            config.command_log_capacity = capacity.max(1);
        }

        config
    }

    pub fn with_match_config(mut self, match_config: MatchConfig) -> Self {
        self.match_config = match_config;
        self
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

/// Main runtime that hosts one match
///
/// [`MatchHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: MatchHandle,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> MatchHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker stops once every handle clone has been dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<MatchState>,
    oracles: Option<OracleBundle>,
    units: Vec<Unit>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            oracles: None,
            units: Vec::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Resume from an existing state instead of a fresh match.
    pub fn initial_state(mut self, state: MatchState) -> Self {
        self.state = Some(state);
        self
    }

    /// Set required oracles
    pub fn oracles(mut self, oracles: OracleBundle) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Add a unit to seed before the match starts.
    pub fn unit(mut self, unit: Unit) -> Self {
        self.units.push(unit);
        self
    }

    pub fn units(mut self, units: impl IntoIterator<Item = Unit>) -> Self {
        self.units.extend(units);
        self
    }

    /// Seed units, start the match, and spawn the worker.
    pub async fn build(self) -> Result<Runtime> {
        let oracles = self.oracles.ok_or(RuntimeError::MissingOracles)?;
        let state = self
            .state
            .unwrap_or_else(|| MatchState::new(self.config.match_config.clone()));

        let log = CommandLog::with_capacity(
            self.config.enable_command_log,
            self.config.command_log_capacity,
        );
        let mut session = MatchSession::with_log(state, oracles, log);
        for unit in self.units {
            session.spawn_unit(unit)?;
        }

        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let (turn, phase) = (session.state().turn_number(), session.state().current_phase());
        let opening = session.start()?;
        event_bus.publish_all(turn, phase, opening);

        let (request_tx, request_rx) = tokio::sync::mpsc::channel::<Request>(self.config.command_buffer_size);
        let handle = MatchHandle::new(request_tx, event_bus.clone());

        let worker = MatchWorker::new(session, request_rx, event_bus);
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            handle,
            worker_handle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_buffers() {
        let config = RuntimeConfig::default();
        assert_eq!(config.command_buffer_size, 32);
        assert_eq!(config.event_buffer_size, 100);
        assert!(config.enable_command_log);
        assert_eq!(config.command_log_capacity, CommandLog::DEFAULT_CAPACITY);
    }

    #[tokio::test]
    async fn build_without_oracles_fails() {
        let result = Runtime::builder().build().await;
        assert!(matches!(result, Err(RuntimeError::MissingOracles)));
    }
}
