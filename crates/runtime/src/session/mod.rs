//! Host-side match session.
//!
//! [`MatchSession`] owns the authoritative [`MatchState`] and the shared
//! oracles. It is the imperative shell around [`MatchEngine`]: it decodes
//! inbound wire maps, re-validates every command against the live state,
//! records the outcome, and packages drained events into a [`Reply`].
//! The session is synchronous; [`crate::workers::MatchWorker`] runs it on a
//! tokio task.

mod checkpoint;
mod log;
mod queue;
mod reply;

pub use checkpoint::{Checkpoint, state_digest};
pub use log::{CommandLog, LogEntry, LogOutcome};
pub use queue::InboundQueues;
pub use reply::Reply;

use tactics_core::{
    Command, GameError, MatchEngine, MatchEvent, MatchSnapshot, MatchState, Phase, Unit, WireMap,
};
use tracing::{debug, info, warn};

use crate::api::Result;
use crate::oracle::OracleBundle;

pub struct MatchSession {
    state: MatchState,
    oracles: OracleBundle,
    queues: InboundQueues,
    log: CommandLog,
}

impl MatchSession {
    pub fn new(state: MatchState, oracles: OracleBundle) -> Self {
        Self::with_log(state, oracles, CommandLog::new(true))
    }

    pub fn with_log(state: MatchState, oracles: OracleBundle, log: CommandLog) -> Self {
        Self {
            state,
            oracles,
            queues: InboundQueues::new(),
            log,
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn oracles(&self) -> &OracleBundle {
        &self.oracles
    }

    pub fn log(&self) -> &CommandLog {
        &self.log
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot::capture(&self.state)
    }

    /// Seeds a unit before (or between) steps.
    pub fn spawn_unit(&mut self, unit: Unit) -> Result<()> {
        let env = self.oracles.as_match_env();
        MatchEngine::new(&mut self.state).spawn_unit(&env, unit)?;
        Ok(())
    }

    /// Leaves `Opening` for the first movement phase and returns the events.
    pub fn start(&mut self) -> Result<Vec<MatchEvent>> {
        let env = self.oracles.as_match_env();
        let mut engine = MatchEngine::new(&mut self.state);
        let phase = engine.start(&env)?;
        info!(%phase, units = engine.state().units.len(), "match started");
        Ok(engine.drain_events())
    }

    /// Processes one command against the live state.
    pub fn handle(&mut self, command: &Command) -> Reply {
        let env = self.oracles.as_match_env();
        let turn = self.state.turn_number();
        let phase = self.state.current_phase();
        let mut engine = MatchEngine::new(&mut self.state);

        match engine.submit(&env, command) {
            Ok(outcome) => {
                let events = engine.drain_events();
                let snapshot = engine.snapshot();
                self.log.record_accepted(turn, phase, command, outcome);
                Reply::Accepted {
                    command_id: command.id,
                    events,
                    snapshot,
                }
            }
            Err(rejection) => {
                self.log.record_rejected(turn, phase, command, &rejection);
                Reply::rejected(Some(command.id.to_string()), &rejection)
            }
        }
    }

    /// Decodes a flat wire map and processes it.
    pub fn handle_wire(&mut self, wire: &WireMap) -> Reply {
        match Command::from_wire(wire) {
            Ok(command) => self.handle(&command),
            Err(err) => {
                warn!(code = err.error_code(), %err, "undecodable command");
                Reply::rejected(Command::wire_id(wire).map(str::to_owned), &err)
            }
        }
    }

    /// Queues a command for [`Self::drain_queues`].
    pub fn enqueue(&mut self, command: Command) {
        self.queues.push(command);
    }

    pub fn queued(&self) -> usize {
        self.queues.len()
    }

    /// Processes every queued command, alternating between players.
    pub fn drain_queues(&mut self) -> Vec<Reply> {
        let mut replies = Vec::with_capacity(self.queues.len());
        while let Some(command) = self.queues.pop() {
            replies.push(self.handle(&command));
        }
        replies
    }

    /// Administrative jump to `phase`. Queued commands are dropped with the
    /// pending moves.
    pub fn force_phase(&mut self, phase: Phase) -> Vec<MatchEvent> {
        let dropped = self.queues.len();
        self.queues.clear();
        let mut engine = MatchEngine::new(&mut self.state);
        engine.force_transition_to(phase);
        if dropped > 0 {
            debug!(dropped, "queued commands discarded by forced transition");
        }
        engine.drain_events()
    }

    /// Replaces the whole state, e.g. after a desync with the authority.
    pub fn replace_state(&mut self, state: MatchState) {
        warn!(
            from_turn = self.state.turn_number(),
            to_turn = state.turn_number(),
            "match state replaced"
        );
        self.queues.clear();
        self.state = state;
    }

    pub fn checkpoint(&self) -> Result<Checkpoint> {
        let checkpoint = Checkpoint::capture(&self.state)?;
        debug!(turn = checkpoint.turn, digest = %checkpoint.digest, "checkpoint captured");
        Ok(checkpoint)
    }

    pub fn restore(&mut self, checkpoint: &Checkpoint) -> Result<()> {
        let state = checkpoint.restore()?;
        self.replace_state(state);
        Ok(())
    }

    pub fn digest(&self) -> Result<String> {
        state_digest(&self.state)
    }
}
