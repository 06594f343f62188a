//! Match orchestration.
//!
//! [`MatchEngine`] is the authoritative reducer for [`MatchState`]. Commands
//! are validated and executed here, the phase-completion policy decides when
//! to advance, and the system phases (resolution, turn end, opening) run
//! their batch passes under the transition lock.

mod errors;
mod flow;

pub use errors::EngineError;

use tracing::{debug, error};

use crate::command::{Command, CommandOutcome, CommandRejection};
use crate::env::{MatchEnv, ZoneTypeId};
use crate::error::GameError;
use crate::events::MatchEvent;
use crate::movement::MovementReport;
use crate::phase::PhaseChange;
use crate::snapshot::MatchSnapshot;
use crate::state::{GridPosition, MatchState, Phase, StateError, Unit, UnitId};
use crate::zone::{self, ZonePlacement, ZoneResolution};

/// Drives one match. Borrow it around a state for the length of a step.
pub struct MatchEngine<'a> {
    state: &'a mut MatchState,
}

impl<'a> MatchEngine<'a> {
    pub fn new(state: &'a mut MatchState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &MatchState {
        self.state
    }

    /// Adds a unit after checking its cell against the grid oracle.
    pub fn spawn_unit(&mut self, env: &MatchEnv<'_>, unit: Unit) -> Result<(), EngineError> {
        let grid = env.grid()?;
        if !grid.is_valid_position(unit.position) || !grid.is_walkable(unit.position, unit.id) {
            return Err(StateError::InvalidPosition(unit.position).into());
        }
        self.state.add_unit(unit)?;
        Ok(())
    }

    /// Leaves `Opening` for the first movement phase. No-op once started.
    pub fn start(&mut self, env: &MatchEnv<'_>) -> Result<Phase, EngineError> {
        if self.state.current_phase() == Phase::Opening {
            self.advance(env)?;
        }
        Ok(self.state.current_phase())
    }

    /// Read-only legality check against the live state.
    pub fn validate(&self, env: &MatchEnv<'_>, command: &Command) -> Result<(), CommandRejection> {
        command.validate(self.state, env)
    }

    /// Validates and executes `command`, then applies the phase-completion
    /// policy. A rejection leaves state untouched.
    pub fn submit(
        &mut self,
        env: &MatchEnv<'_>,
        command: &Command,
    ) -> Result<CommandOutcome, CommandRejection> {
        let result = match command.validate(self.state, env) {
            Ok(()) => command.execute(self.state, env),
            Err(rejection) => Err(rejection),
        };

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(rejection) => {
                if rejection.severity().is_internal() {
                    error!(command = %command.id, code = rejection.error_code(), %rejection, "command aborted");
                } else {
                    debug!(command = %command.id, code = rejection.error_code(), %rejection, "command rejected");
                }
                return Err(rejection);
            }
        };
        debug!(command = %command.id, player = %command.player, kind = %command.command_type(), "command accepted");

        if let Err(err) = self.after_command(env, command) {
            error!(command = %command.id, %err, "phase completion failed");
        }
        Ok(outcome)
    }

    /// Steps to the next phase and runs any system phases that follow.
    ///
    /// Leaving the movement phase resolves the pending batch first.
    pub fn advance(&mut self, env: &MatchEnv<'_>) -> Result<PhaseChange, EngineError> {
        if self.state.phase.allows_movement() && self.state.movement.pending_count() > 0 {
            self.run_movement_batch(env)?;
        }
        let change = self.state.phase.transition_to_next()?;
        self.on_phase_entered(change);
        self.settle()?;
        Ok(change)
    }

    /// Resolves every pending move in one batch and reports the outcome.
    pub fn run_movement_batch(&mut self, env: &MatchEnv<'_>) -> Result<MovementReport, EngineError> {
        let grid = env.grid().inspect_err(|err| {
            error!(%err, "movement batch aborted");
        })?;
        if !self.state.phase.try_lock() {
            return Err(EngineError::BatchInProgress);
        }

        let state = &mut *self.state;
        let report = state.movement.resolve(&mut state.units, &mut state.grid, grid);
        state.phase.unlock();

        for (unit, from, to) in &report.moved {
            state.events.push(MatchEvent::UnitMoved {
                unit: *unit,
                from: *from,
                to: *to,
            });
        }
        for (unit, destination, reason) in &report.rejected {
            state.events.push(MatchEvent::MoveRejected {
                unit: *unit,
                destination: *destination,
                reason: *reason,
            });
        }
        Ok(report)
    }

    /// Runs the zone pass for the current turn. `Ok(None)` when it already ran.
    pub fn run_zone_pass(&mut self) -> Result<Option<ZoneResolution>, EngineError> {
        if !self.state.phase.try_lock() {
            return Err(EngineError::BatchInProgress);
        }
        let resolution = zone::resolve_turn(self.state);
        self.state.phase.unlock();
        Ok(resolution)
    }

    /// Jumps to `phase` unconditionally, discarding unresolved pending moves.
    ///
    /// Landing on a system phase runs it and every system phase after it, so
    /// the match always rests in a player phase or `GameOver`. Returns the
    /// forced change itself.
    pub fn force_transition_to(&mut self, phase: Phase) -> PhaseChange {
        let dropped = self.state.movement.discard_all();
        if dropped > 0 {
            debug!(dropped, "pending moves discarded by forced transition");
        }
        let change = self.state.phase.force_transition_to(phase);
        self.on_phase_entered(change);
        if let Err(err) = self.settle() {
            error!(%err, phase = %phase, "system phases after forced transition failed");
        }
        change
    }

    /// Places a zone directly (scenario hazards, scripted effects).
    pub fn place_zone(
        &mut self,
        env: &MatchEnv<'_>,
        zone_type: ZoneTypeId,
        position: GridPosition,
        owner: UnitId,
    ) -> Result<ZonePlacement, EngineError> {
        let spec = env.zone_type(zone_type)?;
        if !env.grid()?.is_valid_position(position) {
            return Err(StateError::InvalidPosition(position).into());
        }
        Ok(zone::create_zone(self.state, spec, position, owner, 1))
    }

    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        self.state.events.drain()
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot::capture(self.state)
    }
}
