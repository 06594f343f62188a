//! Phase-completion policy, system phases, and the win check.

use tracing::info;

use crate::command::{Command, CommandType};
use crate::effect::tick_statuses;
use crate::env::MatchEnv;
use crate::events::MatchEvent;
use crate::phase::PhaseChange;
use crate::state::{Phase, UnitId};
use crate::zone;

use super::{EngineError, MatchEngine};

impl MatchEngine<'_> {
    /// Decides whether an accepted command completes the current phase.
    pub(super) fn after_command(
        &mut self,
        env: &MatchEnv<'_>,
        command: &Command,
    ) -> Result<(), EngineError> {
        if self.check_victory() {
            return Ok(());
        }

        let phase = self.state.current_phase();
        let config = &self.state.config;
        let complete = match phase {
            Phase::MovementPhase => {
                self.state.phase.both_ended()
                    || self
                        .state
                        .movement
                        .is_batch_ready(config.total_move_threshold, config.moves_per_player)
            }
            _ if phase.aura_owner() == Some(command.player) => match command.command_type() {
                CommandType::EndPhase => true,
                CommandType::UseAbility => {
                    self.state.phase.aura_activations(command.player)
                        >= config.max_aura_activations_per_phase
                }
                _ => false,
            },
            _ => false,
        };

        if complete {
            self.advance(env)?;
        }
        Ok(())
    }

    /// Bookkeeping for every phase change: events and slot resets.
    pub(super) fn on_phase_entered(&mut self, change: PhaseChange) {
        let state = &mut *self.state;
        state.units.reset_phase_flags();
        state.events.push(MatchEvent::PhaseChanged {
            from: change.from,
            to: change.to,
        });
        if let Some(turn) = change.new_turn {
            state.units.reset_turn_flags();
            state.events.push(MatchEvent::TurnChanged { turn });
            info!(turn, "turn started");
        }
    }

    /// Runs system phases until a player phase (or game over) is reached.
    pub(super) fn settle(&mut self) -> Result<(), EngineError> {
        loop {
            if self.state.outcome.is_some() {
                return Ok(());
            }
            match self.state.current_phase() {
                Phase::Resolution => {
                    self.run_zone_pass()?;
                    if self.check_victory() {
                        return Ok(());
                    }
                }
                Phase::EndTurn => {
                    self.end_of_turn();
                    if self.check_victory() {
                        return Ok(());
                    }
                }
                Phase::Opening => {}
                _ => return Ok(()),
            }
            let change = self.state.phase.transition_to_next()?;
            self.on_phase_entered(change);
        }
    }

    /// Turn-end hook: status ticks, cooldowns, void spaces.
    fn end_of_turn(&mut self) {
        let living: Vec<UnitId> = self.state.units.living().map(|unit| unit.id).collect();
        for id in &living {
            tick_statuses(self.state, *id);
        }
        for unit in self.state.units.iter_mut().filter(|unit| unit.is_alive()) {
            unit.tick_cooldowns();
        }
        zone::tick_voids(self.state);
    }

    /// Ends the match once at most one team has living units.
    ///
    /// Only applies when both seats have fielded units, so a half-seeded
    /// match does not end on the spot.
    pub(super) fn check_victory(&mut self) -> bool {
        if self.state.outcome.is_some() {
            return true;
        }
        if self.state.units.teams().len() < 2 {
            return false;
        }
        let living = self.state.units.living_teams();
        if living.len() > 1 {
            return false;
        }

        let winner = living.into_iter().next();
        self.state.outcome = Some(winner);
        self.state.movement.discard_all();
        let change = self.state.phase.force_transition_to(Phase::GameOver);
        self.on_phase_entered(change);
        self.state.events.push(MatchEvent::MatchEnded { winner });
        info!(?winner, turn = self.state.turn_number(), "match ended");
        true
    }
}
