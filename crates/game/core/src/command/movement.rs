use tracing::debug;

use crate::env::MatchEnv;
use crate::events::MatchEvent;
use crate::movement::PendingMove;
use crate::state::{GridPosition, MatchState, PlayerId, UnitId};

use super::validation::{acting_unit, ensure_destination, ensure_phase, ensure_slot_free};
use super::{CommandOutcome, CommandRejection, CommandTransition, CommandType};

/// Queue a destination for the movement batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveCommand {
    pub unit: UnitId,
    pub destination: GridPosition,
}

impl CommandTransition for MoveCommand {
    fn command_type(&self) -> CommandType {
        CommandType::Move
    }

    fn validate(
        &self,
        player: PlayerId,
        state: &MatchState,
        env: &MatchEnv<'_>,
    ) -> Result<(), CommandRejection> {
        let unit = acting_unit(state, player, self.unit)?;
        ensure_phase(state, player, CommandType::Move)?;
        ensure_slot_free(unit)?;
        if unit.has_moved_this_turn || state.movement.has_pending(unit.id) {
            return Err(CommandRejection::ActionSlotUsed(unit.id));
        }

        if unit.is_rooted() {
            return Err(CommandRejection::Rooted(unit.id));
        }
        ensure_destination(state, env, unit, self.destination, unit.movement_range)
    }

    fn execute(
        &self,
        player: PlayerId,
        state: &mut MatchState,
        env: &MatchEnv<'_>,
    ) -> Result<CommandOutcome, CommandRejection> {
        let grid = env.grid()?;
        let unit = state
            .units
            .get_mut(self.unit)
            .ok_or(CommandRejection::UnitNotFound(self.unit))?;

        let request = PendingMove {
            player,
            origin: unit.position,
            destination: self.destination,
            reachable: grid.reachable_positions(unit.position, unit.movement_range),
        };
        state
            .movement
            .register(self.unit, request)
            .map_err(|_| CommandRejection::ActionSlotUsed(self.unit))?;
        unit.has_acted_this_phase = true;

        debug!(unit = %self.unit, destination = %self.destination, "move queued");
        Ok(CommandOutcome::MoveQueued {
            unit: self.unit,
            destination: self.destination,
        })
    }
}

/// Immediate short-range relocation during the owner's aura sub-phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RepositionCommand {
    pub unit: UnitId,
    pub destination: GridPosition,
}

impl CommandTransition for RepositionCommand {
    fn command_type(&self) -> CommandType {
        CommandType::Reposition
    }

    fn validate(
        &self,
        player: PlayerId,
        state: &MatchState,
        env: &MatchEnv<'_>,
    ) -> Result<(), CommandRejection> {
        let unit = acting_unit(state, player, self.unit)?;
        ensure_phase(state, player, CommandType::Reposition)?;
        ensure_slot_free(unit)?;

        if unit.is_rooted() {
            return Err(CommandRejection::Rooted(unit.id));
        }
        ensure_destination(state, env, unit, self.destination, state.config.reposition_range)
    }

    fn execute(
        &self,
        _player: PlayerId,
        state: &mut MatchState,
        _env: &MatchEnv<'_>,
    ) -> Result<CommandOutcome, CommandRejection> {
        let unit = state
            .units
            .get_mut(self.unit)
            .ok_or(CommandRejection::UnitNotFound(self.unit))?;
        let from = unit.position;

        if !state.grid.relocate(self.unit, from, self.destination) {
            let occupant = state.grid.occupant(self.destination).unwrap_or(self.unit);
            return Err(CommandRejection::Occupied {
                destination: self.destination,
                occupant,
            });
        }
        unit.position = self.destination;
        unit.has_acted_this_phase = true;

        state.events.push(MatchEvent::UnitMoved {
            unit: self.unit,
            from,
            to: self.destination,
        });
        debug!(unit = %self.unit, %from, to = %self.destination, "unit repositioned");
        Ok(CommandOutcome::Repositioned {
            unit: self.unit,
            from,
            to: self.destination,
        })
    }
}
