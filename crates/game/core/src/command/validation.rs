//! Gates shared by every unit command, in the order they must run.

use crate::env::{GridOracle, MatchEnv};
use crate::state::{GridPosition, MatchState, Phase, PlayerId, Unit, UnitId};

use super::{CommandRejection, CommandType};

/// Gate (a): the unit exists, belongs to `player`, and is alive.
pub(super) fn acting_unit(
    state: &MatchState,
    player: PlayerId,
    unit: UnitId,
) -> Result<&Unit, CommandRejection> {
    let found = state
        .units
        .get(unit)
        .ok_or(CommandRejection::UnitNotFound(unit))?;
    if found.team != player {
        return Err(CommandRejection::NotOwner { unit, player });
    }
    if !found.is_alive() {
        return Err(CommandRejection::UnitDead(unit));
    }
    Ok(found)
}

/// Gate (b): the current phase admits `command` from `player`.
pub(super) fn ensure_phase(
    state: &MatchState,
    player: PlayerId,
    command: CommandType,
) -> Result<(), CommandRejection> {
    let phase = state.phase.phase();
    let permitted = match command {
        CommandType::Move => state.phase.allows_movement(),
        CommandType::UseAbility | CommandType::Reposition => state.phase.allows_aura_for(player),
        CommandType::EndPhase => phase == Phase::MovementPhase || state.phase.allows_aura_for(player),
    };
    if !permitted {
        return Err(CommandRejection::WrongPhase { phase, command });
    }

    if command == CommandType::UseAbility
        && state.phase.aura_activations(player) >= state.config.max_aura_activations_per_phase
    {
        return Err(CommandRejection::ActivationLimitReached(player));
    }
    Ok(())
}

/// Gate (c): the unit's action slot for this phase is free.
pub(super) fn ensure_slot_free(unit: &Unit) -> Result<(), CommandRejection> {
    if unit.has_acted_this_phase {
        return Err(CommandRejection::ActionSlotUsed(unit.id));
    }
    Ok(())
}

/// Destination checks shared by Move and Reposition: on the grid, walkable,
/// empty, and in the reachable set for `range` steps.
pub(super) fn ensure_destination(
    state: &MatchState,
    env: &MatchEnv<'_>,
    unit: &Unit,
    destination: GridPosition,
    range: u32,
) -> Result<(), CommandRejection> {
    let grid: &dyn GridOracle = env.grid()?;
    if !grid.is_valid_position(destination) {
        return Err(CommandRejection::OutOfBounds(destination));
    }
    if let Some(occupant) = state.grid.occupant(destination) {
        return Err(CommandRejection::Occupied {
            destination,
            occupant,
        });
    }
    if !grid.is_walkable(destination, unit.id)
        || !grid
            .reachable_positions(unit.position, range)
            .contains(&destination)
    {
        return Err(CommandRejection::Unreachable {
            unit: unit.id,
            destination,
        });
    }
    Ok(())
}
