//! Read-only view of a match handed to presentation and network layers.
//!
//! Unlike [`MatchState`], every collection here is a plain list so the
//! snapshot renders to JSON without map-key restrictions.

use crate::env::{AbilityId, ZoneTypeId};
use crate::state::{
    GridPosition, MatchState, Phase, PlayerId, ResourceMeter, StatusEffectInstance, UnitId,
    VoidSpace, ZoneId,
};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitSnapshot {
    pub id: UnitId,
    pub team: PlayerId,
    pub position: GridPosition,
    pub alive: bool,
    pub hp: ResourceMeter,
    pub aura: ResourceMeter,
    pub overload: ResourceMeter,
    pub movement_range: u32,
    pub has_acted_this_phase: bool,
    pub has_moved_this_turn: bool,
    pub cooldowns: Vec<(AbilityId, u32)>,
    pub status_effects: Vec<StatusEffectInstance>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneSnapshot {
    pub id: ZoneId,
    pub zone_type: ZoneTypeId,
    pub name: String,
    pub position: GridPosition,
    pub radius: u32,
    pub remaining_duration: i32,
    pub owner: UnitId,
    pub stacks: u32,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchSnapshot {
    pub turn_number: u32,
    pub phase: Phase,
    /// 0 = none/both, 1, 2.
    pub active_player: u8,
    pub units: Vec<UnitSnapshot>,
    pub zones: Vec<ZoneSnapshot>,
    pub voids: Vec<VoidSpace>,
    /// `Some` once the match is over; the inner value is the winner.
    pub outcome: Option<Option<PlayerId>>,
}

impl MatchSnapshot {
    pub fn capture(state: &MatchState) -> Self {
        let units = state
            .units
            .iter()
            .map(|unit| UnitSnapshot {
                id: unit.id,
                team: unit.team,
                position: unit.position,
                alive: unit.is_alive(),
                hp: unit.hp,
                aura: unit.aura,
                overload: unit.overload,
                movement_range: unit.movement_range,
                has_acted_this_phase: unit.has_acted_this_phase,
                has_moved_this_turn: unit.has_moved_this_turn,
                cooldowns: unit
                    .ability_cooldowns
                    .iter()
                    .map(|(ability, turns)| (*ability, *turns))
                    .collect(),
                status_effects: unit.status_effects.iter().copied().collect(),
            })
            .collect();

        let zones = state
            .zones
            .iter()
            .map(|zone| ZoneSnapshot {
                id: zone.id,
                zone_type: zone.type_id(),
                name: zone.spec.name.clone(),
                position: zone.position,
                radius: zone.radius(),
                remaining_duration: zone.remaining_duration,
                owner: zone.owner,
                stacks: zone.stacks,
                active: zone.active,
            })
            .collect();

        Self {
            turn_number: state.turn_number(),
            phase: state.current_phase(),
            active_player: state.phase.active_player().as_u8(),
            units,
            zones,
            voids: state.zones.voids().copied().collect(),
            outcome: state.outcome,
        }
    }

    pub fn unit(&self, id: UnitId) -> Option<&UnitSnapshot> {
        self.units.iter().find(|unit| unit.id == id)
    }
}
