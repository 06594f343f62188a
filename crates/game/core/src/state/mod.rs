//! Authoritative match state representation.
//!
//! This module owns the data structures that describe units, occupancy,
//! zones, and turn bookkeeping. Hosts clone or query this state but mutate it
//! exclusively through the engine.
mod common;
mod error;
mod grid;
mod registry;
mod status;
mod turn;
mod unit;
mod zone;

pub use common::{GridPosition, PlayerId, ResourceMeter, UnitId, ZoneId};
pub use error::StateError;
pub use grid::GridIndex;
pub use registry::UnitRegistry;
pub use status::{StatusEffectInstance, StatusEffectKind, StatusEffects};
pub use turn::{ActivePlayer, Phase, TurnState};
pub use unit::Unit;
pub use zone::{VoidSpace, ZoneField, ZoneInstance};

use crate::config::MatchConfig;
use crate::events::EventQueue;
use crate::movement::MovementResolver;
use crate::phase::PhaseMachine;

/// Canonical state of one match.
///
/// Everything except the outbound event queue serializes, so a full state can
/// be shipped to a peer and installed wholesale on desync.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchState {
    pub config: MatchConfig,
    pub phase: PhaseMachine,
    pub units: UnitRegistry,
    pub grid: GridIndex,
    pub movement: MovementResolver,
    pub zones: ZoneField,
    /// Set once the match reaches `GameOver`. `Some(None)` is a draw.
    pub outcome: Option<Option<PlayerId>>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub events: EventQueue,
}

impl MatchState {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            phase: PhaseMachine::new(),
            units: UnitRegistry::new(),
            grid: GridIndex::new(),
            movement: MovementResolver::new(),
            zones: ZoneField::new(),
            outcome: None,
            events: EventQueue::new(),
        }
    }

    pub fn turn_number(&self) -> u32 {
        self.phase.turn_number()
    }

    pub fn current_phase(&self) -> Phase {
        self.phase.phase()
    }

    /// Registers a unit and occupies its cell.
    ///
    /// Grid bounds are not checked here; [`MatchEngine::spawn_unit`] does
    /// that against the grid oracle.
    ///
    /// [`MatchEngine::spawn_unit`]: crate::engine::MatchEngine::spawn_unit
    pub fn add_unit(&mut self, unit: Unit) -> Result<(), StateError> {
        if self.units.contains(unit.id) {
            return Err(StateError::DuplicateUnit(unit.id));
        }
        if let Some(occupant) = self.grid.occupant(unit.position) {
            return Err(StateError::PositionOccupied {
                position: unit.position,
                occupant,
            });
        }

        let (id, position, alive) = (unit.id, unit.position, unit.is_alive());
        self.units
            .insert(unit)
            .map_err(|rejected| StateError::DuplicateUnit(rejected.id))?;
        if alive {
            self.grid.place(position, id);
        }
        Ok(())
    }

    /// Checks that every living unit occupies exactly its own cell.
    pub fn verify_occupancy(&self) -> Result<(), StateError> {
        for unit in self.units.living() {
            if self.grid.occupant(unit.position) != Some(unit.id) {
                return Err(StateError::OccupancyDesync {
                    unit: unit.id,
                    position: unit.position,
                });
            }
        }
        if self.grid.len() != self.units.living().count() {
            if let Some((position, unit)) = self
                .grid
                .occupied_cells()
                .find(|(pos, id)| self.units.get(*id).is_none_or(|u| !u.is_alive() || u.position != *pos))
            {
                return Err(StateError::OccupancyDesync { unit, position });
            }
        }
        Ok(())
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}
