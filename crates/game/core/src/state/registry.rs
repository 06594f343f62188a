use std::collections::{BTreeMap, BTreeSet};

use super::{PlayerId, Unit, UnitId};

/// Authoritative per-unit resource state, keyed and iterated by unit id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitRegistry {
    units: BTreeMap<UnitId, Unit>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a unit. Returns the unit back if the id is already taken.
    pub fn insert(&mut self, unit: Unit) -> Result<(), Unit> {
        if self.units.contains_key(&unit.id) {
            return Err(unit);
        }
        self.units.insert(unit.id, unit);
        Ok(())
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.units.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Unit> {
        self.units.values_mut()
    }

    pub fn living(&self) -> impl Iterator<Item = &Unit> {
        self.units.values().filter(|unit| unit.is_alive())
    }

    /// Teams that still field at least one living unit.
    pub fn living_teams(&self) -> BTreeSet<PlayerId> {
        self.living().map(|unit| unit.team).collect()
    }

    /// Teams that have ever fielded a unit in this match.
    pub fn teams(&self) -> BTreeSet<PlayerId> {
        self.units.values().map(|unit| unit.team).collect()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Clears the per-phase action slot on every unit.
    pub fn reset_phase_flags(&mut self) {
        for unit in self.units.values_mut() {
            unit.has_acted_this_phase = false;
        }
    }

    /// Clears the per-turn movement flag on every unit.
    pub fn reset_turn_flags(&mut self) {
        for unit in self.units.values_mut() {
            unit.has_moved_this_turn = false;
        }
    }
}
