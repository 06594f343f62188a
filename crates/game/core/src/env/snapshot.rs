//! Owned oracle implementations backed by plain data.
//!
//! Content loaders build these from RON files and tests build them inline.
//! They are the reference collaborators: hosts with richer pathfinding can
//! supply their own [`GridOracle`].

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::{
    AbilityDefinition, AbilityId, AbilityOracle, GridDimensions, GridOracle, ZoneOracle, ZoneSpec,
    ZoneTypeId,
};
use crate::state::{GridPosition, UnitId};

/// Rectangular grid with impassable cells.
///
/// Reachability is a 4-neighbour breadth-first search bounded by `range`
/// steps. Occupancy is not considered here: the core owns it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSnapshot {
    pub dimensions: GridDimensions,
    #[cfg_attr(feature = "serde", serde(default))]
    pub blocked: BTreeSet<GridPosition>,
}

impl GridSnapshot {
    pub fn new(dimensions: GridDimensions) -> Self {
        Self {
            dimensions,
            blocked: BTreeSet::new(),
        }
    }

    pub fn with_blocked(mut self, cells: impl IntoIterator<Item = GridPosition>) -> Self {
        self.blocked.extend(cells);
        self
    }

    fn passable(&self, position: GridPosition) -> bool {
        self.dimensions.contains(position) && !self.blocked.contains(&position)
    }
}

impl GridOracle for GridSnapshot {
    fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    fn is_walkable(&self, position: GridPosition, _unit: UnitId) -> bool {
        self.passable(position)
    }

    fn reachable_positions(&self, start: GridPosition, range: u32) -> BTreeSet<GridPosition> {
        let mut reached = BTreeSet::new();
        if range == 0 || !self.dimensions.contains(start) {
            return reached;
        }

        let mut seen = BTreeSet::from([start]);
        let mut frontier = VecDeque::from([(start, 0u32)]);
        while let Some((cell, steps)) = frontier.pop_front() {
            if steps == range {
                continue;
            }
            for next in cell.neighbors() {
                if !self.passable(next) || !seen.insert(next) {
                    continue;
                }
                reached.insert(next);
                frontier.push_back((next, steps + 1));
            }
        }
        reached
    }
}

/// Ability definitions keyed by id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AbilityCatalog {
    abilities: BTreeMap<AbilityId, AbilityDefinition>,
}

impl AbilityCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a definition.
    pub fn insert(&mut self, definition: AbilityDefinition) {
        self.abilities.insert(definition.id, definition);
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AbilityDefinition> {
        self.abilities.values()
    }
}

impl FromIterator<AbilityDefinition> for AbilityCatalog {
    fn from_iter<T: IntoIterator<Item = AbilityDefinition>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for definition in iter {
            catalog.insert(definition);
        }
        catalog
    }
}

impl AbilityOracle for AbilityCatalog {
    fn ability(&self, id: AbilityId) -> Option<AbilityDefinition> {
        self.abilities.get(&id).cloned()
    }
}

/// Zone types keyed by id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ZoneCatalog {
    zones: BTreeMap<ZoneTypeId, ZoneSpec>,
}

impl ZoneCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, spec: ZoneSpec) {
        self.zones.insert(spec.id, spec);
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ZoneSpec> {
        self.zones.values()
    }
}

impl FromIterator<ZoneSpec> for ZoneCatalog {
    fn from_iter<T: IntoIterator<Item = ZoneSpec>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for spec in iter {
            catalog.insert(spec);
        }
        catalog
    }
}

impl ZoneOracle for ZoneCatalog {
    fn zone_type(&self, id: ZoneTypeId) -> Option<ZoneSpec> {
        self.zones.get(&id).cloned()
    }
}
