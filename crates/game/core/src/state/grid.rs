use std::collections::BTreeMap;

use super::{GridPosition, UnitId};

/// Dynamic occupancy layered on top of the static grid oracle.
///
/// One unit per cell. Only the command pipeline, the movement resolver and
/// death handling write to it.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridIndex {
    occupancy: BTreeMap<GridPosition, UnitId>,
}

impl GridIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn occupant(&self, position: GridPosition) -> Option<UnitId> {
        self.occupancy.get(&position).copied()
    }

    pub fn is_occupied(&self, position: GridPosition) -> bool {
        self.occupancy.contains_key(&position)
    }

    /// Occupies `position` with `unit`. Fails if another unit is there.
    pub fn place(&mut self, position: GridPosition, unit: UnitId) -> bool {
        match self.occupancy.get(&position) {
            Some(existing) => *existing == unit,
            None => {
                self.occupancy.insert(position, unit);
                true
            }
        }
    }

    /// Clears `position` if `unit` is the occupant.
    pub fn vacate(&mut self, position: GridPosition, unit: UnitId) -> bool {
        if self.occupancy.get(&position) == Some(&unit) {
            self.occupancy.remove(&position);
            true
        } else {
            false
        }
    }

    /// Moves `unit` from `from` to `to`. Leaves the index untouched on failure.
    pub fn relocate(&mut self, unit: UnitId, from: GridPosition, to: GridPosition) -> bool {
        if self.occupancy.get(&from) != Some(&unit) || self.is_occupied(to) {
            return false;
        }
        self.occupancy.remove(&from);
        self.occupancy.insert(to, unit);
        true
    }

    pub fn occupied_cells(&self) -> impl Iterator<Item = (GridPosition, UnitId)> + '_ {
        self.occupancy.iter().map(|(pos, unit)| (*pos, *unit))
    }

    pub fn len(&self) -> usize {
        self.occupancy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupancy.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_rejects_second_occupant() {
        let mut grid = GridIndex::new();
        let cell = GridPosition::new(2, 3);
        assert!(grid.place(cell, UnitId(1)));
        assert!(!grid.place(cell, UnitId(2)));
        assert_eq!(grid.occupant(cell), Some(UnitId(1)));
    }

    #[test]
    fn relocate_is_all_or_nothing() {
        let mut grid = GridIndex::new();
        let a = GridPosition::new(0, 0);
        let b = GridPosition::new(1, 0);
        grid.place(a, UnitId(1));
        grid.place(b, UnitId(2));

        assert!(!grid.relocate(UnitId(1), a, b));
        assert_eq!(grid.occupant(a), Some(UnitId(1)));
        assert_eq!(grid.occupant(b), Some(UnitId(2)));

        let c = GridPosition::new(2, 0);
        assert!(grid.relocate(UnitId(1), a, c));
        assert!(!grid.is_occupied(a));
        assert_eq!(grid.occupant(c), Some(UnitId(1)));
    }
}
