use std::collections::BTreeSet;

use crate::state::{GridPosition, UnitId};

/// Static grid geometry and path reachability.
///
/// The core treats this as a black box: it never builds path graphs itself,
/// it only asks which cells exist, which a unit may stand on, and which cells
/// are reachable within a step budget. Dynamic occupancy is tracked by the
/// core's own [`GridIndex`](crate::state::GridIndex).
pub trait GridOracle: Send + Sync {
    fn dimensions(&self) -> GridDimensions;

    fn is_valid_position(&self, position: GridPosition) -> bool {
        self.dimensions().contains(position)
    }

    fn is_walkable(&self, position: GridPosition, unit: UnitId) -> bool;

    /// Cells reachable from `start` in at most `range` steps, excluding `start`.
    fn reachable_positions(&self, start: GridPosition, range: u32) -> BTreeSet<GridPosition>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridDimensions {
    pub columns: u32,
    pub rows: u32,
}

impl GridDimensions {
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    pub fn contains(&self, position: GridPosition) -> bool {
        position.column >= 0
            && position.row >= 0
            && position.column < self.columns as i32
            && position.row < self.rows as i32
    }
}
