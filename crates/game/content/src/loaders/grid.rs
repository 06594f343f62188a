//! Grid layout loader.
//!
//! Loads board dimensions and blocked cells. Unit placement is handled by
//! the host when it seeds a match.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::{GridDimensions, GridPosition, GridSnapshot};

use crate::loaders::{LoadResult, read_file};

/// Grid layout structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GridLayoutRon {
    dimensions: (u32, u32),
    #[serde(default)]
    blocked: Vec<(i32, i32)>, // (column, row)
}

/// Loader for grid layouts from RON files.
pub struct GridLoader;

impl GridLoader {
    /// Load a grid layout from a RON file.
    pub fn load(path: &Path) -> LoadResult<GridSnapshot> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<GridSnapshot> {
        let data: GridLayoutRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse grid RON: {}", e))?;

        let (columns, rows) = data.dimensions;
        if columns == 0 || rows == 0 {
            anyhow::bail!("Grid dimensions must be non-zero, got {}x{}", columns, rows);
        }
        let dimensions = GridDimensions::new(columns, rows);

        let mut blocked = Vec::with_capacity(data.blocked.len());
        for (column, row) in data.blocked {
            let cell = GridPosition::new(column, row);
            if !dimensions.contains(cell) {
                anyhow::bail!("Blocked cell {} lies outside the {}x{} grid", cell, columns, rows);
            }
            blocked.push(cell);
        }

        Ok(GridSnapshot::new(dimensions).with_blocked(blocked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::{GridOracle, UnitId};

    #[test]
    fn blocked_cells_are_not_walkable() {
        let grid = GridLoader::parse("(dimensions: (6, 4), blocked: [(2, 1), (2, 2)])").unwrap();

        assert_eq!(grid.dimensions(), GridDimensions::new(6, 4));
        assert!(!grid.is_walkable(GridPosition::new(2, 1), UnitId(1)));
        assert!(grid.is_walkable(GridPosition::new(3, 1), UnitId(1)));
        assert!(!grid.is_valid_position(GridPosition::new(6, 0)));
    }

    #[test]
    fn blocked_cell_outside_grid_is_rejected() {
        let err = GridLoader::parse("(dimensions: (3, 3), blocked: [(5, 5)])").unwrap_err();
        assert!(err.to_string().contains("outside"));
    }

    #[test]
    fn empty_dimensions_are_rejected() {
        assert!(GridLoader::parse("(dimensions: (0, 4))").is_err());
    }
}
