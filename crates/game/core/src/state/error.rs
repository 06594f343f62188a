//! State management errors.
//!
//! Errors raised while seeding or replacing match state.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{GridPosition, UnitId};

/// Errors that occur while adding units or installing a replacement state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateError {
    /// A unit with this id is already registered.
    #[error("unit {0} already exists")]
    DuplicateUnit(UnitId),

    /// Position is already occupied by another unit.
    #[error("position {position} is already occupied by unit {occupant}")]
    PositionOccupied {
        position: GridPosition,
        occupant: UnitId,
    },

    /// Position is outside the grid or not walkable.
    #[error("position {0} is not a valid spawn cell")]
    InvalidPosition(GridPosition),

    /// Grid occupancy disagrees with unit positions.
    #[error("occupancy desync for unit {unit} at {position}")]
    OccupancyDesync { unit: UnitId, position: GridPosition },
}

impl GameError for StateError {
    fn severity(&self) -> ErrorSeverity {
        use StateError::*;
        match self {
            DuplicateUnit(_) | PositionOccupied { .. } | InvalidPosition(_) => {
                ErrorSeverity::Validation
            }
            OccupancyDesync { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use StateError::*;
        match self {
            DuplicateUnit(_) => "STATE_DUPLICATE_UNIT",
            PositionOccupied { .. } => "STATE_POSITION_OCCUPIED",
            InvalidPosition(_) => "STATE_INVALID_POSITION",
            OccupancyDesync { .. } => "STATE_OCCUPANCY_DESYNC",
        }
    }
}
