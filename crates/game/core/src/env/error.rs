//! Collaborator access errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::GridPosition;

use super::{AbilityId, ZoneTypeId};

/// Errors that occur when a required collaborator or its data is unavailable.
///
/// Missing collaborators are fatal for the current operation: the engine logs
/// them and aborts without touching state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("GridOracle not available")]
    GridNotAvailable,

    #[error("AbilityOracle not available")]
    AbilitiesNotAvailable,

    #[error("ZoneOracle not available")]
    ZonesNotAvailable,

    #[error("position {0} is outside the grid")]
    PositionOutOfBounds(GridPosition),

    #[error("ability {0:?} not found")]
    AbilityNotFound(AbilityId),

    #[error("zone type {0:?} not found")]
    ZoneTypeNotFound(ZoneTypeId),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            GridNotAvailable | AbilitiesNotAvailable | ZonesNotAvailable => ErrorSeverity::Fatal,
            PositionOutOfBounds(_) | AbilityNotFound(_) | ZoneTypeNotFound(_) => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            GridNotAvailable => "ORACLE_GRID_NOT_AVAILABLE",
            AbilitiesNotAvailable => "ORACLE_ABILITIES_NOT_AVAILABLE",
            ZonesNotAvailable => "ORACLE_ZONES_NOT_AVAILABLE",
            PositionOutOfBounds(_) => "ORACLE_POSITION_OUT_OF_BOUNDS",
            AbilityNotFound(_) => "ORACLE_ABILITY_NOT_FOUND",
            ZoneTypeNotFound(_) => "ORACLE_ZONE_TYPE_NOT_FOUND",
        }
    }
}
