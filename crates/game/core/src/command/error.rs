//! Command rejection reasons.

use crate::env::{AbilityId, OracleError};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{GridPosition, Phase, PlayerId, UnitId};

use super::CommandType;

/// Why a command was refused. A rejected command leaves state untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandRejection {
    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    #[error("unit {unit} is not controlled by {player}")]
    NotOwner { unit: UnitId, player: PlayerId },

    #[error("unit {0} is dead")]
    UnitDead(UnitId),

    #[error("{command} is not allowed for this player during {phase}")]
    WrongPhase { phase: Phase, command: CommandType },

    #[error("unit {0} already acted this phase")]
    ActionSlotUsed(UnitId),

    #[error("{0} already ended this phase")]
    PhaseAlreadyEnded(PlayerId),

    #[error("{0} reached the activation limit for this phase")]
    ActivationLimitReached(PlayerId),

    #[error("unit {0} is rooted")]
    Rooted(UnitId),

    #[error("unit {0} is silenced")]
    Silenced(UnitId),

    #[error("position {0} is outside the grid")]
    OutOfBounds(GridPosition),

    #[error("unit {unit} cannot reach {destination}")]
    Unreachable {
        unit: UnitId,
        destination: GridPosition,
    },

    #[error("position {destination} is occupied by unit {occupant}")]
    Occupied {
        destination: GridPosition,
        occupant: UnitId,
    },

    #[error("unit {unit} does not know ability {ability:?}")]
    AbilityNotKnown { unit: UnitId, ability: AbilityId },

    #[error("ability {ability:?} is on cooldown for {remaining} more turns")]
    OnCooldown { ability: AbilityId, remaining: u32 },

    #[error("target is {distance} cells away, range is {range}")]
    OutOfRange { distance: u32, range: u32 },

    #[error("not enough aura: need {required}, have {available}")]
    InsufficientAura { required: u32, available: u32 },

    #[error("ability {0:?} cannot be overloaded")]
    OverloadUnsupported(AbilityId),

    #[error("not enough overload charge: need {required}, have {available}")]
    InsufficientOverload { required: u32, available: u32 },

    #[error("no living unit at {0}")]
    NoTarget(GridPosition),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for CommandRejection {
    fn severity(&self) -> ErrorSeverity {
        use CommandRejection::*;
        match self {
            UnitNotFound(_) | NotOwner { .. } | OutOfBounds(_) | AbilityNotKnown { .. } => {
                ErrorSeverity::Validation
            }
            Oracle(err) => err.severity(),
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        use CommandRejection::*;
        match self {
            UnitNotFound(_) => "COMMAND_UNIT_NOT_FOUND",
            NotOwner { .. } => "COMMAND_NOT_OWNER",
            UnitDead(_) => "COMMAND_UNIT_DEAD",
            WrongPhase { .. } => "COMMAND_WRONG_PHASE",
            ActionSlotUsed(_) => "COMMAND_ACTION_SLOT_USED",
            PhaseAlreadyEnded(_) => "COMMAND_PHASE_ALREADY_ENDED",
            ActivationLimitReached(_) => "COMMAND_ACTIVATION_LIMIT",
            Rooted(_) => "COMMAND_UNIT_ROOTED",
            Silenced(_) => "COMMAND_UNIT_SILENCED",
            OutOfBounds(_) => "COMMAND_OUT_OF_BOUNDS",
            Unreachable { .. } => "COMMAND_UNREACHABLE",
            Occupied { .. } => "COMMAND_OCCUPIED",
            AbilityNotKnown { .. } => "COMMAND_ABILITY_NOT_KNOWN",
            OnCooldown { .. } => "COMMAND_ON_COOLDOWN",
            OutOfRange { .. } => "COMMAND_OUT_OF_RANGE",
            InsufficientAura { .. } => "COMMAND_INSUFFICIENT_AURA",
            OverloadUnsupported(_) => "COMMAND_OVERLOAD_UNSUPPORTED",
            InsufficientOverload { .. } => "COMMAND_INSUFFICIENT_OVERLOAD",
            NoTarget(_) => "COMMAND_NO_TARGET",
            Oracle(err) => err.error_code(),
        }
    }
}
