//! Player intents and the validate/execute pipeline.
//!
//! Each concrete command implements [`CommandTransition`]. `validate` is a
//! read-only check and runs the shared gates in a fixed order: acting unit
//! (exists, owned, alive), phase permission, free action slot, then the
//! kind-specific target checks. `execute` assumes `validate` just passed
//! against the same state.
mod ability;
mod error;
mod movement;
mod phase;
mod validation;
mod wire;

pub use ability::UseAbilityCommand;
pub use error::CommandRejection;
pub use movement::{MoveCommand, RepositionCommand};
pub use phase::EndPhaseCommand;
pub use wire::{WireError, WireMap};

use std::fmt;

use crate::env::{AbilityId, MatchEnv};
use crate::state::{GridPosition, MatchState, PlayerId, UnitId};
use crate::zone::ZonePlacement;

/// Unique command identifier assigned by the issuing client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandId(pub u64);

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cmd-{}", self.0)
    }
}

/// Discriminant used on the wire and in rejection messages.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandType {
    Move,
    UseAbility,
    EndPhase,
    Reposition,
}

/// Defines how a concrete command checks and mutates match state.
pub trait CommandTransition {
    fn command_type(&self) -> CommandType;

    /// Read-only legality check against the live state.
    fn validate(
        &self,
        player: PlayerId,
        state: &MatchState,
        env: &MatchEnv<'_>,
    ) -> Result<(), CommandRejection>;

    /// Applies the command. Callers run `validate` immediately before.
    ///
    /// Collaborator lookups happen before the first write, so an `Err`
    /// leaves state unchanged.
    fn execute(
        &self,
        player: PlayerId,
        state: &mut MatchState,
        env: &MatchEnv<'_>,
    ) -> Result<CommandOutcome, CommandRejection>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandKind {
    Move(MoveCommand),
    UseAbility(UseAbilityCommand),
    EndPhase(EndPhaseCommand),
    Reposition(RepositionCommand),
}

impl CommandKind {
    fn as_transition(&self) -> &dyn CommandTransition {
        match self {
            CommandKind::Move(command) => command,
            CommandKind::UseAbility(command) => command,
            CommandKind::EndPhase(command) => command,
            CommandKind::Reposition(command) => command,
        }
    }

    pub fn command_type(&self) -> CommandType {
        self.as_transition().command_type()
    }

    /// Acting unit, if the command has one.
    pub fn unit(&self) -> Option<UnitId> {
        match self {
            CommandKind::Move(command) => Some(command.unit),
            CommandKind::UseAbility(command) => Some(command.unit),
            CommandKind::Reposition(command) => Some(command.unit),
            CommandKind::EndPhase(_) => None,
        }
    }

    /// Destination or target cell, when the command names one.
    pub fn target(&self) -> Option<GridPosition> {
        match self {
            CommandKind::Move(command) => Some(command.destination),
            CommandKind::UseAbility(command) => Some(command.target),
            CommandKind::Reposition(command) => Some(command.destination),
            CommandKind::EndPhase(_) => None,
        }
    }
}

/// A player intent, ready for validation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Command {
    pub id: CommandId,
    pub player: PlayerId,
    pub kind: CommandKind,
}

impl Command {
    pub fn new(id: CommandId, player: PlayerId, kind: CommandKind) -> Self {
        Self { id, player, kind }
    }

    pub fn move_unit(id: u64, player: PlayerId, unit: UnitId, destination: GridPosition) -> Self {
        Self::new(
            CommandId(id),
            player,
            CommandKind::Move(MoveCommand { unit, destination }),
        )
    }

    pub fn use_ability(
        id: u64,
        player: PlayerId,
        unit: UnitId,
        ability: AbilityId,
        target: GridPosition,
    ) -> Self {
        Self::new(
            CommandId(id),
            player,
            CommandKind::UseAbility(UseAbilityCommand {
                unit,
                ability,
                target,
                overload: false,
            }),
        )
    }

    pub fn overloaded(mut self) -> Self {
        if let CommandKind::UseAbility(command) = &mut self.kind {
            command.overload = true;
        }
        self
    }

    pub fn end_phase(id: u64, player: PlayerId) -> Self {
        Self::new(CommandId(id), player, CommandKind::EndPhase(EndPhaseCommand))
    }

    pub fn reposition(id: u64, player: PlayerId, unit: UnitId, destination: GridPosition) -> Self {
        Self::new(
            CommandId(id),
            player,
            CommandKind::Reposition(RepositionCommand { unit, destination }),
        )
    }

    pub fn command_type(&self) -> CommandType {
        self.kind.command_type()
    }

    pub fn validate(&self, state: &MatchState, env: &MatchEnv<'_>) -> Result<(), CommandRejection> {
        self.kind.as_transition().validate(self.player, state, env)
    }

    pub fn execute(
        &self,
        state: &mut MatchState,
        env: &MatchEnv<'_>,
    ) -> Result<CommandOutcome, CommandRejection> {
        self.kind.as_transition().execute(self.player, state, env)
    }
}

/// What an executed command did.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandOutcome {
    /// Destination registered with the movement resolver; the unit has not moved.
    MoveQueued {
        unit: UnitId,
        destination: GridPosition,
    },
    AbilityResolved {
        unit: UnitId,
        ability: AbilityId,
        overloaded: bool,
        /// Present when the ability placed a zone.
        zone: Option<ZonePlacement>,
    },
    PhaseEnded {
        player: PlayerId,
    },
    Repositioned {
        unit: UnitId,
        from: GridPosition,
        to: GridPosition,
    },
}
