use tracing::debug;

use crate::env::MatchEnv;
use crate::state::{MatchState, PlayerId};

use super::validation::ensure_phase;
use super::{CommandOutcome, CommandRejection, CommandTransition, CommandType};

/// Declares the issuing player done with the current phase.
///
/// The engine advances once the phase-completion policy is satisfied: both
/// players in the movement phase, the owner in an aura sub-phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EndPhaseCommand;

impl CommandTransition for EndPhaseCommand {
    fn command_type(&self) -> CommandType {
        CommandType::EndPhase
    }

    fn validate(
        &self,
        player: PlayerId,
        state: &MatchState,
        _env: &MatchEnv<'_>,
    ) -> Result<(), CommandRejection> {
        ensure_phase(state, player, CommandType::EndPhase)?;
        if state.phase.has_ended(player) {
            return Err(CommandRejection::PhaseAlreadyEnded(player));
        }
        Ok(())
    }

    fn execute(
        &self,
        player: PlayerId,
        state: &mut MatchState,
        _env: &MatchEnv<'_>,
    ) -> Result<CommandOutcome, CommandRejection> {
        state.phase.mark_ended(player);
        debug!(%player, phase = %state.phase.phase(), "phase ended by player");
        Ok(CommandOutcome::PhaseEnded { player })
    }
}
