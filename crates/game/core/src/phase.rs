//! Turn and phase state machine.
//!
//! [`PhaseMachine`] is the single source of truth for the current phase, the
//! turn number, and whose aura sub-phase it is. It also carries the
//! transition lock held while a batch pass runs and the per-phase counters
//! used by the phase-completion policy.

use tracing::{info, warn};

use crate::error::{ErrorSeverity, GameError};
use crate::state::{ActivePlayer, Phase, PlayerId, TurnState};

/// Why `transition_to_next` refused to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionError {
    #[error("transition lock held during {phase}")]
    Locked { phase: Phase },

    #[error("match is over")]
    Terminal,
}

impl GameError for TransitionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            TransitionError::Locked { .. } => ErrorSeverity::Recoverable,
            TransitionError::Terminal => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            TransitionError::Locked { .. } => "PHASE_TRANSITION_LOCKED",
            TransitionError::Terminal => "PHASE_TERMINAL",
        }
    }
}

/// Result of a successful phase change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseChange {
    pub from: Phase,
    pub to: Phase,
    /// Set when the change wrapped `EndTurn → Opening` and bumped the turn.
    pub new_turn: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseMachine {
    turn: TurnState,
    locked: bool,
    aura_activations: [u32; 2],
    ended: [bool; 2],
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseMachine {
    pub fn new() -> Self {
        Self {
            turn: TurnState::new(),
            locked: false,
            aura_activations: [0; 2],
            ended: [false; 2],
        }
    }

    pub fn turn_state(&self) -> &TurnState {
        &self.turn
    }

    pub fn phase(&self) -> Phase {
        self.turn.phase
    }

    pub fn turn_number(&self) -> u32 {
        self.turn.turn_number
    }

    pub fn active_player(&self) -> ActivePlayer {
        self.turn.active_player
    }

    pub fn is_game_over(&self) -> bool {
        self.turn.phase == Phase::GameOver
    }

    pub fn allows_movement(&self) -> bool {
        self.turn.phase == Phase::MovementPhase
    }

    /// True only during that player's aura sub-phases (1A/2A for player 1,
    /// 1B/2B for player 2).
    pub fn allows_aura_activation(&self, for_player1: bool) -> bool {
        let player = if for_player1 { PlayerId::One } else { PlayerId::Two };
        self.turn.phase.aura_owner() == Some(player)
    }

    pub fn allows_aura_for(&self, player: PlayerId) -> bool {
        self.allows_aura_activation(player == PlayerId::One)
    }

    /// Advances one step through the cycle.
    ///
    /// Leaving `EndTurn` increments the turn number. Refused (logged, no
    /// state change) while the transition lock is held or once the match is
    /// over.
    pub fn transition_to_next(&mut self) -> Result<PhaseChange, TransitionError> {
        let from = self.turn.phase;
        if self.locked {
            warn!(phase = %from, "transition refused: lock held");
            return Err(TransitionError::Locked { phase: from });
        }
        let Some(to) = from.next() else {
            warn!("transition refused: match is over");
            return Err(TransitionError::Terminal);
        };

        let new_turn = if from == Phase::EndTurn {
            Some(self.increment_turn())
        } else {
            None
        };
        self.enter(to);
        info!(%from, %to, turn = self.turn.turn_number, "phase changed");
        Ok(PhaseChange { from, to, new_turn })
    }

    /// Sets the phase unconditionally, ignoring the lock. Used to resync
    /// with an authoritative peer; never fails.
    pub fn force_transition_to(&mut self, phase: Phase) -> PhaseChange {
        let from = self.turn.phase;
        self.enter(phase);
        info!(%from, to = %phase, "phase forced");
        PhaseChange {
            from,
            to: phase,
            new_turn: None,
        }
    }

    /// Overwrites the turn number during a resync.
    pub fn force_turn_number(&mut self, turn_number: u32) {
        self.turn.turn_number = turn_number.max(1);
    }

    /// Increments the turn number and resets per-phase tracking.
    pub fn increment_turn(&mut self) -> u32 {
        self.turn.turn_number = self.turn.turn_number.saturating_add(1);
        self.reset_phase_tracking();
        self.turn.turn_number
    }

    /// Takes the transition lock. Returns false if it is already held.
    pub fn try_lock(&mut self) -> bool {
        if self.locked {
            return false;
        }
        self.locked = true;
        true
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Counts one ability activation for `player` in the current phase.
    pub fn record_aura_activation(&mut self, player: PlayerId) -> u32 {
        let slot = &mut self.aura_activations[player.index()];
        *slot = slot.saturating_add(1);
        *slot
    }

    pub fn aura_activations(&self, player: PlayerId) -> u32 {
        self.aura_activations[player.index()]
    }

    /// Records that `player` has finished with the current phase.
    pub fn mark_ended(&mut self, player: PlayerId) {
        self.ended[player.index()] = true;
    }

    pub fn has_ended(&self, player: PlayerId) -> bool {
        self.ended[player.index()]
    }

    pub fn both_ended(&self) -> bool {
        self.ended.iter().all(|ended| *ended)
    }

    fn enter(&mut self, phase: Phase) {
        self.turn.phase = phase;
        self.turn.active_player = phase.active_player();
        self.reset_phase_tracking();
    }

    fn reset_phase_tracking(&mut self) {
        self.aura_activations = [0; 2];
        self.ended = [false; 2];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_movement() -> PhaseMachine {
        let mut machine = PhaseMachine::new();
        machine.transition_to_next().unwrap();
        assert_eq!(machine.phase(), Phase::MovementPhase);
        machine
    }

    #[test]
    fn eight_steps_return_to_movement_with_next_turn() {
        let mut machine = at_movement();
        let start_turn = machine.turn_number();

        for _ in 0..8 {
            machine.transition_to_next().unwrap();
        }

        assert_eq!(machine.phase(), Phase::MovementPhase);
        assert_eq!(machine.turn_number(), start_turn + 1);
    }

    #[test]
    fn aura_gates_follow_sub_phase_owner() {
        let mut machine = at_movement();
        assert!(machine.allows_movement());
        assert!(!machine.allows_aura_activation(true));

        machine.transition_to_next().unwrap();
        assert_eq!(machine.phase(), Phase::AuraPhase1A);
        assert!(machine.allows_aura_activation(true));
        assert!(!machine.allows_aura_activation(false));
        assert_eq!(machine.active_player(), ActivePlayer::One);

        machine.transition_to_next().unwrap();
        assert!(machine.allows_aura_activation(false));
        assert_eq!(machine.active_player(), ActivePlayer::Two);
    }

    #[test]
    fn lock_refuses_transition_without_state_change() {
        let mut machine = at_movement();
        assert!(machine.try_lock());
        assert!(!machine.try_lock());

        let err = machine.transition_to_next().unwrap_err();
        assert_eq!(err, TransitionError::Locked { phase: Phase::MovementPhase });
        assert_eq!(machine.phase(), Phase::MovementPhase);

        machine.unlock();
        assert!(machine.transition_to_next().is_ok());
    }

    #[test]
    fn force_bypasses_lock_and_game_over_is_terminal() {
        let mut machine = at_movement();
        machine.try_lock();
        machine.force_transition_to(Phase::GameOver);
        assert_eq!(machine.phase(), Phase::GameOver);

        machine.unlock();
        assert_eq!(machine.transition_to_next(), Err(TransitionError::Terminal));
    }

    #[test]
    fn phase_change_resets_activation_counters() {
        let mut machine = at_movement();
        machine.transition_to_next().unwrap();
        machine.record_aura_activation(PlayerId::One);
        machine.mark_ended(PlayerId::One);
        assert_eq!(machine.aura_activations(PlayerId::One), 1);

        machine.transition_to_next().unwrap();
        assert_eq!(machine.aura_activations(PlayerId::One), 0);
        assert!(!machine.has_ended(PlayerId::One));
    }
}
