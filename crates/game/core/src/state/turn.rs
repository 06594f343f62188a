use super::PlayerId;

/// Named stage within a turn.
///
/// The cycle is `Opening → MovementPhase → AuraPhase1A → AuraPhase1B →
/// AuraPhase2A → AuraPhase2B → Resolution → EndTurn → Opening (turn + 1)`.
/// `GameOver` is terminal.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Opening,
    #[strum(serialize = "movement")]
    MovementPhase,
    #[strum(serialize = "aura_1a")]
    AuraPhase1A,
    #[strum(serialize = "aura_1b")]
    AuraPhase1B,
    #[strum(serialize = "aura_2a")]
    AuraPhase2A,
    #[strum(serialize = "aura_2b")]
    AuraPhase2B,
    Resolution,
    EndTurn,
    GameOver,
}

impl Phase {
    /// Next phase in the cycle, or `None` for the terminal phase.
    pub const fn next(self) -> Option<Phase> {
        match self {
            Phase::Opening => Some(Phase::MovementPhase),
            Phase::MovementPhase => Some(Phase::AuraPhase1A),
            Phase::AuraPhase1A => Some(Phase::AuraPhase1B),
            Phase::AuraPhase1B => Some(Phase::AuraPhase2A),
            Phase::AuraPhase2A => Some(Phase::AuraPhase2B),
            Phase::AuraPhase2B => Some(Phase::Resolution),
            Phase::Resolution => Some(Phase::EndTurn),
            Phase::EndTurn => Some(Phase::Opening),
            Phase::GameOver => None,
        }
    }

    /// Player whose aura sub-phase this is.
    pub const fn aura_owner(self) -> Option<PlayerId> {
        match self {
            Phase::AuraPhase1A | Phase::AuraPhase2A => Some(PlayerId::One),
            Phase::AuraPhase1B | Phase::AuraPhase2B => Some(PlayerId::Two),
            _ => None,
        }
    }

    pub const fn active_player(self) -> ActivePlayer {
        match self.aura_owner() {
            Some(PlayerId::One) => ActivePlayer::One,
            Some(PlayerId::Two) => ActivePlayer::Two,
            None => ActivePlayer::None,
        }
    }

    /// Phases that take no player input and are advanced by the engine.
    pub const fn is_system(self) -> bool {
        matches!(self, Phase::Opening | Phase::Resolution | Phase::EndTurn)
    }
}

/// Whose turn it is: 0 = none/both, 1, 2.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActivePlayer {
    #[default]
    None,
    One,
    Two,
}

impl ActivePlayer {
    pub const fn as_u8(self) -> u8 {
        match self {
            ActivePlayer::None => 0,
            ActivePlayer::One => 1,
            ActivePlayer::Two => 2,
        }
    }

    /// Whether `player` may act under this marker. `None` admits both.
    pub const fn admits(self, player: PlayerId) -> bool {
        matches!(
            (self, player),
            (ActivePlayer::None, _)
                | (ActivePlayer::One, PlayerId::One)
                | (ActivePlayer::Two, PlayerId::Two)
        )
    }
}

/// Turn bookkeeping. Exactly one per match, mutated only by the phase machine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// Positive, starts at 1.
    pub turn_number: u32,
    pub phase: Phase,
    pub active_player: ActivePlayer,
}

impl TurnState {
    pub fn new() -> Self {
        Self {
            turn_number: 1,
            phase: Phase::Opening,
            active_player: ActivePlayer::None,
        }
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}
