//! Outbound notifications produced by the simulation.
//!
//! Every state change that presentation or network layers care about is
//! pushed onto the match's [`EventQueue`] in the order it happened. Hosts
//! drain the queue once per simulation step.

use std::collections::VecDeque;

use crate::env::{AbilityId, ZoneTypeId};
use crate::movement::MoveRejection;
use crate::state::{GridPosition, Phase, PlayerId, StatusEffectKind, UnitId, ZoneId};

/// What caused a damage or heal event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectSource {
    Ability { unit: UnitId, ability: AbilityId },
    Zone(ZoneId),
    Status(StatusEffectKind),
}

#[derive(Clone, Debug, PartialEq, Eq, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatchEvent {
    PhaseChanged {
        from: Phase,
        to: Phase,
    },
    TurnChanged {
        turn: u32,
    },
    UnitMoved {
        unit: UnitId,
        from: GridPosition,
        to: GridPosition,
    },
    MoveRejected {
        unit: UnitId,
        destination: GridPosition,
        reason: MoveRejection,
    },
    UnitDamaged {
        unit: UnitId,
        amount: u32,
        absorbed: u32,
        source: EffectSource,
    },
    UnitHealed {
        unit: UnitId,
        amount: u32,
        source: EffectSource,
    },
    UnitDied {
        unit: UnitId,
        position: GridPosition,
    },
    StatusApplied {
        unit: UnitId,
        kind: StatusEffectKind,
        duration: u32,
    },
    StatusExpired {
        unit: UnitId,
        kind: StatusEffectKind,
    },
    AbilityUsed {
        unit: UnitId,
        ability: AbilityId,
        target: GridPosition,
        overloaded: bool,
    },
    ZoneCreated {
        zone: ZoneId,
        zone_type: ZoneTypeId,
        position: GridPosition,
        owner: UnitId,
    },
    ZoneMerged {
        zone: ZoneId,
        incoming: ZoneTypeId,
        stacks: u32,
    },
    ZoneExpired {
        zone: ZoneId,
        position: GridPosition,
    },
    UnstableResonance {
        position: GridPosition,
        deactivated: Vec<ZoneId>,
        volatile: Option<ZoneId>,
    },
    VoidExpired {
        position: GridPosition,
    },
    MatchEnded {
        winner: Option<PlayerId>,
    },
}

impl MatchEvent {
    /// Unit the event is about, if any.
    pub fn unit(&self) -> Option<UnitId> {
        use MatchEvent::*;
        match self {
            UnitMoved { unit, .. }
            | MoveRejected { unit, .. }
            | UnitDamaged { unit, .. }
            | UnitHealed { unit, .. }
            | UnitDied { unit, .. }
            | StatusApplied { unit, .. }
            | StatusExpired { unit, .. }
            | AbilityUsed { unit, .. } => Some(*unit),
            _ => None,
        }
    }
}

/// FIFO of events awaiting delivery.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventQueue {
    events: VecDeque<MatchEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: MatchEvent) {
        self.events.push_back(event);
    }

    /// Removes and returns every queued event, oldest first.
    pub fn drain(&mut self) -> Vec<MatchEvent> {
        self.events.drain(..).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
