//! Damage, healing, status application, and death handling.
//!
//! Ability execution, the zone effect pass, and the turn-end hook all land
//! their effects through these functions so events and death bookkeeping
//! stay uniform.

use tracing::debug;

use crate::events::{EffectSource, MatchEvent};
use crate::state::{MatchState, StatusEffectInstance, StatusEffectKind, UnitId};

/// Result of one damage application.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageOutcome {
    pub dealt: u32,
    pub absorbed: u32,
    pub killed: bool,
}

/// Deals `amount` damage to `target`. `Shielded` absorbs up to its potency.
///
/// Returns `None` if the target does not exist or is already dead.
pub fn apply_damage(
    state: &mut MatchState,
    target: UnitId,
    amount: u32,
    source: EffectSource,
) -> Option<DamageOutcome> {
    let unit = state.units.get_mut(target).filter(|unit| unit.is_alive())?;

    let shield = unit
        .status_effects
        .get(StatusEffectKind::Shielded)
        .map_or(0, |effect| effect.potency);
    let absorbed = shield.min(amount);
    let dealt = unit.hp.drain(amount - absorbed);
    let killed = !unit.is_alive();

    state.events.push(MatchEvent::UnitDamaged {
        unit: target,
        amount: dealt,
        absorbed,
        source,
    });
    if killed {
        bury(state, target);
    }

    Some(DamageOutcome {
        dealt,
        absorbed,
        killed,
    })
}

/// Restores up to `amount` HP on a living unit and returns the gain.
pub fn apply_heal(
    state: &mut MatchState,
    target: UnitId,
    amount: u32,
    source: EffectSource,
) -> Option<u32> {
    let unit = state.units.get_mut(target).filter(|unit| unit.is_alive())?;
    let gained = unit.hp.restore(amount);
    state.events.push(MatchEvent::UnitHealed {
        unit: target,
        amount: gained,
        source,
    });
    Some(gained)
}

/// Attaches (or refreshes) a status effect. False when the unit is gone or
/// its effect list is full.
pub fn apply_status(state: &mut MatchState, target: UnitId, effect: StatusEffectInstance) -> bool {
    let capacity = state.config.max_status_effects;
    let Some(unit) = state.units.get_mut(target).filter(|unit| unit.is_alive()) else {
        return false;
    };
    if effect.remaining_duration == 0 || !unit.status_effects.add(effect, capacity) {
        return false;
    }
    state.events.push(MatchEvent::StatusApplied {
        unit: target,
        kind: effect.kind,
        duration: effect.remaining_duration,
    });
    true
}

/// Periodic status damage and healing, then duration countdown, for one unit.
pub fn tick_statuses(state: &mut MatchState, target: UnitId) {
    let Some(unit) = state.units.get(target).filter(|unit| unit.is_alive()) else {
        return;
    };
    let periodic: Vec<(StatusEffectKind, u32)> = unit
        .status_effects
        .iter()
        .filter(|effect| effect.kind.is_periodic())
        .map(|effect| (effect.kind, effect.potency))
        .collect();

    for (kind, potency) in periodic {
        let source = EffectSource::Status(kind);
        match kind {
            StatusEffectKind::Burning => {
                apply_damage(state, target, potency, source);
            }
            StatusEffectKind::Regenerating => {
                apply_heal(state, target, potency, source);
            }
            _ => {}
        }
    }

    let Some(unit) = state.units.get_mut(target).filter(|unit| unit.is_alive()) else {
        return;
    };
    for kind in unit.status_effects.tick() {
        state.events.push(MatchEvent::StatusExpired { unit: target, kind });
    }
}

/// Clears a dead unit out of the grid and the pending-move registry.
fn bury(state: &mut MatchState, target: UnitId) {
    let Some(unit) = state.units.get_mut(target) else {
        return;
    };
    unit.status_effects.clear();
    let position = unit.position;

    state.grid.vacate(position, target);
    state.movement.discard(target);
    state.events.push(MatchEvent::UnitDied {
        unit: target,
        position,
    });
    debug!(unit = %target, %position, "unit died");
}
