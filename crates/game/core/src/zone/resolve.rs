use tracing::{debug, warn};

use crate::effect::{apply_damage, apply_heal, apply_status};
use crate::env::ZoneEffect;
use crate::events::{EffectSource, MatchEvent};
use crate::state::{
    GridPosition, MatchState, StatusEffectInstance, StatusEffectKind, UnitId, ZoneId, ZoneInstance,
};

/// Summary of one resolution pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ZoneResolution {
    pub turn: u32,
    /// Zone/unit effect applications made in the effect pass.
    pub applications: usize,
    /// Zones whose duration ran out this pass.
    pub expired: Vec<ZoneId>,
    /// Zones deactivated earlier (by resonance) and swept this pass.
    pub dissolved: Vec<ZoneId>,
}

struct PendingEffect {
    zone: ZoneInstance,
    targets: Vec<UnitId>,
}

/// Runs the zone pass for the current turn.
///
/// Pass 1 applies every active zone's effect once to each living unit in its
/// area. Pass 2 counts durations down and removes zones that reached zero
/// along with any deactivated by resonance. Returns `None` when the pass
/// already ran this turn.
pub fn resolve_turn(state: &mut MatchState) -> Option<ZoneResolution> {
    let turn = state.turn_number();
    if state.zones.resolved_turn() == Some(turn) {
        warn!(turn, "zone pass already ran this turn");
        return None;
    }
    state.zones.mark_resolved(turn);

    let mut report = ZoneResolution {
        turn,
        ..ZoneResolution::default()
    };

    // Targets are fixed before any effect lands so deaths mid-pass cannot
    // shift another zone's target list.
    let effects: Vec<PendingEffect> = state
        .zones
        .active()
        .map(|zone| {
            let targets = state
                .grid
                .occupied_cells()
                .filter(|(cell, _)| zone.covers(*cell))
                .map(|(_, id)| id)
                .filter(|id| state.units.get(*id).is_some_and(|unit| unit.is_alive()))
                .collect();
            PendingEffect {
                zone: zone.clone(),
                targets,
            }
        })
        .collect();

    for pending in effects {
        for target in &pending.targets {
            if apply_zone_effect(state, &pending, *target) {
                report.applications += 1;
            }
        }
    }

    for zone in state.zones.iter_mut().filter(|zone| zone.active) {
        if zone.is_permanent() {
            continue;
        }
        zone.remaining_duration = (zone.remaining_duration - 1).max(0);
        if zone.remaining_duration == 0 {
            zone.active = false;
            report.expired.push(zone.id);
        }
    }

    for zone in state.zones.sweep_inactive() {
        if report.expired.contains(&zone.id) {
            state.events.push(MatchEvent::ZoneExpired {
                zone: zone.id,
                position: zone.position,
            });
        } else {
            report.dissolved.push(zone.id);
        }
    }

    debug!(
        turn,
        applications = report.applications,
        expired = report.expired.len(),
        dissolved = report.dissolved.len(),
        "zone pass resolved"
    );
    Some(report)
}

fn apply_zone_effect(state: &mut MatchState, pending: &PendingEffect, target: UnitId) -> bool {
    let zone = &pending.zone;
    let source = EffectSource::Zone(zone.id);
    let magnitude = |base: u32| zone.magnitude(base);
    match &zone.spec.effect {
        ZoneEffect::Damage(base) => apply_damage(state, target, magnitude(*base), source).is_some(),
        ZoneEffect::Heal(base) => apply_heal(state, target, magnitude(*base), source).is_some(),
        ZoneEffect::DamageOverTime { potency, duration } => apply_status(
            state,
            target,
            StatusEffectInstance::new(
                StatusEffectKind::Burning,
                *duration,
                zone.owner,
                magnitude(*potency),
            ),
        ),
        ZoneEffect::HealOverTime { potency, duration } => apply_status(
            state,
            target,
            StatusEffectInstance::new(
                StatusEffectKind::Regenerating,
                *duration,
                zone.owner,
                magnitude(*potency),
            ),
        ),
        ZoneEffect::ApplyStatus {
            kind,
            duration,
            potency,
        } => apply_status(
            state,
            target,
            StatusEffectInstance::new(*kind, *duration, zone.owner, magnitude(*potency)),
        ),
    }
}

/// Counts every void space down by one turn and lifts the expired ones.
pub fn tick_voids(state: &mut MatchState) -> Vec<GridPosition> {
    let mut lifted = Vec::new();
    state.zones.voids_mut().retain(|position, void| {
        void.remaining_duration = void.remaining_duration.saturating_sub(1);
        if void.remaining_duration == 0 {
            lifted.push(*position);
            false
        } else {
            true
        }
    });
    for position in &lifted {
        state.events.push(MatchEvent::VoidExpired {
            position: *position,
        });
    }
    lifted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ZoneSpec, ZoneTypeId};
    use crate::state::{PlayerId, Unit};
    use crate::zone::create_zone;

    fn state_with_unit_at(position: GridPosition) -> MatchState {
        let mut state = MatchState::default();
        state
            .add_unit(Unit::new(UnitId(1), PlayerId::One, position))
            .unwrap();
        state
    }

    fn damage_events(state: &mut MatchState) -> usize {
        state
            .events
            .drain()
            .iter()
            .filter(|event| matches!(event, MatchEvent::UnitDamaged { .. }))
            .count()
    }

    #[test]
    fn one_turn_zone_hits_once_then_expires() {
        let mut state = state_with_unit_at(GridPosition::new(5, 5));
        let spec = ZoneSpec::new(ZoneTypeId(1), "flare", 1, 1, ZoneEffect::Damage(12));
        let id = create_zone(&mut state, spec, GridPosition::new(4, 4), UnitId(2), 1)
            .created_zone()
            .unwrap();
        state.events.drain();

        let report = resolve_turn(&mut state).unwrap();
        assert_eq!(report.applications, 1);
        assert_eq!(report.expired, vec![id]);
        assert!(state.zones.get(id).is_none());
        assert_eq!(state.units.get(UnitId(1)).unwrap().hp.current, 88);
        assert_eq!(damage_events(&mut state), 1);
    }

    #[test]
    fn second_pass_in_same_turn_is_a_no_op() {
        let mut state = state_with_unit_at(GridPosition::new(0, 0));
        let spec = ZoneSpec::new(ZoneTypeId(1), "mire", 0, 3, ZoneEffect::Damage(4));
        create_zone(&mut state, spec, GridPosition::new(0, 0), UnitId(2), 1);

        assert!(resolve_turn(&mut state).is_some());
        assert!(resolve_turn(&mut state).is_none());
        assert_eq!(state.units.get(UnitId(1)).unwrap().hp.current, 96);
    }

    #[test]
    fn durations_count_down_by_one_and_permanent_zones_stay() {
        let mut state = MatchState::default();
        let timed = ZoneSpec::new(ZoneTypeId(1), "timed", 0, 2, ZoneEffect::Heal(1));
        let forever = ZoneSpec::new(ZoneTypeId(2), "forever", 0, ZoneSpec::PERMANENT, ZoneEffect::Heal(1));
        let timed_id = create_zone(&mut state, timed, GridPosition::new(1, 1), UnitId(1), 1)
            .created_zone()
            .unwrap();
        let forever_id = create_zone(&mut state, forever, GridPosition::new(2, 2), UnitId(1), 1)
            .created_zone()
            .unwrap();

        resolve_turn(&mut state);
        assert_eq!(state.zones.get(timed_id).unwrap().remaining_duration, 1);

        state.phase.increment_turn();
        let report = resolve_turn(&mut state).unwrap();
        assert_eq!(report.expired, vec![timed_id]);
        assert_eq!(state.zones.get(forever_id).unwrap().remaining_duration, ZoneSpec::PERMANENT);
    }

    #[test]
    fn resonant_stack_scales_pass_damage() {
        let mut state = state_with_unit_at(GridPosition::new(2, 2));
        let spec = ZoneSpec::new(ZoneTypeId(4), "sear", 0, 2, ZoneEffect::Damage(10))
            .with_tags(["fire"])
            .with_merge([ZoneTypeId(4)], 3)
            .with_resonance(["fire"], 150);
        create_zone(&mut state, spec.clone(), GridPosition::new(2, 2), UnitId(2), 1);
        create_zone(&mut state, spec, GridPosition::new(2, 2), UnitId(2), 1);

        let report = resolve_turn(&mut state).unwrap();
        assert_eq!(report.applications, 1);
        assert_eq!(state.units.get(UnitId(1)).unwrap().hp.current, 70);
    }

    #[test]
    fn voids_lift_after_their_duration() {
        let mut state = MatchState::default();
        let cell = GridPosition::new(3, 3);
        state.zones.mark_void(cell, 2);

        assert!(tick_voids(&mut state).is_empty());
        assert!(state.zones.is_void(cell));
        assert_eq!(tick_voids(&mut state), vec![cell]);
        assert!(!state.zones.is_void(cell));
    }
}
