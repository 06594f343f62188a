use tracing::{debug, info};

use crate::env::ZoneSpec;
use crate::events::MatchEvent;
use crate::state::{GridPosition, MatchState, UnitId, ZoneId, ZoneInstance};

/// What happened to a zone creation request.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZonePlacement {
    Created(ZoneId),
    /// Folded into an existing zone of a compatible type.
    Merged { zone: ZoneId, stacks: u32 },
    /// The cell is void space.
    RejectedVoid,
    /// The cell was full: existing zones were deactivated and the cell went void.
    Resonance {
        deactivated: Vec<ZoneId>,
        volatile: Option<ZoneId>,
    },
}

impl ZonePlacement {
    /// The new zone instance, if the request produced one.
    pub fn created_zone(&self) -> Option<ZoneId> {
        match self {
            ZonePlacement::Created(id) => Some(*id),
            _ => None,
        }
    }
}

/// Places a zone of type `spec` at `position`.
///
/// Checks run in order: void space refuses, a compatible active zone
/// absorbs the newcomer as extra stacks, a full cell triggers unstable
/// resonance, otherwise a fresh instance is created with `stacks` stacks.
pub fn create_zone(
    state: &mut MatchState,
    spec: ZoneSpec,
    position: GridPosition,
    owner: UnitId,
    stacks: u32,
) -> ZonePlacement {
    if state.zones.is_void(position) {
        debug!(%position, zone_type = spec.id.0, "zone refused: void space");
        return ZonePlacement::RejectedVoid;
    }

    if let Some(placement) = try_merge(state, &spec, position, stacks) {
        return placement;
    }

    if state.zones.active_count_at(position) >= state.config.max_zones_per_tile {
        return unstable_resonance(state, position, owner);
    }

    let id = state.zones.allocate_id();
    let zone_type = spec.id;
    let mut zone = ZoneInstance::new(id, spec, position, owner);
    zone.stacks = stacks.clamp(1, zone.spec.max_stacks.max(1));
    state.zones.push(zone);
    state.events.push(MatchEvent::ZoneCreated {
        zone: id,
        zone_type,
        position,
        owner,
    });
    debug!(zone = %id, %position, zone_type = zone_type.0, "zone created");
    ZonePlacement::Created(id)
}

fn try_merge(
    state: &mut MatchState,
    incoming: &ZoneSpec,
    position: GridPosition,
    stacks: u32,
) -> Option<ZonePlacement> {
    let zones = state.zones.zones_at_mut(position)?;
    let existing = zones
        .iter_mut()
        .find(|zone| zone.active && zone.spec.accepts_merge(incoming.id))?;

    let cap = existing.spec.max_stacks.max(1);
    existing.stacks = existing.stacks.saturating_add(stacks.max(1)).min(cap);
    for tag in &incoming.tags {
        if !existing.origin_tags.contains(tag) {
            existing.origin_tags.push(tag.clone());
        }
    }
    if !existing.is_permanent() {
        existing.remaining_duration = existing.remaining_duration.max(incoming.duration);
    }

    let (zone, stacks) = (existing.id, existing.stacks);
    state.events.push(MatchEvent::ZoneMerged {
        zone,
        incoming: incoming.id,
        stacks,
    });
    debug!(%zone, stacks, "zone merged");
    Some(ZonePlacement::Merged { zone, stacks })
}

fn unstable_resonance(state: &mut MatchState, position: GridPosition, owner: UnitId) -> ZonePlacement {
    let mut deactivated = Vec::new();
    if let Some(zones) = state.zones.zones_at_mut(position) {
        for zone in zones.iter_mut().filter(|zone| zone.active) {
            zone.active = false;
            deactivated.push(zone.id);
        }
    }
    state.zones.mark_void(position, state.config.void_duration);

    let volatile = if state.config.volatile_zone_damage > 0 {
        let id = state.zones.allocate_id();
        let spec = ZoneSpec::volatile(
            state.config.volatile_zone_damage,
            state.config.volatile_zone_radius,
        );
        state
            .zones
            .push_volatile(ZoneInstance::new(id, spec, position, owner));
        Some(id)
    } else {
        None
    };

    info!(%position, deactivated = deactivated.len(), "unstable resonance");
    state.events.push(MatchEvent::UnstableResonance {
        position,
        deactivated: deactivated.clone(),
        volatile,
    });
    ZonePlacement::Resonance {
        deactivated,
        volatile,
    }
}
