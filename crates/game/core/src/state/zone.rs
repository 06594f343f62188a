//! Zone instances, void spaces, and the per-cell zone field.
//!
//! Placement and resolution policy lives in [`crate::zone`]; this module only
//! holds the data and the bookkeeping primitives those passes use.

use std::collections::BTreeMap;

use super::{GridPosition, UnitId, ZoneId};
use crate::env::{ZoneSpec, ZoneTypeId};

/// A live zone anchored at one cell.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneInstance {
    pub id: ZoneId,
    pub spec: ZoneSpec,
    pub position: GridPosition,
    pub owner: UnitId,
    /// Turns left. [`ZoneSpec::PERMANENT`] never counts down.
    pub remaining_duration: i32,
    pub stacks: u32,
    /// Tags of every zone merged into this one, the anchor's own first.
    pub origin_tags: Vec<String>,
    pub active: bool,
}

impl ZoneInstance {
    pub fn new(id: ZoneId, spec: ZoneSpec, position: GridPosition, owner: UnitId) -> Self {
        Self {
            id,
            // anything below PERMANENT is treated as already spent
            remaining_duration: if spec.duration < ZoneSpec::PERMANENT {
                0
            } else {
                spec.duration
            },
            origin_tags: spec.tags.clone(),
            position,
            owner,
            stacks: 1,
            active: true,
            spec,
        }
    }

    pub fn type_id(&self) -> ZoneTypeId {
        self.spec.id
    }

    pub fn radius(&self) -> u32 {
        self.spec.radius
    }

    pub fn is_permanent(&self) -> bool {
        self.remaining_duration == ZoneSpec::PERMANENT
    }

    /// Whether `cell` lies inside this zone's area.
    pub fn covers(&self, cell: GridPosition) -> bool {
        self.position.chebyshev_distance(cell) <= self.spec.radius
    }

    /// True when the zone is stacked and one of its origin tags is on the
    /// type's resonance list.
    pub fn resonates(&self) -> bool {
        self.stacks > 1
            && self
                .origin_tags
                .iter()
                .any(|tag| self.spec.resonance_tags.contains(tag))
    }

    /// Effect magnitude for this instance: `base × stacks`, scaled by the
    /// resonance multiplier when the stack resonates.
    pub fn magnitude(&self, base: u32) -> u32 {
        let stacked = base.saturating_mul(self.stacks);
        if self.resonates() {
            let scaled = u64::from(stacked) * u64::from(self.spec.resonance_multiplier_percent) / 100;
            u32::try_from(scaled).unwrap_or(u32::MAX)
        } else {
            stacked
        }
    }
}

/// A cell temporarily closed to zone placement after unstable resonance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoidSpace {
    pub position: GridPosition,
    pub remaining_duration: u32,
}

/// All zones and void spaces on the battlefield.
///
/// - at most one zone list per cell; empty lists are pruned
/// - volatile zones spawned by resonance live outside the cell lists
/// - `resolved_turn` guards the once-per-turn resolution pass
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneField {
    cells: BTreeMap<GridPosition, Vec<ZoneInstance>>,
    volatile: Vec<ZoneInstance>,
    voids: BTreeMap<GridPosition, VoidSpace>,
    next_zone_id: u32,
    resolved_turn: Option<u32>,
}

impl ZoneField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate_id(&mut self) -> ZoneId {
        self.next_zone_id = self.next_zone_id.wrapping_add(1);
        ZoneId(self.next_zone_id)
    }

    pub fn zones_at(&self, cell: GridPosition) -> &[ZoneInstance] {
        self.cells.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn zones_at_mut(&mut self, cell: GridPosition) -> Option<&mut Vec<ZoneInstance>> {
        self.cells.get_mut(&cell)
    }

    pub fn active_count_at(&self, cell: GridPosition) -> usize {
        self.zones_at(cell).iter().filter(|zone| zone.active).count()
    }

    pub fn push(&mut self, zone: ZoneInstance) {
        self.cells.entry(zone.position).or_default().push(zone);
    }

    pub fn push_volatile(&mut self, zone: ZoneInstance) {
        self.volatile.push(zone);
    }

    /// Finds a zone anywhere in the field.
    pub fn get(&self, id: ZoneId) -> Option<&ZoneInstance> {
        self.iter().find(|zone| zone.id == id)
    }

    /// Every zone (cell lists in cell order, then volatile), active or not.
    pub fn iter(&self) -> impl Iterator<Item = &ZoneInstance> {
        self.cells.values().flatten().chain(self.volatile.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ZoneInstance> {
        self.cells
            .values_mut()
            .flatten()
            .chain(self.volatile.iter_mut())
    }

    pub fn active(&self) -> impl Iterator<Item = &ZoneInstance> {
        self.iter().filter(|zone| zone.active)
    }

    /// Removes every inactive zone, returning them in iteration order.
    pub fn sweep_inactive(&mut self) -> Vec<ZoneInstance> {
        let mut removed = Vec::new();
        for zones in self.cells.values_mut() {
            let (keep, gone): (Vec<_>, Vec<_>) = zones.drain(..).partition(|zone| zone.active);
            *zones = keep;
            removed.extend(gone);
        }
        self.cells.retain(|_, zones| !zones.is_empty());

        let (keep, gone): (Vec<_>, Vec<_>) = self.volatile.drain(..).partition(|zone| zone.active);
        self.volatile = keep;
        removed.extend(gone);
        removed
    }

    pub fn is_void(&self, cell: GridPosition) -> bool {
        self.voids.contains_key(&cell)
    }

    pub fn void_at(&self, cell: GridPosition) -> Option<&VoidSpace> {
        self.voids.get(&cell)
    }

    /// Marks `cell` void, extending any existing void to the longer duration.
    pub fn mark_void(&mut self, cell: GridPosition, duration: u32) {
        let entry = self.voids.entry(cell).or_insert(VoidSpace {
            position: cell,
            remaining_duration: 0,
        });
        entry.remaining_duration = entry.remaining_duration.max(duration);
    }

    pub fn voids(&self) -> impl Iterator<Item = &VoidSpace> {
        self.voids.values()
    }

    pub(crate) fn voids_mut(&mut self) -> &mut BTreeMap<GridPosition, VoidSpace> {
        &mut self.voids
    }

    pub fn resolved_turn(&self) -> Option<u32> {
        self.resolved_turn
    }

    pub(crate) fn mark_resolved(&mut self, turn: u32) {
        self.resolved_turn = Some(turn);
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.volatile.is_empty()
    }
}
