//! Batched simultaneous movement.
//!
//! `Move` commands only register a pending destination here. The batch pass
//! snapshots and clears the registry, re-validates every request against the
//! live grid, settles destination conflicts by unit id, and commits the
//! surviving moves in one step.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::env::GridOracle;
use crate::state::{GridIndex, GridPosition, PlayerId, UnitId, UnitRegistry};

/// A destination queued during the movement phase.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingMove {
    pub player: PlayerId,
    /// Unit position when the request was accepted.
    pub origin: GridPosition,
    pub destination: GridPosition,
    /// Reachable set computed from `origin` at validation time.
    pub reachable: BTreeSet<GridPosition>,
}

/// Why a queued move did not happen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveRejection {
    /// Another unit with a lower id claimed the same cell.
    Conflict { winner: UnitId },
    /// The destination held a unit when the batch ran.
    Occupied,
    /// The destination is no longer reachable or walkable.
    Unreachable,
    /// The unit died, vanished, or became rooted before the batch.
    UnitUnavailable,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MovementReport {
    pub moved: Vec<(UnitId, GridPosition, GridPosition)>,
    pub rejected: Vec<(UnitId, GridPosition, MoveRejection)>,
}

impl MovementReport {
    pub fn is_empty(&self) -> bool {
        self.moved.is_empty() && self.rejected.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegisterError {
    #[error("unit {0} already has a pending move")]
    AlreadyPending(UnitId),
}

/// Pending-move registry plus the batch resolver.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementResolver {
    pending: BTreeMap<UnitId, PendingMove>,
    queued: [u32; 2],
}

impl MovementResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a destination for `unit`. One pending move per unit.
    pub fn register(&mut self, unit: UnitId, request: PendingMove) -> Result<(), RegisterError> {
        if self.pending.contains_key(&unit) {
            return Err(RegisterError::AlreadyPending(unit));
        }
        let slot = &mut self.queued[request.player.index()];
        *slot = slot.saturating_add(1);
        self.pending.insert(unit, request);
        Ok(())
    }

    pub fn pending(&self, unit: UnitId) -> Option<&PendingMove> {
        self.pending.get(&unit)
    }

    pub fn has_pending(&self, unit: UnitId) -> bool {
        self.pending.contains_key(&unit)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Moves `player` has queued in the current batch.
    pub fn queued_by(&self, player: PlayerId) -> u32 {
        self.queued[player.index()]
    }

    pub fn total_queued(&self) -> u32 {
        self.queued.iter().sum()
    }

    /// Batch trigger: the total threshold is hit, or every player reached
    /// the per-player quota.
    pub fn is_batch_ready(&self, total_threshold: u32, per_player: u32) -> bool {
        let total_hit = total_threshold > 0 && self.total_queued() >= total_threshold;
        let quotas_hit = per_player > 0 && self.queued.iter().all(|count| *count >= per_player);
        total_hit || quotas_hit
    }

    /// Drops the pending move for a unit that died or was removed.
    pub fn discard(&mut self, unit: UnitId) -> Option<PendingMove> {
        self.pending.remove(&unit)
    }

    /// Drops every pending move and resets the batch counters.
    pub fn discard_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        self.queued = [0; 2];
        dropped
    }

    /// Runs the batch pass.
    ///
    /// Occupancy is judged against the grid as it stood before the batch, so
    /// a unit cannot step into a cell another unit is leaving in the same
    /// batch. Among valid claims on one cell the lowest unit id wins.
    pub fn resolve(
        &mut self,
        units: &mut UnitRegistry,
        grid: &mut GridIndex,
        oracle: &dyn GridOracle,
    ) -> MovementReport {
        let batch = std::mem::take(&mut self.pending);
        self.queued = [0; 2];

        let mut report = MovementReport::default();
        let mut claims: BTreeMap<GridPosition, UnitId> = BTreeMap::new();
        let mut accepted = Vec::new();

        // BTreeMap iteration is ascending by id, so the first claim on a
        // cell is the winning one.
        for (unit_id, request) in batch {
            let destination = request.destination;
            let Some(unit) = units.get(unit_id).filter(|unit| unit.is_alive() && !unit.is_rooted())
            else {
                report.rejected.push((unit_id, destination, MoveRejection::UnitUnavailable));
                continue;
            };

            let reachable_now = if unit.position == request.origin {
                request.reachable.contains(&destination)
            } else {
                oracle
                    .reachable_positions(unit.position, unit.movement_range)
                    .contains(&destination)
            };
            if !reachable_now || !oracle.is_walkable(destination, unit_id) {
                report.rejected.push((unit_id, destination, MoveRejection::Unreachable));
                continue;
            }

            if grid.occupant(destination).is_some_and(|occupant| occupant != unit_id) {
                report.rejected.push((unit_id, destination, MoveRejection::Occupied));
                continue;
            }

            if let Some(winner) = claims.get(&destination) {
                report
                    .rejected
                    .push((unit_id, destination, MoveRejection::Conflict { winner: *winner }));
                continue;
            }

            claims.insert(destination, unit_id);
            accepted.push((unit_id, unit.position, destination));
        }

        for (unit_id, from, to) in accepted {
            if from != to && !grid.relocate(unit_id, from, to) {
                report.rejected.push((unit_id, to, MoveRejection::Occupied));
                continue;
            }
            if let Some(unit) = units.get_mut(unit_id) {
                unit.position = to;
                unit.has_moved_this_turn = true;
            }
            report.moved.push((unit_id, from, to));
        }

        debug!(
            moved = report.moved.len(),
            rejected = report.rejected.len(),
            "movement batch resolved"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{GridDimensions, GridSnapshot};
    use crate::state::Unit;

    fn board() -> GridSnapshot {
        GridSnapshot::new(GridDimensions::new(10, 10))
    }

    fn spawn(units: &mut UnitRegistry, grid: &mut GridIndex, id: u32, team: PlayerId, at: GridPosition) {
        units.insert(Unit::new(UnitId(id), team, at)).unwrap();
        grid.place(at, UnitId(id));
    }

    fn request(oracle: &GridSnapshot, units: &UnitRegistry, id: u32, to: GridPosition) -> PendingMove {
        let unit = units.get(UnitId(id)).unwrap();
        PendingMove {
            player: unit.team,
            origin: unit.position,
            destination: to,
            reachable: oracle.reachable_positions(unit.position, unit.movement_range),
        }
    }

    #[test]
    fn lower_id_wins_contested_cell() {
        let oracle = board();
        let mut units = UnitRegistry::new();
        let mut grid = GridIndex::new();
        spawn(&mut units, &mut grid, 1, PlayerId::One, GridPosition::new(4, 5));
        spawn(&mut units, &mut grid, 2, PlayerId::Two, GridPosition::new(6, 5));

        let target = GridPosition::new(5, 5);
        let mut resolver = MovementResolver::new();
        resolver.register(UnitId(2), request(&oracle, &units, 2, target)).unwrap();
        resolver.register(UnitId(1), request(&oracle, &units, 1, target)).unwrap();

        let report = resolver.resolve(&mut units, &mut grid, &oracle);

        assert_eq!(report.moved, vec![(UnitId(1), GridPosition::new(4, 5), target)]);
        assert_eq!(
            report.rejected,
            vec![(UnitId(2), target, MoveRejection::Conflict { winner: UnitId(1) })]
        );
        assert_eq!(units.get(UnitId(2)).unwrap().position, GridPosition::new(6, 5));
        assert_eq!(grid.occupant(target), Some(UnitId(1)));
        assert_eq!(resolver.pending_count(), 0);
    }

    #[test]
    fn cannot_enter_cell_vacated_in_same_batch() {
        let oracle = board();
        let mut units = UnitRegistry::new();
        let mut grid = GridIndex::new();
        spawn(&mut units, &mut grid, 1, PlayerId::One, GridPosition::new(2, 2));
        spawn(&mut units, &mut grid, 2, PlayerId::Two, GridPosition::new(3, 2));

        let mut resolver = MovementResolver::new();
        resolver
            .register(UnitId(1), request(&oracle, &units, 1, GridPosition::new(3, 2)))
            .unwrap();
        resolver
            .register(UnitId(2), request(&oracle, &units, 2, GridPosition::new(3, 4)))
            .unwrap();

        let report = resolver.resolve(&mut units, &mut grid, &oracle);
        assert_eq!(report.moved.len(), 1);
        assert_eq!(
            report.rejected,
            vec![(UnitId(1), GridPosition::new(3, 2), MoveRejection::Occupied)]
        );
        assert!(units.get(UnitId(2)).unwrap().has_moved_this_turn);
        assert!(!units.get(UnitId(1)).unwrap().has_moved_this_turn);
    }

    #[test]
    fn one_pending_move_per_unit() {
        let oracle = board();
        let mut units = UnitRegistry::new();
        let mut grid = GridIndex::new();
        spawn(&mut units, &mut grid, 1, PlayerId::One, GridPosition::new(0, 0));

        let mut resolver = MovementResolver::new();
        resolver
            .register(UnitId(1), request(&oracle, &units, 1, GridPosition::new(1, 0)))
            .unwrap();
        assert_eq!(
            resolver.register(UnitId(1), request(&oracle, &units, 1, GridPosition::new(0, 1))),
            Err(RegisterError::AlreadyPending(UnitId(1)))
        );
        assert_eq!(resolver.queued_by(PlayerId::One), 1);
    }

    #[test]
    fn batch_ready_on_total_or_both_quotas() {
        let mut resolver = MovementResolver::new();
        resolver.queued = [2, 0];
        assert!(!resolver.is_batch_ready(3, 1));
        resolver.queued = [2, 1];
        assert!(resolver.is_batch_ready(3, 2));
        resolver.queued = [1, 1];
        assert!(resolver.is_batch_ready(6, 1));
    }
}
