use std::fmt;

use arrayvec::ArrayVec;

/// Unique identifier for a unit on the battlefield.
///
/// Ordering matters: movement conflicts are won by the lower id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a live zone instance, allocated by the zone field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneId(pub u32);

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zone#{}", self.0)
    }
}

/// One of the two seats in a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    /// Wire representation (1 or 2).
    pub const fn as_u8(self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }

    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(PlayerId::One),
            2 => Some(PlayerId::Two),
            _ => None,
        }
    }

    /// Index into per-player arrays.
    pub const fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    pub const fn opponent(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.as_u8())
    }
}

/// Discrete grid cell expressed as (column, row).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPosition {
    pub column: i32,
    pub row: i32,
}

impl GridPosition {
    pub const ORIGIN: Self = Self { column: 0, row: 0 };

    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Chebyshev (chessboard) distance. A radius of 1 in this metric is the
    /// 3×3 neighbourhood around a cell.
    pub fn chebyshev_distance(self, other: GridPosition) -> u32 {
        let dc = self.column.abs_diff(other.column);
        let dr = self.row.abs_diff(other.row);
        dc.max(dr)
    }

    /// Orthogonal neighbours in N, E, S, W order.
    pub fn neighbors(self) -> ArrayVec<GridPosition, 4> {
        let mut cells = ArrayVec::new();
        cells.push(Self::new(self.column, self.row - 1));
        cells.push(Self::new(self.column + 1, self.row));
        cells.push(Self::new(self.column, self.row + 1));
        cells.push(Self::new(self.column - 1, self.row));
        cells
    }

    /// Every cell within `radius` (Chebyshev), row-major, anchor included.
    ///
    /// Radii beyond `i32::MAX` are clamped and coordinates saturate at the
    /// `i32` bounds, so cells may repeat along the edge of the coordinate
    /// space but the iterator never overflows.
    pub fn area(self, radius: u32) -> impl Iterator<Item = GridPosition> {
        let r = i32::try_from(radius).unwrap_or(i32::MAX);
        (-r..=r).flat_map(move |dr| {
            (-r..=r).map(move |dc| {
                GridPosition::new(self.column.saturating_add(dc), self.row.saturating_add(dr))
            })
        })
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Integer resource meter (HP, aura pool, overload charge).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

impl ResourceMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self {
            current: current.min(maximum),
            maximum,
        }
    }

    pub fn full(maximum: u32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    /// Spends `amount` if available. Returns false (and changes nothing) otherwise.
    pub fn spend(&mut self, amount: u32) -> bool {
        if self.current < amount {
            return false;
        }
        self.current -= amount;
        true
    }

    /// Removes up to `amount`, returning how much was actually removed.
    pub fn drain(&mut self, amount: u32) -> u32 {
        let drained = amount.min(self.current);
        self.current -= drained;
        drained
    }

    /// Adds up to `amount` without exceeding the maximum, returning the gain.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.maximum.saturating_sub(self.current));
        self.current += gained;
        gained
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_total_at_coordinate_extremes() {
        let low = GridPosition::new(i32::MIN, 0);
        let high = GridPosition::new(i32::MAX, 3);
        assert_eq!(low.chebyshev_distance(high), u32::MAX);
        assert_eq!(high.chebyshev_distance(GridPosition::new(i32::MAX, 0)), 3);
    }

    #[test]
    fn oversized_radius_does_not_overflow() {
        let anchor = GridPosition::new(2, 2);
        let first = anchor.area(u32::MAX).next();
        assert_eq!(first, Some(GridPosition::new(2 - i32::MAX, 2 - i32::MAX)));
        assert_eq!(anchor.area(1).count(), 9);
    }
}
