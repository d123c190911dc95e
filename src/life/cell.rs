//! Integer cell coordinates on the unbounded plane

use serde::{Deserialize, Serialize};
use std::fmt;

/// Offsets of the eight Moore neighbours, in row-major order.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Largest coordinate magnitude accepted from seed files
pub const COORDINATE_LIMIT: i32 = i32::MAX - 1;

/// A live-cell coordinate.
///
/// The derived ordering is lexicographic on `(x, y)`, which is the order
/// every [`SparseGrid`](super::SparseGrid) is kept in.
///
/// The plane is unbounded only within `±COORDINATE_LIMIT`. Neighbour offsets
/// wrap at the `i32` limits, so a pattern that grows past them wraps around
/// to the opposite edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell displaced by `(dx, dy)`. Wraps at the `i32` limits.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }

    /// The eight neighbouring coordinates.
    pub fn neighbors(self) -> impl Iterator<Item = Cell> {
        NEIGHBOR_OFFSETS
            .iter()
            .map(move |&(dx, dy)| self.offset(dx, dy))
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_x_then_y() {
        assert!(Cell::new(0, 5) < Cell::new(1, -5));
        assert!(Cell::new(1, -5) < Cell::new(1, 0));
        assert_eq!(Cell::new(2, 3), Cell::from((2, 3)));

        let mut cells = vec![Cell::new(1, 1), Cell::new(0, 2), Cell::new(1, 0), Cell::new(-1, 9)];
        cells.sort();
        assert_eq!(
            cells,
            vec![Cell::new(-1, 9), Cell::new(0, 2), Cell::new(1, 0), Cell::new(1, 1)]
        );
    }

    #[test]
    fn test_neighbors() {
        let neighbors: Vec<Cell> = Cell::new(10, -3).neighbors().collect();
        assert_eq!(neighbors.len(), 8);
        assert!(!neighbors.contains(&Cell::new(10, -3)));
        assert!(neighbors.contains(&Cell::new(9, -4)));
        assert!(neighbors.contains(&Cell::new(11, -2)));
    }

    #[test]
    fn test_neighbors_at_the_coordinate_limit_do_not_wrap() {
        let edge = Cell::new(COORDINATE_LIMIT, -COORDINATE_LIMIT);
        let neighbors: Vec<Cell> = edge.neighbors().collect();
        assert!(neighbors.contains(&Cell::new(i32::MAX, -COORDINATE_LIMIT - 1)));
        assert!(neighbors.iter().all(|n| n.x >= COORDINATE_LIMIT - 1 && n.y <= -COORDINATE_LIMIT + 1));
    }
}
