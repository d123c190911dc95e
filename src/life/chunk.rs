//! Next-generation computation restricted to one slice of the live cells

use super::grid::canonicalize;
use super::rules::{candidate_neighbors, will_live};
use super::{Cell, SparseGrid};
use std::ops::Range;

/// Compute the part of the next generation contributed by `grid.cells()[range]`.
///
/// Returns the survivors from the range plus every birth adjacent to it,
/// sorted and duplicate-free. Neighbour counts always read the whole of
/// `grid`, so the result is exact even for cells at the edge of the range.
/// Only reads `grid`; safe to call from many threads on the same snapshot.
///
/// # Panics
///
/// Panics if `range` is out of bounds for the grid.
pub fn advance_chunk(grid: &SparseGrid, range: Range<usize>) -> Vec<Cell> {
    let chunk = &grid.cells()[range];

    let mut next: Vec<Cell> = chunk
        .iter()
        .copied()
        .filter(|&cell| will_live(grid, cell))
        .collect();

    next.extend(
        candidate_neighbors(chunk)
            .into_iter()
            .filter(|&cell| !grid.contains(cell) && will_live(grid, cell)),
    );

    canonicalize(&mut next);
    next
}
