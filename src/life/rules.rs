//! Neighbour counting and the B3/S23 liveness rule

use super::cell::NEIGHBOR_OFFSETS;
use super::{Cell, SparseGrid};

/// Neighbour counts at which a dead cell is born
pub const BIRTH_COUNTS: [u8; 1] = [3];

/// Neighbour counts at which a live cell survives
pub const SURVIVAL_COUNTS: [u8; 2] = [2, 3];

/// Check if a cell should be alive in the next generation given its current state and neighbor count
#[inline]
pub fn should_be_alive(current_state: bool, neighbor_count: u8) -> bool {
    matches!((current_state, neighbor_count), (true, 2) | (true, 3) | (false, 3))
}

/// Count live neighbours of `cell` in `grid`
pub fn neighbor_count(grid: &SparseGrid, cell: Cell) -> u8 {
    NEIGHBOR_OFFSETS
        .iter()
        .filter(|&&(dx, dy)| grid.contains(cell.offset(dx, dy)))
        .count() as u8
}

/// Whether `cell` is live in the generation after `grid`.
///
/// `grid` must be the whole previous generation, not a chunk of it.
pub fn will_live(grid: &SparseGrid, cell: Cell) -> bool {
    match neighbor_count(grid, cell) {
        3 => true,
        2 => grid.contains(cell),
        _ => false,
    }
}

/// Every coordinate adjacent to at least one of `cells`, sorted and deduplicated.
///
/// These are the only places a birth can happen next to this batch.
pub fn candidate_neighbors(cells: &[Cell]) -> Vec<Cell> {
    let mut candidates: Vec<Cell> = Vec::with_capacity(cells.len() * NEIGHBOR_OFFSETS.len());
    for cell in cells {
        candidates.extend(cell.neighbors());
    }
    candidates.sort_unstable();
    candidates.dedup();
    candidates
}
