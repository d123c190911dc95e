//! Sparse grid representation of one generation

use super::Cell;
use crate::error::{LifeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// The set of live cells of one generation.
///
/// Cells are stored strictly ascending with no duplicates. Every constructor
/// either canonicalizes or checks the input, so membership tests can rely on
/// binary search. A grid is never mutated once built; stepping produces a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Cell>", into = "Vec<Cell>")]
pub struct SparseGrid {
    cells: Vec<Cell>,
}

/// Inclusive bounds of the live cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl BoundingBox {
    pub fn width(&self) -> u64 {
        (i64::from(self.max_x) - i64::from(self.min_x) + 1) as u64
    }

    pub fn height(&self) -> u64 {
        (i64::from(self.max_y) - i64::from(self.min_y) + 1) as u64
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}..={}] x [{}..={}] ({}x{})",
            self.min_x,
            self.max_x,
            self.min_y,
            self.max_y,
            self.width(),
            self.height()
        )
    }
}

impl SparseGrid {
    /// Create an empty grid
    pub fn new() -> Self {
        Self { cells: Vec::new() }
    }

    /// Build a grid from cells in any order, sorting and removing duplicates
    pub fn from_cells<I: IntoIterator<Item = Cell>>(cells: I) -> Self {
        let mut cells: Vec<Cell> = cells.into_iter().collect();
        canonicalize(&mut cells);
        Self { cells }
    }

    /// Wrap cells that are already sorted and duplicate-free, checking that they are
    pub fn try_from_sorted(cells: Vec<Cell>) -> Result<Self> {
        if is_canonical(&cells) {
            Ok(Self { cells })
        } else {
            Err(LifeError::NonCanonical)
        }
    }

    /// Wrap cells the caller guarantees to be canonical.
    ///
    /// Only checked in debug builds; a non-canonical input makes membership
    /// tests and stepping return garbage.
    pub fn from_sorted_unchecked(cells: Vec<Cell>) -> Self {
        debug_assert!(is_canonical(&cells), "cells are not canonical");
        Self { cells }
    }

    /// Whether `cell` is live
    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.binary_search(&cell).is_ok()
    }

    /// Number of live cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Live cells in ascending order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    /// Smallest rectangle containing every live cell, `None` for an empty grid
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = self.cells.first()?;
        let last = self.cells.last()?;
        // x is the primary sort key, so the x extent comes from the ends.
        let (min_y, max_y) = self
            .cells
            .iter()
            .fold((i32::MAX, i32::MIN), |(lo, hi), c| (lo.min(c.y), hi.max(c.y)));
        Some(BoundingBox {
            min_x: first.x,
            min_y,
            max_x: last.x,
            max_y,
        })
    }

    /// The same pattern shifted by `(dx, dy)`
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        // A uniform shift keeps the lexicographic order.
        Self::from_sorted_unchecked(self.cells.iter().map(|c| c.offset(dx, dy)).collect())
    }

    /// The pattern moved so its bounding box starts at the origin
    pub fn normalized(&self) -> Self {
        match self.bounding_box() {
            Some(bounds) => self.translated(-bounds.min_x, -bounds.min_y),
            None => Self::new(),
        }
    }
}

/// Whether `grid` holds `cell`. Free-function form of [`SparseGrid::contains`].
pub fn contains(grid: &SparseGrid, cell: Cell) -> bool {
    grid.contains(cell)
}

/// Sort ascending and drop duplicates in place
pub fn canonicalize(cells: &mut Vec<Cell>) {
    cells.sort_unstable();
    cells.dedup();
}

/// Whether `cells` is strictly ascending
pub fn is_canonical(cells: &[Cell]) -> bool {
    cells.windows(2).all(|pair| pair[0] < pair[1])
}

impl From<Vec<Cell>> for SparseGrid {
    fn from(cells: Vec<Cell>) -> Self {
        Self::from_cells(cells)
    }
}

impl From<SparseGrid> for Vec<Cell> {
    fn from(grid: SparseGrid) -> Self {
        grid.cells
    }
}

impl FromIterator<Cell> for SparseGrid {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Self::from_cells(iter)
    }
}

impl<'a> IntoIterator for &'a SparseGrid {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

impl Index<usize> for SparseGrid {
    type Output = Cell;

    fn index(&self, index: usize) -> &Cell {
        &self.cells[index]
    }
}

impl fmt::Display for SparseGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(bounds) = self.bounding_box() else {
            return writeln!(f, "(empty)");
        };
        for y in bounds.min_y..=bounds.max_y {
            for x in bounds.min_x..=bounds.max_x {
                let symbol = if self.contains(Cell::new(x, y)) { "⬛" } else { "⬜" };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(coords: &[(i32, i32)]) -> Vec<Cell> {
        coords.iter().map(|&c| Cell::from(c)).collect()
    }

    #[test]
    fn test_from_cells_canonicalizes() {
        let grid = SparseGrid::from_cells(cells(&[(1, 0), (0, 1), (1, 0), (0, 0), (0, 1)]));
        assert_eq!(grid.cells(), cells(&[(0, 0), (0, 1), (1, 0)]).as_slice());
        assert_eq!(grid.len(), 3);
        assert!(is_canonical(grid.cells()));
    }

    #[test]
    fn test_contains() {
        let grid = SparseGrid::from_cells(cells(&[(-5, 2), (0, 0), (3, -7)]));
        assert!(grid.contains(Cell::new(-5, 2)));
        assert!(contains(&grid, Cell::new(3, -7)));
        assert!(!grid.contains(Cell::new(0, 1)));
        assert!(!SparseGrid::new().contains(Cell::new(0, 0)));
    }

    #[test]
    fn test_try_from_sorted() {
        assert!(SparseGrid::try_from_sorted(cells(&[(0, 0), (0, 1)])).is_ok());
        assert!(matches!(
            SparseGrid::try_from_sorted(cells(&[(0, 1), (0, 0)])),
            Err(LifeError::NonCanonical)
        ));
        assert!(matches!(
            SparseGrid::try_from_sorted(cells(&[(0, 0), (0, 0)])),
            Err(LifeError::NonCanonical)
        ));
    }

    #[test]
    fn test_bounding_box() {
        assert_eq!(SparseGrid::new().bounding_box(), None);

        let grid = SparseGrid::from_cells(cells(&[(-2, 5), (0, -1), (4, 3)]));
        let bounds = grid.bounding_box().unwrap();
        assert_eq!(
            bounds,
            BoundingBox { min_x: -2, min_y: -1, max_x: 4, max_y: 5 }
        );
        assert_eq!(bounds.width(), 7);
        assert_eq!(bounds.height(), 7);
    }

    #[test]
    fn test_translate_and_normalize() {
        let grid = SparseGrid::from_cells(cells(&[(3, 4), (4, 4)]));
        assert_eq!(grid.translated(-3, 1).cells(), cells(&[(0, 5), (1, 5)]).as_slice());
        assert_eq!(grid.normalized().cells(), cells(&[(0, 0), (1, 0)]).as_slice());
    }

    #[test]
    fn test_serde_canonicalizes() {
        let grid: SparseGrid =
            serde_json::from_str(r#"[{"x":1,"y":0},{"x":0,"y":0},{"x":1,"y":0}]"#).unwrap();
        assert_eq!(grid.cells(), cells(&[(0, 0), (1, 0)]).as_slice());

        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, r#"[{"x":0,"y":0},{"x":1,"y":0}]"#);
    }

    #[test]
    fn test_display() {
        let grid = SparseGrid::from_cells(cells(&[(0, 0), (1, 1)]));
        assert_eq!(grid.to_string(), "⬛⬜\n⬜⬛\n");
        assert_eq!(SparseGrid::new().to_string(), "(empty)\n");
    }
}
