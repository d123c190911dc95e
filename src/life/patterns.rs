//! Well-known reference patterns, in screen coordinates (y grows downward)

use super::{Cell, SparseGrid};

fn from_coords(coords: &[(i32, i32)]) -> SparseGrid {
    coords.iter().map(|&c| Cell::from(c)).collect()
}

/// 2x2 still life
pub fn block() -> SparseGrid {
    from_coords(&[(0, 0), (1, 0), (0, 1), (1, 1)])
}

/// Period 2 oscillator, horizontal phase
pub fn blinker() -> SparseGrid {
    from_coords(&[(1, 0), (2, 0), (3, 0)])
}

/// Period 2 oscillator made of two diagonal blocks
pub fn beacon() -> SparseGrid {
    from_coords(&[(0, 0), (1, 0), (0, 1), (1, 1), (2, 2), (3, 2), (2, 3), (3, 3)])
}

/// Period 4 spaceship travelling one cell right and down per period
pub fn glider() -> SparseGrid {
    from_coords(&[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)])
}

/// Methuselah that settles after 1103 generations
pub fn r_pentomino() -> SparseGrid {
    from_coords(&[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)])
}

/// Every bundled pattern with its file stem
pub fn all() -> Vec<(&'static str, SparseGrid)> {
    vec![
        ("glider", glider()),
        ("blinker", blinker()),
        ("block", block()),
        ("beacon", beacon()),
        ("r_pentomino", r_pentomino()),
    ]
}

/// Look up a bundled pattern by name
pub fn by_name(name: &str) -> Option<SparseGrid> {
    all()
        .into_iter()
        .find(|(pattern, _)| *pattern == name)
        .map(|(_, grid)| grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_populations() {
        assert_eq!(block().len(), 4);
        assert_eq!(blinker().len(), 3);
        assert_eq!(beacon().len(), 8);
        assert_eq!(glider().len(), 5);
        assert_eq!(r_pentomino().len(), 5);
    }

    #[test]
    fn test_by_name() {
        assert_eq!(by_name("glider"), Some(glider()));
        assert_eq!(by_name("gosper_gun"), None);
    }
}
