//! Reading and writing seeds in the Life 1.06 format
//!
//! Format: the first line is exactly `#Life 1.06`, followed by whitespace
//! separated `x y` integer pairs, one live cell each. The file's y axis
//! points up, so y is negated on load and negated back on save.

use super::cell::COORDINATE_LIMIT;
use super::{patterns, Cell, SparseGrid};
use crate::error::{LifeError, Result};
use log::info;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Required first line of every seed file
pub const LIFE_106_HEADER: &str = "#Life 1.06";

/// Load a seed file into a canonical grid
pub fn load_seed_from_file<P: AsRef<Path>>(path: P) -> Result<SparseGrid> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| LifeError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let grid = parse_life106(&content)?;
    info!("loaded {} live cells from {}", grid.len(), path.display());
    Ok(grid)
}

/// Parse a Life 1.06 document
pub fn parse_life106(content: &str) -> Result<SparseGrid> {
    let mut lines = content.lines().enumerate();

    match lines.next() {
        Some((_, header)) if header.trim_end_matches('\r') == LIFE_106_HEADER => {}
        Some((_, header)) => {
            return Err(LifeError::Format {
                line: 1,
                message: format!("expected header '{}', found '{}'", LIFE_106_HEADER, header),
            })
        }
        None => {
            return Err(LifeError::Format {
                line: 1,
                message: "empty stream, missing header".to_string(),
            })
        }
    }

    let mut cells = Vec::new();
    // An x waiting for its y, possibly from an earlier line.
    let mut pending_x: Option<(usize, i32)> = None;

    for (index, line) in lines {
        let line_number = index + 1;
        for token in line.split_whitespace() {
            let value: i32 = token.parse().map_err(|_| LifeError::Format {
                line: line_number,
                message: format!("'{}' is not a valid coordinate", token),
            })?;
            // Also keeps the y negation below from overflowing.
            if !(-COORDINATE_LIMIT..=COORDINATE_LIMIT).contains(&value) {
                return Err(LifeError::Format {
                    line: line_number,
                    message: format!(
                        "coordinate {} is outside the supported range ±{}",
                        value, COORDINATE_LIMIT
                    ),
                });
            }

            match pending_x.take() {
                None => pending_x = Some((line_number, value)),
                Some((_, x)) => cells.push(Cell::new(x, -value)),
            }
        }
    }

    if let Some((line, x)) = pending_x {
        return Err(LifeError::Format {
            line,
            message: format!("x coordinate {} has no matching y", x),
        });
    }

    Ok(SparseGrid::from_cells(cells))
}

/// Render a grid as a Life 1.06 document
pub fn life106_to_string(grid: &SparseGrid) -> String {
    let mut result = String::with_capacity(LIFE_106_HEADER.len() + 1 + grid.len() * 8);
    result.push_str(LIFE_106_HEADER);
    result.push('\n');

    for cell in grid {
        // Writing into a String cannot fail.
        let _ = writeln!(result, "{} {}", cell.x, -i64::from(cell.y));
    }

    result
}

/// Save a grid to a Life 1.06 file, creating parent directories
pub fn save_grid_to_file<P: AsRef<Path>>(grid: &SparseGrid, path: P) -> Result<()> {
    let path = path.as_ref();
    let io_error = |source| LifeError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(path, life106_to_string(grid)).map_err(io_error)?;

    info!("saved {} live cells to {}", grid.len(), path.display());
    Ok(())
}

/// Write the bundled example seeds into `output_dir`.
///
/// Existing files are left alone unless `overwrite` is set. Returns the paths written.
pub fn create_example_seeds<P: AsRef<Path>>(output_dir: P, overwrite: bool) -> Result<Vec<PathBuf>> {
    let dir = output_dir.as_ref();
    let mut written = Vec::new();
    for (name, grid) in patterns::all() {
        let path = dir.join(format!("{}.lif", name));
        if path.exists() && !overwrite {
            info!("keeping existing seed {}", path.display());
            continue;
        }
        save_grid_to_file(&grid, &path)?;
        written.push(path);
    }
    Ok(written)
}
