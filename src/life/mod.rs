//! Sparse Game of Life core

pub mod cell;
pub mod chunk;
pub mod engine;
pub mod grid;
pub mod io;
pub mod patterns;
pub mod rules;

pub use cell::{Cell, COORDINATE_LIMIT};
pub use chunk::advance_chunk;
pub use engine::{
    advance, Engine, EngineConfig, MergeStrategy, Scheduler, SequentialScheduler,
    ThreadPoolScheduler,
};
pub use grid::{contains, BoundingBox, SparseGrid};
pub use io::{create_example_seeds, load_seed_from_file, parse_life106, save_grid_to_file};
pub use rules::{candidate_neighbors, neighbor_count, will_live};
