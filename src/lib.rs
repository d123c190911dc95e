//! Sparse Game of Life
//!
//! A parallel stepping engine for Conway's Game of Life on an unbounded grid.
//! A generation is a sorted, duplicate-free list of live cells; each step
//! splits that list into chunks, evaluates the chunks on worker threads
//! against the shared previous generation and merges the partial results.

pub mod config;
pub mod error;
pub mod life;
pub mod simulation;
pub mod utils;

pub use config::Settings;
pub use error::LifeError;
pub use life::{advance, Cell, Engine, EngineConfig, SparseGrid};
pub use simulation::{Simulation, SimulationReport};

use anyhow::{Context, Result};

/// Load the configured seed and run it for the configured number of generations
pub fn run_simulation(settings: &Settings) -> Result<(SparseGrid, SimulationReport)> {
    let seed = life::load_seed_from_file(&settings.input.seed_file)
        .with_context(|| format!("Failed to load seed {}", settings.input.seed_file.display()))?;
    let mut simulation = Simulation::new(seed, settings.engine_config())?;
    let report = simulation.run(settings.simulation.generations)?;
    Ok((simulation.grid().clone(), report))
}
