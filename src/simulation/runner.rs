//! Multi-generation driver on top of the stepping engine

use super::report::{SimulationReport, Stability, StabilityTracker};
use crate::life::{Engine, EngineConfig, Scheduler, SparseGrid, ThreadPoolScheduler};
use anyhow::{anyhow, Context, Result};
use log::debug;
use std::time::{Duration, Instant};

/// Owns the current generation and steps it with an [`Engine`]
#[derive(Debug)]
pub struct Simulation<S = ThreadPoolScheduler> {
    engine: Engine<S>,
    current: SparseGrid,
    generation: usize,
    populations: Vec<usize>,
    tracker: StabilityTracker,
    stability: Stability,
    elapsed: Duration,
}

impl Simulation<ThreadPoolScheduler> {
    /// Create a simulation from a seed and engine settings
    pub fn new(seed: SparseGrid, config: EngineConfig) -> Result<Self> {
        let engine = Engine::new(config).context("Failed to create simulation engine")?;
        Ok(Self::with_engine(seed, engine))
    }
}

impl<S: Scheduler> Simulation<S> {
    pub fn with_engine(seed: SparseGrid, engine: Engine<S>) -> Self {
        let mut tracker = StabilityTracker::new();
        let stability = tracker.observe(&seed);
        Self {
            engine,
            populations: vec![seed.len()],
            current: seed,
            generation: 0,
            tracker,
            stability,
            elapsed: Duration::ZERO,
        }
    }

    /// The current generation
    pub fn grid(&self) -> &SparseGrid {
        &self.current
    }

    /// Generations stepped since the seed
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn stability(&self) -> Stability {
        self.stability
    }

    pub fn engine(&self) -> &Engine<S> {
        &self.engine
    }

    /// Advance one generation. On failure the current generation is kept.
    pub fn step(&mut self) -> Result<&SparseGrid> {
        let start = Instant::now();
        let next = self
            .engine
            .advance(&self.current)
            .with_context(|| format!("Failed to compute generation {}", self.generation + 1))?;
        self.publish(next, start.elapsed());
        Ok(&self.current)
    }

    /// Advance `generations` times and summarise the whole run so far
    pub fn run(&mut self, generations: usize) -> Result<SimulationReport> {
        for _ in 0..generations {
            self.step()?;
        }
        Ok(self.report())
    }

    /// Summary of everything stepped so far
    pub fn report(&self) -> SimulationReport {
        SimulationReport {
            generations: self.generation,
            initial_population: self.populations.first().copied().unwrap_or(0),
            final_population: self.current.len(),
            peak_population: self.populations.iter().copied().max().unwrap_or(0),
            populations: self.populations.clone(),
            final_bounding_box: self.current.bounding_box(),
            stability: self.stability,
            elapsed: self.elapsed,
            elapsed_ms: self.elapsed.as_millis() as u64,
        }
    }

    fn publish(&mut self, next: SparseGrid, step_time: Duration) {
        self.current = next;
        self.generation += 1;
        self.elapsed += step_time;
        self.populations.push(self.current.len());
        self.stability = self.tracker.observe(&self.current);
        debug!(
            "generation {}: {} live cells ({:?})",
            self.generation,
            self.current.len(),
            step_time
        );
    }
}

impl<S: Scheduler + Sync> Simulation<S> {
    /// Double-buffered run.
    ///
    /// While generation N+1 is computed on a scoped worker thread, `consumer`
    /// reads generation N on the calling thread. The new generation replaces
    /// the current one only after its computation has joined, so the consumer
    /// never sees a partial grid. `consumer` is called for every generation
    /// from the current one up to and including the last.
    pub fn run_pipelined<F>(&mut self, generations: usize, mut consumer: F) -> Result<SimulationReport>
    where
        F: FnMut(usize, &SparseGrid),
    {
        for _ in 0..generations {
            let engine = &self.engine;
            let current = &self.current;
            let generation = self.generation;

            let (next, step_time) = std::thread::scope(|scope| {
                let worker = scope.spawn(move || {
                    let start = Instant::now();
                    let next = engine.advance(current);
                    (next, start.elapsed())
                });
                consumer(generation, current);
                worker.join()
            })
            .map_err(|_| anyhow!("Worker for generation {} panicked", generation + 1))?;

            let next = next
                .with_context(|| format!("Failed to compute generation {}", generation + 1))?;
            self.publish(next, step_time);
        }

        consumer(self.generation, &self.current);
        Ok(self.report())
    }
}
