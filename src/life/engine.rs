//! Parallel generation stepping: partition, fan out, merge

use super::chunk::advance_chunk;
use super::grid::canonicalize;
use super::{Cell, SparseGrid};
use crate::error::{LifeError, Result};
use itertools::Itertools;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};

/// Smallest chunk handed to a worker unless the whole grid is smaller
pub const DEFAULT_MIN_CHUNK_SIZE: usize = 64;

/// How per-chunk results are combined into the next generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Concatenate everything, then sort and deduplicate
    #[default]
    SortUnique,
    /// Lazily merge the already sorted chunk results, dropping repeats
    KWayMerge,
}

/// Runs a batch of independent jobs and returns their outputs in submission order.
///
/// Jobs only share read-only state captured by `job`; implementations are free
/// to run them in any order or in parallel.
pub trait Scheduler {
    fn map_jobs<I, O, F>(&self, inputs: Vec<I>, job: F) -> Vec<O>
    where
        I: Send,
        O: Send,
        F: Fn(I) -> O + Sync + Send;

    /// Number of jobs that can run at once
    fn parallelism(&self) -> usize;
}

/// Runs every job on the calling thread
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialScheduler;

impl Scheduler for SequentialScheduler {
    fn map_jobs<I, O, F>(&self, inputs: Vec<I>, job: F) -> Vec<O>
    where
        I: Send,
        O: Send,
        F: Fn(I) -> O + Sync + Send,
    {
        inputs.into_iter().map(job).collect()
    }

    fn parallelism(&self) -> usize {
        1
    }
}

/// Runs jobs on a rayon pool, either the global one or a dedicated one
#[derive(Debug)]
pub struct ThreadPoolScheduler {
    pool: Option<rayon::ThreadPool>,
}

impl ThreadPoolScheduler {
    /// Use rayon's global pool, sized to the detected hardware parallelism
    pub fn global() -> Self {
        Self { pool: None }
    }

    /// Build a dedicated pool; `threads == 0` means one thread per hardware thread
    pub fn with_threads(threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("life-worker-{}", i))
            .build()?;
        Ok(Self { pool: Some(pool) })
    }
}

impl Scheduler for ThreadPoolScheduler {
    fn map_jobs<I, O, F>(&self, inputs: Vec<I>, job: F) -> Vec<O>
    where
        I: Send,
        O: Send,
        F: Fn(I) -> O + Sync + Send,
    {
        let run = || -> Vec<O> { inputs.into_par_iter().map(job).collect() };
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }

    fn parallelism(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }
}

/// Engine tuning knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Worker threads; 0 uses the detected hardware parallelism
    pub workers: usize,
    pub min_chunk_size: usize,
    pub merge: MergeStrategy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            min_chunk_size: DEFAULT_MIN_CHUNK_SIZE,
            merge: MergeStrategy::SortUnique,
        }
    }
}

/// Steps a [`SparseGrid`] forward one generation at a time.
///
/// The previous generation is shared read-only between all chunk jobs; each
/// job writes only its own output vector, and the results are merged after
/// every job has finished. The output does not depend on the chunking or on
/// the order in which jobs complete.
#[derive(Debug)]
pub struct Engine<S = ThreadPoolScheduler> {
    scheduler: S,
    min_chunk_size: usize,
    merge: MergeStrategy,
}

impl Engine<ThreadPoolScheduler> {
    /// Create an engine from its configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        let scheduler = if config.workers == 0 {
            ThreadPoolScheduler::global()
        } else {
            ThreadPoolScheduler::with_threads(config.workers)?
        };
        Ok(Self::with_scheduler(scheduler, config))
    }
}

impl Engine<SequentialScheduler> {
    /// Single-threaded reference engine
    pub fn sequential() -> Self {
        Self::with_scheduler(SequentialScheduler, EngineConfig::default())
    }
}

impl Default for Engine<ThreadPoolScheduler> {
    fn default() -> Self {
        Self::with_scheduler(ThreadPoolScheduler::global(), EngineConfig::default())
    }
}

impl<S: Scheduler> Engine<S> {
    /// Create an engine on top of an arbitrary scheduler. `config.workers` is ignored.
    pub fn with_scheduler(scheduler: S, config: EngineConfig) -> Self {
        Self {
            scheduler,
            min_chunk_size: config.min_chunk_size.max(1),
            merge: config.merge,
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn merge_strategy(&self) -> MergeStrategy {
        self.merge
    }

    /// Chunk size this engine would use for a grid of `len` live cells
    pub fn chunk_size(&self, len: usize) -> usize {
        chunk_size_for(len, self.scheduler.parallelism(), self.min_chunk_size)
    }

    /// Compute the next generation
    pub fn advance(&self, grid: &SparseGrid) -> Result<SparseGrid> {
        self.advance_partitioned(grid, self.chunk_size(grid.len()))
    }

    /// Compute the next generation with an explicit chunk size
    pub fn advance_partitioned(&self, grid: &SparseGrid, chunk_size: usize) -> Result<SparseGrid> {
        let chunks = partition(grid.len(), chunk_size);
        debug!(
            "advancing {} live cells in {} chunk(s) of up to {}",
            grid.len(),
            chunks.len(),
            chunk_size
        );

        let parts = run_chunk_jobs(&self.scheduler, chunks, |range| advance_chunk(grid, range))?;
        Ok(merge_chunks(parts, self.merge))
    }

    /// Advance `generations` times, returning the final generation
    pub fn advance_n(&self, grid: &SparseGrid, generations: usize) -> Result<SparseGrid> {
        let mut current = grid.clone();
        for _ in 0..generations {
            current = self.advance(&current)?;
        }
        Ok(current)
    }
}

/// Step `grid` one generation using the global worker pool and default settings
pub fn advance(grid: &SparseGrid) -> Result<SparseGrid> {
    Engine::<ThreadPoolScheduler>::default().advance(grid)
}

/// Cells per chunk for `len` live cells spread over `workers` workers
pub fn chunk_size_for(len: usize, workers: usize, min_chunk_size: usize) -> usize {
    (len / workers.max(1)).max(min_chunk_size).max(1)
}

/// Split `0..len` into contiguous ranges of `chunk_size`, the last one possibly shorter
pub fn partition(len: usize, chunk_size: usize) -> Vec<Range<usize>> {
    let chunk_size = chunk_size.max(1);
    (0..len)
        .step_by(chunk_size)
        .map(|start| start..(start + chunk_size).min(len))
        .collect()
}

/// Combine canonical chunk results into one canonical grid
pub fn merge_chunks(parts: Vec<Vec<Cell>>, strategy: MergeStrategy) -> SparseGrid {
    match strategy {
        MergeStrategy::SortUnique => {
            let mut cells: Vec<Cell> = Vec::with_capacity(parts.iter().map(Vec::len).sum());
            for part in parts {
                cells.extend(part);
            }
            canonicalize(&mut cells);
            SparseGrid::from_sorted_unchecked(cells)
        }
        MergeStrategy::KWayMerge => {
            let cells: Vec<Cell> = parts.into_iter().kmerge().dedup().collect();
            SparseGrid::from_sorted_unchecked(cells)
        }
    }
}

/// Run one job per chunk, turning a panicking job into [`LifeError::TaskFailed`].
///
/// A missing chunk would silently drop cells, so any failure fails the whole batch.
fn run_chunk_jobs<S, F>(scheduler: &S, chunks: Vec<Range<usize>>, job: F) -> Result<Vec<Vec<Cell>>>
where
    S: Scheduler,
    F: Fn(Range<usize>) -> Vec<Cell> + Sync + Send,
{
    scheduler
        .map_jobs(chunks.into_iter().enumerate().collect::<Vec<_>>(), |(index, range)| {
            panic::catch_unwind(AssertUnwindSafe(|| job(range))).map_err(|payload| {
                LifeError::TaskFailed {
                    chunk: index,
                    message: panic_message(payload.as_ref()),
                }
            })
        })
        .into_iter()
        .collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
