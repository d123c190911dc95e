//! Error types for the simulation core and seed loader

use std::path::PathBuf;
use thiserror::Error;

/// All kinds of errors produced by the library.
#[derive(Debug, Error)]
pub enum LifeError {
    /// The seed file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The seed stream is not valid Life 1.06.
    #[error("format error on line {line}: {message}")]
    Format { line: usize, message: String },

    /// A chunk task did not complete; the whole step is discarded.
    #[error("chunk task {chunk} failed: {message}")]
    TaskFailed { chunk: usize, message: String },

    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Cells handed over as canonical were unsorted or contained duplicates.
    #[error("cell sequence is not sorted and duplicate-free")]
    NonCanonical,
}

pub type Result<T> = std::result::Result<T, LifeError>;
