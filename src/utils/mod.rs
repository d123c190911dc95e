//! Console and file output helpers

pub mod display;

pub use display::{Console, GridFormatter, ProgressIndicator, Tone, PROGRESS_INTERVAL};
