//! Running seeds for many generations and checking the results

pub mod report;
pub mod runner;
pub mod verifier;

pub use report::{SimulationReport, Stability, StabilityTracker};
pub use runner::Simulation;
pub use verifier::{DeterminismVerifier, Divergence, VerificationResult, Variant};
