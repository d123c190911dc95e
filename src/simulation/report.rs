//! Run summaries and long-term behaviour detection

use crate::life::{BoundingBox, SparseGrid};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

/// How many past generations are kept for period detection
pub const HISTORY_LEN: usize = 16;

/// Long-term behaviour observed so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stability {
    /// No repetition found within the history window
    Evolving,
    Extinct,
    StillLife,
    Oscillator { period: usize },
    /// Repeats its shape displaced by `(dx, dy)` every `period` generations
    Spaceship { period: usize, dx: i32, dy: i32 },
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stability::Evolving => write!(f, "Evolving"),
            Stability::Extinct => write!(f, "Extinct"),
            Stability::StillLife => write!(f, "Still Life"),
            Stability::Oscillator { period } => write!(f, "Oscillator (period {})", period),
            Stability::Spaceship { period, dx, dy } => {
                write!(f, "Spaceship (period {}, moves ({}, {}))", period, dx, dy)
            }
        }
    }
}

/// Bounded window of recent generations used to classify a run
#[derive(Debug, Clone, Default)]
pub struct StabilityTracker {
    history: VecDeque<SparseGrid>,
}

impl StabilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `grid` as the newest generation and classify it against the window
    pub fn observe(&mut self, grid: &SparseGrid) -> Stability {
        let stability = self.classify(grid);
        if self.history.len() == HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(grid.clone());
        stability
    }

    fn classify(&self, grid: &SparseGrid) -> Stability {
        if grid.is_empty() {
            return Stability::Extinct;
        }

        // Newest first, so the first match is the smallest period.
        for (period, past) in (1..).zip(self.history.iter().rev()) {
            if past.len() != grid.len() {
                continue;
            }
            if past == grid {
                return if period == 1 {
                    Stability::StillLife
                } else {
                    Stability::Oscillator { period }
                };
            }
            if let (Some(before), Some(after)) = (past.bounding_box(), grid.bounding_box()) {
                let dx = after.min_x.wrapping_sub(before.min_x);
                let dy = after.min_y.wrapping_sub(before.min_y);
                if past.translated(dx, dy) == *grid {
                    return Stability::Spaceship { period, dx, dy };
                }
            }
        }

        Stability::Evolving
    }
}

/// Summary of a simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Generations stepped since the seed
    pub generations: usize,
    pub initial_population: usize,
    pub final_population: usize,
    pub peak_population: usize,
    /// Population per generation, starting with the seed
    pub populations: Vec<usize>,
    pub final_bounding_box: Option<BoundingBox>,
    pub stability: Stability,
    #[serde(skip)]
    pub elapsed: Duration,
    pub elapsed_ms: u64,
}

impl SimulationReport {
    /// Mean wall-clock time per generation
    pub fn average_step_time(&self) -> Duration {
        if self.generations == 0 {
            Duration::ZERO
        } else {
            self.elapsed.div_f64(self.generations as f64)
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation Report:")?;
        writeln!(f, "  Generations: {}", self.generations)?;
        writeln!(
            f,
            "  Population: {} → {} (peak {})",
            self.initial_population, self.final_population, self.peak_population
        )?;
        match &self.final_bounding_box {
            Some(bounds) => writeln!(f, "  Bounding box: {}", bounds)?,
            None => writeln!(f, "  Bounding box: none")?,
        }
        writeln!(f, "  Behaviour: {}", self.stability)?;
        writeln!(
            f,
            "  Time: {:.3}s ({:.3}ms per generation)",
            self.elapsed.as_secs_f64(),
            self.average_step_time().as_secs_f64() * 1000.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::life::{patterns, Cell};

    fn row(len: i32) -> SparseGrid {
        (0..len).map(|x| Cell::new(x, 0)).collect()
    }

    #[test]
    fn test_still_life() {
        let mut tracker = StabilityTracker::new();
        assert_eq!(tracker.observe(&patterns::block()), Stability::Evolving);
        assert_eq!(tracker.observe(&patterns::block()), Stability::StillLife);
    }

    #[test]
    fn test_oscillator_and_extinction() {
        let mut tracker = StabilityTracker::new();
        let horizontal = patterns::blinker();
        let vertical = SparseGrid::from_cells(vec![Cell::new(2, -1), Cell::new(2, 0), Cell::new(2, 1)]);
        tracker.observe(&horizontal);
        tracker.observe(&vertical);
        assert_eq!(tracker.observe(&horizontal), Stability::Oscillator { period: 2 });
        assert_eq!(tracker.observe(&SparseGrid::new()), Stability::Extinct);
    }

    #[test]
    fn test_spaceship_displacement() {
        let mut tracker = StabilityTracker::new();
        let glider = patterns::glider();
        tracker.observe(&glider);
        assert_eq!(
            tracker.observe(&glider.translated(1, 1)),
            Stability::Spaceship { period: 1, dx: 1, dy: 1 }
        );
    }

    #[test]
    fn test_history_is_bounded() {
        let mut tracker = StabilityTracker::new();
        tracker.observe(&row(1));
        for len in 2..=(HISTORY_LEN as i32 + 1) {
            tracker.observe(&row(len));
        }
        assert_eq!(tracker.history.len(), HISTORY_LEN);
        // The single cell fell out of the window, so no repetition is found.
        assert_eq!(tracker.observe(&row(1)), Stability::Evolving);
    }

    fn report_with(generations: usize, elapsed: Duration) -> SimulationReport {
        SimulationReport {
            generations,
            initial_population: 0,
            final_population: 0,
            peak_population: 0,
            populations: Vec::new(),
            final_bounding_box: None,
            stability: Stability::Extinct,
            elapsed,
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }

    #[test]
    fn test_average_step_time() {
        assert_eq!(report_with(0, Duration::from_secs(3)).average_step_time(), Duration::ZERO);
        assert_eq!(
            report_with(8, Duration::from_secs(1)).average_step_time(),
            Duration::from_millis(125)
        );
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_average_step_time_beyond_u32_generations() {
        let report = report_with(1 << 32, Duration::from_secs(1 << 32));
        assert_eq!(report.average_step_time(), Duration::from_secs(1));
    }
}
