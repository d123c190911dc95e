//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::life::{save_grid_to_file, Cell, SparseGrid};
use crate::simulation::SimulationReport;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Grids wider or taller than this are summarised instead of drawn
pub const MAX_RENDER_EXTENT: u64 = 120;

/// Format grids and run results for display
pub struct GridFormatter;

impl GridFormatter {
    /// Format a grid in compact form over its bounding box
    pub fn format_grid_compact(grid: &SparseGrid) -> String {
        let Some(bounds) = grid.bounding_box() else {
            return "(empty)\n".to_string();
        };
        if bounds.width() > MAX_RENDER_EXTENT || bounds.height() > MAX_RENDER_EXTENT {
            return format!("({} live cells in {}, too large to draw)\n", grid.len(), bounds);
        }

        let mut output = String::new();
        for y in bounds.min_y..=bounds.max_y {
            for x in bounds.min_x..=bounds.max_x {
                output.push(if grid.contains(Cell::new(x, y)) { '█' } else { '·' });
            }
            output.push('\n');
        }
        output
    }

    /// Format a grid with coordinates
    pub fn format_grid_with_coords(grid: &SparseGrid) -> String {
        let Some(bounds) = grid.bounding_box() else {
            return "(empty)\n".to_string();
        };
        if bounds.width() > MAX_RENDER_EXTENT || bounds.height() > MAX_RENDER_EXTENT {
            return Self::format_grid_compact(grid);
        }

        let mut output = String::new();

        // Header with column numbers
        output.push_str("     ");
        for x in bounds.min_x..=bounds.max_x {
            output.push_str(&format!("{:2}", x.rem_euclid(10)));
        }
        output.push('\n');

        // Rows with row numbers
        for y in bounds.min_y..=bounds.max_y {
            output.push_str(&format!("{:4} ", y));
            for x in bounds.min_x..=bounds.max_x {
                output.push_str(if grid.contains(Cell::new(x, y)) { "██" } else { "··" });
            }
            output.push('\n');
        }

        output
    }

    /// One-line population summary
    pub fn format_summary(generation: usize, grid: &SparseGrid) -> String {
        match grid.bounding_box() {
            Some(bounds) => format!(
                "Generation {}: {} live cells in {}",
                generation,
                grid.len(),
                bounds
            ),
            None => format!("Generation {}: no live cells", generation),
        }
    }

    /// Save the final grid and the report based on output format.
    ///
    /// Returns the paths written.
    pub fn save_run<P: AsRef<Path>>(
        grid: &SparseGrid,
        report: &SimulationReport,
        output_dir: P,
        format: OutputFormat,
    ) -> Result<Vec<PathBuf>> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

        let mut written = Vec::new();
        match format {
            OutputFormat::Text => {
                let path = output_dir.join("final.txt");
                let content = format!(
                    "{}\n{}",
                    report,
                    Self::format_grid_with_coords(grid)
                );
                std::fs::write(&path, content)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                written.push(path);
            }
            OutputFormat::Json => {
                let grid_path = output_dir.join("final.json");
                let grid_json = serde_json::to_string_pretty(grid)?;
                std::fs::write(&grid_path, grid_json)
                    .with_context(|| format!("Failed to write {}", grid_path.display()))?;
                written.push(grid_path);

                let report_path = output_dir.join("report.json");
                std::fs::write(&report_path, report.to_json()?)
                    .with_context(|| format!("Failed to write {}", report_path.display()))?;
                written.push(report_path);
            }
            OutputFormat::Life106 => {
                let grid_path = output_dir.join("final.lif");
                save_grid_to_file(grid, &grid_path)?;
                written.push(grid_path);

                let report_path = output_dir.join("report.txt");
                std::fs::write(&report_path, report.to_string())
                    .with_context(|| format!("Failed to write {}", report_path.display()))?;
                written.push(report_path);
            }
        }

        Ok(written)
    }
}

/// Generations between two throughput samples
pub const PROGRESS_INTERVAL: usize = 50;

/// Throughput readout for a running simulation.
///
/// Every `interval` generations (and on the last one) it samples how many
/// generations per second were sustained since the previous sample.
pub struct ProgressIndicator {
    total: usize,
    interval: usize,
    sample_generation: usize,
    sample_time: Instant,
    start_time: Instant,
}

impl ProgressIndicator {
    pub fn new(total: usize) -> Self {
        Self::with_interval(total, PROGRESS_INTERVAL)
    }

    pub fn with_interval(total: usize, interval: usize) -> Self {
        let now = Instant::now();
        Self {
            total,
            interval: interval.max(1),
            sample_generation: 0,
            sample_time: now,
            start_time: now,
        }
    }

    /// Status line for `generation`, or `None` between samples
    pub fn update(&mut self, generation: usize, population: usize) -> Option<String> {
        if generation == 0 || (generation % self.interval != 0 && generation != self.total) {
            return None;
        }

        let now = Instant::now();
        let stepped = generation.saturating_sub(self.sample_generation);
        let rate = generations_per_second(stepped, now.duration_since(self.sample_time));
        self.sample_generation = generation;
        self.sample_time = now;

        Some(format!(
            "Generation {}/{}: {} live cells, {}",
            generation,
            self.total,
            population,
            format_rate(rate)
        ))
    }

    /// Closing line with the mean rate over the whole run
    pub fn summary(&self, population: usize) -> String {
        let elapsed = self.start_time.elapsed();
        format!(
            "Completed {} generations in {:.1}s ({}), {} live cells",
            self.total,
            elapsed.as_secs_f64(),
            format_rate(generations_per_second(self.total, elapsed)),
            population
        )
    }
}

fn generations_per_second(generations: usize, elapsed: Duration) -> Option<f64> {
    let seconds = elapsed.as_secs_f64();
    (seconds > 0.0).then(|| generations as f64 / seconds)
}

fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{:.1} gen/s", rate),
        None => "-- gen/s".to_string(),
    }
}

/// Kind of console message; picks its colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Warning,
    Failure,
}

impl Tone {
    fn ansi_code(self) -> u8 {
        match self {
            Tone::Failure => 31,
            Tone::Success => 32,
            Tone::Warning => 33,
            Tone::Info => 34,
        }
    }
}

/// Console message styling, decided once per command
#[derive(Debug, Clone, Copy)]
pub struct Console {
    color: bool,
}

impl Console {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Colour unless `NO_COLOR` is set or the terminal is `dumb`
    pub fn from_env() -> Self {
        let dumb = std::env::var("TERM").map_or(false, |term| term == "dumb");
        Self::new(std::env::var_os("NO_COLOR").is_none() && !dumb)
    }

    pub fn paint(&self, tone: Tone, text: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", tone.ansi_code(), text)
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::life::{patterns, Engine};
    use crate::simulation::Simulation;
    use tempfile::tempdir;

    #[test]
    fn test_grid_formatting() {
        let grid = patterns::glider();

        let compact = GridFormatter::format_grid_compact(&grid);
        assert_eq!(compact, "·█·\n··█\n███\n");

        let with_coords = GridFormatter::format_grid_with_coords(&grid);
        assert!(with_coords.starts_with("      0 1 2\n"));
        assert!(with_coords.contains("   2 ██████"));

        assert_eq!(GridFormatter::format_grid_compact(&SparseGrid::new()), "(empty)\n");
    }

    #[test]
    fn test_large_grid_is_summarised() {
        let far = SparseGrid::from_cells(vec![Cell::new(0, 0), Cell::new(1000, 0)]);
        let compact = GridFormatter::format_grid_compact(&far);
        assert!(compact.contains("too large to draw"));
        assert!(compact.contains("2 live cells"));
    }

    #[test]
    fn test_save_run_formats() {
        let mut sim = Simulation::with_engine(patterns::blinker(), Engine::sequential());
        let report = sim.run(1).unwrap();
        let temp_dir = tempdir().unwrap();

        let text = GridFormatter::save_run(sim.grid(), &report, temp_dir.path().join("text"), OutputFormat::Text).unwrap();
        assert_eq!(text.len(), 1);
        let content = std::fs::read_to_string(&text[0]).unwrap();
        assert!(content.contains("Simulation Report:"));

        let json = GridFormatter::save_run(sim.grid(), &report, temp_dir.path().join("json"), OutputFormat::Json).unwrap();
        let reloaded: SparseGrid = serde_json::from_str(&std::fs::read_to_string(&json[0]).unwrap()).unwrap();
        assert_eq!(&reloaded, sim.grid());

        let lif = GridFormatter::save_run(sim.grid(), &report, temp_dir.path().join("lif"), OutputFormat::Life106).unwrap();
        let reloaded = crate::life::load_seed_from_file(&lif[0]).unwrap();
        assert_eq!(&reloaded, sim.grid());
    }

    #[test]
    fn test_progress_samples_every_interval() {
        let mut progress = ProgressIndicator::with_interval(25, 10);

        assert_eq!(progress.update(0, 5), None);
        assert_eq!(progress.update(7, 5), None);

        let line = progress.update(10, 42).unwrap();
        assert!(line.starts_with("Generation 10/25: 42 live cells, "), "{}", line);
        assert!(line.ends_with(" gen/s"), "{}", line);

        assert_eq!(progress.update(15, 42), None);
        // The last generation is always reported.
        assert!(progress.update(25, 3).unwrap().starts_with("Generation 25/25: 3 live cells"));

        let summary = progress.summary(3);
        assert!(summary.starts_with("Completed 25 generations in "), "{}", summary);
        assert!(summary.ends_with("gen/s), 3 live cells"), "{}", summary);
    }

    #[test]
    fn test_rate_formatting() {
        assert_eq!(format_rate(Some(1234.56)), "1234.6 gen/s");
        assert_eq!(format_rate(None), "-- gen/s");
        assert_eq!(generations_per_second(50, Duration::from_millis(500)), Some(100.0));
        assert_eq!(generations_per_second(50, Duration::ZERO), None);
    }

    #[test]
    fn test_console_tones() {
        assert_eq!(Console::new(false).paint(Tone::Warning, "seed missing"), "seed missing");
        assert_eq!(Console::new(true).paint(Tone::Failure, "diverged"), "\x1b[31mdiverged\x1b[0m");
        assert_eq!(Console::new(true).paint(Tone::Success, "ok"), "\x1b[32mok\x1b[0m");
    }
}
