//! Configuration settings for the simulation runner

use crate::life::engine::DEFAULT_MIN_CHUNK_SIZE;
use crate::life::{EngineConfig, MergeStrategy};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub simulation: SimulationConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub generations: usize,
    /// Worker threads; 0 picks the hardware parallelism
    #[serde(default)]
    pub workers: usize,
    #[serde(default = "default_min_chunk_size")]
    pub min_chunk_size: usize,
    #[serde(default)]
    pub merge_strategy: MergeStrategy,
}

fn default_min_chunk_size() -> usize {
    DEFAULT_MIN_CHUNK_SIZE
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub seed_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub save_final: bool,
    pub output_directory: PathBuf,
    /// Print every n-th generation while running; 0 disables
    #[serde(default)]
    pub show_every: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
    Life106,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: LogLevel::Warn }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig {
                generations: 100,
                workers: 0,
                min_chunk_size: DEFAULT_MIN_CHUNK_SIZE,
                merge_strategy: MergeStrategy::SortUnique,
            },
            input: InputConfig {
                seed_file: PathBuf::from("input/seeds/glider.lif"),
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                save_final: true,
                output_directory: PathBuf::from("output/runs"),
                show_every: 0,
            },
            logging: LoggingConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.simulation.generations == 0 {
            anyhow::bail!("Number of generations must be positive");
        }

        if self.simulation.min_chunk_size == 0 {
            anyhow::bail!("Minimum chunk size must be positive");
        }

        if !self.input.seed_file.exists() {
            anyhow::bail!("Seed file does not exist: {}", self.input.seed_file.display());
        }

        Ok(())
    }

    /// Engine parameters described by these settings
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            workers: self.simulation.workers,
            min_chunk_size: self.simulation.min_chunk_size,
            merge: self.simulation.merge_strategy,
        }
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(generations) = cli_overrides.generations {
            self.simulation.generations = generations;
        }
        if let Some(workers) = cli_overrides.workers {
            self.simulation.workers = workers;
        }
        if let Some(ref seed_file) = cli_overrides.seed_file {
            self.input.seed_file = seed_file.clone();
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.output_directory = output_dir.clone();
        }
        if let Some(show_every) = cli_overrides.show_every {
            self.output.show_every = show_every;
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub generations: Option<usize>,
    pub workers: Option<usize>,
    pub seed_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub show_every: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_yaml_round_trip() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config/default.yaml");

        let mut settings = Settings::default();
        settings.simulation.merge_strategy = MergeStrategy::KWayMerge;
        settings.output.format = OutputFormat::Life106;
        settings.to_file(&path).unwrap();

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded.simulation.generations, 100);
        assert_eq!(loaded.simulation.merge_strategy, MergeStrategy::KWayMerge);
        assert_eq!(loaded.output.format, OutputFormat::Life106);
    }

    #[test]
    fn test_optional_fields_default() {
        let yaml = "
simulation:
  generations: 7
input:
  seed_file: seeds/x.lif
output:
  format: json
  save_final: false
  output_directory: out
";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.simulation.workers, 0);
        assert_eq!(settings.simulation.min_chunk_size, DEFAULT_MIN_CHUNK_SIZE);
        assert_eq!(settings.simulation.merge_strategy, MergeStrategy::SortUnique);
        assert_eq!(settings.logging.level, LogLevel::Warn);
        assert_eq!(settings.output.show_every, 0);
    }

    #[test]
    fn test_validate() {
        let temp_dir = tempdir().unwrap();
        let seed = temp_dir.path().join("seed.lif");
        std::fs::write(&seed, "#Life 1.06\n").unwrap();

        let mut settings = Settings::default();
        settings.input.seed_file = seed;
        assert!(settings.validate().is_ok());

        settings.simulation.min_chunk_size = 0;
        assert!(settings.validate().is_err());
        settings.simulation.min_chunk_size = 1;

        settings.simulation.generations = 0;
        assert!(settings.validate().is_err());
        settings.simulation.generations = 1;

        settings.input.seed_file = temp_dir.path().join("missing.lif");
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_merge_with_cli() {
        let mut settings = Settings::default();
        settings.merge_with_cli(&CliOverrides {
            generations: Some(3),
            workers: Some(2),
            seed_file: Some(PathBuf::from("a.lif")),
            output_dir: None,
            show_every: Some(1),
        });

        assert_eq!(settings.simulation.generations, 3);
        assert_eq!(settings.engine_config().workers, 2);
        assert_eq!(settings.input.seed_file, PathBuf::from("a.lif"));
        assert_eq!(settings.output.output_directory, PathBuf::from("output/runs"));
        assert_eq!(settings.output.show_every, 1);
    }
}
