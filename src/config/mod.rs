//! Configuration management for the simulation runner

pub mod settings;

pub use settings::{
    CliOverrides, InputConfig, LogLevel, LoggingConfig, OutputConfig, OutputFormat, Settings,
    SimulationConfig,
};
