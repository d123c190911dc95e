//! Main CLI application for the sparse Game of Life engine

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use sparse_life::{
    config::{CliOverrides, LogLevel, OutputFormat, Settings},
    life::{create_example_seeds, load_seed_from_file},
    simulation::{DeterminismVerifier, Simulation},
    utils::{Console, GridFormatter, ProgressIndicator, Tone},
};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sparse_life")]
#[command(about = "Parallel sparse Game of Life engine")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a seed for a number of generations
    Run {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Seed file in Life 1.06 format (overrides config)
        #[arg(short, long)]
        seed: Option<PathBuf>,

        /// Number of generations (overrides config)
        #[arg(short, long)]
        generations: Option<usize>,

        /// Worker threads, 0 for all hardware threads (overrides config)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print every n-th generation (overrides config)
        #[arg(long)]
        show_every: Option<usize>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Create example configuration and seed files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Check that parallel stepping matches the sequential reference
    Verify {
        /// Seed file in Life 1.06 format
        #[arg(short, long)]
        seed: PathBuf,

        /// Number of generations to compare
        #[arg(short, long, default_value_t = 100)]
        generations: usize,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show statistics about a seed file
    Info {
        /// Seed file in Life 1.06 format
        #[arg(short, long)]
        seed: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config, seed, generations, workers, output, show_every, verbose
        } => {
            let overrides = CliOverrides {
                generations,
                workers,
                seed_file: seed,
                output_dir: output,
                show_every,
            };
            run_command(config, overrides, verbose)
        }
        Commands::Setup { directory, force } => {
            setup_command(directory, force)
        }
        Commands::Verify { seed, generations, verbose } => {
            init_logging(if verbose { LogLevel::Debug } else { LogLevel::Warn })?;
            verify_command(seed, generations)
        }
        Commands::Info { seed } => {
            init_logging(LogLevel::Warn)?;
            info_command(seed)
        }
    }
}

fn init_logging(level: LogLevel) -> Result<()> {
    simple_logger::init_with_level(level.into()).context("Failed to initialise logger")
}

fn run_command(config_path: PathBuf, overrides: CliOverrides, verbose: bool) -> Result<()> {
    // Load configuration
    let config_missing = !config_path.exists();
    let mut settings = if config_missing {
        Settings::default()
    } else {
        Settings::from_file(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    };
    settings.merge_with_cli(&overrides);

    init_logging(if verbose { LogLevel::Debug } else { settings.logging.level })?;

    let console = Console::from_env();
    println!("{}", console.paint(Tone::Info, "▶ Starting sparse Game of Life"));
    if config_missing {
        println!("{}", console.paint(Tone::Warning, &format!(
            "Config file {} not found, using defaults", config_path.display()
        )));
    }

    if verbose {
        println!("Configuration:");
        println!("  Generations: {}", settings.simulation.generations);
        println!("  Workers: {}", settings.simulation.workers);
        println!("  Min chunk size: {}", settings.simulation.min_chunk_size);
        println!("  Merge strategy: {:?}", settings.simulation.merge_strategy);
        println!("  Seed file: {}", settings.input.seed_file.display());
        println!("  Output dir: {}", settings.output.output_directory.display());
        println!();
    }

    settings.validate()
        .context("Configuration validation failed")?;

    let seed = load_seed_from_file(&settings.input.seed_file)
        .with_context(|| format!("Failed to load seed from {}", settings.input.seed_file.display()))?;
    println!("{}", GridFormatter::format_summary(0, &seed));

    let mut simulation = Simulation::new(seed, settings.engine_config())?;
    let generations = settings.simulation.generations;
    let show_every = settings.output.show_every;

    let mut progress = ProgressIndicator::new(generations);
    let report = simulation.run_pipelined(generations, |generation, grid| {
        if show_every > 0 && generation % show_every == 0 {
            println!("\n{}", GridFormatter::format_summary(generation, grid));
            print!("{}", GridFormatter::format_grid_compact(grid));
        } else if show_every == 0 {
            if let Some(line) = progress.update(generation, grid.len()) {
                print!("\r{}", line);
                std::io::stdout().flush().ok();
            }
        }
    })?;
    if show_every == 0 {
        println!("\r{}", progress.summary(simulation.grid().len()));
    }

    println!("\n{}", report);
    println!("Final State:");
    print!("{}", GridFormatter::format_grid_compact(simulation.grid()));

    if settings.output.save_final {
        let written = GridFormatter::save_run(
            simulation.grid(),
            &report,
            &settings.output.output_directory,
            settings.output.format,
        )
        .context("Failed to save results")?;

        for path in &written {
            info!("wrote {}", path.display());
        }
        println!("{}", console.paint(Tone::Success, &format!(
            "Results saved to {}",
            settings.output.output_directory.display()
        )));
    }

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    let console = Console::from_env();
    println!("{}", console.paint(Tone::Info, "🛠️  Setting up project structure..."));

    // Create directories
    let config_dir = directory.join("config");
    let seed_dir = directory.join("input/seeds");
    let output_dir = directory.join("output/runs");

    for dir in [&config_dir, &seed_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    // Create default configuration
    let config_path = config_dir.join("default.yaml");
    write_unless_present(&config_path, force, |path| Settings::default().to_file(path))
        .context("Failed to create default configuration")?;

    let seeds = create_example_seeds(&seed_dir, force)
        .context("Failed to create example seeds")?;
    println!("Created {} example seeds in: {}", seeds.len(), seed_dir.display());

    // Create example configuration variants
    let examples_dir = config_dir.join("examples");
    std::fs::create_dir_all(&examples_dir)?;

    let mut quick_config = Settings::default();
    quick_config.simulation.generations = 10;
    quick_config.input.seed_file = PathBuf::from("input/seeds/blinker.lif");
    quick_config.output.show_every = 1;
    write_unless_present(&examples_dir.join("quick.yaml"), force, |path| quick_config.to_file(path))?;

    let mut long_config = Settings::default();
    long_config.simulation.generations = 1200;
    long_config.input.seed_file = PathBuf::from("input/seeds/r_pentomino.lif");
    long_config.output.format = OutputFormat::Json;
    write_unless_present(&examples_dir.join("methuselah.yaml"), force, |path| long_config.to_file(path))?;

    println!("\n{}", console.paint(Tone::Success, "✅ Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Add your seeds to {}", seed_dir.display());
    println!("3. Run: cargo run -- run --config config/default.yaml");

    Ok(())
}

/// Run `write` for `path` unless the file exists and `force` is off.
///
/// Returns whether the file was written.
fn write_unless_present<F>(path: &PathBuf, force: bool, write: F) -> Result<bool>
where
    F: FnOnce(&PathBuf) -> Result<()>,
{
    if path.exists() && !force {
        println!("Skipped: {} (already exists)", path.display());
        return Ok(false);
    }
    write(path)?;
    println!("Created: {}", path.display());
    Ok(true)
}

fn verify_command(seed_path: PathBuf, generations: usize) -> Result<()> {
    let console = Console::from_env();
    println!("{}", console.paint(Tone::Info, "🔍 Checking determinism..."));

    let seed = load_seed_from_file(&seed_path)
        .with_context(|| format!("Failed to load seed from {}", seed_path.display()))?;

    let verifier = DeterminismVerifier::new(generations)?;
    let result = verifier.verify(&seed)
        .context("Determinism check failed to run")?;

    println!("{}", result);

    if result.is_deterministic {
        println!("{}", console.paint(Tone::Success, "✅ All engine variants agree"));
        Ok(())
    } else {
        println!("{}", console.paint(Tone::Failure, "❌ Engine variants disagree"));
        anyhow::bail!("Determinism check failed")
    }
}

fn info_command(seed_path: PathBuf) -> Result<()> {
    let seed = load_seed_from_file(&seed_path)
        .with_context(|| format!("Failed to load seed from {}", seed_path.display()))?;

    println!("Seed: {}", seed_path.display());
    println!("  Living cells: {}", seed.len());
    match seed.bounding_box() {
        Some(bounds) => {
            println!("  Bounding box: {}", bounds);
            let area = bounds.width() as f64 * bounds.height() as f64;
            println!("  Density: {:.1}%", seed.len() as f64 / area * 100.0);
        }
        None => println!("  Bounding box: none"),
    }
    println!();
    print!("{}", GridFormatter::format_grid_with_coords(&seed));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "sparse_life",
            "run",
            "--config", "test.yaml",
            "--generations", "5",
            "--workers", "2",
        ]);
        assert!(cli.is_ok());

        let cli = Cli::try_parse_from(["sparse_life", "verify", "--seed", "x.lif"]).unwrap();
        match cli.command {
            Commands::Verify { generations, .. } => assert_eq!(generations, 100),
            _ => panic!("expected verify command"),
        }
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        let result = setup_command(temp_dir.path().to_path_buf(), false);

        assert!(result.is_ok());
        assert!(temp_dir.path().join("config/default.yaml").exists());
        assert!(temp_dir.path().join("config/examples/quick.yaml").exists());
        assert!(temp_dir.path().join("input/seeds/glider.lif").exists());
    }

    #[test]
    fn test_setup_keeps_edited_files_unless_forced() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path().to_path_buf();
        setup_command(root.clone(), false).unwrap();

        let quick = root.join("config/examples/quick.yaml");
        let seed = root.join("input/seeds/blinker.lif");
        let config = root.join("config/default.yaml");
        let mut edited = Settings::default();
        edited.simulation.generations = 7;
        edited.to_file(&quick).unwrap();
        edited.to_file(&config).unwrap();
        std::fs::write(&seed, "#Life 1.06\n5 5\n").unwrap();

        setup_command(root.clone(), false).unwrap();
        assert_eq!(Settings::from_file(&quick).unwrap().simulation.generations, 7);
        assert_eq!(Settings::from_file(&config).unwrap().simulation.generations, 7);
        assert_eq!(load_seed_from_file(&seed).unwrap().len(), 1);

        setup_command(root, true).unwrap();
        assert_eq!(Settings::from_file(&quick).unwrap().simulation.generations, 10);
        assert_eq!(
            Settings::from_file(&config).unwrap().simulation.generations,
            Settings::default().simulation.generations
        );
        assert_eq!(load_seed_from_file(&seed).unwrap().len(), 3);
    }

    #[test]
    fn test_verify_and_info_commands() {
        let temp_dir = tempdir().unwrap();
        create_example_seeds(temp_dir.path(), false).unwrap();
        let seed = temp_dir.path().join("r_pentomino.lif");

        assert!(verify_command(seed.clone(), 20).is_ok());
        assert!(info_command(seed).is_ok());
    }
}
