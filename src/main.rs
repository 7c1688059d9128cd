// src/main.rs

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub mod config;
pub mod error;
pub mod generation;
pub mod io;
pub mod model;
pub mod sweep;
pub mod utils;

use config::SweepConfig;
use error::Result;

#[derive(Parser)]
#[command(name = "fevgen")]
#[command(about = "FeV alloy supercell generation and LAMMPS sweep automation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full lattice-parameter sweep from a configuration file
    Sweep {
        /// Configuration file path
        #[arg(short, long, default_value = "sweep.json")]
        config: PathBuf,

        /// Override the configured random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Generate workspaces without launching the engine
        #[arg(long)]
        dry_run: bool,
    },
    /// Write a single data file for one lattice parameter
    Data {
        /// Configuration file path
        #[arg(short, long, default_value = "sweep.json")]
        config: PathBuf,

        /// Lattice parameter in Angstrom
        #[arg(short, long)]
        lattice: f64,

        /// Output path for the data file
        #[arg(short, long, default_value = "atoms_positions.data")]
        output: PathBuf,

        /// Override the configured random seed
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Sweep {
            config,
            seed,
            dry_run,
        } => {
            let mut config = SweepConfig::load(&config)?;
            if let Some(seed) = seed {
                config.seed = Some(seed);
            }
            if dry_run {
                config.engine_command = None;
            }

            let mut rng = make_rng(config.seed);
            let report = sweep::run_sweep(&config, &mut rng)?;

            for (value, reason) in &report.failed {
                warn!("lattice parameter {:.2} failed: {}", value, reason);
            }
            info!(
                "{} of {} workspaces written under {}",
                report.completed.len(),
                report.completed.len() + report.failed.len(),
                config.output_directory.display()
            );
            Ok(())
        }
        Commands::Data {
            config,
            lattice,
            output,
            seed,
        } => {
            let mut config = SweepConfig::load(&config)?;
            if let Some(seed) = seed {
                config.seed = Some(seed);
            }

            let mut rng = make_rng(config.seed);
            let cell = sweep::build_supercell(&config, lattice, &mut rng)?;
            io::lammps_data::write(&output, &cell)?;
            info!("wrote {} sites to {}", cell.sites.len(), output.display());
            Ok(())
        }
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
