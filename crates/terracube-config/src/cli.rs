//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// terracube server command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "terracube", about = "Headless voxel world simulation")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Chunks generated around spawn on each axis.
    #[arg(long)]
    pub spawn_radius: Option<u32>,

    /// Number of fixed simulation steps to run.
    #[arg(long)]
    pub steps: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Directory for JSON log files (debug builds only).
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.world.seed = seed;
        }
        if let Some(radius) = args.spawn_radius {
            self.world.spawn_radius = radius;
        }
        if let Some(steps) = args.steps {
            self.simulation.steps = steps;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
