//! Runtime configuration for the terracube server.
//!
//! Settings persist to disk as a RON file and can be overridden from the
//! command line. Every section falls back to its defaults when missing, so
//! older config files keep loading as new settings are added.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE_NAME, Config, DebugConfig, PhysicsConfig, SimulationConfig, TerrainConfig,
    WorldConfig, default_config_dir,
};
pub use error::ConfigError;
