//! Configuration structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted config inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Platform config directory for terracube, e.g. `~/.config/terracube`.
///
/// Falls back to `./terracube` when the platform has no config directory.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("terracube")
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub world: WorldConfig,
    pub terrain: TerrainConfig,
    pub physics: PhysicsConfig,
    pub simulation: SimulationConfig,
    pub debug: DebugConfig,
}

/// World creation and block tick settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// World seed. The same seed always produces the same terrain.
    pub seed: u64,
    /// Chunks generated around the spawn chunk on each axis.
    pub spawn_radius: u32,
    /// Seconds between block ticks.
    pub tick_interval: f32,
}

/// Terrain generator tunables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    pub sea_level: i32,
    pub height_amplitude: f64,
    pub base_frequency: f64,
    pub biome_frequency: f64,
    /// Probability (0.0 - 1.0) that a subsurface block is ore.
    pub ore_chance: f64,
}

/// Entity movement tunables, in blocks and seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub jump_impulse: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub player_length: f32,
}

/// Headless simulation loop settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed step length in seconds.
    pub step_seconds: f32,
    /// Number of steps to run before exiting.
    pub steps: u32,
    /// Make the simulated player jump whenever it lands.
    pub player_jumps: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter (e.g., "debug", "info", "terracube_world=trace").
    pub log_level: String,
    /// Log every world event at debug level.
    pub log_world_events: bool,
}

// --- Default implementations ---

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 1337,
            spawn_radius: 3,
            tick_interval: 0.02,
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            sea_level: 95,
            height_amplitude: 32.0,
            base_frequency: 0.006,
            biome_frequency: 0.0045,
            ore_chance: 0.01,
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -32.0,
            terminal_velocity: -50.0,
            jump_impulse: 10.0,
            player_width: 0.6,
            player_height: 1.8,
            player_length: 0.6,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            step_seconds: 1.0 / 60.0,
            steps: 600,
            player_jumps: true,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_world_events: false,
        }
    }
}

// --- Load / Save ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE_NAME), serialized)
            .map_err(ConfigError::WriteError)
    }
}
