//! Headless terracube simulation.
//!
//! Generates the spawn area from a seed, drops a player-sized body onto the
//! terrain, and runs a fixed number of simulation steps with block ticking.
//!
//! Run with: `cargo run -p terracube-server -- --seed 42 --steps 300`

mod simulation;

use std::process::ExitCode;

use clap::Parser;
use terracube_config::{CliArgs, Config, default_config_dir};
use terracube_physics::{CollisionResolver, PhysicsParams};
use terracube_terrain::{GeneratorParams, WorldGenerator};
use terracube_voxel::ChunkPos;
use terracube_world::World;
use tracing::info;

use crate::simulation::{Simulation, spawn_point};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);
    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("failed to load config from {}: {err}", config_dir.display());
            return ExitCode::FAILURE;
        }
    };
    config.apply_cli_overrides(&args);

    terracube_log::init_logging(
        args.log_dir.as_deref(),
        cfg!(debug_assertions),
        Some(&config),
    );

    info!("terracube headless simulation");
    info!(
        "Seed: {} | spawn radius: {} | tick interval: {}s",
        config.world.seed, config.world.spawn_radius, config.world.tick_interval
    );

    let world = build_world(&config);
    let resolver = CollisionResolver::new(physics_params(&config));
    let spawn = spawn_point(&world, 8, 8);
    info!("Spawning player at ({:.1}, {:.1}, {:.1})", spawn.x, spawn.y, spawn.z);

    let mut simulation = Simulation::new(world, resolver, spawn, &config);
    let report = simulation.run(config.simulation.steps);

    info!(
        "Finished {} steps: {} block ticks, {} jumps, {} landings, {} block events",
        report.steps, report.block_ticks, report.jumps, report.landings, report.block_events
    );
    info!(
        "Player at ({:.2}, {:.2}, {:.2}), {} chunks loaded",
        report.final_position.x,
        report.final_position.y,
        report.final_position.z,
        report.loaded_chunks
    );
    ExitCode::SUCCESS
}

fn generator_params(config: &Config) -> GeneratorParams {
    let terrain = &config.terrain;
    GeneratorParams {
        sea_level: terrain.sea_level,
        height_amplitude: terrain.height_amplitude,
        base_frequency: terrain.base_frequency,
        biome_frequency: terrain.biome_frequency,
        ore_chance: terrain.ore_chance,
    }
}

fn physics_params(config: &Config) -> PhysicsParams {
    PhysicsParams {
        gravity: config.physics.gravity,
        terminal_velocity: config.physics.terminal_velocity,
        jump_impulse: config.physics.jump_impulse,
    }
}

/// Generator plus the loaded spawn area around chunk (0, 0).
fn build_world(config: &Config) -> World {
    let generator = WorldGenerator::new(config.world.seed, generator_params(config));
    let mut world = World::with_tick_interval(generator, config.world.tick_interval);
    let radius = i32::try_from(config.world.spawn_radius).unwrap_or(i32::MAX);
    world.generate_area(ChunkPos::new(0, 0), radius);
    world
}
