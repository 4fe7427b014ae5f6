//! Fixed-step driver tying the world, block ticking, and player physics
//! together.

use glam::Vec3;
use terracube_config::Config;
use terracube_physics::{CollisionResolver, EntityBody};
use terracube_voxel::WorldEvent;
use terracube_world::{EntityId, World};
use tracing::{debug, info, trace};

/// Id under which the simulated player's hitbox is tracked.
pub const PLAYER_ID: EntityId = EntityId(0);

/// Feet position two blocks above the surface of world column `(x, z)`,
/// centred in the column.
pub fn spawn_point(world: &World, x: i32, z: i32) -> Vec3 {
    let surface = world.generator().column_height(x, z);
    Vec3::new(x as f32 + 0.2, (surface + 2) as f32, z as f32 + 0.2)
}

/// Totals gathered over a [`Simulation::run`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulationReport {
    pub steps: u32,
    pub block_ticks: u64,
    pub jumps: u32,
    /// Transitions from airborne to grounded.
    pub landings: u32,
    pub block_events: usize,
    pub chunk_events: usize,
    pub loaded_chunks: usize,
    pub final_position: Vec3,
}

pub struct Simulation {
    world: World,
    resolver: CollisionResolver,
    player: EntityBody,
    step_seconds: f32,
    player_jumps: bool,
    log_events: bool,
    report: SimulationReport,
}

impl Simulation {
    /// Places a player-sized body at `spawn` and registers its hitbox with
    /// the world.
    pub fn new(
        mut world: World,
        resolver: CollisionResolver,
        spawn: Vec3,
        config: &Config,
    ) -> Self {
        let physics = &config.physics;
        let size = Vec3::new(
            physics.player_width,
            physics.player_height,
            physics.player_length,
        );
        let player = EntityBody::new(spawn, size);
        world.track_entity(PLAYER_ID, player.hitbox());

        Self {
            world,
            resolver,
            player,
            step_seconds: config.simulation.step_seconds,
            player_jumps: config.simulation.player_jumps,
            log_events: config.debug.log_world_events,
            report: SimulationReport::default(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn player(&self) -> &EntityBody {
        &self.player
    }

    /// One fixed step: player movement, then world time.
    pub fn step(&mut self) {
        if self.player_jumps && self.resolver.jump(&mut self.player) {
            self.report.jumps += 1;
        }

        let was_grounded = self.player.is_grounded();
        let outcome = self
            .resolver
            .step(&mut self.player, &self.world, self.step_seconds);
        if outcome.landed && !was_grounded {
            self.report.landings += 1;
            trace!("player landed at y={:.2}", self.player.position.y);
        }
        self.world.track_entity(PLAYER_ID, self.player.hitbox());

        self.world.tick(self.step_seconds);
        self.drain_events();
        self.report.steps += 1;
    }

    /// Runs `steps` fixed steps and returns the accumulated report.
    pub fn run(&mut self, steps: u32) -> SimulationReport {
        info!("running {steps} steps of {:.4}s", self.step_seconds);
        for _ in 0..steps {
            self.step();
        }
        self.report()
    }

    pub fn report(&self) -> SimulationReport {
        SimulationReport {
            block_ticks: self.world.tick_count(),
            loaded_chunks: self.world.loaded_count(),
            final_position: self.player.position,
            ..self.report.clone()
        }
    }

    // The simulation is the only event consumer, so events are counted once
    // and dropped rather than left for a second frame.
    fn drain_events(&mut self) {
        for event in self.world.events().read() {
            match event {
                WorldEvent::BlockPlaced { chunk, old, new } => {
                    self.report.block_events += 1;
                    if self.log_events {
                        debug!(
                            "chunk {chunk}: {} -> {} at {}",
                            old.block_type.name(),
                            new.block_type.name(),
                            new.position
                        );
                    }
                }
                WorldEvent::ChunkLoaded { chunk } => {
                    self.report.chunk_events += 1;
                    if self.log_events {
                        debug!("chunk {chunk} loaded");
                    }
                }
            }
        }
        self.world.events_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;
    use terracube_terrain::{GeneratorParams, WorldGenerator};
    use terracube_voxel::{BlockType, Chunk, ChunkPos};

    const FLOOR_Y: i32 = 64;

    /// Origin chunk with a full stone floor at `FLOOR_Y`.
    fn flat_world() -> World {
        let mut world = World::new(WorldGenerator::new(0, GeneratorParams::default()));
        world.insert_chunk(Chunk::new(ChunkPos::new(0, 0)));
        for x in 0..16 {
            for z in 0..16 {
                assert!(world.place_block(IVec3::new(x, FLOOR_Y, z), BlockType::Stone));
            }
        }
        world
    }

    fn simulation(world: World, player_jumps: bool) -> Simulation {
        let mut config = Config::default();
        config.simulation.player_jumps = player_jumps;
        Simulation::new(
            world,
            CollisionResolver::default(),
            Vec3::new(8.2, (FLOOR_Y + 2) as f32, 8.2),
            &config,
        )
    }

    #[test]
    fn test_spawn_point_is_above_surface() {
        let mut world = World::new(WorldGenerator::new(9, GeneratorParams::default()));
        world.load_chunk(ChunkPos::new(0, 0));
        let spawn = spawn_point(&world, 8, 8);
        let surface = world.generator().column_height(8, 8);
        assert_eq!(spawn.y, (surface + 2) as f32);
        assert!(world.block_at(spawn.floor().as_ivec3()).is_air());
    }

    #[test]
    fn test_player_lands_and_stays_on_floor() {
        let mut sim = simulation(flat_world(), false);
        let report = sim.run(120);

        assert_eq!(report.steps, 120);
        assert_eq!(report.landings, 1);
        assert_eq!(report.jumps, 0);
        assert!(sim.player().is_grounded());
        assert_eq!(sim.player().position.y, (FLOOR_Y + 1) as f32);
    }

    #[test]
    fn test_player_hitbox_is_tracked() {
        let mut sim = simulation(flat_world(), false);
        sim.run(60);
        let tracked = sim.world().entity_hitbox(PLAYER_ID);
        assert_eq!(tracked, Some(sim.player().hitbox()));

        // The player's own cell refuses placement while occupied.
        let feet = sim.player().position.floor().as_ivec3();
        assert!(!sim.world_mut().place_block(feet, BlockType::Stone));
    }

    #[test]
    fn test_jumping_player_keeps_bouncing() {
        let mut sim = simulation(flat_world(), true);
        let report = sim.run(180);
        assert!(report.jumps >= 2, "jumps: {}", report.jumps);
        assert!(report.landings >= 2, "landings: {}", report.landings);
        assert!(sim.player().position.y >= (FLOOR_Y + 1) as f32);
    }

    #[test]
    fn test_world_ticks_during_run() {
        let mut world = flat_world();
        let tnt = IVec3::new(2, FLOOR_Y + 1, 2);
        assert!(world.place_block(tnt, BlockType::Tnt));

        let mut sim = simulation(world, false);
        let report = sim.run(300);

        assert!(report.block_ticks > 0);
        assert!(sim.world().block_at(tnt).is_air(), "fuse should have expired");
        // Floor placements, the TNT, and its removal.
        assert_eq!(report.block_events, 16 * 16 + 2);
        assert_eq!(report.chunk_events, 1);
        assert_eq!(report.loaded_chunks, 1);
    }
}
