//! The block map: loaded chunks, total block queries, and the tick loop.
//!
//! [`World`] is the single owner of every loaded [`Chunk`]. All gameplay
//! mutations go through [`World::add_block_to_world`], which validates the
//! placement, updates storage, runs the lifecycle hooks, and emits a
//! [`WorldEvent::BlockPlaced`]. Block callbacks never mutate the world while
//! chunks are being iterated; they queue [`BlockCommands`] that are applied
//! at the end of [`World::tick`].

use rustc_hash::FxHashMap;
use terracube_math::Aabb;
use terracube_terrain::WorldGenerator;
use terracube_voxel::{
    BlockAccess, BlockCommand, BlockCommands, BlockPos, BlockState, BlockType, Chunk, ChunkPos,
    LocalPos, WorldEvent, WorldEventBuffer, is_within_build_height,
};
use tracing::{debug, info, trace, warn};

/// Default interval between block ticks, in seconds.
pub const SECONDS_PER_TICK: f32 = 0.02;

/// Handle for an entity whose hitbox blocks placements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

pub struct World {
    chunks: FxHashMap<ChunkPos, Chunk>,
    generator: WorldGenerator,
    /// Current hitboxes of tracked entities.
    entities: FxHashMap<EntityId, Aabb>,
    tick_interval: f32,
    elapsed_since_tick: f32,
    tick_count: u64,
    /// Removals and additions deferred to the end of the next `tick` call.
    pending: BlockCommands,
    events: WorldEventBuffer,
}

impl World {
    /// Creates an empty world that generates chunks with `generator` and
    /// ticks blocks every [`SECONDS_PER_TICK`].
    pub fn new(generator: WorldGenerator) -> Self {
        Self::with_tick_interval(generator, SECONDS_PER_TICK)
    }

    pub fn with_tick_interval(generator: WorldGenerator, tick_interval: f32) -> Self {
        Self {
            chunks: FxHashMap::default(),
            generator,
            entities: FxHashMap::default(),
            tick_interval,
            elapsed_since_tick: 0.0,
            tick_count: 0,
            pending: BlockCommands::new(),
            events: WorldEventBuffer::new(),
        }
    }

    /// The chunk column containing world block column `(x, z)`.
    pub fn chunk_position(x: i32, z: i32) -> ChunkPos {
        ChunkPos::containing(x, z)
    }

    pub fn generator(&self) -> &WorldGenerator {
        &self.generator
    }

    // -----------------------------------------------------------------------
    // Chunk lifecycle
    // -----------------------------------------------------------------------

    /// Generates and inserts the chunk at `pos` unless it is already loaded.
    ///
    /// Returns `true` if a chunk was generated.
    pub fn load_chunk(&mut self, pos: ChunkPos) -> bool {
        if self.chunks.contains_key(&pos) {
            return false;
        }
        let chunk = self.generator.generate(pos.x, pos.z);
        self.insert_chunk(chunk);
        true
    }

    /// Inserts a prebuilt chunk, replacing any chunk at the same position.
    pub fn insert_chunk(&mut self, chunk: Chunk) -> Option<Chunk> {
        let pos = chunk.position();
        debug!("chunk {pos} loaded with {} blocks", chunk.block_count());
        let previous = self.chunks.insert(pos, chunk);
        self.events.send(WorldEvent::ChunkLoaded { chunk: pos });
        previous
    }

    pub fn unload_chunk(&mut self, pos: ChunkPos) -> Option<Chunk> {
        let chunk = self.chunks.remove(&pos);
        if chunk.is_some() {
            debug!("chunk {pos} unloaded");
        }
        chunk
    }

    /// Loads every chunk within `radius` chunks of `center` on both axes.
    ///
    /// Returns the number of chunks newly generated.
    pub fn generate_area(&mut self, center: ChunkPos, radius: i32) -> usize {
        let mut generated = 0;
        for x in center.x - radius..=center.x + radius {
            for z in center.z - radius..=center.z + radius {
                if self.load_chunk(ChunkPos::new(x, z)) {
                    generated += 1;
                }
            }
        }
        info!(
            "generated {generated} chunks around {center} ({} loaded)",
            self.chunks.len()
        );
        generated
    }

    pub fn chunk(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&pos)
    }

    pub fn is_chunk_loaded(&self, pos: ChunkPos) -> bool {
        self.chunks.contains_key(&pos)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    // -----------------------------------------------------------------------
    // Block queries and mutation
    // -----------------------------------------------------------------------

    /// The block at `pos`. Total: unloaded chunks and positions outside the
    /// build height report Air.
    pub fn block_at(&self, pos: BlockPos) -> BlockState {
        match self.chunks.get(&ChunkPos::of_block(pos)) {
            Some(chunk) => chunk.block_at(LocalPos::from_block(pos)),
            None => BlockState::air(pos),
        }
    }

    /// Places `state` at `pos` (Air removes).
    ///
    /// Returns `false` without side effects if `pos` is outside the build
    /// height, its chunk is not loaded, the new block's collision shape
    /// overlaps a tracked entity, or a non-Air block would replace another
    /// non-Air block. On success the old block's `on_destroy` runs when it is
    /// being removed, the new block's `on_added` runs, and a
    /// [`WorldEvent::BlockPlaced`] is emitted. Placing Air on Air succeeds
    /// without any effect.
    pub fn add_block_to_world(&mut self, pos: BlockPos, state: BlockState) -> bool {
        let new = state.at(pos);

        if !is_within_build_height(pos.y) {
            debug!(
                "refusing {} at {pos}: outside build height",
                new.block_type.name()
            );
            return false;
        }
        let chunk_pos = ChunkPos::of_block(pos);
        if !self.chunks.contains_key(&chunk_pos) {
            debug!(
                "refusing {} at {pos}: chunk {chunk_pos} not loaded",
                new.block_type.name()
            );
            return false;
        }
        if let Some(shape) = new.collision_box()
            && let Some((id, _)) = self.entities.iter().find(|(_, hb)| hb.intersects(&shape))
        {
            debug!(
                "refusing {} at {pos}: blocked by entity {id:?}",
                new.block_type.name()
            );
            return false;
        }

        let old = self.block_at(pos);
        if !old.is_air() && !new.is_air() {
            debug!(
                "refusing {} at {pos}: occupied by {}",
                new.block_type.name(),
                old.block_type.name()
            );
            return false;
        }
        if old.is_air() && new.is_air() {
            return true;
        }

        let local = LocalPos::from_block(pos);
        let Some(chunk) = self.chunks.get_mut(&chunk_pos) else {
            return false;
        };
        let stored = if new.is_air() {
            chunk.remove_block_at(local).map(|_| ())
        } else {
            chunk.add_block_at(local, new.clone())
        };
        if let Err(err) = stored {
            warn!("storage rejected {} at {pos}: {err}", new.block_type.name());
            return false;
        }

        let mut follow_up = BlockCommands::new();
        if new.is_air() {
            old.block_type.on_destroy(&old, self, &mut follow_up);
        }
        new.block_type.on_added(&new, self, &mut follow_up);
        self.pending.append(&mut follow_up);

        trace!("{} -> {} at {pos}", old.block_type.name(), new.block_type.name());
        self.events.send(WorldEvent::BlockPlaced {
            chunk: chunk_pos,
            old,
            new,
        });
        true
    }

    /// Places a fresh block of `block_type` after checking its placement
    /// rule (e.g. sugar cane needs soil below).
    pub fn place_block(&mut self, pos: BlockPos, block_type: BlockType) -> bool {
        if !block_type.can_add_block_at(self, pos) {
            debug!("refusing {} at {pos}: placement rule", block_type.name());
            return false;
        }
        self.add_block_to_world(pos, BlockState::new(block_type, pos))
    }

    /// Removes the block at `pos` immediately. Removing Air is a no-op that
    /// still reports success.
    pub fn remove_block_at(&mut self, pos: BlockPos) -> bool {
        self.add_block_to_world(pos, BlockState::air(pos))
    }

    /// Defers removal of the block at `pos` to the end of the next
    /// [`tick`](World::tick) call.
    pub fn queue_to_remove_block_at(&mut self, pos: BlockPos) {
        self.pending.queue_remove(pos);
    }

    /// Alias of [`queue_to_remove_block_at`](World::queue_to_remove_block_at).
    pub fn delete_block_at(&mut self, pos: BlockPos) {
        self.queue_to_remove_block_at(pos);
    }

    /// Defers placement of `state` at its cached position to the end of the
    /// next [`tick`](World::tick) call. The placement rule is checked when
    /// the command is applied.
    pub fn queue_to_add_block_at(&mut self, state: BlockState) {
        self.pending.queue_add(state);
    }

    /// Number of deferred commands waiting for the next `tick`.
    pub fn pending_commands(&self) -> usize {
        self.pending.len()
    }

    // -----------------------------------------------------------------------
    // Tick loop
    // -----------------------------------------------------------------------

    /// Advances world time by `dt` seconds.
    ///
    /// Once the accumulated time exceeds the tick interval, every loaded
    /// chunk is ticked with the full accumulated time and the accumulator
    /// resets. Deferred commands are applied on every call, after any chunk
    /// ticking; commands they produce in turn wait for the next call.
    pub fn tick(&mut self, dt: f32) {
        self.elapsed_since_tick += dt;
        if self.elapsed_since_tick > self.tick_interval {
            let elapsed = self.elapsed_since_tick;
            self.tick_chunks(elapsed);
            self.elapsed_since_tick = 0.0;
            self.tick_count += 1;
        }
        self.apply_pending();
    }

    fn tick_chunks(&mut self, elapsed: f32) {
        let mut commands = BlockCommands::new();
        let mut updates = Vec::new();

        let world: &World = self;
        for (&pos, chunk) in &world.chunks {
            let changed = chunk.tick(elapsed, world, &mut commands);
            if !changed.is_empty() {
                updates.push((pos, changed));
            }
        }

        for (pos, changed) in updates {
            if let Some(chunk) = self.chunks.get_mut(&pos) {
                chunk.apply_tick_updates(changed);
            }
        }
        self.pending.append(&mut commands);
    }

    fn apply_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let commands = std::mem::take(&mut self.pending);
        for command in commands {
            match command {
                BlockCommand::Remove(pos) => {
                    self.add_block_to_world(pos, BlockState::air(pos));
                }
                BlockCommand::Add(state) => {
                    let pos = state.position;
                    if state.block_type.can_add_block_at(self, pos) {
                        self.add_block_to_world(pos, state);
                    } else {
                        debug!("dropping queued {} at {pos}", state.block_type.name());
                    }
                }
            }
        }
    }

    /// Number of block ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn tick_interval(&self) -> f32 {
        self.tick_interval
    }

    // -----------------------------------------------------------------------
    // Entities and events
    // -----------------------------------------------------------------------

    /// Records or updates the hitbox of an entity.
    pub fn track_entity(&mut self, id: EntityId, hitbox: Aabb) {
        self.entities.insert(id, hitbox);
    }

    pub fn untrack_entity(&mut self, id: EntityId) -> Option<Aabb> {
        self.entities.remove(&id)
    }

    pub fn entity_hitbox(&self, id: EntityId) -> Option<Aabb> {
        self.entities.get(&id).copied()
    }

    pub fn entity_hitboxes(&self) -> impl Iterator<Item = (EntityId, &Aabb)> {
        self.entities.iter().map(|(&id, hb)| (id, hb))
    }

    pub fn events(&self) -> &WorldEventBuffer {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut WorldEventBuffer {
        &mut self.events
    }

    /// Serialized size of every loaded chunk.
    pub fn payload_size(&self) -> usize {
        self.chunks.values().map(Chunk::payload_size).sum()
    }
}

impl BlockAccess for World {
    fn block_at(&self, pos: BlockPos) -> BlockState {
        World::block_at(self, pos)
    }
}
