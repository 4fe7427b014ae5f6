//! A 16×16 column of lazily allocated sections with per-chunk block indices.
//!
//! [`Chunk`] stores sections in a small per-chunk arena and addresses them
//! through a fixed slot table, so a column that only has terrain near the
//! bottom never allocates the sections above it. Blocks with a tick or
//! light capability are mirrored into position-keyed indices that are kept
//! in sync on every add and remove.

use rustc_hash::FxHashMap;

use crate::behavior::{BlockAccess, BlockCommands};
use crate::block::{BlockState, BlockType};
use crate::coords::{BlockPos, ChunkPos, LocalPos, NUM_SECTIONS};
use crate::error::VoxelError;
use crate::section::Section;

/// Slot-table marker for a section that has not been allocated.
const NO_SECTION: u16 = u16::MAX;

/// Bytes of fixed per-section-slot overhead in serialized chunk data.
pub const SECTION_SLOT_OVERHEAD_BYTES: usize = 1;

#[derive(Clone, Debug)]
pub struct Chunk {
    position: ChunkPos,
    /// Index into `sections` for each vertical slice, or [`NO_SECTION`].
    section_slots: [u16; NUM_SECTIONS],
    sections: Vec<Section>,
    /// Tickable blocks by world position.
    tickable: FxHashMap<BlockPos, BlockType>,
    /// Light-emitting blocks by world position, with their emission level.
    light_sources: FxHashMap<BlockPos, u8>,
    /// Incremented on every storage mutation.
    version: u64,
}

impl Chunk {
    /// Creates an empty chunk with no sections allocated.
    pub fn new(position: ChunkPos) -> Self {
        Self {
            position,
            section_slots: [NO_SECTION; NUM_SECTIONS],
            sections: Vec::new(),
            tickable: FxHashMap::default(),
            light_sources: FxHashMap::default(),
            version: 0,
        }
    }

    pub fn position(&self) -> ChunkPos {
        self.position
    }

    /// The section at vertical slice `level`, if allocated.
    pub fn section(&self, level: usize) -> Option<&Section> {
        match *self.section_slots.get(level)? {
            NO_SECTION => None,
            slot => self.sections.get(slot as usize),
        }
    }

    fn section_mut(&mut self, level: usize) -> Option<&mut Section> {
        match *self.section_slots.get(level)? {
            NO_SECTION => None,
            slot => self.sections.get_mut(slot as usize),
        }
    }

    fn section_or_insert(&mut self, level: usize) -> &mut Section {
        if self.section_slots[level] == NO_SECTION {
            self.section_slots[level] = self.sections.len() as u16;
            self.sections.push(Section::new());
        }
        let slot = self.section_slots[level] as usize;
        &mut self.sections[slot]
    }

    /// Number of allocated sections.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// The stored state at `local`, or `None` for Air (including positions
    /// outside the build height).
    pub fn get(&self, local: LocalPos) -> Option<&BlockState> {
        let section = self.section(local.section_level()?)?;
        section.get(local.x, local.section_y(), local.z)
    }

    fn get_mut(&mut self, local: LocalPos) -> Option<&mut BlockState> {
        let section = self.section_mut(local.section_level()?)?;
        section.get_mut(local.x, local.section_y(), local.z)
    }

    /// The block at `local`. Never fails: out-of-range Y, an unallocated
    /// section, or an empty slot all report Air.
    pub fn block_at(&self, local: LocalPos) -> BlockState {
        self.get(local)
            .cloned()
            .unwrap_or_else(|| BlockState::air(self.position.block_pos(local)))
    }

    /// Stores `state` at `local`, allocating the section on first use and
    /// updating the tickable and light-source indices.
    ///
    /// The state's cached position is overwritten with the world position of
    /// `local`.
    pub fn add_block_at(&mut self, local: LocalPos, state: BlockState) -> Result<(), VoxelError> {
        let level = local
            .section_level()
            .ok_or(VoxelError::OutsideBuildHeight { y: local.y })?;
        if state.is_air() {
            return Err(VoxelError::AirPlacement);
        }

        let world_pos = self.position.block_pos(local);
        let block_type = state.block_type;
        self.section_or_insert(level)
            .add(local.x, local.section_y(), local.z, state.at(world_pos))?;

        self.unindex(world_pos);
        if block_type.is_tickable() {
            self.tickable.insert(world_pos, block_type);
        }
        if block_type.is_light_source() {
            self.light_sources
                .insert(world_pos, block_type.light_emission());
        }
        self.version += 1;
        Ok(())
    }

    /// Clears `local`, returning the removed state. Clearing an empty cell is
    /// a no-op and does not allocate a section.
    pub fn remove_block_at(&mut self, local: LocalPos) -> Result<Option<BlockState>, VoxelError> {
        let level = local
            .section_level()
            .ok_or(VoxelError::OutsideBuildHeight { y: local.y })?;

        let Some(section) = self.section_mut(level) else {
            return Ok(None);
        };
        let removed = section.remove(local.x, local.section_y(), local.z);
        if removed.is_some() {
            self.unindex(self.position.block_pos(local));
            self.version += 1;
        }
        Ok(removed)
    }

    fn unindex(&mut self, world_pos: BlockPos) {
        self.tickable.remove(&world_pos);
        self.light_sources.remove(&world_pos);
    }

    /// Runs the tick capability of every tickable block.
    ///
    /// Storage is not touched: each block ticks on a copy of its state, and
    /// the copies that changed are returned for [`apply_tick_updates`].
    /// Removals and additions requested by blocks go into `commands`.
    ///
    /// [`apply_tick_updates`]: Chunk::apply_tick_updates
    pub fn tick(
        &self,
        dt: f32,
        world: &dyn BlockAccess,
        commands: &mut BlockCommands,
    ) -> Vec<BlockState> {
        let mut updated = Vec::new();
        for &pos in self.tickable.keys() {
            let Some(current) = self.get(LocalPos::from_block(pos)) else {
                tracing::warn!("tickable index of chunk {} is stale at {pos}", self.position);
                continue;
            };
            let mut state = current.clone();
            state.block_type.on_tick(&mut state, world, dt, commands);
            if state != *current {
                updated.push(state);
            }
        }
        updated
    }

    /// Writes payloads produced by [`tick`](Chunk::tick) back into storage.
    ///
    /// An update is dropped if the slot no longer holds a block of the same
    /// type.
    pub fn apply_tick_updates(&mut self, updates: impl IntoIterator<Item = BlockState>) {
        for update in updates {
            match self.get_mut(LocalPos::from_block(update.position)) {
                Some(slot) if slot.block_type == update.block_type => {
                    slot.payload = update.payload;
                    self.version += 1;
                }
                _ => tracing::trace!(
                    "dropping tick update for replaced block at {}",
                    update.position
                ),
            }
        }
    }

    /// Tickable blocks as `(world position, type)`.
    pub fn tickable_blocks(&self) -> impl Iterator<Item = (BlockPos, BlockType)> + '_ {
        self.tickable.iter().map(|(&pos, &ty)| (pos, ty))
    }

    /// Light-emitting blocks as `(world position, emission)`.
    pub fn light_sources(&self) -> impl Iterator<Item = (BlockPos, u8)> + '_ {
        self.light_sources.iter().map(|(&pos, &level)| (pos, level))
    }

    pub fn is_tickable_at(&self, world_pos: BlockPos) -> bool {
        self.tickable.contains_key(&world_pos)
    }

    /// Every stored block, bottom section first.
    pub fn blocks(&self) -> impl Iterator<Item = &BlockState> {
        (0..NUM_SECTIONS)
            .filter_map(|level| self.section(level))
            .flat_map(|section| section.iter().map(|(_, state)| state))
    }

    /// Number of stored (non-Air) blocks.
    pub fn block_count(&self) -> usize {
        self.sections.iter().map(Section::block_count).sum()
    }

    /// Monotonic mutation counter, for change detection by consumers.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Serialized size: fixed overhead per section slot plus the size of
    /// every allocated section.
    pub fn payload_size(&self) -> usize {
        let sections: usize = self.sections.iter().map(Section::payload_size).sum();
        NUM_SECTIONS * SECTION_SLOT_OVERHEAD_BYTES + sections
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
