//! Dense 16×16×16 block storage, the unit of lazy allocation inside a chunk.

use crate::block::BlockState;
use crate::coords::{SECTION_SIZE, SECTION_VOLUME};
use crate::error::VoxelError;

/// Bytes of fixed per-slot overhead in serialized section data.
pub const SLOT_OVERHEAD_BYTES: usize = 2;

/// A 16³ cube of optional block states indexed by local `(x, y, z)`.
///
/// An empty slot reads as Air. Air is never stored.
#[derive(Clone, Debug)]
pub struct Section {
    blocks: Box<[Option<BlockState>]>,
    occupied: usize,
}

impl Section {
    /// Creates a section with every slot empty.
    pub fn new() -> Self {
        Self {
            blocks: vec![None; SECTION_VOLUME].into_boxed_slice(),
            occupied: 0,
        }
    }

    #[inline]
    fn index(x: u8, y: u8, z: u8) -> usize {
        let (x, y, z) = (x as usize, y as usize, z as usize);
        debug_assert!(
            x < SECTION_SIZE && y < SECTION_SIZE && z < SECTION_SIZE,
            "section coordinates out of range: ({x}, {y}, {z})"
        );
        x + z * SECTION_SIZE + y * SECTION_SIZE * SECTION_SIZE
    }

    #[inline]
    fn coords(index: usize) -> (u8, u8, u8) {
        let x = index % SECTION_SIZE;
        let z = (index / SECTION_SIZE) % SECTION_SIZE;
        let y = index / (SECTION_SIZE * SECTION_SIZE);
        (x as u8, y as u8, z as u8)
    }

    /// The state at `(x, y, z)`, or `None` for Air.
    pub fn get(&self, x: u8, y: u8, z: u8) -> Option<&BlockState> {
        self.blocks[Self::index(x, y, z)].as_ref()
    }

    pub fn get_mut(&mut self, x: u8, y: u8, z: u8) -> Option<&mut BlockState> {
        self.blocks[Self::index(x, y, z)].as_mut()
    }

    /// Stores `state` at `(x, y, z)`, returning the state it replaced.
    pub fn add(
        &mut self,
        x: u8,
        y: u8,
        z: u8,
        state: BlockState,
    ) -> Result<Option<BlockState>, VoxelError> {
        if state.is_air() {
            return Err(VoxelError::AirPlacement);
        }
        let previous = self.blocks[Self::index(x, y, z)].replace(state);
        if previous.is_none() {
            self.occupied += 1;
        }
        Ok(previous)
    }

    /// Clears `(x, y, z)`. Clearing an empty slot is a no-op.
    pub fn remove(&mut self, x: u8, y: u8, z: u8) -> Option<BlockState> {
        let previous = self.blocks[Self::index(x, y, z)].take();
        if previous.is_some() {
            self.occupied -= 1;
        }
        previous
    }

    /// Number of occupied slots.
    pub fn block_count(&self) -> usize {
        self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Iterates occupied slots as `((x, y, z), state)`.
    pub fn iter(&self) -> impl Iterator<Item = ((u8, u8, u8), &BlockState)> {
        self.blocks
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|state| (Self::coords(i), state)))
    }

    /// Serialized size: fixed overhead for every slot plus each stored
    /// state's payload.
    pub fn payload_size(&self) -> usize {
        let payloads: usize = self.iter().map(|(_, state)| state.payload_size()).sum();
        SECTION_VOLUME * SLOT_OVERHEAD_BYTES + payloads
    }
}

impl Default for Section {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
