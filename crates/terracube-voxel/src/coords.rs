//! Block, chunk, and section coordinate conventions.
//!
//! World block coordinates are unbounded `i32` on X/Z and limited to
//! `[0, BUILD_HEIGHT)` on Y. A chunk covers a 16×16 column; the chunk
//! coordinate of a block is `v >> 4` (arithmetic shift, so negative
//! coordinates floor) and its chunk-local coordinate is `v & 15`.

use std::fmt;

use glam::IVec3;
use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;

/// World-absolute block coordinate.
pub type BlockPos = IVec3;

/// Edge length of a chunk on X/Z, and of a section on every axis.
pub const CHUNK_SIZE: i32 = 16;

/// Shift that converts a block coordinate into a chunk or section coordinate.
pub const CHUNK_SHIFT: u32 = 4;

/// Edge length of a section, as an index type.
pub const SECTION_SIZE: usize = 16;

/// Number of block slots in a section.
pub const SECTION_VOLUME: usize = SECTION_SIZE * SECTION_SIZE * SECTION_SIZE;

/// Number of section slots stacked in a chunk column.
pub const NUM_SECTIONS: usize = 16;

/// Exclusive upper bound of valid Y coordinates.
pub const BUILD_HEIGHT: i32 = 256;

const_assert_eq!(SECTION_SIZE * NUM_SECTIONS, BUILD_HEIGHT as usize);
const_assert_eq!(1 << CHUNK_SHIFT, CHUNK_SIZE);

/// Chunk (or section) coordinate containing block coordinate `v`.
#[inline]
pub fn chunk_coord(v: i32) -> i32 {
    v >> CHUNK_SHIFT
}

/// Chunk-local coordinate of block coordinate `v`, in `[0, 16)`.
#[inline]
pub fn local_coord(v: i32) -> u8 {
    (v & (CHUNK_SIZE - 1)) as u8
}

/// Returns true if `y` lies inside `[0, BUILD_HEIGHT)`.
#[inline]
pub fn is_within_build_height(y: i32) -> bool {
    (0..BUILD_HEIGHT).contains(&y)
}

/// Horizontal address of a chunk column.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The chunk containing world block column `(x, z)`.
    pub fn containing(x: i32, z: i32) -> Self {
        Self::new(chunk_coord(x), chunk_coord(z))
    }

    /// The chunk containing a world block position.
    pub fn of_block(pos: BlockPos) -> Self {
        Self::containing(pos.x, pos.z)
    }

    /// World position of the chunk's `(0, 0, 0)` local corner.
    pub fn origin(&self) -> BlockPos {
        IVec3::new(self.x * CHUNK_SIZE, 0, self.z * CHUNK_SIZE)
    }

    /// Converts a chunk-local position of this chunk to a world position.
    pub fn block_pos(&self, local: LocalPos) -> BlockPos {
        self.origin() + IVec3::new(i32::from(local.x), local.y, i32::from(local.z))
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Position inside a chunk column.
///
/// `x` and `z` are in `[0, 16)`; `y` is the world Y coordinate and is not
/// range-checked here, so callers can represent (and reject) positions
/// above or below the build height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LocalPos {
    pub x: u8,
    pub y: i32,
    pub z: u8,
}

impl LocalPos {
    pub fn new(x: u8, y: i32, z: u8) -> Self {
        debug_assert!(
            (x as usize) < SECTION_SIZE && (z as usize) < SECTION_SIZE,
            "local coordinates out of range: ({x}, {z})"
        );
        Self { x, y, z }
    }

    /// Local position of a world block inside its own chunk.
    pub fn from_block(pos: BlockPos) -> Self {
        Self {
            x: local_coord(pos.x),
            y: pos.y,
            z: local_coord(pos.z),
        }
    }

    /// Index of the section holding this position, or `None` outside the
    /// build height.
    pub fn section_level(&self) -> Option<usize> {
        is_within_build_height(self.y).then(|| (self.y >> CHUNK_SHIFT) as usize)
    }

    /// Y coordinate inside the section.
    pub fn section_y(&self) -> u8 {
        local_coord(self.y)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
