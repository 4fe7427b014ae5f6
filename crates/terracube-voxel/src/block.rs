//! Block identities, per-instance payloads, and placed block states.

use serde::{Deserialize, Serialize};
use terracube_math::Aabb;

use crate::behavior::TNT_FUSE_SECONDS;
use crate::coords::BlockPos;

/// Immutable identity of a block kind.
///
/// The set is closed: every capability (collision, ticking, light emission,
/// lifecycle hooks) is answered by matching on the variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockType {
    /// Empty space. Never stored explicitly.
    #[default]
    Air,
    Stone,
    Cobblestone,
    Dirt,
    Grass,
    Sand,
    Snow,
    RedstoneOre,
    Glowstone,
    SugarCane,
    Tnt,
}

impl BlockType {
    /// Every block type, in declaration order.
    pub const ALL: [BlockType; 11] = [
        BlockType::Air,
        BlockType::Stone,
        BlockType::Cobblestone,
        BlockType::Dirt,
        BlockType::Grass,
        BlockType::Sand,
        BlockType::Snow,
        BlockType::RedstoneOre,
        BlockType::Glowstone,
        BlockType::SugarCane,
        BlockType::Tnt,
    ];

    /// Human-readable name, e.g. `"redstone_ore"`.
    pub fn name(self) -> &'static str {
        match self {
            BlockType::Air => "air",
            BlockType::Stone => "stone",
            BlockType::Cobblestone => "cobblestone",
            BlockType::Dirt => "dirt",
            BlockType::Grass => "grass",
            BlockType::Sand => "sand",
            BlockType::Snow => "snow",
            BlockType::RedstoneOre => "redstone_ore",
            BlockType::Glowstone => "glowstone",
            BlockType::SugarCane => "sugar_cane",
            BlockType::Tnt => "tnt",
        }
    }

    pub fn is_air(self) -> bool {
        self == BlockType::Air
    }

    /// Whether the block occupies its full unit cube for collision.
    pub fn is_solid(self) -> bool {
        !matches!(self, BlockType::Air | BlockType::SugarCane)
    }

    /// Whether the block receives periodic tick callbacks.
    pub fn is_tickable(self) -> bool {
        matches!(self, BlockType::SugarCane | BlockType::Tnt)
    }

    /// Emitted light level (0 = none, 15 = full brightness).
    pub fn light_emission(self) -> u8 {
        match self {
            BlockType::Glowstone => 15,
            _ => 0,
        }
    }

    pub fn is_light_source(self) -> bool {
        self.light_emission() > 0
    }

    /// Payload a freshly placed block of this type starts with.
    pub fn default_payload(self) -> BlockPayload {
        match self {
            BlockType::SugarCane => BlockPayload::SugarCane { growth_timer: 0.0 },
            BlockType::Tnt => BlockPayload::Tnt {
                fuse: TNT_FUSE_SECONDS,
            },
            _ => BlockPayload::None,
        }
    }
}

/// Mutable per-instance data carried by some block types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum BlockPayload {
    #[default]
    None,
    /// Seconds accumulated toward the next growth step.
    SugarCane { growth_timer: f32 },
    /// Seconds left before the block removes itself.
    Tnt { fuse: f32 },
}

impl BlockPayload {
    /// Serialized size of the payload in bytes.
    pub fn size_bytes(&self) -> usize {
        match self {
            BlockPayload::None => 0,
            BlockPayload::SugarCane { .. } | BlockPayload::Tnt { .. } => size_of::<f32>(),
        }
    }
}

/// A placed block: its type, its payload, and its cached world position.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockState {
    pub block_type: BlockType,
    pub payload: BlockPayload,
    pub position: BlockPos,
}

impl BlockState {
    /// A block of `block_type` with its default payload.
    pub fn new(block_type: BlockType, position: BlockPos) -> Self {
        Self {
            block_type,
            payload: block_type.default_payload(),
            position,
        }
    }

    /// The implicit Air state reported for empty cells.
    pub fn air(position: BlockPos) -> Self {
        Self::new(BlockType::Air, position)
    }

    pub fn is_air(&self) -> bool {
        self.block_type.is_air()
    }

    /// Returns a copy of this state relocated to `position`.
    pub fn at(mut self, position: BlockPos) -> Self {
        self.position = position;
        self
    }

    /// Serialized payload size of this instance in bytes.
    pub fn payload_size(&self) -> usize {
        self.payload.size_bytes()
    }

    /// Collision shape in world space, or `None` for passable blocks.
    pub fn collision_box(&self) -> Option<Aabb> {
        self.block_type
            .is_solid()
            .then(|| Aabb::block(self.position))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
