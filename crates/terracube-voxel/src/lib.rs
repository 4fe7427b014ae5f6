//! Block types, sparse section/chunk storage, and world change events.

pub mod behavior;
pub mod block;
pub mod chunk;
pub mod coords;
pub mod error;
pub mod events;
pub mod section;

pub use behavior::{BlockAccess, BlockCommand, BlockCommands};
pub use block::{BlockPayload, BlockState, BlockType};
pub use chunk::Chunk;
pub use coords::{
    BUILD_HEIGHT, BlockPos, CHUNK_SIZE, ChunkPos, LocalPos, NUM_SECTIONS, SECTION_SIZE,
    SECTION_VOLUME, chunk_coord, is_within_build_height, local_coord,
};
pub use error::VoxelError;
pub use events::{WorldEvent, WorldEventBuffer};
pub use section::Section;
