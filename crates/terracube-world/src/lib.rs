//! The voxel world map: chunk table, block API, fixed-interval block ticks,
//! and deferred block mutation.

mod world;


pub use world::{EntityId, SECONDS_PER_TICK, World};
