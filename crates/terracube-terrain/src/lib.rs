//! Procedural terrain: seeded height and biome noise, ore scattering, and
//! per-chunk deterministic RNG.

pub mod biome;
pub mod generator;
pub mod seed;

pub use biome::Biome;
pub use generator::{GeneratorParams, WorldGenerator};
pub use seed::{chunk_rng, derive_chunk_seed, hash_chunk};
