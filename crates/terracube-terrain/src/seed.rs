//! Deterministic seeding for terrain generation.
//!
//! Every chunk draws its random decisions from its own RNG, derived from the
//! world seed and the chunk position, so a chunk generates identically no
//! matter which other chunks were generated before it.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use terracube_voxel::{Chunk, ChunkPos};

/// SplitMix64 finalizer. Fixed across toolchains, unlike std's hashers.
fn mix64(value: u64) -> u64 {
    let mut z = value.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Derive a u64 seed for a chunk from the world seed and chunk position.
///
/// X and Z feed different halves of the state, so swapping them changes
/// the result.
pub fn derive_chunk_seed(world_seed: u64, pos: ChunkPos) -> u64 {
    let x = u64::from(pos.x as u32);
    let z = u64::from(pos.z as u32) << 32;
    mix64(mix64(mix64(world_seed) ^ x) ^ z)
}

/// Deterministic RNG for a specific chunk.
pub fn chunk_rng(world_seed: u64, pos: ChunkPos) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_chunk_seed(world_seed, pos))
}

/// Derive the seed of a noise field from the world seed.
///
/// `salt` decorrelates fields that share a world seed.
pub fn derive_noise_seed(world_seed: u64, salt: u64) -> u32 {
    mix64(mix64(world_seed) ^ salt) as u32
}

/// Hash the contents of a chunk for determinism comparison within one
/// process. Not stable across toolchains; do not persist it.
///
/// Covers every stored block's position, type, and payload tag, visited
/// bottom section first.
pub fn hash_chunk(chunk: &Chunk) -> u64 {
    let mut hasher = DefaultHasher::new();
    chunk.position().hash(&mut hasher);
    for state in chunk.blocks() {
        state.position.hash(&mut hasher);
        state.block_type.hash(&mut hasher);
        std::mem::discriminant(&state.payload).hash(&mut hasher);
    }
    hasher.finish()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn test_derive_chunk_seed_deterministic() {
        let pos = ChunkPos::new(42, -7);
        assert_eq!(
            derive_chunk_seed(999, pos),
            derive_chunk_seed(999, pos),
            "same inputs must produce same derived seed"
        );
    }

    #[test]
    fn test_derive_chunk_seed_different_positions() {
        let a = derive_chunk_seed(42, ChunkPos::new(0, 0));
        let b = derive_chunk_seed(42, ChunkPos::new(0, 1));
        let c = derive_chunk_seed(42, ChunkPos::new(1, 0));
        assert_ne!(a, b, "adjacent chunks should produce different seeds");
        assert_ne!(b, c, "x and z must not be interchangeable");
    }

    #[test]
    fn test_derive_chunk_seed_different_world_seeds() {
        let pos = ChunkPos::new(5, 5);
        assert_ne!(derive_chunk_seed(0, pos), derive_chunk_seed(1, pos));
    }

    #[test]
    fn test_seeds_are_pinned() {
        // Fixed values: regeneration must not depend on the toolchain.
        assert_eq!(mix64(0), 0xE220_A839_7B1D_CDAF);
        assert_eq!(
            derive_chunk_seed(12345, ChunkPos::new(3, -2)),
            12_203_285_979_792_432_482
        );
        assert_eq!(derive_chunk_seed(0, ChunkPos::new(0, 0)), 2_558_736_989_570_252_433);
        assert_eq!(derive_noise_seed(1337, 0), 1_941_553_282);
    }

    #[test]
    fn test_chunk_rng_deterministic() {
        let pos = ChunkPos::new(10, -20);
        let mut rng_a = chunk_rng(42, pos);
        let mut rng_b = chunk_rng(42, pos);
        for _ in 0..1000 {
            assert_eq!(rng_a.next_u64(), rng_b.next_u64());
        }
    }

    #[test]
    fn test_noise_seed_salts_differ() {
        assert_ne!(derive_noise_seed(7, 0), derive_noise_seed(7, 1));
        assert_eq!(derive_noise_seed(7, 1), derive_noise_seed(7, 1));
    }

    #[test]
    fn test_hash_empty_chunks_by_position() {
        let a = Chunk::new(ChunkPos::new(0, 0));
        let b = Chunk::new(ChunkPos::new(0, 0));
        let c = Chunk::new(ChunkPos::new(1, 0));
        assert_eq!(hash_chunk(&a), hash_chunk(&b));
        assert_ne!(hash_chunk(&a), hash_chunk(&c));
    }
}
