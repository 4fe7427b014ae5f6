//! Seeded chunk generation: height and biome noise, stone fill, and ore.

use glam::IVec3;
use noise::{NoiseFn, Perlin};
use rand::Rng;
use terracube_voxel::{
    BUILD_HEIGHT, BlockState, BlockType, CHUNK_SIZE, Chunk, ChunkPos, LocalPos,
};
use tracing::{debug, warn};

use crate::biome::Biome;
use crate::seed::{chunk_rng, derive_noise_seed};

const BASE_NOISE_SALT: u64 = 0;
const BIOME_NOISE_SALT: u64 = 1;

/// Tunables for [`WorldGenerator`].
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorParams {
    /// Minimum surface height.
    pub sea_level: i32,
    /// Scale applied to the base noise before it is added to `sea_level`.
    pub height_amplitude: f64,
    /// Frequency of the height noise, in cycles per block.
    pub base_frequency: f64,
    /// Frequency of the biome noise, in cycles per block.
    pub biome_frequency: f64,
    /// Probability that a subsurface block is ore instead of stone.
    pub ore_chance: f64,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            sea_level: 95,
            height_amplitude: 32.0,
            base_frequency: 0.006,
            biome_frequency: 0.0045,
            ore_chance: 0.01,
        }
    }
}

/// A 2D Perlin field sampled at world block coordinates.
struct NoiseField {
    noise: Perlin,
    frequency: f64,
}

impl NoiseField {
    fn new(seed: u32, frequency: f64) -> Self {
        Self {
            noise: Perlin::new(seed),
            frequency,
        }
    }

    /// Roughly in `[-1, 1]`.
    fn sample(&self, x: i32, z: i32) -> f64 {
        self.noise
            .get([f64::from(x) * self.frequency, f64::from(z) * self.frequency])
    }
}

/// Produces the initial contents of a chunk from the world seed.
///
/// Generation is a pure function of `(seed, params, chunk position)`: the
/// same inputs always produce block-for-block identical chunks.
pub struct WorldGenerator {
    seed: u64,
    params: GeneratorParams,
    base: NoiseField,
    biome: NoiseField,
}

impl WorldGenerator {
    pub fn new(seed: u64, params: GeneratorParams) -> Self {
        let base = NoiseField::new(
            derive_noise_seed(seed, BASE_NOISE_SALT),
            params.base_frequency,
        );
        let biome = NoiseField::new(
            derive_noise_seed(seed, BIOME_NOISE_SALT),
            params.biome_frequency,
        );
        Self {
            seed,
            params,
            base,
            biome,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn params(&self) -> &GeneratorParams {
        &self.params
    }

    /// Y of the surface cell in world column `(x, z)`.
    ///
    /// Solid fill occupies `[0, height)`; the biome's surface block sits at
    /// `height`.
    pub fn column_height(&self, x: i32, z: i32) -> i32 {
        let offset = (self.base.sample(x, z) * self.params.height_amplitude) as i32;
        (self.params.sea_level + offset.abs()).clamp(0, BUILD_HEIGHT - 1)
    }

    /// Biome of world column `(x, z)`, if the sample falls inside a band.
    pub fn biome_at(&self, x: i32, z: i32) -> Option<Biome> {
        Biome::from_noise(self.biome.sample(x, z))
    }

    /// Generates the chunk at `(chunk_x, chunk_z)`.
    pub fn generate(&self, chunk_x: i32, chunk_z: i32) -> Chunk {
        let pos = ChunkPos::new(chunk_x, chunk_z);
        let mut chunk = Chunk::new(pos);
        let mut rng = chunk_rng(self.seed, pos);
        let origin = pos.origin();

        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                let (world_x, world_z) = (origin.x + x, origin.z + z);
                let height = self.column_height(world_x, world_z);
                let local = |y| LocalPos::new(x as u8, y, z as u8);

                if let Some(biome) = self.biome_at(world_x, world_z) {
                    place(&mut chunk, local(height), biome.surface_block());
                }

                for y in (0..height).rev() {
                    let block = if rng.random::<f64>() < self.params.ore_chance {
                        BlockType::RedstoneOre
                    } else {
                        BlockType::Stone
                    };
                    place(&mut chunk, local(y), block);
                }
            }
        }

        debug!(
            "generated chunk {pos}: {} blocks in {} sections",
            chunk.block_count(),
            chunk.section_count()
        );
        chunk
    }
}

fn place(chunk: &mut Chunk, local: LocalPos, block_type: BlockType) {
    let state = BlockState::new(block_type, IVec3::ZERO);
    if let Err(err) = chunk.add_block_at(local, state) {
        warn!(
            "terrain placement at {:?} in chunk {} rejected: {err}",
            local,
            chunk.position()
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
