//! Surface biome banding driven by a low-frequency noise field.

use terracube_voxel::BlockType;

/// Above this value the surface is bare rock.
pub const MOUNTAIN_THRESHOLD: f64 = 0.75;
/// Below this value the surface is snow.
pub const TUNDRA_THRESHOLD: f64 = -0.75;
/// Boundary between grassland and desert.
pub const DESERT_THRESHOLD: f64 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Biome {
    Mountains,
    Tundra,
    Plains,
    Desert,
}

impl Biome {
    /// Classifies a biome noise sample.
    ///
    /// The bands are open intervals, so samples landing exactly on
    /// -0.75, 0.25, or 0.75 belong to no biome and their column gets no
    /// surface block.
    pub fn from_noise(value: f64) -> Option<Biome> {
        if value > MOUNTAIN_THRESHOLD {
            Some(Biome::Mountains)
        } else if value < TUNDRA_THRESHOLD {
            Some(Biome::Tundra)
        } else if value > TUNDRA_THRESHOLD && value < DESERT_THRESHOLD {
            Some(Biome::Plains)
        } else if value > DESERT_THRESHOLD && value < MOUNTAIN_THRESHOLD {
            Some(Biome::Desert)
        } else {
            None
        }
    }

    /// Block placed on top of the stone column.
    pub fn surface_block(self) -> BlockType {
        match self {
            Biome::Mountains => BlockType::Stone,
            Biome::Tundra => BlockType::Snow,
            Biome::Plains => BlockType::Grass,
            Biome::Desert => BlockType::Sand,
        }
    }
}
