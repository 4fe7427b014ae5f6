//! Kinematic entity state: an axis-aligned box with velocity and a vertical
//! mode.

use glam::Vec3;
use terracube_math::Aabb;

/// Default player extents in blocks (width, height, length).
pub const PLAYER_SIZE: Vec3 = Vec3::new(0.6, 1.8, 0.6);

/// Whether an entity is supported by the ground.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VerticalMode {
    Grounded,
    #[default]
    Airborne,
}

/// A moving box resolved against the voxel world.
///
/// `position` is the minimum corner of the hitbox, i.e. the feet.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityBody {
    pub position: Vec3,
    pub size: Vec3,
    /// Horizontal velocity is set by the owner; `velocity.y` is driven by
    /// `vertical_speed` during a gravity step.
    pub velocity: Vec3,
    pub vertical_speed: f32,
    pub mode: VerticalMode,
}

impl EntityBody {
    /// A resting, airborne body at `position`.
    pub fn new(position: Vec3, size: Vec3) -> Self {
        Self {
            position,
            size,
            velocity: Vec3::ZERO,
            vertical_speed: 0.0,
            mode: VerticalMode::default(),
        }
    }

    /// A player-sized body at `position`.
    pub fn player(position: Vec3) -> Self {
        Self::new(position, PLAYER_SIZE)
    }

    /// World-space hitbox spanning `position .. position + size`.
    pub fn hitbox(&self) -> Aabb {
        Aabb::from_min_size(self.position, self.size)
    }

    pub fn is_grounded(&self) -> bool {
        self.mode == VerticalMode::Grounded
    }
}
