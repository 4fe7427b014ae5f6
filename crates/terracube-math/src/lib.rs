//! Geometry primitives shared by the voxel, world, and physics crates.

mod aabb;

pub use aabb::Aabb;
pub use glam::{IVec3, Vec3};
