//! Entity movement against the voxel world.
//!
//! [`CollisionResolver`] advances an [`EntityBody`] one axis at a time,
//! clamping it out of solid blocks reported by a [`CollisionSource`] (the
//! [`World`](terracube_world::World) implements one). Gravity and jumping are
//! driven by a two-state [`VerticalMode`].

mod body;
mod collision;

#[cfg(test)]
mod collision_tests;

pub use body::{EntityBody, PLAYER_SIZE, VerticalMode};
pub use collision::{
    Axis, CollisionResolver, CollisionSource, Contact, PhysicsParams, StepOutcome, resolve_axis,
};
