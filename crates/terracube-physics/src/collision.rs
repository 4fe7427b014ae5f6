//! Axis-separated AABB-vs-voxel collision with gravity and jumping.
//!
//! Each step moves the body one axis at a time (X, then gravity and Y, then
//! Z). After each axis move the hitbox is tested against nearby block boxes;
//! on overlap the body is clamped flush against the first box hit and the
//! velocity on that axis is zeroed. Resolving axes separately lets a body
//! slide along walls and floors instead of stopping dead.

use glam::{BVec3, Vec3};
use terracube_math::Aabb;
use terracube_voxel::{ChunkPos, LocalPos};
use terracube_world::World;
use tracing::trace;

use crate::body::{EntityBody, VerticalMode};

/// Source of solid block boxes around an entity.
pub trait CollisionSource {
    /// Collision boxes that may touch an entity whose feet are at `feet`.
    fn collision_boxes_near(&self, feet: Vec3) -> Vec<Aabb>;
}

impl CollisionSource for World {
    /// Only the 16³ section containing the feet is searched, so a body that
    /// straddles a section or chunk border does not see blocks on the other
    /// side.
    fn collision_boxes_near(&self, feet: Vec3) -> Vec<Aabb> {
        let cell = feet.floor().as_ivec3();
        let Some(level) = LocalPos::from_block(cell).section_level() else {
            return Vec::new();
        };
        let Some(section) = self
            .chunk(ChunkPos::of_block(cell))
            .and_then(|chunk| chunk.section(level))
        else {
            return Vec::new();
        };
        section
            .iter()
            .filter_map(|(_, state)| state.collision_box())
            .collect()
    }
}

/// Gravity and jump tuning, in blocks and seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsParams {
    /// Vertical acceleration (negative is down).
    pub gravity: f32,
    /// Most negative vertical speed reachable by falling.
    pub terminal_velocity: f32,
    /// Vertical speed set by a jump.
    pub jump_impulse: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            gravity: -32.0,
            terminal_velocity: -50.0,
            jump_impulse: 10.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Which face of the body made contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contact {
    /// Moving toward +axis; the body's max face hit a box.
    Positive,
    /// Moving toward -axis; the body's min face hit a box.
    Negative,
}

/// What happened during a step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepOutcome {
    /// Axes on which movement was stopped by a block.
    pub blocked: BVec3,
    /// The body came to rest on a block during the Y move.
    pub landed: bool,
}

/// Moves the body along one axis and clamps it out of the first overlapping
/// block box.
pub fn resolve_axis(
    body: &mut EntityBody,
    source: &dyn CollisionSource,
    axis: Axis,
    dt: f32,
) -> Option<Contact> {
    let i = axis.index();
    let speed = body.velocity[i];
    body.position[i] += speed * dt;

    let hitbox = body.hitbox();
    let hit = source
        .collision_boxes_near(body.position)
        .into_iter()
        .find(|candidate| hitbox.intersects(candidate))?;

    if speed > 0.0 {
        body.position[i] = hit.min[i] - body.size[i];
        body.velocity[i] = 0.0;
        Some(Contact::Positive)
    } else if speed < 0.0 {
        body.position[i] = hit.max[i];
        body.velocity[i] = 0.0;
        Some(Contact::Negative)
    } else {
        None
    }
}

#[derive(Clone, Debug, Default)]
pub struct CollisionResolver {
    params: PhysicsParams,
}

impl CollisionResolver {
    pub fn new(params: PhysicsParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PhysicsParams {
        &self.params
    }

    /// One full simulation step: X, gravity, Y, Z.
    pub fn step(
        &self,
        body: &mut EntityBody,
        source: &dyn CollisionSource,
        dt: f32,
    ) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        outcome.blocked.x = resolve_axis(body, source, Axis::X, dt).is_some();
        self.apply_gravity(body, dt);
        self.resolve_vertical(body, source, dt, &mut outcome);
        outcome.blocked.z = resolve_axis(body, source, Axis::Z, dt).is_some();
        outcome
    }

    /// Resolves all three axes with the current velocity and no gravity.
    pub fn resolve(
        &self,
        body: &mut EntityBody,
        source: &dyn CollisionSource,
        dt: f32,
    ) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        outcome.blocked.x = resolve_axis(body, source, Axis::X, dt).is_some();
        self.resolve_vertical(body, source, dt, &mut outcome);
        outcome.blocked.z = resolve_axis(body, source, Axis::Z, dt).is_some();
        outcome
    }

    fn resolve_vertical(
        &self,
        body: &mut EntityBody,
        source: &dyn CollisionSource,
        dt: f32,
        outcome: &mut StepOutcome,
    ) {
        match resolve_axis(body, source, Axis::Y, dt) {
            Some(Contact::Negative) => {
                if !body.is_grounded() {
                    trace!("body landed at y={}", body.position.y);
                }
                body.vertical_speed = 0.0;
                body.mode = VerticalMode::Grounded;
                outcome.blocked.y = true;
                outcome.landed = true;
            }
            Some(Contact::Positive) => {
                trace!("body hit ceiling at y={}", body.position.y + body.size.y);
                body.vertical_speed = 0.0;
                body.mode = VerticalMode::Airborne;
                outcome.blocked.y = true;
            }
            None => body.mode = VerticalMode::Airborne,
        }
    }

    /// Accelerates the body downward, clamped at terminal velocity, and
    /// copies the result into `velocity.y`.
    pub fn apply_gravity(&self, body: &mut EntityBody, dt: f32) {
        body.vertical_speed = (body.vertical_speed + self.params.gravity * dt)
            .max(self.params.terminal_velocity);
        body.velocity.y = body.vertical_speed;
    }

    /// Starts a jump if the body is grounded. Returns whether it did.
    pub fn jump(&self, body: &mut EntityBody) -> bool {
        if !body.is_grounded() {
            return false;
        }
        body.vertical_speed = self.params.jump_impulse;
        body.velocity.y = body.vertical_speed;
        body.mode = VerticalMode::Airborne;
        true
    }
}
