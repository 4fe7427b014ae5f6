//! Unit tests for axis-separated collision, gravity, and jumping.

use glam::{IVec3, Vec3};
use terracube_terrain::{GeneratorParams, WorldGenerator};
use terracube_voxel::{BlockType, Chunk, ChunkPos};
use terracube_world::World;

use crate::body::{EntityBody, VerticalMode};
use crate::collision::{
    Axis, CollisionResolver, CollisionSource, Contact, PhysicsParams, resolve_axis,
};

const DT: f32 = 1.0 / 60.0;

/// An empty origin chunk with stone at each of `blocks`.
fn world_with(blocks: &[IVec3]) -> World {
    let mut world = World::new(WorldGenerator::new(0, GeneratorParams::default()));
    world.insert_chunk(Chunk::new(ChunkPos::new(0, 0)));
    for &pos in blocks {
        assert!(world.place_block(pos, BlockType::Stone), "placing {pos}");
    }
    world
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn test_collision_boxes_limited_to_feet_section() {
    let world = world_with(&[IVec3::new(8, 64, 8), IVec3::new(8, 40, 8)]);
    let boxes = world.collision_boxes_near(Vec3::new(8.5, 65.0, 8.5));
    assert_eq!(boxes.len(), 1, "only the section holding y = 64..80");
    assert!(world.collision_boxes_near(Vec3::new(8.5, 300.0, 8.5)).is_empty());
    assert!(world.collision_boxes_near(Vec3::new(-5.0, 65.0, 8.5)).is_empty());
}

#[test]
fn test_x_collision_is_isolated_from_other_axes() {
    let world = world_with(&[IVec3::new(8, 64, 8)]);
    let resolver = CollisionResolver::default();
    let mut body = EntityBody::player(Vec3::new(7.0, 64.0, 8.2));
    body.velocity = Vec3::new(5.0, 0.0, 0.0);

    let outcome = resolver.resolve(&mut body, &world, 0.1);

    assert!(approx(body.position.x, 7.4), "x clamped to 8 - width, got {}", body.position.x);
    assert_eq!(body.velocity.x, 0.0);
    assert_eq!(body.position.y, 64.0);
    assert_eq!(body.position.z, 8.2);
    assert_eq!(body.velocity, Vec3::ZERO);
    assert!(outcome.blocked.x);
    assert!(!outcome.blocked.y && !outcome.blocked.z);
}

#[test]
fn test_negative_direction_clamps_to_max_face() {
    let world = world_with(&[IVec3::new(8, 64, 8)]);
    let mut body = EntityBody::player(Vec3::new(9.1, 64.0, 8.2));
    body.velocity = Vec3::new(-5.0, 0.0, 0.0);

    let contact = resolve_axis(&mut body, &world, Axis::X, 0.1);

    assert_eq!(contact, Some(Contact::Negative));
    assert_eq!(body.position.x, 9.0);
    assert_eq!(body.velocity.x, 0.0);
}

#[test]
fn test_sliding_along_floor_is_not_blocked() {
    let world = world_with(&[IVec3::new(8, 64, 8), IVec3::new(9, 64, 8)]);
    let mut body = EntityBody::player(Vec3::new(8.1, 65.0, 8.2));
    body.velocity = Vec3::new(2.0, 0.0, 0.0);

    let contact = resolve_axis(&mut body, &world, Axis::X, 0.1);

    assert_eq!(contact, None, "touching the floor face is not a collision");
    assert!(approx(body.position.x, 8.3));
}

#[test]
fn test_falls_and_lands_on_block() {
    let world = world_with(&[IVec3::new(8, 64, 8)]);
    let resolver = CollisionResolver::default();
    let mut body = EntityBody::player(Vec3::new(8.2, 70.0, 8.2));

    let mut landed_at = None;
    for step in 0..300 {
        let outcome = resolver.step(&mut body, &world, DT);
        if outcome.landed {
            landed_at = Some(step);
            break;
        }
        assert_eq!(body.mode, VerticalMode::Airborne);
    }

    assert!(landed_at.is_some(), "body never landed");
    assert_eq!(body.position.y, 65.0);
    assert_eq!(body.mode, VerticalMode::Grounded);
    assert_eq!(body.vertical_speed, 0.0);

    // Resting contact keeps the body grounded at the same height.
    for _ in 0..30 {
        resolver.step(&mut body, &world, DT);
        assert!(body.is_grounded());
        assert_eq!(body.position.y, 65.0);
    }
}

#[test]
fn test_jump_only_when_grounded() {
    let world = world_with(&[IVec3::new(8, 64, 8)]);
    let resolver = CollisionResolver::default();
    let mut body = EntityBody::player(Vec3::new(8.2, 66.0, 8.2));

    // Airborne: jump is ignored and does not change vertical speed.
    resolver.step(&mut body, &world, DT);
    let speed = body.vertical_speed;
    assert!(!resolver.jump(&mut body));
    assert_eq!(body.vertical_speed, speed);

    while !body.is_grounded() {
        resolver.step(&mut body, &world, DT);
    }

    assert!(resolver.jump(&mut body));
    assert_eq!(body.mode, VerticalMode::Airborne);
    assert_eq!(body.vertical_speed, PhysicsParams::default().jump_impulse);
    assert!(!resolver.jump(&mut body), "no double jump");

    resolver.step(&mut body, &world, DT);
    assert!(body.position.y > 65.0, "jump should lift the body");
    assert!(!body.is_grounded());
}

#[test]
fn test_jump_on_step_before_landing_is_ignored() {
    let world = world_with(&[IVec3::new(8, 64, 8)]);
    let resolver = CollisionResolver::default();
    let mut body = EntityBody::player(Vec3::new(8.2, 67.0, 8.2));

    let mut checked = false;
    for _ in 0..300 {
        let mut lookahead = body.clone();
        if resolver.step(&mut lookahead, &world, DT).landed {
            // The next step lands; the body is still airborne now.
            let speed = body.vertical_speed;
            assert!(!resolver.jump(&mut body));
            assert_eq!(body.vertical_speed, speed);
            assert_eq!(body.mode, VerticalMode::Airborne);

            let outcome = resolver.step(&mut body, &world, DT);
            assert!(outcome.landed);
            assert!(body.is_grounded());
            assert_eq!(body.position.y, 65.0);
            checked = true;
            break;
        }
        body = lookahead;
    }
    assert!(checked, "body never reached the step before landing");
}

#[test]
fn test_ceiling_hit_stops_rise_without_grounding() {
    let world = world_with(&[IVec3::new(8, 68, 8)]);
    let resolver = CollisionResolver::default();
    let mut body = EntityBody::player(Vec3::new(8.2, 65.5, 8.2));
    body.vertical_speed = 20.0;

    let outcome = resolver.step(&mut body, &world, 0.05);

    assert!(outcome.blocked.y);
    assert!(!outcome.landed);
    assert!(approx(body.position.y, 68.0 - 1.8), "got {}", body.position.y);
    assert_eq!(body.vertical_speed, 0.0);
    assert_eq!(body.velocity.y, 0.0);
    assert_eq!(body.mode, VerticalMode::Airborne);
}

#[test]
fn test_gravity_clamps_at_terminal_velocity() {
    let resolver = CollisionResolver::new(PhysicsParams {
        gravity: -30.0,
        terminal_velocity: -10.0,
        jump_impulse: 8.0,
    });
    let mut body = EntityBody::player(Vec3::new(0.0, 200.0, 0.0));

    resolver.apply_gravity(&mut body, 0.1);
    assert!(approx(body.vertical_speed, -3.0));
    assert_eq!(body.velocity.y, body.vertical_speed);

    for _ in 0..10 {
        resolver.apply_gravity(&mut body, 0.1);
    }
    assert_eq!(body.vertical_speed, -10.0);
}

#[test]
fn test_free_fall_in_unloaded_space() {
    let world = world_with(&[]);
    let resolver = CollisionResolver::default();
    let mut body = EntityBody::player(Vec3::new(100.0, 120.0, 100.0));
    resolver.step(&mut body, &world, 0.1);
    assert!(body.position.y < 120.0);
    assert_eq!(body.mode, VerticalMode::Airborne);
}
