//! Shared setup helpers for rein2d benchmarks.
//!
//! ## Running
//!
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench physics
//!
//! Filter by group:
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench physics -- narrowphase

use glam::Vec2;
use rein2d::ecs::bridge::{spawn_body, spawn_joint, spawn_static_polygon};
use rein2d::ecs::components::physics::{Collider, ColliderShape, RigidBody};
use rein2d::physics::contact::CollisionEvent;
use rein2d::physics::narrowphase::detect_collisions;
use rein2d::physics::{PhysicsConfig, PhysicsWorld};

/// Counter-clockwise square outline centred on `center`.
pub fn square(center: Vec2, half: f32) -> Vec<Vec2> {
    vec![
        center + Vec2::new(-half, -half),
        center + Vec2::new(half, -half),
        center + Vec2::new(half, half),
        center + Vec2::new(-half, half),
    ]
}

/// Regular counter-clockwise polygon with `sides` vertices.
pub fn regular_polygon(center: Vec2, radius: f32, sides: usize) -> Vec<Vec2> {
    (0..sides)
        .map(|i| {
            let angle = i as f32 / sides as f32 * std::f32::consts::TAU;
            center + Vec2::from_angle(angle) * radius
        })
        .collect()
}

/// Spawn `n` dynamic bodies (alternating circles and boxes) in a grid over a
/// static floor, spaced so neighbours overlap slightly.
pub fn setup_world(n: usize) -> hecs::World {
    let mut world = hecs::World::new();
    let cols = (n as f32).sqrt().ceil() as usize;

    spawn_static_polygon(
        &mut world,
        &[
            Vec2::new(-1000.0, -1.0),
            Vec2::new(1000.0, -1.0),
            Vec2::new(1000.0, 0.0),
            Vec2::new(-1000.0, 0.0),
        ],
    )
    .expect("floor outline is valid");

    for i in 0..n {
        let x = (i % cols) as f32 * 0.95;
        let y = 0.5 + (i / cols) as f32 * 0.95;
        let shape = if i % 2 == 0 {
            ColliderShape::Circle { radius: 0.5 }
        } else {
            ColliderShape::Box {
                width: 1.0,
                height: 1.0,
            }
        };
        spawn_body(
            &mut world,
            Vec2::new(x, y),
            RigidBody::for_shape(1.0, &shape),
            Collider::new(shape),
        );
    }
    world
}

/// World and physics ready to step.
pub fn setup_scene(n: usize) -> (hecs::World, PhysicsWorld) {
    (setup_world(n), PhysicsWorld::new(PhysicsConfig::default()))
}

/// World with its collision events for solver benchmarks.
pub fn setup_contacts(n: usize) -> (hecs::World, Vec<CollisionEvent>) {
    let mut world = setup_world(n);
    let pairs = rein2d::physics::broadphase::BruteForcePairs::new().find_pairs(&world);
    let events = detect_collisions(&mut world, &pairs);
    (world, events)
}

/// A chain of `links` bodies joined end to end, hanging from a static pivot.
pub fn setup_chain(links: usize) -> (hecs::World, PhysicsWorld) {
    let mut world = hecs::World::new();
    let mut previous = spawn_body(
        &mut world,
        Vec2::ZERO,
        RigidBody::new_static(),
        Collider::circle(0.1).as_sensor(),
    );
    for i in 0..links {
        let anchor = Vec2::new(i as f32 * 0.5, 0.0);
        let link = spawn_body(
            &mut world,
            anchor + Vec2::new(0.5, 0.0),
            RigidBody::new_dynamic(1.0, 0.1),
            Collider::circle(0.1).as_sensor(),
        );
        spawn_joint(&mut world, previous, link, anchor).expect("links are distinct");
        previous = link;
    }
    (world, PhysicsWorld::new(PhysicsConfig::default()))
}
