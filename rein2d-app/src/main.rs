use glam::Vec2;
use rein2d::ecs::components::physics::{ColliderShape, ForceGenerator, ForceGenerators};
use rein2d::prelude::*;
use rein2d::{PhysicsConfig, PhysicsWorld};

/// Frame time of the simulated game loop.
const FRAME_DT: f64 = 1.0 / 60.0;
const SECONDS: u32 = 10;

struct Level {
    hole: hecs::Entity,
    ball: hecs::Entity,
}

fn build_level(world: &mut hecs::World) -> anyhow::Result<Level> {
    // Terrain: a flat floor and a ramp, as world-space outlines.
    spawn_static_polygon(
        world,
        &[
            Vec2::new(-20.0, -1.0),
            Vec2::new(20.0, -1.0),
            Vec2::new(20.0, 0.0),
            Vec2::new(-20.0, 0.0),
        ],
    )?;
    spawn_static_polygon(
        world,
        &[
            Vec2::new(-12.0, 0.0),
            Vec2::new(-6.0, 0.0),
            Vec2::new(-12.0, 4.0),
        ],
    )?;

    // Sensor at the far end of the floor.
    let hole = world.spawn((
        Transform::from_position(Vec2::new(8.0, 0.25)),
        RigidBody::new_static(),
        Collider::rect(1.0, 0.5).as_sensor(),
    ));

    // A ball rolling down the ramp.
    let shape = ColliderShape::Circle { radius: 0.4 };
    let ball = spawn_body(
        world,
        Vec2::new(-11.0, 5.0),
        RigidBody::for_shape(1.0, &shape)
            .with_restitution(0.2)
            .with_velocity(Vec2::new(1.0, 0.0)),
        Collider::new(shape),
    );
    world.insert_one(
        ball,
        ForceGenerators(vec![ForceGenerator::Drag { coefficient: 0.05 }]),
    )?;

    // A stack of crates.
    for i in 0..3 {
        let shape = ColliderShape::Box {
            width: 1.0,
            height: 1.0,
        };
        spawn_body(
            world,
            Vec2::new(2.0, 0.5 + i as f32 * 1.05),
            RigidBody::for_shape(2.0, &shape).with_friction(0.6),
            Collider::new(shape),
        );
    }

    // A pendulum hanging from a fixed pivot.
    let pivot = spawn_body(
        world,
        Vec2::new(5.0, 6.0),
        RigidBody::new_static(),
        Collider::circle(0.1).as_sensor(),
    );
    let shape = ColliderShape::Circle { radius: 0.3 };
    let bob = spawn_body(
        world,
        Vec2::new(7.0, 6.0),
        RigidBody::for_shape(1.0, &shape),
        Collider::new(shape),
    );
    spawn_joint(world, pivot, bob, Vec2::new(5.0, 6.0))?;

    Ok(Level { hole, ball })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut world = hecs::World::new();
    let mut physics = PhysicsWorld::new(PhysicsConfig::default());
    let level = build_level(&mut world)?;

    let mut contacts = 0usize;
    for frame in 0..SECONDS * 60 {
        physics.step(&mut world, FRAME_DT);

        for event in physics.drain_events() {
            contacts += event.contacts.len();
            if event.involves(level.hole) && event.involves(level.ball) {
                log::info!("frame {frame}: ball reached the hole");
            }
        }
    }

    let ball = world.get::<&Transform>(level.ball)?;
    log::info!(
        "simulated {SECONDS}s, {contacts} contacts, ball at ({:.2}, {:.2})",
        ball.position.x,
        ball.position.y
    );
    Ok(())
}
