//! Force generators.
//!
//! The free functions are pure: they compute a force from body state and
//! leave accumulation to the caller. [`apply_force_generators`] evaluates the
//! [`ForceGenerators`] component of every body once per step.

use glam::Vec2;

use crate::ecs::components::physics::{ForceGenerator, ForceGenerators, RigidBody};
use crate::ecs::components::transform::Transform;

/// Quadratic drag: `-unit(v) * k * |v|²`.
pub fn drag(velocity: Vec2, coefficient: f32) -> Vec2 {
    let speed_sq = velocity.length_squared();
    if speed_sq <= 0.0 {
        return Vec2::ZERO;
    }
    -velocity.normalize_or_zero() * coefficient * speed_sq
}

/// Kinetic friction of constant magnitude opposing `velocity`.
pub fn friction(velocity: Vec2, coefficient: f32) -> Vec2 {
    -velocity.normalize_or_zero() * coefficient
}

/// Gravitational attraction of body `a` toward body `b`.
///
/// The distance is clamped to `[min_distance, max_distance]` before squaring,
/// so nearby bodies do not produce unbounded forces and far bodies still
/// feel a weak pull.
pub fn gravitation(
    position_a: Vec2,
    mass_a: f32,
    position_b: Vec2,
    mass_b: f32,
    strength: f32,
    min_distance: f32,
    max_distance: f32,
) -> Vec2 {
    let d = position_b - position_a;
    let direction = d.normalize_or_zero();
    let distance = d.length().clamp(min_distance, max_distance.max(min_distance));
    if distance <= 0.0 {
        return Vec2::ZERO;
    }
    direction * (strength * mass_a * mass_b / (distance * distance))
}

/// Hooke spring pulling `position` toward a fixed `anchor`.
pub fn spring_to_anchor(position: Vec2, anchor: Vec2, rest_length: f32, stiffness: f32) -> Vec2 {
    let d = position - anchor;
    let displacement = d.length() - rest_length;
    -d.normalize_or_zero() * stiffness * displacement
}

/// Hooke spring between two bodies; the force acts on the body at `position_a`.
pub fn spring_between(
    position_a: Vec2,
    position_b: Vec2,
    rest_length: f32,
    stiffness: f32,
) -> Vec2 {
    spring_to_anchor(position_a, position_b, rest_length, stiffness)
}

/// Evaluate every body's force generators and add the results to its
/// accumulated force.
///
/// Generators referencing another body read that body's state as it was at
/// the start of the pass; a generator whose other body is gone (or lacks a
/// `Transform`/`RigidBody`) contributes nothing. Each generator only pushes
/// its owner: attach a mirrored generator to the other body for a
/// two-sided spring.
pub fn apply_force_generators(world: &mut hecs::World) {
    let mut forces = Vec::new();
    {
        let mut query = world.query::<(&ForceGenerators, &RigidBody, &Transform)>();
        for (entity, (generators, rb, transform)) in query.iter() {
            let mut total = Vec2::ZERO;
            for generator in &generators.0 {
                total += evaluate(world, generator, rb, transform);
            }
            forces.push((entity, total));
        }
    }

    for (entity, force) in forces {
        if let Ok(mut rb) = world.get::<&mut RigidBody>(entity) {
            rb.add_force(force);
        }
    }
}

fn evaluate(
    world: &hecs::World,
    generator: &ForceGenerator,
    rb: &RigidBody,
    transform: &Transform,
) -> Vec2 {
    match *generator {
        ForceGenerator::Drag { coefficient } => drag(rb.linear_velocity, coefficient),
        ForceGenerator::Friction { coefficient } => friction(rb.linear_velocity, coefficient),
        ForceGenerator::AnchorSpring {
            anchor,
            rest_length,
            stiffness,
        } => spring_to_anchor(transform.position, anchor, rest_length, stiffness),
        ForceGenerator::BodySpring {
            other,
            rest_length,
            stiffness,
        } => match world.get::<&Transform>(other) {
            Ok(other_transform) => spring_between(
                transform.position,
                other_transform.position,
                rest_length,
                stiffness,
            ),
            Err(_) => {
                tracing::trace!(?other, "spring target missing, skipped");
                Vec2::ZERO
            }
        },
        ForceGenerator::Attractor {
            other,
            strength,
            min_distance,
            max_distance,
        } => {
            let other_state = world
                .get::<&Transform>(other)
                .ok()
                .map(|t| t.position)
                .zip(world.get::<&RigidBody>(other).ok().map(|b| b.mass()));
            match other_state {
                Some((position, mass)) => gravitation(
                    transform.position,
                    rb.mass(),
                    position,
                    mass,
                    strength,
                    min_distance,
                    max_distance,
                ),
                None => {
                    tracing::trace!(?other, "attractor target missing, skipped");
                    Vec2::ZERO
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_opposes_velocity_quadratically() {
        let f = drag(Vec2::new(2.0, 0.0), 0.5);
        assert!((f - Vec2::new(-2.0, 0.0)).length() < 1e-6);
        assert_eq!(drag(Vec2::ZERO, 0.5), Vec2::ZERO);
    }

    #[test]
    fn test_friction_constant_magnitude() {
        let slow = friction(Vec2::new(0.0, 0.1), 3.0);
        let fast = friction(Vec2::new(0.0, 100.0), 3.0);
        assert!((slow - Vec2::new(0.0, -3.0)).length() < 1e-5);
        assert!((fast - slow).length() < 1e-5);
        assert_eq!(friction(Vec2::ZERO, 3.0), Vec2::ZERO);
    }

    #[test]
    fn test_gravitation_points_toward_other_and_clamps() {
        let f = gravitation(Vec2::ZERO, 2.0, Vec2::new(2.0, 0.0), 3.0, 1.0, 0.1, 100.0);
        // 1 * 2 * 3 / 4
        assert!((f - Vec2::new(1.5, 0.0)).length() < 1e-5);

        // Closer than min_distance behaves as if at min_distance.
        let near = gravitation(Vec2::ZERO, 1.0, Vec2::new(0.01, 0.0), 1.0, 1.0, 1.0, 100.0);
        assert!((near - Vec2::new(1.0, 0.0)).length() < 1e-5);

        // Coincident bodies have no direction.
        let same = gravitation(Vec2::ONE, 1.0, Vec2::ONE, 1.0, 1.0, 1.0, 100.0);
        assert_eq!(same, Vec2::ZERO);
    }

    #[test]
    fn test_spring_restores_toward_rest_length() {
        // Stretched: pulled back toward the anchor.
        let stretched = spring_to_anchor(Vec2::new(3.0, 0.0), Vec2::ZERO, 1.0, 10.0);
        assert!((stretched - Vec2::new(-20.0, 0.0)).length() < 1e-4);

        // Compressed: pushed away.
        let compressed = spring_between(Vec2::new(0.5, 0.0), Vec2::ZERO, 1.0, 10.0);
        assert!((compressed - Vec2::new(5.0, 0.0)).length() < 1e-4);

        // At rest length: no force.
        let rest = spring_to_anchor(Vec2::new(0.0, 1.0), Vec2::ZERO, 1.0, 10.0);
        assert!(rest.length() < 1e-5);
    }

    #[test]
    fn test_apply_force_generators_accumulates() {
        let mut world = hecs::World::new();
        let heavy = world.spawn((
            Transform::from_position(Vec2::new(4.0, 0.0)),
            RigidBody::new_dynamic(8.0, 1.0),
        ));
        let body = world.spawn((
            Transform::from_position(Vec2::ZERO),
            RigidBody::new_dynamic(1.0, 1.0).with_velocity(Vec2::new(0.0, 1.0)),
            ForceGenerators(vec![
                ForceGenerator::Drag { coefficient: 1.0 },
                ForceGenerator::Attractor {
                    other: heavy,
                    strength: 2.0,
                    min_distance: 1.0,
                    max_distance: 10.0,
                },
            ]),
        ));

        apply_force_generators(&mut world);

        let rb = world.get::<&RigidBody>(body).unwrap();
        // Drag (0,-1) plus attraction 2 * 1 * 8 / 16 = 1 toward +x.
        assert!((rb.force_accumulator - Vec2::new(1.0, -1.0)).length() < 1e-5);
        let heavy_rb = world.get::<&RigidBody>(heavy).unwrap();
        assert_eq!(heavy_rb.force_accumulator, Vec2::ZERO);
    }

    #[test]
    fn test_generator_with_missing_target_contributes_nothing() {
        let mut world = hecs::World::new();
        let gone = world.spawn((Transform::identity(),));
        world.despawn(gone).unwrap();
        let body = world.spawn((
            Transform::identity(),
            RigidBody::new_dynamic(1.0, 1.0),
            ForceGenerators(vec![ForceGenerator::BodySpring {
                other: gone,
                rest_length: 1.0,
                stiffness: 5.0,
            }]),
        ));

        apply_force_generators(&mut world);

        let rb = world.get::<&RigidBody>(body).unwrap();
        assert_eq!(rb.force_accumulator, Vec2::ZERO);
    }
}
