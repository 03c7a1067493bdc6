//! Sequential impulse constraint solver.

use crate::ecs::components::physics::Collider;

use super::constraint::{
    BodyState, Constraint, JointConstraint, PenetrationConstraint, SolverParams,
};
use super::contact::CollisionEvent;

/// Drives joint and penetration constraints through one step.
///
/// Joints live as [`JointConstraint`] components in the world and keep their
/// cached impulse between steps. Penetration constraints are owned here,
/// rebuilt from the collision events of every step and dropped by
/// [`ConstraintSolver::post_step`].
#[derive(Debug, Default)]
pub struct ConstraintSolver {
    penetrations: Vec<PenetrationConstraint>,
}

impl ConstraintSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Penetration constraints registered for the current step.
    pub fn penetrations(&self) -> &[PenetrationConstraint] {
        &self.penetrations
    }

    /// Turn every contact of every event into a penetration constraint.
    ///
    /// Sensor pairs and pairs missing a `RigidBody` or `Transform` are
    /// skipped.
    pub fn add_penetrations(&mut self, world: &hecs::World, events: &[CollisionEvent]) {
        for event in events {
            if is_sensor(world, event.entity_a) || is_sensor(world, event.entity_b) {
                tracing::trace!(a = ?event.entity_a, b = ?event.entity_b, "sensor pair, no response");
                continue;
            }
            let (Some(a), Some(b)) = (
                BodyState::load(world, event.entity_a),
                BodyState::load(world, event.entity_b),
            ) else {
                tracing::trace!(a = ?event.entity_a, b = ?event.entity_b, "pair without rigid bodies, no response");
                continue;
            };
            for contact in &event.contacts {
                self.penetrations.push(PenetrationConstraint::new(
                    event.entity_a,
                    event.entity_b,
                    contact,
                    &a,
                    &b,
                ));
            }
        }
    }

    /// Build Jacobians and biases and apply warm starts: joints first, then
    /// penetrations.
    pub fn pre_solve(&mut self, world: &hecs::World, dt: f32, params: &SolverParams) {
        for entity in joint_entities(world) {
            if let Ok(mut joint) = world.get::<&mut JointConstraint>(entity) {
                with_bodies(world, &mut *joint, |joint, a, b| {
                    joint.pre_solve(a, b, dt, params)
                });
            }
        }
        for penetration in &mut self.penetrations {
            with_bodies(world, penetration, |penetration, a, b| {
                penetration.pre_solve(a, b, dt, params)
            });
        }
    }

    /// One solver pass over joints, then penetrations.
    pub fn solve(&mut self, world: &hecs::World) {
        for entity in joint_entities(world) {
            if let Ok(mut joint) = world.get::<&mut JointConstraint>(entity) {
                with_bodies(world, &mut *joint, |joint, a, b| joint.solve(a, b));
            }
        }
        for penetration in &mut self.penetrations {
            with_bodies(world, penetration, |penetration, a, b| penetration.solve(a, b));
        }
    }

    /// Drop this step's penetration constraints. Joints persist.
    pub fn post_step(&mut self) {
        for penetration in &mut self.penetrations {
            penetration.post_solve();
        }
        self.penetrations.clear();
    }
}

fn is_sensor(world: &hecs::World, entity: hecs::Entity) -> bool {
    world
        .get::<&Collider>(entity)
        .map(|collider| collider.is_sensor)
        .unwrap_or(false)
}

fn joint_entities(world: &hecs::World) -> Vec<hecs::Entity> {
    world
        .query::<&JointConstraint>()
        .iter()
        .map(|(entity, _)| entity)
        .collect()
}

/// Load both bodies of `constraint`, run `f`, and store them back.
///
/// A constraint whose bodies are gone or incomplete is skipped for this pass.
fn with_bodies<C, F>(world: &hecs::World, constraint: &mut C, f: F)
where
    C: Constraint,
    F: FnOnce(&mut C, &mut BodyState, &mut BodyState),
{
    let (entity_a, entity_b) = constraint.bodies();
    let (Some(mut a), Some(mut b)) = (
        BodyState::load(world, entity_a),
        BodyState::load(world, entity_b),
    ) else {
        tracing::trace!(a = ?entity_a, b = ?entity_b, "constraint body missing, skipped");
        return;
    };
    f(constraint, &mut a, &mut b);
    a.store(world, entity_a);
    b.store(world, entity_b);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::physics::RigidBody;
    use crate::ecs::components::transform::Transform;
    use crate::physics::contact::Contact;
    use glam::Vec2;

    fn contact_event(a: hecs::Entity, b: hecs::Entity) -> CollisionEvent {
        CollisionEvent {
            entity_a: a,
            entity_b: b,
            contacts: vec![Contact {
                start: Vec2::new(0.0, -0.1),
                end: Vec2::ZERO,
                normal: Vec2::Y,
                depth: 0.1,
            }],
        }
    }

    #[test]
    fn test_penetrations_rebuilt_each_step() {
        let mut world = hecs::World::new();
        let ground = world.spawn((
            Transform::from_position(Vec2::new(0.0, -0.5)),
            RigidBody::new_static(),
            Collider::rect(10.0, 1.0),
        ));
        let ball = world.spawn((
            Transform::from_position(Vec2::new(0.0, 0.4)),
            RigidBody::new_dynamic(1.0, 1.0).with_velocity(Vec2::new(0.0, -2.0)),
            Collider::circle(0.5),
        ));

        let mut solver = ConstraintSolver::new();
        solver.add_penetrations(&world, &[contact_event(ground, ball)]);
        assert_eq!(solver.penetrations().len(), 1);

        let params = SolverParams::default();
        solver.pre_solve(&world, 1.0 / 60.0, &params);
        for _ in 0..8 {
            solver.solve(&world);
        }
        let rb = world.get::<&RigidBody>(ball).unwrap();
        assert!(rb.linear_velocity.y >= -1e-4, "vy = {}", rb.linear_velocity.y);
        drop(rb);

        solver.post_step();
        assert!(solver.penetrations().is_empty());
    }

    #[test]
    fn test_sensor_and_bodyless_pairs_are_skipped() {
        let mut world = hecs::World::new();
        let sensor = world.spawn((
            Transform::identity(),
            RigidBody::new_static(),
            Collider::circle(1.0).as_sensor(),
        ));
        let ball = world.spawn((
            Transform::identity(),
            RigidBody::new_dynamic(1.0, 1.0),
            Collider::circle(0.5),
        ));
        let ghost = world.spawn((Transform::identity(), Collider::circle(0.5)));

        let mut solver = ConstraintSolver::new();
        solver.add_penetrations(
            &world,
            &[contact_event(sensor, ball), contact_event(ball, ghost)],
        );
        assert!(solver.penetrations().is_empty());
    }

    #[test]
    fn test_kinematic_velocity_invariant() {
        let mut world = hecs::World::new();
        let mut kinematic = RigidBody::new_kinematic().with_velocity(Vec2::new(0.0, 2.0));
        kinematic.angular_velocity = 0.5;
        let platform = world.spawn((
            Transform::from_position(Vec2::new(0.0, -0.5)),
            kinematic,
            Collider::rect(4.0, 1.0),
        ));
        let ball = world.spawn((
            Transform::from_position(Vec2::new(0.0, 0.4)),
            RigidBody::new_dynamic(1.0, 0.1).with_velocity(Vec2::new(1.0, -3.0)),
            Collider::circle(0.5),
        ));
        let anchor = world.spawn((Transform::identity(), RigidBody::new_dynamic(1.0, 1.0)));
        let joint = JointConstraint::from_world(&world, platform, anchor, Vec2::ZERO).unwrap();
        world.spawn((joint,));

        let mut solver = ConstraintSolver::new();
        solver.add_penetrations(&world, &[contact_event(platform, ball)]);
        solver.pre_solve(&world, 1.0 / 60.0, &SolverParams::default());
        for _ in 0..8 {
            solver.solve(&world);
        }

        let rb = world.get::<&RigidBody>(platform).unwrap();
        assert_eq!(rb.linear_velocity, Vec2::new(0.0, 2.0));
        assert_eq!(rb.angular_velocity, 0.5);
    }

    #[test]
    fn test_joint_with_despawned_body_is_skipped() {
        let mut world = hecs::World::new();
        let a = world.spawn((Transform::identity(), RigidBody::new_static()));
        let b = world.spawn((
            Transform::from_position(Vec2::new(0.0, -1.0)),
            RigidBody::new_dynamic(1.0, 1.0).with_velocity(Vec2::X),
        ));
        let joint = JointConstraint::from_world(&world, a, b, Vec2::new(0.0, -1.0)).unwrap();
        world.spawn((joint,));
        world.despawn(a).unwrap();

        let mut solver = ConstraintSolver::new();
        solver.pre_solve(&world, 1.0 / 60.0, &SolverParams::default());
        solver.solve(&world);

        let rb = world.get::<&RigidBody>(b).unwrap();
        assert_eq!(rb.linear_velocity, Vec2::X);
    }
}
