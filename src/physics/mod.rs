//! CPU-based 2D physics engine with rigid body simulation, collision
//! detection, and a sequential-impulse constraint solver.
//!
//! # Architecture
//!
//! The physics pipeline runs in a fixed timestep loop:
//!
//! 1. Apply forces (gravity, force generators)
//! 2. Integrate forces into velocities
//! 3. Refresh collider world-space caches
//! 4. Broadphase (all pairs) and narrowphase collision detection
//! 5. Resolve collisions: register penetration constraints, or respond
//!    directly (see [`ResolutionMode`])
//! 6. Pre-solve and solve constraints (joints, then penetrations)
//! 7. Integrate velocities into positions
//! 8. Drop the step's penetration constraints

pub mod broadphase;
pub mod collider;
pub mod constraint;
pub mod contact;
pub mod force;
pub mod narrowphase;
pub mod response;
pub mod rigid_body;
pub mod solver;

use glam::Vec2;

use self::broadphase::BruteForcePairs;
use self::constraint::SolverParams;
use self::contact::CollisionEvent;
use self::solver::ConstraintSolver;

/// How detected collisions are resolved. Exactly one path runs per world.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolutionMode {
    /// Penetration constraints solved together with joints, with friction.
    #[default]
    ConstraintSolver,
    /// Immediate projection and restitution impulse per contact.
    DirectImpulse,
}

/// Configuration for the physics simulation.
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Gravity vector. Default: (0, -9.81).
    pub gravity: Vec2,
    /// Fixed timestep for physics updates in seconds. Default: 1/60.
    pub fixed_timestep: f64,
    /// Maximum number of sub-steps per frame. Default: 4.
    pub max_substeps: u32,
    /// Number of constraint solver iterations. Default: 8.
    pub solver_iterations: u32,
    /// Collision resolution path. Default: [`ResolutionMode::ConstraintSolver`].
    pub resolution: ResolutionMode,
    /// Baumgarte stabilisation parameters.
    pub solver: SolverParams,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.81),
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 4,
            solver_iterations: 8,
            resolution: ResolutionMode::default(),
            solver: SolverParams::default(),
        }
    }
}

/// The main physics world managing simulation state.
pub struct PhysicsWorld {
    config: PhysicsConfig,
    accumulator: f64,
    broadphase: BruteForcePairs,
    solver: ConstraintSolver,
    events: Vec<CollisionEvent>,
}

impl PhysicsWorld {
    /// Create a new physics world with the given configuration.
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            accumulator: 0.0,
            broadphase: BruteForcePairs::new(),
            solver: ConstraintSolver::new(),
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn solver(&self) -> &ConstraintSolver {
        &self.solver
    }

    /// Collision events produced by the last `step`/`step_fixed` call.
    pub fn events(&self) -> &[CollisionEvent] {
        &self.events
    }

    /// Take the collision events produced by the last `step`/`step_fixed` call.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, CollisionEvent> {
        self.events.drain(..)
    }

    /// Step the physics simulation forward by `delta_time` seconds.
    ///
    /// Uses a fixed timestep accumulator to ensure deterministic simulation.
    pub fn step(&mut self, world: &mut hecs::World, delta_time: f64) {
        self.events.clear();
        self.accumulator += delta_time;

        let mut substeps = 0u32;
        while self.accumulator >= self.config.fixed_timestep && substeps < self.config.max_substeps
        {
            self.fixed_step(world, self.config.fixed_timestep as f32);
            self.accumulator -= self.config.fixed_timestep;
            substeps += 1;
        }

        // Clamp accumulator to avoid spiral of death
        if self.accumulator > self.config.fixed_timestep * self.config.max_substeps as f64 {
            self.accumulator = 0.0;
        }
    }

    /// Run exactly one fixed step, bypassing the accumulator.
    pub fn step_fixed(&mut self, world: &mut hecs::World) {
        self.events.clear();
        self.fixed_step(world, self.config.fixed_timestep as f32);
    }

    fn fixed_step(&mut self, world: &mut hecs::World, dt: f32) {
        // 1. Apply forces
        rigid_body::apply_gravity(world, self.config.gravity);
        force::apply_force_generators(world);

        // 2. Integrate forces into velocities
        rigid_body::integrate_forces(world, dt);

        // 3-4. Collision detection on fresh world-space geometry
        collider::update_colliders(world);
        let pairs = self.broadphase.find_pairs(world);
        let events = narrowphase::detect_collisions(world, &pairs);

        // 5. Collision resolution
        match self.config.resolution {
            ResolutionMode::ConstraintSolver => self.solver.add_penetrations(world, &events),
            ResolutionMode::DirectImpulse => response::resolve_collisions(world, &events),
        }

        // 6. Constraints
        self.solver.pre_solve(world, dt, &self.config.solver);
        for _ in 0..self.config.solver_iterations {
            self.solver.solve(world);
        }

        tracing::debug!(
            events = events.len(),
            penetrations = self.solver.penetrations().len(),
            "physics step"
        );

        // 7. Integrate positions
        rigid_body::integrate_velocities(world, dt);

        // 8. Penetrations do not carry over
        self.solver.post_step();

        self.events.extend(events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::physics::{Collider, ColliderShape, RigidBody};
    use crate::ecs::components::transform::Transform;
    use crate::physics::constraint::JointConstraint;

    fn spawn_ground(world: &mut hecs::World) -> hecs::Entity {
        world.spawn((
            Transform::from_position(Vec2::new(0.0, -0.5)),
            RigidBody::new_static()
                .with_restitution(0.0)
                .with_friction(0.5),
            Collider::rect(20.0, 1.0),
        ))
    }

    fn spawn_ball(world: &mut hecs::World, position: Vec2) -> hecs::Entity {
        let shape = ColliderShape::Circle { radius: 0.5 };
        world.spawn((
            Transform::from_position(position),
            RigidBody::for_shape(1.0, &shape).with_restitution(0.0),
            Collider::new(shape),
        ))
    }

    #[test]
    fn test_physics_world_free_fall() {
        let mut world = hecs::World::new();
        let mut physics = PhysicsWorld::new(PhysicsConfig::default());

        let entity = spawn_ball(&mut world, Vec2::new(0.0, 10.0));

        // Simulate ~1 second
        for _ in 0..60 {
            physics.step_fixed(&mut world);
        }

        let transform = world.get::<&Transform>(entity).unwrap();
        assert!(
            transform.position.y < 10.0 - 4.5,
            "Body should have fallen: y = {}",
            transform.position.y
        );
        assert!(physics.events().is_empty());
    }

    #[test]
    fn test_step_caps_substeps() {
        let mut world = hecs::World::new();
        let mut physics = PhysicsWorld::new(PhysicsConfig::default());
        let entity = spawn_ball(&mut world, Vec2::ZERO);

        // A one-second hitch runs at most four fixed steps.
        physics.step(&mut world, 1.0);

        let rb = world.get::<&RigidBody>(entity).unwrap();
        assert!((rb.linear_velocity.y + 9.81 * 4.0 / 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_ball_comes_to_rest_on_ground() {
        let mut world = hecs::World::new();
        let mut physics = PhysicsWorld::new(PhysicsConfig::default());

        spawn_ground(&mut world);
        let ball = spawn_ball(&mut world, Vec2::new(0.0, 2.0));

        // Simulate 3 seconds
        for _ in 0..180 {
            physics.step_fixed(&mut world);
        }

        let transform = world.get::<&Transform>(ball).unwrap();
        let rb = world.get::<&RigidBody>(ball).unwrap();

        // Resting on the surface at y = 0, within the penetration slop.
        assert!(
            transform.position.y > 0.45 && transform.position.y < 0.51,
            "Ball should rest on the ground: y = {}",
            transform.position.y
        );
        let speed = rb.linear_velocity.length();
        assert!(speed < 0.05, "Ball should have settled: speed = {}", speed);
        assert!(!physics.events().is_empty());
    }

    #[test]
    fn test_direct_impulse_mode_stops_ball() {
        let mut world = hecs::World::new();
        let mut physics = PhysicsWorld::new(PhysicsConfig {
            resolution: ResolutionMode::DirectImpulse,
            ..Default::default()
        });

        spawn_ground(&mut world);
        let ball = spawn_ball(&mut world, Vec2::new(0.0, 2.0));

        for _ in 0..180 {
            physics.step_fixed(&mut world);
        }

        let transform = world.get::<&Transform>(ball).unwrap();
        let rb = world.get::<&RigidBody>(ball).unwrap();
        assert!(
            transform.position.y > 0.4 && transform.position.y < 0.55,
            "y = {}",
            transform.position.y
        );
        assert!(rb.linear_velocity.length() < 0.2);
        assert!(physics.solver().penetrations().is_empty());
    }

    #[test]
    fn test_joint_holds_body() {
        let mut world = hecs::World::new();
        let mut physics = PhysicsWorld::new(PhysicsConfig::default());

        let pivot = world.spawn((Transform::identity(), RigidBody::new_static()));
        let bob = world.spawn((
            Transform::from_position(Vec2::new(0.0, -1.0)),
            RigidBody::new_dynamic(1.0, 0.1),
        ));
        let joint = JointConstraint::from_world(&world, pivot, bob, Vec2::new(0.0, -1.0)).unwrap();
        let joint_entity = world.spawn((joint,));

        for _ in 0..120 {
            physics.step_fixed(&mut world);
        }

        let transform = world.get::<&Transform>(bob).unwrap();
        assert!(
            (transform.position - Vec2::new(0.0, -1.0)).length() < 0.05,
            "Bob should hang at its anchor: {:?}",
            transform.position
        );
        // The joint keeps carrying the bob's weight between steps.
        let joint = world.get::<&JointConstraint>(joint_entity).unwrap();
        assert!(joint.cached_lambda().abs() > 0.0);
    }

    #[test]
    fn test_pendulum_swings_at_fixed_length() {
        let mut world = hecs::World::new();
        let mut physics = PhysicsWorld::new(PhysicsConfig::default());

        let pivot = world.spawn((Transform::identity(), RigidBody::new_static()));
        let bob = world.spawn((
            Transform::from_position(Vec2::new(1.0, 0.0)),
            RigidBody::new_dynamic(1.0, 0.05),
        ));
        let joint = JointConstraint::from_world(&world, pivot, bob, Vec2::ZERO).unwrap();
        world.spawn((joint,));

        for _ in 0..30 {
            physics.step_fixed(&mut world);
        }

        let position = world.get::<&Transform>(bob).unwrap().position;
        assert!(position.y < -0.2, "Bob should swing down: {:?}", position);
        assert!(
            (position.length() - 1.0).abs() < 0.3,
            "Bob should stay on its arc: {:?}",
            position
        );
    }

    #[test]
    fn test_events_emitted_and_drained() {
        let mut world = hecs::World::new();
        let mut physics = PhysicsWorld::new(PhysicsConfig::default());

        let a = world.spawn((Transform::identity(), Collider::circle(1.0)));
        let b = world.spawn((
            Transform::from_position(Vec2::new(1.5, 0.0)),
            Collider::circle(1.0),
        ));

        physics.step_fixed(&mut world);
        assert_eq!(physics.events().len(), 1);
        let event = &physics.events()[0];
        assert!(event.involves(a) && event.involves(b));
        assert!((event.contacts[0].depth - 0.5).abs() < 1e-5);

        let drained: Vec<_> = physics.drain_events().collect();
        assert_eq!(drained.len(), 1);
        assert!(physics.events().is_empty());
        // Colliders without rigid bodies produce no constraints.
        assert!(physics.solver().penetrations().is_empty());
    }

    #[test]
    fn test_sensor_reports_but_does_not_block() {
        let mut world = hecs::World::new();
        let mut physics = PhysicsWorld::new(PhysicsConfig::default());

        let sensor = world.spawn((
            Transform::from_position(Vec2::new(0.0, -0.5)),
            RigidBody::new_static(),
            Collider::rect(20.0, 1.0).as_sensor(),
        ));
        let ball = spawn_ball(&mut world, Vec2::new(0.0, 0.6));

        let mut saw_sensor = false;
        for _ in 0..60 {
            physics.step_fixed(&mut world);
            saw_sensor |= physics.events().iter().any(|e| e.involves(sensor));
        }

        assert!(saw_sensor);
        let transform = world.get::<&Transform>(ball).unwrap();
        assert!(transform.position.y < -1.0, "y = {}", transform.position.y);
    }

    #[test]
    fn test_physics_config_default() {
        let config = PhysicsConfig::default();
        assert_eq!(config.gravity, Vec2::new(0.0, -9.81));
        assert!((config.fixed_timestep - 1.0 / 60.0).abs() < 1e-10);
        assert_eq!(config.max_substeps, 4);
        assert_eq!(config.solver_iterations, 8);
        assert_eq!(config.resolution, ResolutionMode::ConstraintSolver);
        assert_eq!(config.solver, SolverParams::default());
    }
}
