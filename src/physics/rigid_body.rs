//! Rigid body integration functions.

use glam::Vec2;

use crate::ecs::components::physics::RigidBody;
use crate::ecs::components::transform::Transform;

impl RigidBody {
    /// Integrate accumulated force into linear velocity.
    ///
    /// `v += F * inv_mass * dt`, then returns the displacement `v * dt` for
    /// the caller to add to the position. The force accumulator is cleared.
    /// Static bodies return zero; kinematic bodies ignore forces but still
    /// report the displacement of their driven velocity.
    pub fn integrate(&mut self, dt: f32) -> Vec2 {
        if self.is_static() {
            self.clear_forces();
            return Vec2::ZERO;
        }
        if !self.is_kinematic {
            let acceleration = self.force_accumulator * self.inv_mass();
            self.linear_velocity += acceleration * dt;
        }
        self.force_accumulator = Vec2::ZERO;
        self.linear_velocity * dt
    }

    /// Angular counterpart of [`RigidBody::integrate`]; returns the change
    /// in rotation and clears the torque accumulator.
    pub fn integrate_angular(&mut self, dt: f32) -> f32 {
        if self.is_static() {
            self.torque_accumulator = 0.0;
            return 0.0;
        }
        if !self.is_kinematic {
            let angular_acceleration = self.torque_accumulator * self.inv_inertia();
            self.angular_velocity += angular_acceleration * dt;
        }
        self.torque_accumulator = 0.0;
        self.angular_velocity * dt
    }
}

/// Apply gravity force to all dynamic rigid bodies.
pub fn apply_gravity(world: &mut hecs::World, gravity: Vec2) {
    for (_, rb) in world.query_mut::<&mut RigidBody>() {
        if !rb.is_kinematic && rb.mass() > 0.0 {
            let weight = gravity * rb.mass() * rb.gravity_scale;
            rb.add_force(weight);
        }
    }
}

/// Integrate forces into velocities (semi-implicit Euler, first half).
///
/// Runs before constraint solving; positions are left untouched and the
/// force accumulators are cleared.
pub fn integrate_forces(world: &mut hecs::World, dt: f32) {
    for (_, rb) in world.query_mut::<&mut RigidBody>() {
        rb.integrate(dt);
        rb.integrate_angular(dt);
    }
}

/// Integrate velocities into positions (second half), after solving.
pub fn integrate_velocities(world: &mut hecs::World, dt: f32) {
    for (_, (rb, transform)) in world.query_mut::<(&RigidBody, &mut Transform)>() {
        if rb.is_static() {
            continue;
        }
        transform.position += rb.linear_velocity * dt;
        transform.rotation += rb.angular_velocity * dt;
    }
}
