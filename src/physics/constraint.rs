//! Velocity constraints for the sequential-impulse solver.
//!
//! A constraint works on [`BodyState`] snapshots of its two bodies: the
//! solver loads both, lets the constraint update their velocities, and
//! stores them back. Body pairs are never borrowed from the world twice.

use glam::Vec2;

use crate::ecs::components::physics::RigidBody;
use crate::ecs::components::transform::Transform;
use crate::error::PhysicsError;
use crate::math::{angular_cross, rotate, solve_gauss_seidel, MatMN, VecN};

use super::contact::Contact;

/// Baumgarte stabilisation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverParams {
    /// Fraction of the position error fed back per step.
    pub baumgarte: f32,
    /// Squared-distance error a joint tolerates before correcting.
    pub joint_slop: f32,
    /// Penetration depth tolerated before correcting.
    pub penetration_slop: f32,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            baumgarte: 0.2,
            joint_slop: 0.01,
            penetration_slop: 0.01,
        }
    }
}

/// Snapshot of the state a constraint reads and writes for one body.
///
/// `inv_mass` and `inv_inertia` are the effective values: zero for static
/// and kinematic bodies.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BodyState {
    pub position: Vec2,
    pub rotation: f32,
    pub linear_velocity: Vec2,
    pub angular_velocity: f32,
    pub inv_mass: f32,
    pub inv_inertia: f32,
    pub restitution: f32,
    pub friction: f32,
    pub is_kinematic: bool,
}

impl BodyState {
    pub fn new(rb: &RigidBody, transform: &Transform) -> Self {
        Self {
            position: transform.position,
            rotation: transform.rotation,
            linear_velocity: rb.linear_velocity,
            angular_velocity: rb.angular_velocity,
            inv_mass: rb.effective_inv_mass(),
            inv_inertia: rb.effective_inv_inertia(),
            restitution: rb.restitution,
            friction: rb.friction,
            is_kinematic: rb.is_kinematic,
        }
    }

    /// Snapshot `entity`, or `None` if it lacks a `RigidBody` or `Transform`.
    pub fn load(world: &hecs::World, entity: hecs::Entity) -> Option<Self> {
        let rb = world.get::<&RigidBody>(entity).ok()?;
        let transform = world.get::<&Transform>(entity).ok()?;
        Some(Self::new(&rb, &transform))
    }

    /// Write velocities and placement back to `entity`.
    pub fn store(&self, world: &hecs::World, entity: hecs::Entity) {
        if let Ok(mut rb) = world.get::<&mut RigidBody>(entity) {
            rb.linear_velocity = self.linear_velocity;
            rb.angular_velocity = self.angular_velocity;
        }
        if let Ok(mut transform) = world.get::<&mut Transform>(entity) {
            transform.position = self.position;
            transform.rotation = self.rotation;
        }
    }

    pub fn local_to_world(&self, local: Vec2) -> Vec2 {
        self.position + rotate(local, self.rotation)
    }

    pub fn world_to_local(&self, world: Vec2) -> Vec2 {
        rotate(world - self.position, -self.rotation)
    }

    /// Velocity of the material point at offset `r` from the center of mass.
    pub fn velocity_at(&self, r: Vec2) -> Vec2 {
        self.linear_velocity + angular_cross(self.angular_velocity, r)
    }

    pub fn apply_impulse_linear(&mut self, impulse: Vec2) {
        if self.is_kinematic {
            return;
        }
        self.linear_velocity += impulse * self.inv_mass;
    }

    pub fn apply_impulse_angular(&mut self, impulse: f32) {
        if self.is_kinematic {
            return;
        }
        self.angular_velocity += impulse * self.inv_inertia;
    }

    pub fn apply_impulse_at_point(&mut self, impulse: Vec2, r: Vec2) {
        self.apply_impulse_linear(impulse);
        self.apply_impulse_angular(r.perp_dot(impulse));
    }
}

/// Pack `[vAx, vAy, ωA, vBx, vBy, ωB]`.
pub fn velocities(a: &BodyState, b: &BodyState) -> VecN {
    VecN::from([
        a.linear_velocity.x,
        a.linear_velocity.y,
        a.angular_velocity,
        b.linear_velocity.x,
        b.linear_velocity.y,
        b.angular_velocity,
    ])
}

/// Diagonal 6x6 inverse mass matrix of a body pair.
pub fn inv_mass_matrix(a: &BodyState, b: &BodyState) -> MatMN {
    MatMN::from_diagonal(&[
        a.inv_mass,
        a.inv_mass,
        a.inv_inertia,
        b.inv_mass,
        b.inv_mass,
        b.inv_inertia,
    ])
}

/// Apply the generalized impulse `Jᵀ·λ` to both bodies.
fn apply_impulses(a: &mut BodyState, b: &mut BodyState, jacobian: &MatMN, lambda: &VecN) {
    let impulses = &jacobian.transpose() * lambda;
    a.apply_impulse_linear(Vec2::new(impulses[0], impulses[1]));
    a.apply_impulse_angular(impulses[2]);
    b.apply_impulse_linear(Vec2::new(impulses[3], impulses[4]));
    b.apply_impulse_angular(impulses[5]);
}

/// Solve `J·M⁻¹·Jᵀ·λ = -J·V - bias` for the impulse increment.
fn solve_lambda(a: &BodyState, b: &BodyState, jacobian: &MatMN, bias: f32) -> VecN {
    let v = velocities(a, b);
    let inv_mass = inv_mass_matrix(a, b);
    let lhs = &(jacobian * &inv_mass) * &jacobian.transpose();
    let mut rhs = -(jacobian * &v);
    rhs[0] -= bias;
    solve_gauss_seidel(&lhs, &rhs)
}

/// A velocity constraint between two bodies.
pub trait Constraint {
    /// The constrained entities `(a, b)`.
    fn bodies(&self) -> (hecs::Entity, hecs::Entity);

    /// Rebuild the Jacobian and bias for the current placement and apply
    /// the cached impulse.
    fn pre_solve(&mut self, a: &mut BodyState, b: &mut BodyState, dt: f32, params: &SolverParams);

    /// One sequential-impulse pass.
    fn solve(&mut self, a: &mut BodyState, b: &mut BodyState);

    fn post_solve(&mut self) {}
}

/// Distance joint pinning an anchor point of `a` to the same point of `b`.
///
/// The anchors are fixed in each body's local space when the joint is
/// created. The cached impulse carries over between steps.
#[derive(Debug, Clone)]
pub struct JointConstraint {
    a: hecs::Entity,
    b: hecs::Entity,
    anchor_a: Vec2,
    anchor_b: Vec2,
    jacobian: MatMN,
    cached_lambda: VecN,
    bias: f32,
}

impl JointConstraint {
    /// Join `a` and `b` at the world-space point `anchor`.
    ///
    /// Fails with [`PhysicsError::SelfJoint`] when `a == b`.
    pub fn new(
        a: hecs::Entity,
        b: hecs::Entity,
        anchor: Vec2,
        transform_a: &Transform,
        transform_b: &Transform,
    ) -> Result<Self, PhysicsError> {
        if a == b {
            return Err(PhysicsError::SelfJoint(a));
        }
        Ok(Self {
            a,
            b,
            anchor_a: transform_a.world_to_local(anchor),
            anchor_b: transform_b.world_to_local(anchor),
            jacobian: MatMN::zeros(1, 6),
            cached_lambda: VecN::zeros(1),
            bias: 0.0,
        })
    }

    /// Like [`JointConstraint::new`], reading both transforms from `world`.
    pub fn from_world(
        world: &hecs::World,
        a: hecs::Entity,
        b: hecs::Entity,
        anchor: Vec2,
    ) -> Result<Self, PhysicsError> {
        if a == b {
            return Err(PhysicsError::SelfJoint(a));
        }
        let transform_a = *world.get::<&Transform>(a)?;
        let transform_b = *world.get::<&Transform>(b)?;
        Self::new(a, b, anchor, &transform_a, &transform_b)
    }

    /// Anchor points in `a`'s and `b`'s local space.
    pub fn local_anchors(&self) -> (Vec2, Vec2) {
        (self.anchor_a, self.anchor_b)
    }

    pub fn jacobian(&self) -> &MatMN {
        &self.jacobian
    }

    pub fn cached_lambda(&self) -> f32 {
        self.cached_lambda[0]
    }

    pub fn bias(&self) -> f32 {
        self.bias
    }
}

impl Constraint for JointConstraint {
    fn bodies(&self) -> (hecs::Entity, hecs::Entity) {
        (self.a, self.b)
    }

    fn pre_solve(&mut self, a: &mut BodyState, b: &mut BodyState, dt: f32, params: &SolverParams) {
        let pa = a.local_to_world(self.anchor_a);
        let pb = b.local_to_world(self.anchor_b);
        let ra = pa - a.position;
        let rb = pb - b.position;

        // Gradient of C = |pb - pa|².
        let d = pa - pb;
        let row = self.jacobian.row_mut(0);
        row[0] = 2.0 * d.x;
        row[1] = 2.0 * d.y;
        row[2] = 2.0 * ra.perp_dot(d);
        row[3] = -2.0 * d.x;
        row[4] = -2.0 * d.y;
        row[5] = 2.0 * rb.perp_dot(-d);

        apply_impulses(a, b, &self.jacobian, &self.cached_lambda);

        let c = d.length_squared();
        self.bias = (params.baumgarte / dt) * (c - params.joint_slop).max(0.0);
    }

    fn solve(&mut self, a: &mut BodyState, b: &mut BodyState) {
        let lambda = solve_lambda(a, b, &self.jacobian, self.bias);
        self.cached_lambda += &lambda;
        apply_impulses(a, b, &self.jacobian, &lambda);
    }
}

/// Non-penetration constraint for one contact, with Coulomb friction.
///
/// Created from a contact every step and discarded after it; only the impulse
/// accumulated within the step is cached.
#[derive(Debug, Clone)]
pub struct PenetrationConstraint {
    a: hecs::Entity,
    b: hecs::Entity,
    /// Contact point on `b` inside `a`, in `a`'s local space.
    point_a: Vec2,
    /// Contact point on `a` inside `b`, in `b`'s local space.
    point_b: Vec2,
    /// Normal in `a`'s local frame.
    normal: Vec2,
    jacobian: MatMN,
    cached_lambda: VecN,
    bias: f32,
    friction: f32,
}

impl PenetrationConstraint {
    pub fn new(
        a: hecs::Entity,
        b: hecs::Entity,
        contact: &Contact,
        state_a: &BodyState,
        state_b: &BodyState,
    ) -> Self {
        Self {
            a,
            b,
            point_a: state_a.world_to_local(contact.start),
            point_b: state_b.world_to_local(contact.end),
            normal: rotate(contact.normal, -state_a.rotation),
            jacobian: MatMN::zeros(2, 6),
            cached_lambda: VecN::zeros(2),
            bias: 0.0,
            friction: state_a.friction.max(state_b.friction),
        }
    }

    pub fn jacobian(&self) -> &MatMN {
        &self.jacobian
    }

    /// Accumulated `(normal, tangent)` impulse.
    pub fn cached_lambda(&self) -> (f32, f32) {
        (self.cached_lambda[0], self.cached_lambda[1])
    }

    pub fn bias(&self) -> f32 {
        self.bias
    }

    pub fn friction(&self) -> f32 {
        self.friction
    }
}

impl Constraint for PenetrationConstraint {
    fn bodies(&self) -> (hecs::Entity, hecs::Entity) {
        (self.a, self.b)
    }

    fn pre_solve(&mut self, a: &mut BodyState, b: &mut BodyState, dt: f32, params: &SolverParams) {
        let pa = a.local_to_world(self.point_a);
        let pb = b.local_to_world(self.point_b);
        let n = rotate(self.normal, a.rotation);
        let ra = pa - a.position;
        let rb = pb - b.position;

        self.jacobian.set_zero();
        {
            let row = self.jacobian.row_mut(0);
            row[0] = -n.x;
            row[1] = -n.y;
            row[2] = -ra.perp_dot(n);
            row[3] = n.x;
            row[4] = n.y;
            row[5] = rb.perp_dot(n);
        }
        if self.friction > 0.0 {
            let t = n.perp();
            let row = self.jacobian.row_mut(1);
            row[0] = -t.x;
            row[1] = -t.y;
            row[2] = -ra.perp_dot(t);
            row[3] = t.x;
            row[4] = t.y;
            row[5] = rb.perp_dot(t);
        }

        // Approach speed along the normal, before the warm start changes it.
        let relative_normal_velocity = (b.velocity_at(rb) - a.velocity_at(ra)).dot(n);

        apply_impulses(a, b, &self.jacobian, &self.cached_lambda);

        let restitution = a.restitution.min(b.restitution);
        let c = ((pb - pa).dot(-n) + params.penetration_slop).min(0.0);
        self.bias = (params.baumgarte / dt) * c + restitution * relative_normal_velocity;
    }

    fn solve(&mut self, a: &mut BodyState, b: &mut BodyState) {
        let lambda = solve_lambda(a, b, &self.jacobian, self.bias);

        let previous = self.cached_lambda.clone();
        self.cached_lambda += &lambda;
        self.cached_lambda[0] = self.cached_lambda[0].max(0.0);
        if self.friction > 0.0 {
            let max_friction = self.cached_lambda[0] * self.friction;
            self.cached_lambda[1] = self.cached_lambda[1].clamp(-max_friction, max_friction);
        }

        let delta = &self.cached_lambda - &previous;
        apply_impulses(a, b, &self.jacobian, &delta);
    }

    fn post_solve(&mut self) {
        self.cached_lambda.set_zero();
    }
}
