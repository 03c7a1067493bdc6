//! Physics components for ECS entities.

use glam::Vec2;

use crate::ecs::components::transform::Transform;
use crate::physics::collider::signed_area;
use crate::physics::contact::Contact;

/// Rigid body component.
///
/// A mass of zero means infinite mass: the body is static and its inverse
/// mass and inverse inertia are zero.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub linear_velocity: Vec2,
    /// Angular velocity in radians per second, counter-clockwise.
    pub angular_velocity: f32,
    pub force_accumulator: Vec2,
    pub torque_accumulator: f32,
    mass: f32,
    inv_mass: f32,
    inertia: f32,
    inv_inertia: f32,
    /// Coefficient of restitution (0.0 - 1.0).
    pub restitution: f32,
    /// Friction coefficient (>= 0.0).
    pub friction: f32,
    /// Kinematic bodies are moved by their velocity but never receive impulses.
    pub is_kinematic: bool,
    /// Gravity scale (default: 1.0).
    pub gravity_scale: f32,
}

impl RigidBody {
    /// Create a new dynamic rigid body with the given mass and moment of inertia.
    pub fn new_dynamic(mass: f32, inertia: f32) -> Self {
        let mut rb = Self::new_static();
        rb.set_mass(mass);
        rb.set_inertia(inertia);
        rb.gravity_scale = 1.0;
        rb
    }

    /// Create a dynamic rigid body whose inertia is derived from `shape`.
    pub fn for_shape(mass: f32, shape: &ColliderShape) -> Self {
        Self::new_dynamic(mass, shape.moment_of_inertia(mass))
    }

    /// Create a new static rigid body.
    pub fn new_static() -> Self {
        Self {
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            force_accumulator: Vec2::ZERO,
            torque_accumulator: 0.0,
            mass: 0.0,
            inv_mass: 0.0,
            inertia: 0.0,
            inv_inertia: 0.0,
            restitution: 0.3,
            friction: 0.5,
            is_kinematic: false,
            gravity_scale: 0.0,
        }
    }

    /// Create a new kinematic rigid body.
    pub fn new_kinematic() -> Self {
        Self {
            is_kinematic: true,
            ..Self::new_static()
        }
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution.clamp(0.0, 1.0);
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction.max(0.0);
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.linear_velocity = velocity;
        self
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    pub fn inertia(&self) -> f32 {
        self.inertia
    }

    pub fn inv_inertia(&self) -> f32 {
        self.inv_inertia
    }

    /// Set the mass; zero (or less) makes the body immovable.
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass.max(0.0);
        self.inv_mass = if self.mass > 0.0 { 1.0 / self.mass } else { 0.0 };
    }

    /// Set the moment of inertia; zero (or less) disables rotation response.
    pub fn set_inertia(&mut self, inertia: f32) {
        self.inertia = inertia.max(0.0);
        self.inv_inertia = if self.inertia > 0.0 {
            1.0 / self.inertia
        } else {
            0.0
        };
    }

    /// True for infinite-mass bodies.
    pub fn is_static(&self) -> bool {
        self.inv_mass == 0.0 && !self.is_kinematic
    }

    /// Inverse mass as seen by impulses: zero for kinematic bodies.
    pub fn effective_inv_mass(&self) -> f32 {
        if self.is_kinematic {
            0.0
        } else {
            self.inv_mass
        }
    }

    /// Inverse inertia as seen by impulses: zero for kinematic bodies.
    pub fn effective_inv_inertia(&self) -> f32 {
        if self.is_kinematic {
            0.0
        } else {
            self.inv_inertia
        }
    }

    pub fn add_force(&mut self, force: Vec2) {
        self.force_accumulator += force;
    }

    pub fn add_torque(&mut self, torque: f32) {
        self.torque_accumulator += torque;
    }

    pub fn clear_forces(&mut self) {
        self.force_accumulator = Vec2::ZERO;
        self.torque_accumulator = 0.0;
    }
}

/// Collider shape in the owning entity's local space.
#[derive(Debug, Clone, PartialEq)]
pub enum ColliderShape {
    Circle { radius: f32 },
    /// Axis-aligned box in local space, centred on the origin.
    Box { width: f32, height: f32 },
    /// Convex polygon with counter-clockwise vertices.
    Polygon { vertices: Vec<Vec2> },
}

/// Collision detection component.
///
/// Besides the local geometry it caches the world-space projection of the
/// shape. The cache is valid for the transform passed to the last
/// [`Collider::update_world_space`] call.
#[derive(Debug, Clone)]
pub struct Collider {
    pub shape: ColliderShape,
    /// Offset from the entity's transform origin, in local space.
    pub offset: Vec2,
    /// If true, generates collision events but no physics response.
    pub is_sensor: bool,
    pub(crate) world_center: Vec2,
    pub(crate) world_vertices: Vec<Vec2>,
    pub(crate) contacts: Vec<Contact>,
}

impl Collider {
    pub fn new(shape: ColliderShape) -> Self {
        let mut collider = Self {
            shape,
            offset: Vec2::ZERO,
            is_sensor: false,
            world_center: Vec2::ZERO,
            world_vertices: Vec::new(),
            contacts: Vec::new(),
        };
        collider.update_world_space(&Transform::identity());
        collider
    }

    pub fn circle(radius: f32) -> Self {
        Self::new(ColliderShape::Circle { radius })
    }

    pub fn rect(width: f32, height: f32) -> Self {
        Self::new(ColliderShape::Box { width, height })
    }

    /// Convex polygon collider; clockwise input is reversed so edge normals
    /// point outward.
    pub fn polygon(mut vertices: Vec<Vec2>) -> Self {
        if signed_area(&vertices) < 0.0 {
            vertices.reverse();
        }
        Self::new(ColliderShape::Polygon { vertices })
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self.update_world_space(&Transform::identity());
        self
    }

    pub fn as_sensor(mut self) -> Self {
        self.is_sensor = true;
        self
    }

    /// World-space center of the shape as of the last update.
    pub fn world_center(&self) -> Vec2 {
        self.world_center
    }

    /// World-space vertices (boxes and polygons) as of the last update.
    pub fn world_vertices(&self) -> &[Vec2] {
        &self.world_vertices
    }

    /// Contacts found for this collider during the last detection pass.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }
}

/// A force source evaluated every step for the owning body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForceGenerator {
    /// Quadratic drag opposing velocity.
    Drag { coefficient: f32 },
    /// Constant-magnitude kinetic friction opposing velocity.
    Friction { coefficient: f32 },
    /// Spring pulling the body toward a fixed world-space anchor.
    AnchorSpring {
        anchor: Vec2,
        rest_length: f32,
        stiffness: f32,
    },
    /// Spring between the body and another body.
    BodySpring {
        other: hecs::Entity,
        rest_length: f32,
        stiffness: f32,
    },
    /// Gravitational attraction toward another body.
    Attractor {
        other: hecs::Entity,
        strength: f32,
        min_distance: f32,
        max_distance: f32,
    },
}

/// Force generators attached to a rigid body.
#[derive(Debug, Clone, Default)]
pub struct ForceGenerators(pub Vec<ForceGenerator>);
