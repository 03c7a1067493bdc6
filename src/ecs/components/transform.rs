//! Transform component for ECS entities.

use glam::Vec2;

use crate::math::rotate;

/// World-space placement of an entity.
///
/// The physics core integrates `position` and `rotation`. `scale` is carried
/// for rendering collaborators and is not applied to collider geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    /// Rotation in radians, counter-clockwise.
    pub rotation: f32,
    pub scale: Vec2,
}

impl Transform {
    /// Create an identity transform.
    pub fn identity() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }

    /// Create a transform from a position.
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Create a transform from a position and a rotation in radians.
    pub fn from_position_rotation(position: Vec2, rotation: f32) -> Self {
        Self {
            position,
            rotation,
            scale: Vec2::ONE,
        }
    }

    /// Map a point from this entity's local space to world space.
    pub fn local_to_world(&self, local: Vec2) -> Vec2 {
        self.position + rotate(local, self.rotation)
    }

    /// Map a world-space point into this entity's local space.
    pub fn world_to_local(&self, world: Vec2) -> Vec2 {
        rotate(world - self.position, -self.rotation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
