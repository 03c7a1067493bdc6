//! Spawn helpers tying physics components to ECS entities.

use glam::Vec2;

use crate::ecs::components::physics::{Collider, RigidBody};
use crate::ecs::components::transform::Transform;
use crate::error::PhysicsError;
use crate::physics::collider::{centroid, signed_area};
use crate::physics::constraint::JointConstraint;

/// Spawn a body at `position` with its collider cache already placed there.
pub fn spawn_body(
    world: &mut hecs::World,
    position: Vec2,
    body: RigidBody,
    mut collider: Collider,
) -> hecs::Entity {
    let transform = Transform::from_position(position);
    collider.update_world_space(&transform);
    world.spawn((transform, body, collider))
}

/// Build a static polygon collider from world-space level geometry.
///
/// The polygon's centroid becomes the entity's position and clockwise input
/// is reversed to counter-clockwise. The outline must be convex.
pub fn spawn_static_polygon(
    world: &mut hecs::World,
    vertices: &[Vec2],
) -> Result<hecs::Entity, PhysicsError> {
    if vertices.len() < 3 {
        return Err(PhysicsError::DegeneratePolygon {
            vertex_count: vertices.len(),
        });
    }
    let area = signed_area(vertices);
    if area.abs() <= f32::EPSILON {
        return Err(PhysicsError::ZeroAreaPolygon);
    }

    let center = centroid(vertices);
    let mut local: Vec<Vec2> = vertices.iter().map(|v| *v - center).collect();
    if area < 0.0 {
        local.reverse();
    }

    let entity = spawn_body(world, center, RigidBody::new_static(), Collider::polygon(local));
    tracing::info!(?entity, vertices = vertices.len(), "spawned static polygon");
    Ok(entity)
}

/// Join `a` and `b` at the world-space point `anchor`.
///
/// The joint lives on its own entity, whose `Transform` records the anchor.
pub fn spawn_joint(
    world: &mut hecs::World,
    a: hecs::Entity,
    b: hecs::Entity,
    anchor: Vec2,
) -> Result<hecs::Entity, PhysicsError> {
    let joint = JointConstraint::from_world(world, a, b, anchor)?;
    let entity = world.spawn((Transform::from_position(anchor), joint));
    tracing::info!(?entity, ?a, ?b, "spawned joint");
    Ok(entity)
}
