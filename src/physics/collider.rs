//! Collider world-space projection and shape mass properties.

use glam::Vec2;

use crate::ecs::components::physics::{Collider, ColliderShape};
use crate::ecs::components::transform::Transform;
use crate::math::rotate;

impl ColliderShape {
    /// Vertices in local space (empty for circles).
    pub fn local_vertices(&self) -> Vec<Vec2> {
        match self {
            ColliderShape::Circle { .. } => Vec::new(),
            ColliderShape::Box { width, height } => box_vertices(*width, *height).to_vec(),
            ColliderShape::Polygon { vertices } => vertices.clone(),
        }
    }

    /// Moment of inertia about the local origin for a body of `mass`.
    pub fn moment_of_inertia(&self, mass: f32) -> f32 {
        match self {
            ColliderShape::Circle { radius } => 0.5 * mass * radius * radius,
            ColliderShape::Box { width, height } => {
                mass * (width * width + height * height) / 12.0
            }
            ColliderShape::Polygon { vertices } => polygon_inertia(vertices) * mass,
        }
    }
}

impl Collider {
    /// Recompute the world-space cache for `transform`.
    ///
    /// Circle: `center = position + rotate(offset)`. Box/polygon: each vertex
    /// is `position + rotate(offset + local_vertex)`.
    pub fn update_world_space(&mut self, transform: &Transform) {
        self.world_center = transform.local_to_world(self.offset);
        self.world_vertices.clear();
        match &self.shape {
            ColliderShape::Circle { .. } => {}
            ColliderShape::Box { width, height } => {
                let corners = box_vertices(*width, *height);
                self.world_vertices.extend(
                    corners
                        .iter()
                        .map(|v| transform.position + rotate(self.offset + *v, transform.rotation)),
                );
            }
            ColliderShape::Polygon { vertices } => {
                self.world_vertices.extend(
                    vertices
                        .iter()
                        .map(|v| transform.position + rotate(self.offset + *v, transform.rotation)),
                );
            }
        }
    }
}

/// Refresh the world-space cache of every collider from its transform.
///
/// Must run after positions change and before collision detection.
pub fn update_colliders(world: &mut hecs::World) {
    for (_, (collider, transform)) in world.query_mut::<(&mut Collider, &Transform)>() {
        collider.update_world_space(transform);
    }
}

/// Counter-clockwise corners of a box centred on the origin.
fn box_vertices(width: f32, height: f32) -> [Vec2; 4] {
    let hw = width * 0.5;
    let hh = height * 0.5;
    [
        Vec2::new(-hw, -hh),
        Vec2::new(hw, -hh),
        Vec2::new(hw, hh),
        Vec2::new(-hw, hh),
    ]
}

/// Signed area of a polygon; positive for counter-clockwise winding.
pub fn signed_area(vertices: &[Vec2]) -> f32 {
    let n = vertices.len();
    (0..n)
        .map(|i| vertices[i].perp_dot(vertices[(i + 1) % n]))
        .sum::<f32>()
        * 0.5
}

/// Area-weighted centroid of a simple polygon.
pub fn centroid(vertices: &[Vec2]) -> Vec2 {
    let n = vertices.len();
    let mut cx = Vec2::ZERO;
    let mut area = 0.0;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let cross = a.perp_dot(b);
        area += cross;
        cx += (a + b) * cross;
    }
    if area.abs() < f32::EPSILON {
        // Degenerate: fall back to the vertex average.
        return vertices.iter().copied().sum::<Vec2>() / n.max(1) as f32;
    }
    cx / (3.0 * area)
}

/// Inertia per unit mass of a polygon about the local origin.
fn polygon_inertia(vertices: &[Vec2]) -> f32 {
    let n = vertices.len();
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let cross = a.perp_dot(b).abs();
        numerator += cross * (a.dot(a) + a.dot(b) + b.dot(b));
        denominator += cross;
    }
    if denominator <= 0.0 {
        return 0.0;
    }
    numerator / (6.0 * denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_circle_world_center() {
        let mut collider = Collider::circle(1.0).with_offset(Vec2::new(1.0, 0.0));
        let transform = Transform::from_position_rotation(Vec2::new(5.0, 5.0), FRAC_PI_2);
        collider.update_world_space(&transform);
        assert!((collider.world_center() - Vec2::new(5.0, 6.0)).length() < 1e-5);
    }

    #[test]
    fn test_box_world_vertices() {
        let mut collider = Collider::rect(2.0, 4.0);
        let transform = Transform::from_position(Vec2::new(10.0, 0.0));
        collider.update_world_space(&transform);

        let expected = [
            Vec2::new(9.0, -2.0),
            Vec2::new(11.0, -2.0),
            Vec2::new(11.0, 2.0),
            Vec2::new(9.0, 2.0),
        ];
        for (v, e) in collider.world_vertices().iter().zip(expected) {
            assert!((*v - e).length() < 1e-5);
        }
    }

    #[test]
    fn test_rotated_polygon_world_vertices() {
        let mut collider = Collider::polygon(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
        ]);
        let transform = Transform::from_position_rotation(Vec2::ZERO, FRAC_PI_2);
        collider.update_world_space(&transform);
        assert!((collider.world_vertices()[1] - Vec2::Y).length() < 1e-5);
        assert!((collider.world_vertices()[2] - Vec2::NEG_X).length() < 1e-5);
    }

    #[test]
    fn test_update_colliders_system_follows_transform() {
        let mut world = hecs::World::new();
        let entity = world.spawn((
            Transform::from_position(Vec2::new(3.0, 4.0)),
            Collider::circle(0.5),
        ));

        update_colliders(&mut world);
        assert_eq!(
            world.get::<&Collider>(entity).unwrap().world_center(),
            Vec2::new(3.0, 4.0)
        );

        world.get::<&mut Transform>(entity).unwrap().position = Vec2::new(-1.0, 0.0);
        // Cache is stale until the next update.
        assert_eq!(
            world.get::<&Collider>(entity).unwrap().world_center(),
            Vec2::new(3.0, 4.0)
        );
        update_colliders(&mut world);
        assert_eq!(
            world.get::<&Collider>(entity).unwrap().world_center(),
            Vec2::new(-1.0, 0.0)
        );
    }

    #[test]
    fn test_moment_of_inertia() {
        let circle = ColliderShape::Circle { radius: 2.0 };
        assert!((circle.moment_of_inertia(3.0) - 6.0).abs() < 1e-5);

        let rect = ColliderShape::Box {
            width: 2.0,
            height: 2.0,
        };
        let square_poly = ColliderShape::Polygon {
            vertices: rect.local_vertices(),
        };
        // A polygon shaped like the box must match the closed-form box inertia.
        let expected = rect.moment_of_inertia(1.0);
        assert!((expected - 8.0 / 12.0).abs() < 1e-5);
        assert!((square_poly.moment_of_inertia(1.0) - expected).abs() < 1e-4);
    }

    #[test]
    fn test_signed_area_and_centroid() {
        let ccw = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        assert!((signed_area(&ccw) - 4.0).abs() < 1e-5);
        let mut cw = ccw.clone();
        cw.reverse();
        assert!((signed_area(&cw) + 4.0).abs() < 1e-5);
        assert!((centroid(&ccw) - Vec2::new(1.0, 1.0)).length() < 1e-5);
    }
}
