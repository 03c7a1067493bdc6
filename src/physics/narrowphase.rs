//! Narrowphase collision detection: circle-circle, SAT polygon-polygon and
//! circle-polygon region tests.
//!
//! All routines work on the world-space cache of the colliders, so
//! [`super::collider::update_colliders`] must run before them. Every contact
//! they return has a unit normal pointing from shape `a` to shape `b` and a
//! non-negative depth.

use glam::Vec2;

use crate::ecs::components::physics::{Collider, ColliderShape};
use crate::math::edge_normal;

use super::contact::{CollisionEvent, Contact};

/// Circle-circle test.
///
/// Touching circles (`|ab| == ra + rb`) report a zero-depth contact.
pub fn circle_circle(center_a: Vec2, radius_a: f32, center_b: Vec2, radius_b: f32) -> Option<Contact> {
    let ab = center_b - center_a;
    let radius_sum = radius_a + radius_b;
    if ab.length_squared() > radius_sum * radius_sum {
        return None;
    }

    let normal = ab.try_normalize().unwrap_or(Vec2::Y);
    let start = center_b - normal * radius_b;
    let end = center_a + normal * radius_a;
    Some(Contact {
        start,
        end,
        normal,
        depth: (end - start).length(),
    })
}

/// Result of searching the edges of `a` for the axis of least penetration.
#[derive(Debug, Clone, Copy)]
struct EdgeSeparation {
    separation: f32,
    edge: usize,
    support: Vec2,
}

/// Largest separation of `b` from any edge line of `a`.
///
/// For each edge of `a` the deepest vertex of `b` along that edge's outward
/// normal is found; the edge whose deepest vertex is furthest out wins. Ties
/// keep the first edge.
fn find_min_separation(a: &[Vec2], b: &[Vec2]) -> EdgeSeparation {
    let mut best = EdgeSeparation {
        separation: f32::NEG_INFINITY,
        edge: 0,
        support: Vec2::ZERO,
    };
    for i in 0..a.len() {
        let va = a[i];
        let normal = edge_normal(va, a[(i + 1) % a.len()]);

        let mut min_sep = f32::INFINITY;
        let mut support = Vec2::ZERO;
        for &vb in b {
            let proj = (vb - va).dot(normal);
            if proj < min_sep {
                min_sep = proj;
                support = vb;
            }
        }

        if min_sep > best.separation {
            best = EdgeSeparation {
                separation: min_sep,
                edge: i,
                support,
            };
        }
    }
    best
}

/// Edge of `incident` most anti-parallel to `reference_normal`.
fn find_incident_edge(incident: &[Vec2], reference_normal: Vec2) -> usize {
    let mut best = 0;
    let mut min_dot = f32::INFINITY;
    for i in 0..incident.len() {
        let normal = edge_normal(incident[i], incident[(i + 1) % incident.len()]);
        let d = normal.dot(reference_normal);
        if d < min_dot {
            min_dot = d;
            best = i;
        }
    }
    best
}

/// Clip a segment against the line `c0 -> c1`, keeping the side a
/// counter-clockwise polygon's interior lies on. Returns `None` unless two
/// points remain.
fn clip_segment_to_line(input: [Vec2; 2], c0: Vec2, c1: Vec2) -> Option<[Vec2; 2]> {
    let dir = c1 - c0;
    let d0 = (input[0] - c0).perp_dot(dir);
    let d1 = (input[1] - c0).perp_dot(dir);

    let mut out = [Vec2::ZERO; 2];
    let mut count = 0;
    if d0 <= 0.0 {
        out[count] = input[0];
        count += 1;
    }
    if d1 <= 0.0 {
        out[count] = input[1];
        count += 1;
    }
    if d0 * d1 < 0.0 {
        let t = d0 / (d0 - d1);
        out[count] = input[0] + (input[1] - input[0]) * t;
        count += 1;
    }
    (count == 2).then_some(out)
}

/// Separating axis test between two convex counter-clockwise polygons with
/// reference/incident edge clipping.
///
/// Returns one or two contacts. Polygons with fewer than three vertices never
/// collide, and neither do polygons that merely touch.
pub fn polygon_polygon(a: &[Vec2], b: &[Vec2]) -> Option<Vec<Contact>> {
    if a.len() < 3 || b.len() < 3 {
        tracing::trace!(a = a.len(), b = b.len(), "degenerate polygon, skipped");
        return None;
    }

    let ab = find_min_separation(a, b);
    if ab.separation >= 0.0 {
        return None;
    }
    let ba = find_min_separation(b, a);
    if ba.separation >= 0.0 {
        return None;
    }

    let (reference, incident, best, flip) = if ab.separation > ba.separation {
        (a, b, ab, false)
    } else {
        (b, a, ba, true)
    };

    let ref_start = reference[best.edge];
    let ref_end = reference[(best.edge + 1) % reference.len()];
    let ref_normal = edge_normal(ref_start, ref_end);

    let inc = find_incident_edge(incident, ref_normal);
    let mut clipped = [incident[inc], incident[(inc + 1) % incident.len()]];

    // Clip the incident edge against every other edge line of the reference
    // polygon.
    for i in 0..reference.len() {
        if i == best.edge {
            continue;
        }
        let c0 = reference[i];
        let c1 = reference[(i + 1) % reference.len()];
        match clip_segment_to_line(clipped, c0, c1) {
            Some(points) => clipped = points,
            None => break,
        }
    }

    let mut contacts: Vec<Contact> = clipped
        .iter()
        .filter_map(|&v| {
            let separation = (v - ref_start).dot(ref_normal);
            (separation <= 0.0).then(|| Contact {
                start: v,
                end: v + ref_normal * -separation,
                normal: ref_normal,
                depth: -separation,
            })
        })
        .collect();

    if contacts.is_empty() {
        contacts.push(Contact {
            start: best.support,
            end: best.support + ref_normal * -best.separation,
            normal: ref_normal,
            depth: -best.separation,
        });
    }

    if flip {
        for contact in &mut contacts {
            *contact = contact.flipped();
        }
    }
    Some(contacts)
}

/// Circle against a convex counter-clockwise polygon.
///
/// The polygon is shape `a` and the circle shape `b`, so the normal points
/// from the polygon toward the circle. The edge with the largest projection
/// of the circle center decides the region: near its start vertex, near its
/// end vertex, or along its interior. A center inside the polygon always
/// collides with depth `radius - projection`.
pub fn polygon_circle(polygon: &[Vec2], center: Vec2, radius: f32) -> Option<Contact> {
    if polygon.len() < 3 {
        tracing::trace!(vertices = polygon.len(), "degenerate polygon, skipped");
        return None;
    }

    let mut max_proj = f32::NEG_INFINITY;
    let mut edge = 0;
    for i in 0..polygon.len() {
        let normal = edge_normal(polygon[i], polygon[(i + 1) % polygon.len()]);
        let proj = (center - polygon[i]).dot(normal);
        if proj > max_proj {
            max_proj = proj;
            edge = i;
        }
    }
    if max_proj > radius {
        return None;
    }

    let va = polygon[edge];
    let vb = polygon[(edge + 1) % polygon.len()];

    let (normal, depth) = if max_proj > 0.0 {
        let to_start = center - va;
        let to_end = center - vb;
        if to_start.dot(vb - va) < 0.0 {
            vertex_region(to_start, radius)?
        } else if to_end.dot(va - vb) < 0.0 {
            vertex_region(to_end, radius)?
        } else {
            (edge_normal(va, vb), radius - max_proj)
        }
    } else {
        (edge_normal(va, vb), radius - max_proj)
    };

    let start = center - normal * radius;
    Some(Contact {
        start,
        end: start + normal * depth,
        normal,
        depth,
    })
}

/// Normal and depth for a circle center at offset `to_center` from a vertex.
fn vertex_region(to_center: Vec2, radius: f32) -> Option<(Vec2, f32)> {
    let distance = to_center.length();
    if distance > radius {
        return None;
    }
    let normal = to_center.try_normalize()?;
    Some((normal, radius - distance))
}

/// Detect contacts between two colliders, dispatching on their shape kinds.
pub fn detect_collision(a: &Collider, b: &Collider) -> Option<Vec<Contact>> {
    match (&a.shape, &b.shape) {
        (ColliderShape::Circle { radius: ra }, ColliderShape::Circle { radius: rb }) => {
            circle_circle(a.world_center(), *ra, b.world_center(), *rb).map(|c| vec![c])
        }
        (ColliderShape::Circle { radius }, _) => {
            polygon_circle(b.world_vertices(), a.world_center(), *radius)
                .map(|c| vec![c.flipped()])
        }
        (_, ColliderShape::Circle { radius }) => {
            polygon_circle(a.world_vertices(), b.world_center(), *radius).map(|c| vec![c])
        }
        _ => polygon_polygon(a.world_vertices(), b.world_vertices()),
    }
}

/// Run the narrowphase over candidate `pairs`.
///
/// Clears every collider's debug contacts, writes the contacts found for a
/// pair into both colliders, and returns one event per colliding pair in
/// pair order.
pub fn detect_collisions(
    world: &mut hecs::World,
    pairs: &[(hecs::Entity, hecs::Entity)],
) -> Vec<CollisionEvent> {
    for (_, collider) in world.query_mut::<&mut Collider>() {
        collider.contacts.clear();
    }

    let mut events = Vec::new();
    for &(entity_a, entity_b) in pairs {
        let contacts = {
            let (Ok(ca), Ok(cb)) = (
                world.get::<&Collider>(entity_a),
                world.get::<&Collider>(entity_b),
            ) else {
                tracing::trace!(?entity_a, ?entity_b, "pair without colliders, skipped");
                continue;
            };
            detect_collision(&ca, &cb)
        };

        let Some(contacts) = contacts else {
            continue;
        };
        for entity in [entity_a, entity_b] {
            if let Ok(mut collider) = world.get::<&mut Collider>(entity) {
                collider.contacts.extend_from_slice(&contacts);
            }
        }
        events.push(CollisionEvent {
            entity_a,
            entity_b,
            contacts,
        });
    }
    events
}
