//! Direct collision response: positional projection plus a single
//! restitution impulse per contact, without warm starting.

use crate::ecs::components::physics::Collider;

use super::constraint::BodyState;
use super::contact::{CollisionEvent, Contact};

/// Push both bodies apart along the contact normal, split by inverse mass.
///
/// No-op when both bodies have zero inverse mass.
pub fn resolve_penetration(a: &mut BodyState, b: &mut BodyState, contact: &Contact) {
    let total = a.inv_mass + b.inv_mass;
    if total <= 0.0 {
        return;
    }
    let da = contact.depth * a.inv_mass / total;
    let db = contact.depth * b.inv_mass / total;
    a.position -= contact.normal * da;
    b.position += contact.normal * db;
}

/// Separate the bodies, then apply `J = -(1 + e)(v_rel · n) / (1/ma + 1/mb)`
/// at the contact points.
///
/// `e` is the smaller restitution of the two bodies. Bodies already moving
/// apart along the normal only get the positional correction.
pub fn resolve_collision(a: &mut BodyState, b: &mut BodyState, contact: &Contact) {
    resolve_penetration(a, b, contact);
    apply_restitution_impulse(a, b, contact);
}

fn apply_restitution_impulse(a: &mut BodyState, b: &mut BodyState, contact: &Contact) {
    let total = a.inv_mass + b.inv_mass;
    if total <= 0.0 {
        return;
    }

    let ra = contact.end - a.position;
    let rb = contact.start - b.position;
    let relative_velocity = a.velocity_at(ra) - b.velocity_at(rb);
    let approach = relative_velocity.dot(contact.normal);
    if approach <= 0.0 {
        return;
    }

    let restitution = a.restitution.min(b.restitution);
    let impulse = contact.normal * (-(1.0 + restitution) * approach / total);
    a.apply_impulse_at_point(impulse, ra);
    b.apply_impulse_at_point(-impulse, rb);
}

/// Resolve every event directly on the bodies.
///
/// Each pair is separated once by its deepest contact, then every contact
/// gets its own restitution impulse. Sensor pairs and pairs missing a `RigidBody` or `Transform` are skipped.
pub fn resolve_collisions(world: &hecs::World, events: &[CollisionEvent]) {
    for event in events {
        let sensor = |entity| {
            world
                .get::<&Collider>(entity)
                .map(|c| c.is_sensor)
                .unwrap_or(false)
        };
        if sensor(event.entity_a) || sensor(event.entity_b) {
            continue;
        }
        let (Some(mut a), Some(mut b)) = (
            BodyState::load(world, event.entity_a),
            BodyState::load(world, event.entity_b),
        ) else {
            tracing::trace!(a = ?event.entity_a, b = ?event.entity_b, "pair without rigid bodies, no response");
            continue;
        };
        let Some(deepest) = event
            .contacts
            .iter()
            .max_by(|x, y| x.depth.total_cmp(&y.depth))
        else {
            continue;
        };
        resolve_penetration(&mut a, &mut b, deepest);
        for contact in &event.contacts {
            apply_restitution_impulse(&mut a, &mut b, contact);
        }
        a.store(world, event.entity_a);
        b.store(world, event.entity_b);
    }
}
