//! Broadphase: candidate pair generation.

use crate::ecs::components::physics::Collider;
use crate::ecs::components::transform::Transform;

/// Brute-force broadphase: every collider is paired with every other.
///
/// Pairs come out in query order with `i < j`, so each unordered pair is
/// produced once and no entity is paired with itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct BruteForcePairs;

impl BruteForcePairs {
    pub fn new() -> Self {
        Self
    }

    /// All unordered pairs of entities carrying a `Collider` and a `Transform`.
    pub fn find_pairs(&self, world: &hecs::World) -> Vec<(hecs::Entity, hecs::Entity)> {
        let entities: Vec<hecs::Entity> = world
            .query::<(&Collider, &Transform)>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();

        let mut pairs = Vec::with_capacity(entities.len() * entities.len().saturating_sub(1) / 2);
        for i in 0..entities.len() {
            for j in (i + 1)..entities.len() {
                pairs.push((entities[i], entities[j]));
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_broadphase_all_pairs_once() {
        let mut world = hecs::World::new();
        let a = world.spawn((Transform::identity(), Collider::circle(1.0)));
        let b = world.spawn((Transform::from_position(Vec2::X), Collider::circle(1.0)));
        let c = world.spawn((
            Transform::from_position(Vec2::new(100.0, 0.0)),
            Collider::circle(1.0),
        ));

        let pairs = BruteForcePairs::new().find_pairs(&world);
        assert_eq!(pairs, vec![(a, b), (a, c), (b, c)]);
    }

    #[test]
    fn test_broadphase_requires_transform() {
        let mut world = hecs::World::new();
        world.spawn((Transform::identity(), Collider::circle(1.0)));
        world.spawn((Collider::circle(1.0),));

        let pairs = BruteForcePairs::new().find_pairs(&world);
        assert!(pairs.is_empty());
    }
}
