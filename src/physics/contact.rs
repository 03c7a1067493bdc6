//! Contact data structures for collision response.

use glam::Vec2;

/// A single contact between two shapes `a` and `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Deepest point of `b` inside `a`, in world space.
    pub start: Vec2,
    /// Deepest point of `a` inside `b`, in world space.
    pub end: Vec2,
    /// Unit collision normal pointing from `a` to `b`.
    pub normal: Vec2,
    /// Penetration depth (>= 0).
    pub depth: f32,
}

impl Contact {
    /// The same contact described from `b`'s point of view.
    pub fn flipped(self) -> Self {
        Self {
            start: self.end,
            end: self.start,
            normal: -self.normal,
            depth: self.depth,
        }
    }
}

/// Notification emitted once per colliding pair per step.
#[derive(Debug, Clone)]
pub struct CollisionEvent {
    pub entity_a: hecs::Entity,
    pub entity_b: hecs::Entity,
    /// Normally one contact; polygon pairs may produce two.
    pub contacts: Vec<Contact>,
}

impl CollisionEvent {
    /// True if `entity` is one of the two colliding entities.
    pub fn involves(&self, entity: hecs::Entity) -> bool {
        self.entity_a == entity || self.entity_b == entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flipped_swaps_points_and_normal() {
        let c = Contact {
            start: Vec2::new(1.0, 0.0),
            end: Vec2::new(2.0, 0.0),
            normal: Vec2::X,
            depth: 1.0,
        };
        let f = c.flipped();
        assert_eq!(f.start, c.end);
        assert_eq!(f.end, c.start);
        assert_eq!(f.normal, -Vec2::X);
        assert_eq!(f.flipped(), c);
    }

    #[test]
    fn test_event_involves() {
        let mut world = hecs::World::new();
        let a = world.spawn(());
        let b = world.spawn(());
        let c = world.spawn(());
        let event = CollisionEvent {
            entity_a: a,
            entity_b: b,
            contacts: Vec::new(),
        };
        assert!(event.involves(a));
        assert!(event.involves(b));
        assert!(!event.involves(c));
    }
}
