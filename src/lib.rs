//! Rein 2D Physics
//!
//! A 2D rigid body physics core for hecs-based games: force integration,
//! convex collision detection, and a sequential-impulse solver for contacts
//! and joints.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **math** - `glam` helpers plus dynamically sized vectors, matrices and
//!    a Gauss-Seidel solver
//! 2. **ecs** - components (`Transform`, `RigidBody`, `Collider`, ...) and
//!    spawn helpers
//! 3. **physics** - integration, collision detection, constraint solving and
//!    the fixed-step [`PhysicsWorld`]
//!
//! # Example
//!
//! ```
//! use rein2d::glam::Vec2;
//! use rein2d::prelude::*;
//! use rein2d::{PhysicsConfig, PhysicsWorld};
//!
//! let mut world = rein2d::hecs::World::new();
//! let mut physics = PhysicsWorld::new(PhysicsConfig::default());
//!
//! spawn_static_polygon(
//!     &mut world,
//!     &[
//!         Vec2::new(-10.0, -1.0),
//!         Vec2::new(10.0, -1.0),
//!         Vec2::new(10.0, 0.0),
//!         Vec2::new(-10.0, 0.0),
//!     ],
//! )?;
//! let ball = spawn_body(
//!     &mut world,
//!     Vec2::new(0.0, 3.0),
//!     RigidBody::new_dynamic(1.0, 0.125),
//!     Collider::circle(0.5),
//! );
//!
//! for _ in 0..120 {
//!     physics.step(&mut world, 1.0 / 60.0);
//! }
//! assert!(world.get::<&Transform>(ball)?.position.y < 3.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod ecs;
pub mod error;
pub mod math;
pub mod physics;

pub use error::PhysicsError;
pub use physics::{PhysicsConfig, PhysicsWorld, ResolutionMode};

pub mod prelude {
    pub use crate::ecs::prelude::*;
}

// Re-export glam and hecs for convenience
pub use glam;
pub use hecs;
