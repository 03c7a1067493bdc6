//! ECS components (transform, physics).

pub mod physics;
pub mod transform;

pub use crate::physics::constraint::JointConstraint;
pub use physics::*;
pub use transform::*;
