//! Errors returned by construction APIs.
//!
//! Stepping the simulation never fails; problems found mid-step are skipped
//! locally. Only building level geometry and joints can be rejected.

/// Error type for physics construction operations.
#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    /// A polygon collider needs at least three vertices.
    #[error("polygon needs at least 3 vertices, got {vertex_count}")]
    DegeneratePolygon { vertex_count: usize },

    /// All polygon vertices are collinear.
    #[error("polygon has zero area")]
    ZeroAreaPolygon,

    /// A joint must connect two different entities.
    #[error("joint cannot connect entity {0:?} to itself")]
    SelfJoint(hecs::Entity),

    /// A referenced entity is missing or lacks a required component.
    #[error(transparent)]
    Component(#[from] hecs::ComponentError),
}
