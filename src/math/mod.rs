//! Linear algebra used by the physics core.
//!
//! Fixed 2D vectors are [`glam::Vec2`]. The constraint solver additionally
//! needs small dynamically sized vectors and matrices (Jacobians with one or
//! two rows, the 6x6 inverse mass matrix of a body pair), provided by
//! [`VecN`] and [`MatMN`].

pub mod mat_mn;
pub mod vec_n;

use glam::Vec2;

pub use mat_mn::{solve_gauss_seidel, solve_gauss_seidel_sweeps, MatMN};
pub use vec_n::VecN;

/// Rotate `v` counter-clockwise by `angle` radians.
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Outward normal of the edge `start -> end` of a counter-clockwise polygon.
#[inline]
pub fn edge_normal(start: Vec2, end: Vec2) -> Vec2 {
    let edge = end - start;
    Vec2::new(edge.y, -edge.x).normalize_or_zero()
}

/// Velocity contribution `ω × r` of an angular velocity at offset `r`.
#[inline]
pub fn angular_cross(omega: f32, r: Vec2) -> Vec2 {
    r.perp() * omega
}
