//! Math type re-exports and rotation helpers.
//!
//! The pipeline works in double precision throughout; angles arrive as
//! decimal degrees and small float errors would otherwise show up in the
//! orthonormality checks.

pub use glam::{DMat3, DVec3};

/// A point of the reference body in object-local coordinates.
pub type Vertex3D = DVec3;

/// A 3x3 rotation matrix (column-major, as glam stores it).
pub type RotationMatrix = DMat3;

/// Default tolerance for float comparisons of rotation results.
pub const EPSILON: f64 = 1e-9;

/// Check `Rᵗ·R ≈ I` and `det(R) ≈ 1` within `eps`.
pub fn is_orthonormal(m: &RotationMatrix, eps: f64) -> bool {
    let gram = m.transpose() * *m;
    gram.abs_diff_eq(DMat3::IDENTITY, eps) && (m.determinant() - 1.0).abs() <= eps
}

/// Component-wise comparison of two point sets.
pub fn points_approx_eq(a: &[Vertex3D], b: &[Vertex3D], eps: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(p, q)| p.abs_diff_eq(*q, eps))
}
