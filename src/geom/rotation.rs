//! Euler-angle rotation composition.
//!
//! Elementary rotations (right-handed, column vectors, angles in degrees):
//!
//! ```text
//! Rx(roll)  = | 1  0   0 |   Ry(pitch) = |  c  0  s |   Rz(yaw) = | c -s  0 |
//!             | 0  c  -s |               |  0  1  0 |             | s  c  0 |
//!             | 0  s   c |               | -s  0  c |             | 0  0  1 |
//! ```
//!
//! The product order is configurable because it is not commutative: the same
//! angles give a different attitude under a different order. Matrices are
//! rebuilt from the latest angles every tick, so there is no accumulated
//! drift to renormalize away.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::AngleSample;
use crate::util::{DMat3, Error, RotationMatrix, Vertex3D};

/// Order in which the elementary rotations are multiplied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositionOrder {
    /// `R = Rz · Ry · Rx`: roll innermost, yaw outermost.
    /// With two axes this reduces to `R = Ry · Rx`.
    #[default]
    Zyx,
    /// `R = Rx · Ry · Rz`: yaw innermost, roll outermost.
    Xyz,
}

impl fmt::Display for CompositionOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zyx => f.write_str("zyx"),
            Self::Xyz => f.write_str("xyz"),
        }
    }
}

impl FromStr for CompositionOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zyx" => Ok(Self::Zyx),
            "xyz" => Ok(Self::Xyz),
            other => Err(Error::config(format!(
                "unknown composition order {other:?}, expected zyx or xyz"
            ))),
        }
    }
}

/// Rotation about the first axis by `roll` degrees.
#[inline]
pub fn rot_x(roll: f64) -> RotationMatrix {
    DMat3::from_rotation_x(roll.to_radians())
}

/// Rotation about the second axis by `pitch` degrees.
#[inline]
pub fn rot_y(pitch: f64) -> RotationMatrix {
    DMat3::from_rotation_y(pitch.to_radians())
}

/// Rotation about the third axis by `yaw` degrees.
#[inline]
pub fn rot_z(yaw: f64) -> RotationMatrix {
    DMat3::from_rotation_z(yaw.to_radians())
}

/// Builds rotation matrices from angle samples and applies them to points.
#[derive(Clone, Copy, Debug, Default)]
pub struct RotationComposer {
    order: CompositionOrder,
}

impl RotationComposer {
    pub const fn new(order: CompositionOrder) -> Self {
        Self { order }
    }

    pub const fn order(&self) -> CompositionOrder {
        self.order
    }

    /// Rotation for one sample. A missing yaw contributes the identity.
    pub fn compose(&self, angles: &AngleSample) -> RotationMatrix {
        let rx = rot_x(angles.roll);
        let ry = rot_y(angles.pitch);
        match (self.order, angles.yaw) {
            (CompositionOrder::Zyx, None) => ry * rx,
            (CompositionOrder::Zyx, Some(yaw)) => rot_z(yaw) * (ry * rx),
            (CompositionOrder::Xyz, None) => rx * ry,
            (CompositionOrder::Xyz, Some(yaw)) => rx * (ry * rot_z(yaw)),
        }
    }

    /// Rotate every point by `r`. The input is left untouched.
    pub fn apply(vertices: &[Vertex3D], r: &RotationMatrix) -> Vec<Vertex3D> {
        vertices.iter().map(|&v| *r * v).collect()
    }

    /// `compose` followed by `apply`.
    pub fn rotate(&self, angles: &AngleSample, vertices: &[Vertex3D]) -> (RotationMatrix, Vec<Vertex3D>) {
        let r = self.compose(angles);
        let rotated = Self::apply(vertices, &r);
        (r, rotated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::{is_orthonormal, points_approx_eq, DVec3, EPSILON};

    fn cube() -> Vec<Vertex3D> {
        vec![
            DVec3::new(-1.0, -1.0, -0.2),
            DVec3::new(1.0, -1.0, -0.2),
            DVec3::new(1.0, 1.0, 0.2),
            DVec3::new(-1.0, 1.0, 0.2),
        ]
    }

    #[test]
    fn test_zero_angles_give_identity() {
        let composer = RotationComposer::default();
        let r = composer.compose(&AngleSample::with_yaw(0.0, 0.0, 0.0));
        assert!(r.abs_diff_eq(DMat3::IDENTITY, EPSILON));

        let r2 = composer.compose(&AngleSample::new(0.0, 0.0));
        assert!(r2.abs_diff_eq(DMat3::IDENTITY, EPSILON));
    }

    #[test]
    fn test_identity_apply_is_noop() {
        let verts = cube();
        let out = RotationComposer::apply(&verts, &DMat3::IDENTITY);
        assert_eq!(out, verts);
    }

    #[test]
    fn test_elementary_sign_conventions() {
        // Rx: row 1, col 2 holds -sin
        let rx = rot_x(90.0);
        assert!((rx.z_axis.y - -1.0).abs() < EPSILON);
        // Ry: row 2, col 0 holds -sin
        let ry = rot_y(90.0);
        assert!((ry.x_axis.z - -1.0).abs() < EPSILON);
        assert!((ry.z_axis.x - 1.0).abs() < EPSILON);
        // Rz: row 0, col 1 holds -sin
        let rz = rot_z(90.0);
        assert!((rz.y_axis.x - -1.0).abs() < EPSILON);
    }

    #[test]
    fn test_pitch_90_rotates_x_towards_minus_z() {
        let composer = RotationComposer::default();
        let (_, out) = composer.rotate(&AngleSample::with_yaw(90.0, 0.0, 0.0), &[DVec3::X]);
        assert!(out[0].abs_diff_eq(DVec3::new(0.0, 0.0, -1.0), EPSILON));
    }

    #[test]
    fn test_roll_90_rotates_y_towards_z() {
        let composer = RotationComposer::default();
        let (_, out) = composer.rotate(&AngleSample::new(0.0, 90.0), &[DVec3::Y]);
        assert!(out[0].abs_diff_eq(DVec3::Z, EPSILON));
    }

    #[test]
    fn test_two_axis_order_is_ry_rx() {
        let composer = RotationComposer::new(CompositionOrder::Zyx);
        let s = AngleSample::new(30.0, 45.0);
        let expected = rot_y(30.0) * rot_x(45.0);
        assert!(composer.compose(&s).abs_diff_eq(expected, EPSILON));
    }

    #[test]
    fn test_three_axis_order_is_rz_ry_rx() {
        let composer = RotationComposer::new(CompositionOrder::Zyx);
        let s = AngleSample::with_yaw(10.0, 20.0, 30.0);
        let expected = rot_z(30.0) * rot_y(10.0) * rot_x(20.0);
        assert!(composer.compose(&s).abs_diff_eq(expected, EPSILON));
    }

    #[test]
    fn test_order_is_not_commutative() {
        let s = AngleSample::with_yaw(15.0, 40.0, 70.0);
        let verts = cube();
        let (_, zyx) = RotationComposer::new(CompositionOrder::Zyx).rotate(&s, &verts);
        let (_, xyz) = RotationComposer::new(CompositionOrder::Xyz).rotate(&s, &verts);
        assert!(!points_approx_eq(&zyx, &xyz, 1e-6));
    }

    #[test]
    fn test_orthonormal_at_boundaries() {
        let angles = [-180.0, -90.0, -45.0, 0.0, 45.0, 90.0, 180.0];
        for order in [CompositionOrder::Zyx, CompositionOrder::Xyz] {
            let composer = RotationComposer::new(order);
            for &p in &angles {
                for &r in &angles {
                    assert!(is_orthonormal(&composer.compose(&AngleSample::new(p, r)), EPSILON));
                    for &y in &angles {
                        let m = composer.compose(&AngleSample::with_yaw(p, r, y));
                        assert!(is_orthonormal(&m, EPSILON), "{order} p={p} r={r} y={y}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let verts = cube();
        let before = verts.clone();
        let r = RotationComposer::default().compose(&AngleSample::with_yaw(33.0, -12.0, 5.0));
        let out = RotationComposer::apply(&verts, &r);
        assert_eq!(verts, before);
        assert_eq!(out.len(), verts.len());
        // Rotation preserves distance from the origin
        for (a, b) in verts.iter().zip(&out) {
            assert!((a.length() - b.length()).abs() < EPSILON);
        }
    }

    #[test]
    fn test_order_parse() {
        assert_eq!("ZYX".parse::<CompositionOrder>().unwrap(), CompositionOrder::Zyx);
        assert_eq!("xyz".parse::<CompositionOrder>().unwrap(), CompositionOrder::Xyz);
        assert!("yxz".parse::<CompositionOrder>().is_err());
        assert_eq!(serde_json::to_string(&CompositionOrder::Xyz).unwrap(), "\"xyz\"");
    }
}
