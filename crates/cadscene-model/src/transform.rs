// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rigid placement transforms

use nalgebra::{Isometry3, Matrix4, Point3, Quaternion, Translation3, Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// Rigid 3D transform (rotation followed by translation)
///
/// Composition follows the assembly tree: for a root-to-leaf chain of
/// placements `[T1, T2, ..., Tn]` the composed transform is
/// `T1 * T2 * ... * Tn`, so `T1` is the outermost placement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "TransformRepr", into = "TransformRepr")]
pub struct Transform {
    isometry: Isometry3<f64>,
}

/// Serialized form: translation + unit quaternion (i, j, k, w)
#[derive(Clone, Copy, Serialize, Deserialize)]
struct TransformRepr {
    translation: [f64; 3],
    rotation: [f64; 4],
}

impl From<TransformRepr> for Transform {
    fn from(repr: TransformRepr) -> Self {
        let [x, y, z] = repr.translation;
        let [i, j, k, w] = repr.rotation;
        let rotation = UnitQuaternion::from_quaternion(Quaternion::new(w, i, j, k));
        Self {
            isometry: Isometry3::from_parts(Translation3::new(x, y, z), rotation),
        }
    }
}

impl From<Transform> for TransformRepr {
    fn from(transform: Transform) -> Self {
        let t = transform.isometry.translation.vector;
        let q = transform.isometry.rotation.quaternion().coords;
        TransformRepr {
            translation: [t.x, t.y, t.z],
            rotation: [q[0], q[1], q[2], q[3]],
        }
    }
}

impl Transform {
    /// The identity transform (empty composition)
    pub fn identity() -> Self {
        Self {
            isometry: Isometry3::identity(),
        }
    }

    /// Pure translation
    pub fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            isometry: Isometry3::translation(x, y, z),
        }
    }

    /// Pure rotation of `angle` radians around `axis`
    ///
    /// A degenerate (zero-length) axis yields the identity.
    pub fn from_axis_angle(axis: [f64; 3], angle: f64) -> Self {
        Self::new([0.0, 0.0, 0.0], axis, angle)
    }

    /// Rotation around `axis` followed by a translation
    pub fn new(translation: [f64; 3], axis: [f64; 3], angle: f64) -> Self {
        let rotation = Unit::try_new(Vector3::from(axis), f64::EPSILON)
            .map(|axis| UnitQuaternion::from_axis_angle(&axis, angle))
            .unwrap_or_else(UnitQuaternion::identity);
        let [x, y, z] = translation;
        Self {
            isometry: Isometry3::from_parts(Translation3::new(x, y, z), rotation),
        }
    }

    /// Compose with a child placement: `self * local`
    pub fn multiplied(&self, local: &Transform) -> Transform {
        Self {
            isometry: self.isometry * local.isometry,
        }
    }

    /// Compose a root-to-leaf chain of placements
    pub fn compose<'a>(chain: impl IntoIterator<Item = &'a Transform>) -> Transform {
        chain
            .into_iter()
            .fold(Transform::identity(), |acc, t| acc.multiplied(t))
    }

    /// Translation part
    pub fn translation(&self) -> [f64; 3] {
        let t = self.isometry.translation.vector;
        [t.x, t.y, t.z]
    }

    /// Rotation part as (unit axis, angle in radians)
    ///
    /// The identity rotation is reported as a zero rotation around +Z.
    pub fn axis_angle(&self) -> ([f64; 3], f64) {
        match self.isometry.rotation.axis_angle() {
            Some((axis, angle)) => ([axis.x, axis.y, axis.z], angle),
            None => ([0.0, 0.0, 1.0], 0.0),
        }
    }

    /// Apply to a point
    pub fn transform_point(&self, p: [f64; 3]) -> [f64; 3] {
        let q = self.isometry.transform_point(&Point3::from(p));
        [q.x, q.y, q.z]
    }

    /// Apply to a direction (rotation only)
    pub fn transform_vector(&self, v: [f64; 3]) -> [f64; 3] {
        let w = self.isometry.transform_vector(&Vector3::from(v));
        [w.x, w.y, w.z]
    }

    /// 4x4 homogeneous matrix
    pub fn to_matrix(&self) -> Matrix4<f64> {
        self.isometry.to_homogeneous()
    }

    /// Underlying isometry
    pub fn isometry(&self) -> &Isometry3<f64> {
        &self.isometry
    }

    /// Element-wise matrix comparison within `tolerance`
    pub fn approx_eq(&self, other: &Transform, tolerance: f64) -> bool {
        let a = self.to_matrix();
        let b = other.to_matrix();
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= tolerance)
    }

    /// Check for the identity within `tolerance`
    pub fn is_identity(&self, tolerance: f64) -> bool {
        self.approx_eq(&Transform::identity(), tolerance)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        self.multiplied(&rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_empty_composition_is_identity() {
        let composed = Transform::compose(&[]);
        assert!(composed.is_identity(1e-12));
    }

    #[test]
    fn test_two_level_composition_matches_hand_computed() {
        // Outer placement: rotate 90 degrees around Z, then move +10 in X
        let outer = Transform::new([10.0, 0.0, 0.0], [0.0, 0.0, 1.0], FRAC_PI_2);
        // Inner placement: move +5 in X
        let inner = Transform::from_translation(5.0, 0.0, 0.0);

        let composed = Transform::compose(&[outer, inner]);

        // Point at origin: inner moves it to (5,0,0), outer rotates to (0,5,0)
        // and translates to (10,5,0)
        let p = composed.transform_point([0.0, 0.0, 0.0]);
        assert_relative_eq!(p[0], 10.0, epsilon = 1e-9);
        assert_relative_eq!(p[1], 5.0, epsilon = 1e-9);
        assert_relative_eq!(p[2], 0.0, epsilon = 1e-9);

        // Literal product of the placements in root-to-leaf order
        let product = outer.to_matrix() * inner.to_matrix();
        for (a, b) in composed.to_matrix().iter().zip(product.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }

        // Reversed order is a different placement
        let reversed = Transform::compose(&[inner, outer]);
        assert!(!reversed.approx_eq(&composed, 1e-6));
    }

    #[test]
    fn test_axis_angle_of_identity() {
        let (axis, angle) = Transform::identity().axis_angle();
        assert_eq!(axis, [0.0, 0.0, 1.0]);
        assert_eq!(angle, 0.0);
    }

    #[test]
    fn test_axis_angle_roundtrip() {
        let t = Transform::new([1.0, 2.0, 3.0], [1.0, 0.0, 0.0], 0.5);
        let (axis, angle) = t.axis_angle();
        assert_relative_eq!(axis[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(angle, 0.5, epsilon = 1e-12);
        assert_eq!(t.translation(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_degenerate_axis_is_identity_rotation() {
        let t = Transform::from_axis_angle([0.0, 0.0, 0.0], 1.0);
        assert!(t.is_identity(1e-12));
    }

    #[test]
    fn test_json_roundtrip_preserves_placement() {
        let t = Transform::new([4.0, -1.0, 0.5], [0.0, 1.0, 0.0], 1.2);
        let json = serde_json::to_string(&t).unwrap();
        let back: Transform = serde_json::from_str(&json).unwrap();
        assert!(back.approx_eq(&t, 1e-12));
    }
}
