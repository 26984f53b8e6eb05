//! Position + orientation pairs and the rotate-about-point operation.

use glam::{DMat4, DQuat, DVec3};
use std::ops::Mul;

/// A rigid transform: translation followed by rotation, no scale.
///
/// Body sizes are baked into mesh geometry, so transforms only ever carry
/// where a frame sits and which way it faces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Origin of the frame, expressed in the parent frame.
    pub position: DVec3,
    /// Orientation of the frame relative to the parent frame. Kept unit length.
    pub orientation: DQuat,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        position: DVec3::ZERO,
        orientation: DQuat::IDENTITY,
    };

    /// A transform at `position` with no rotation.
    pub fn from_position(position: DVec3) -> Self {
        Self {
            position,
            orientation: DQuat::IDENTITY,
        }
    }

    /// Returns a copy with the given orientation.
    pub fn with_orientation(mut self, orientation: DQuat) -> Self {
        self.orientation = orientation.normalize();
        self
    }

    /// Rotates the frame about one of its own axes, leaving its position alone.
    ///
    /// This is the axial-spin primitive: `axis` is interpreted in the local
    /// frame, so `DVec3::Y` always means the body's own vertical axis.
    pub fn rotate_local(&mut self, axis: DVec3, angle: f64) {
        let delta = DQuat::from_axis_angle(axis, angle);
        self.orientation = (self.orientation * delta).normalize();
    }

    /// Maps a point from this frame into the parent frame.
    pub fn transform_point(&self, point: DVec3) -> DVec3 {
        self.position + self.orientation * point
    }

    /// Maps a point from the parent frame into this frame.
    pub fn inverse_transform_point(&self, point: DVec3) -> DVec3 {
        self.orientation.inverse() * (point - self.position)
    }

    /// The inverse rigid transform.
    pub fn inverse(&self) -> Self {
        let orientation = self.orientation.inverse();
        Self {
            position: -(orientation * self.position),
            orientation,
        }
    }

    /// Column-major 4x4 matrix for GPU upload.
    pub fn to_matrix(&self) -> DMat4 {
        DMat4::from_rotation_translation(self.orientation, self.position)
    }

    /// Returns true if both position and orientation are within `epsilon`.
    ///
    /// `q` and `-q` describe the same rotation, so either sign matches.
    pub fn approx_eq(&self, other: &Transform, epsilon: f64) -> bool {
        let same_rotation = self.orientation.abs_diff_eq(other.orientation, epsilon)
            || self.orientation.abs_diff_eq(-other.orientation, epsilon);
        same_rotation && self.position.abs_diff_eq(other.position, epsilon)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Composition: `parent * child` expresses `child` in the parent's parent frame.
impl Mul for Transform {
    type Output = Transform;

    fn mul(self, child: Transform) -> Transform {
        Transform {
            position: self.transform_point(child.position),
            orientation: (self.orientation * child.orientation).normalize(),
        }
    }
}

/// Rotates a whole frame about `pivot` by `angle` radians around `axis`.
///
/// Translates the pivot to the origin, rotates, and translates back. The
/// rotation is applied to the full frame, so the orientation turns with the
/// position. `axis` must be normalized. `pivot` and the result are expressed
/// in the same frame as `transform`.
pub fn rotate_about_pivot(
    transform: Transform,
    pivot: DVec3,
    angle: f64,
    axis: DVec3,
) -> Transform {
    let rotation = DQuat::from_axis_angle(axis, angle);
    Transform {
        position: pivot + rotation * (transform.position - pivot),
        orientation: (rotation * transform.orientation).normalize(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_rotate_about_origin_quarter_turn() {
        let t = Transform::from_position(DVec3::new(0.0, 0.0, -10.0));
        let rotated = rotate_about_pivot(t, DVec3::ZERO, FRAC_PI_2, DVec3::Y);
        // Right-handed rotation about +Y takes -Z to -X.
        assert!(
            rotated.position.abs_diff_eq(DVec3::new(-10.0, 0.0, 0.0), EPS),
            "got {:?}",
            rotated.position
        );
    }

    #[test]
    fn test_rotate_about_offset_pivot_keeps_radius() {
        let pivot = DVec3::new(5.0, 1.0, -3.0);
        let mut t = Transform::from_position(pivot + DVec3::new(7.0, 0.0, 0.0));
        for i in 0..500 {
            t = rotate_about_pivot(t, pivot, 0.013 * i as f64, DVec3::Y);
            let r = (t.position - pivot).length();
            assert!((r - 7.0).abs() < 1e-9, "radius drifted to {r}");
        }
    }

    #[test]
    fn test_rotate_about_pivot_reorients_frame() {
        let t = Transform::from_position(DVec3::new(3.0, 0.0, 0.0));
        let rotated = rotate_about_pivot(t, DVec3::ZERO, PI, DVec3::Y);
        let forward = rotated.orientation * DVec3::NEG_Z;
        assert!(forward.abs_diff_eq(DVec3::Z, EPS), "forward = {forward:?}");
    }

    #[test]
    fn test_pivot_at_position_only_rotates() {
        let p = DVec3::new(2.0, 4.0, 6.0);
        let t = Transform::from_position(p);
        let rotated = rotate_about_pivot(t, p, 1.0, DVec3::Y);
        assert!(rotated.position.abs_diff_eq(p, EPS));
        assert!(!rotated.orientation.abs_diff_eq(DQuat::IDENTITY, 1e-3));
    }

    #[test]
    fn test_full_turn_returns_to_start() {
        let t = Transform::from_position(DVec3::new(0.0, 0.0, -42.0));
        let back = rotate_about_pivot(t, DVec3::ZERO, TAU, DVec3::Y);
        assert!(back.approx_eq(&t, 1e-9));
    }

    #[test]
    fn test_rotate_local_leaves_position() {
        let mut t = Transform::from_position(DVec3::new(1.0, 2.0, 3.0));
        t.rotate_local(DVec3::Y, 0.7);
        assert_eq!(t.position, DVec3::new(1.0, 2.0, 3.0));
        let (axis, angle) = t.orientation.to_axis_angle();
        assert!((angle - 0.7).abs() < EPS);
        assert!(axis.abs_diff_eq(DVec3::Y, EPS));
    }

    #[test]
    fn test_rotate_local_uses_local_axis() {
        // Tip the frame onto its side, then spin about its own Y.
        let mut t = Transform::IDENTITY.with_orientation(DQuat::from_rotation_z(FRAC_PI_2));
        let up_before = t.orientation * DVec3::Y;
        t.rotate_local(DVec3::Y, 1.2);
        let up_after = t.orientation * DVec3::Y;
        assert!(up_before.abs_diff_eq(up_after, EPS));
    }

    #[test]
    fn test_composition_matches_matrices() {
        let parent = Transform::from_position(DVec3::new(10.0, 0.0, 0.0))
            .with_orientation(DQuat::from_rotation_y(0.3));
        let child = Transform::from_position(DVec3::new(0.0, 0.0, -2.0))
            .with_orientation(DQuat::from_rotation_y(-1.1));
        let composed = (parent * child).to_matrix();
        let expected = parent.to_matrix() * child.to_matrix();
        assert!(composed.abs_diff_eq(expected, 1e-9));
    }

    #[test]
    fn test_inverse_undoes_transform() {
        let t = Transform::from_position(DVec3::new(-4.0, 2.0, 9.0))
            .with_orientation(DQuat::from_rotation_y(2.2));
        let round = t * t.inverse();
        assert!(round.approx_eq(&Transform::IDENTITY, 1e-9));

        let p = DVec3::new(1.0, -1.0, 5.0);
        let local = t.inverse_transform_point(p);
        assert!(t.transform_point(local).abs_diff_eq(p, 1e-9));
    }

    #[test]
    fn test_approx_eq_accepts_negated_quaternion() {
        let a = Transform::IDENTITY.with_orientation(DQuat::from_rotation_y(0.5));
        let b = Transform {
            orientation: -a.orientation,
            ..a
        };
        assert!(a.approx_eq(&b, EPS));
    }
}
