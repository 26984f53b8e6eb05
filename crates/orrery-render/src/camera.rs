//! Perspective camera with reverse-Z projection.

use glam::{Mat3, Mat4, Quat, Vec3};

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    /// Unit quaternion; the camera looks down its local `-Z`.
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect_ratio: f32,
    /// Near clip distance, positive.
    pub near: f32,
    /// Far clip distance, greater than `near`.
    pub far: f32,
}

impl Camera {
    pub fn perspective(fov_y_degrees: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_y: fov_y_degrees.to_radians(),
            aspect_ratio,
            near,
            far,
        }
    }

    /// Turns the camera to face `target`. Does nothing if `target` is the
    /// camera position.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let forward = (target - self.position).normalize_or_zero();
        if forward == Vec3::ZERO {
            return;
        }
        let mut right = forward.cross(up).normalize_or_zero();
        if right == Vec3::ZERO {
            // Looking straight along `up`; any perpendicular will do.
            right = forward.cross(Vec3::Z).normalize_or_zero();
            if right == Vec3::ZERO {
                right = Vec3::X;
            }
        }
        let true_up = right.cross(forward);
        self.rotation = Quat::from_mat3(&Mat3::from_cols(right, true_up, -forward)).normalize();
    }

    pub fn view_matrix(&self) -> Mat4 {
        (Mat4::from_translation(self.position) * Mat4::from_quat(self.rotation)).inverse()
    }

    /// Near and far are swapped so the near plane lands on depth 1.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Local `-Z` in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Ignored when `height` is zero, as for a minimised window.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        if height > 0.0 {
            self.aspect_ratio = width / height;
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(60.0, 16.0 / 9.0, 0.5, 10_000.0)
    }
}
