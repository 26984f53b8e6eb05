//! Camera that orbits a target point.
//!
//! Dragging with the left button swings the eye around the target on a
//! sphere; the wheel scales the sphere's radius. The polar angle is kept off
//! the poles so the up vector stays well defined.

use std::f32::consts::PI;

use glam::Vec3;
use winit::event::MouseButton;

use crate::mouse::MouseState;

/// Keeps the eye off the poles.
const POLAR_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitLimits {
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitLimits {
    fn default() -> Self {
        Self {
            min_distance: 5.0,
            max_distance: 5000.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrbitControl {
    pub target: Vec3,
    /// Distance from target to eye.
    radius: f32,
    /// Azimuth around +Y, zero looking down -Z from +Z.
    theta: f32,
    /// Polar angle from +Y.
    phi: f32,
    pub rotate_speed: f32,
    /// Wheel sensitivity. Each notch scales the radius by `0.95^zoom_speed`.
    pub zoom_speed: f32,
    pub limits: OrbitLimits,
    pub enabled: bool,
}

impl OrbitControl {
    /// Starts at `eye` looking at `target`.
    #[must_use]
    pub fn new(eye: Vec3, target: Vec3, limits: OrbitLimits) -> Self {
        let offset = eye - target;
        let radius = offset.length().clamp(limits.min_distance, limits.max_distance);
        let (theta, phi) = if offset.length_squared() > 0.0 {
            let phi = (offset.y / offset.length()).clamp(-1.0, 1.0).acos();
            (offset.x.atan2(offset.z), phi)
        } else {
            (0.0, PI / 2.0)
        };
        Self {
            target,
            radius,
            theta,
            phi: phi.clamp(POLAR_EPSILON, PI - POLAR_EPSILON),
            rotate_speed: 1.0,
            zoom_speed: 2.0,
            limits,
            enabled: true,
        }
    }

    #[must_use]
    pub fn distance(&self) -> f32 {
        self.radius
    }

    #[must_use]
    pub fn eye(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        self.target
            + self.radius
                * Vec3::new(
                    sin_phi * self.theta.sin(),
                    self.phi.cos(),
                    sin_phi * self.theta.cos(),
                )
    }

    /// Drag distances are normalised by the viewport height, so a drag across
    /// the full height turns the camera by a full circle.
    pub fn rotate(&mut self, drag_px: glam::Vec2, viewport_height: f32) {
        let h = viewport_height.max(1.0);
        self.theta -= 2.0 * PI * drag_px.x / h * self.rotate_speed;
        self.phi = (self.phi - 2.0 * PI * drag_px.y / h * self.rotate_speed)
            .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
    }

    /// Positive `notches` move the eye toward the target.
    pub fn zoom(&mut self, notches: f32) {
        let scale = 0.95_f32.powf(self.zoom_speed * notches);
        self.radius =
            (self.radius * scale).clamp(self.limits.min_distance, self.limits.max_distance);
    }

    /// Applies this frame's mouse input. Returns whether the eye moved.
    pub fn update(&mut self, mouse: &MouseState, viewport_height: f32) -> bool {
        if !self.enabled {
            return false;
        }
        let before = (self.radius, self.theta, self.phi);
        if mouse.is_button_pressed(MouseButton::Left) && mouse.delta() != glam::Vec2::ZERO {
            self.rotate(mouse.delta(), viewport_height);
        }
        if mouse.scroll() != 0.0 {
            self.zoom(mouse.scroll());
        }
        before != (self.radius, self.theta, self.phi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use winit::event::{ElementState, MouseScrollDelta};

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn test_new_reproduces_eye() {
        let eye = Vec3::new(30.0, 120.0, 250.0);
        let ctl = OrbitControl::new(eye, Vec3::ZERO, OrbitLimits::default());
        assert!(close(ctl.eye(), eye), "{:?}", ctl.eye());
    }

    #[test]
    fn test_new_clamps_distance() {
        let ctl = OrbitControl::new(Vec3::new(0.0, 0.0, 1.0), Vec3::ZERO, OrbitLimits::default());
        assert!((ctl.distance() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_rotate_keeps_distance() {
        let mut ctl = OrbitControl::new(Vec3::new(0.0, 50.0, 200.0), Vec3::ZERO, OrbitLimits::default());
        let d = ctl.eye().length();
        ctl.rotate(Vec2::new(137.0, -42.0), 720.0);
        assert!((ctl.eye().length() - d).abs() < 1e-2);
    }

    #[test]
    fn test_full_height_drag_is_full_turn() {
        let eye = Vec3::new(0.0, 0.0, 100.0);
        let mut ctl = OrbitControl::new(eye, Vec3::ZERO, OrbitLimits::default());
        ctl.rotate(Vec2::new(720.0, 0.0), 720.0);
        assert!(close(ctl.eye(), eye), "{:?}", ctl.eye());
    }

    #[test]
    fn test_polar_angle_clamped() {
        let mut ctl = OrbitControl::new(Vec3::new(0.0, 0.0, 100.0), Vec3::ZERO, OrbitLimits::default());
        ctl.rotate(Vec2::new(0.0, 10_000.0), 100.0);
        let eye = ctl.eye();
        assert!(eye.is_finite());
        assert!(eye.y > 99.9 && eye.y <= 100.0 + 1e-3, "{eye:?}");
    }

    #[test]
    fn test_zoom_direction_and_clamp() {
        let limits = OrbitLimits {
            min_distance: 10.0,
            max_distance: 300.0,
        };
        let mut ctl = OrbitControl::new(Vec3::new(0.0, 0.0, 100.0), Vec3::ZERO, limits);
        ctl.zoom(1.0);
        assert!(ctl.distance() < 100.0);
        ctl.zoom(-2.0);
        assert!(ctl.distance() > 100.0);
        ctl.zoom(1000.0);
        assert!((ctl.distance() - 10.0).abs() < 1e-5);
        ctl.zoom(-1000.0);
        assert!((ctl.distance() - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_update_needs_left_button_to_rotate() {
        let mut ctl = OrbitControl::new(Vec3::new(0.0, 0.0, 100.0), Vec3::ZERO, OrbitLimits::default());
        let mut mouse = MouseState::new();
        mouse.on_cursor_moved(0.0, 0.0);
        mouse.on_cursor_moved(50.0, 0.0);
        assert!(!ctl.update(&mouse, 720.0));

        mouse.on_button(MouseButton::Left, ElementState::Pressed);
        assert!(ctl.update(&mouse, 720.0));
    }

    #[test]
    fn test_update_scroll_zooms() {
        let mut ctl = OrbitControl::new(Vec3::new(0.0, 0.0, 100.0), Vec3::ZERO, OrbitLimits::default());
        let mut mouse = MouseState::new();
        mouse.on_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        assert!(ctl.update(&mouse, 720.0));
        assert!((ctl.distance() - 100.0 * 0.95_f32.powi(2)).abs() < 1e-3);
    }

    #[test]
    fn test_disabled_ignores_input() {
        let mut ctl = OrbitControl::new(Vec3::new(0.0, 0.0, 100.0), Vec3::ZERO, OrbitLimits::default());
        ctl.enabled = false;
        let mut mouse = MouseState::new();
        mouse.on_scroll(MouseScrollDelta::LineDelta(0.0, 3.0));
        assert!(!ctl.update(&mouse, 720.0));
    }
}
