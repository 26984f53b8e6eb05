//! The per-frame spin and revolution step.

use glam::DVec3;
use orrery_math::{rotate_about_pivot, wrap_angle};

use crate::system::{SolarSystem, pivot_in_parent};

/// Axis every body spins and revolves about, in its parent's frame.
pub const VERTICAL_AXIS: DVec3 = DVec3::Y;

/// Applies fixed angular increments to every body of a [`SolarSystem`].
///
/// One call to [`advance`](Self::advance) with `delta_frames = n` is the same
/// as `n` calls with `1`. Bodies are updated in traversal order, so a pivot
/// body has already moved when its dependents read its position.
#[derive(Debug, Default)]
pub struct OrbitalAnimator {
    frames: u64,
}

impl OrbitalAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total frames applied since creation or the last [`reset`](Self::reset).
    pub fn frames_advanced(&self) -> u64 {
        self.frames
    }

    /// Zeroes the frame counter. Body transforms are reset by [`SolarSystem::reset`].
    pub fn reset(&mut self) {
        self.frames = 0;
    }

    /// Spins and revolves every body `delta_frames` times. Zero is a no-op.
    pub fn advance(&mut self, system: &mut SolarSystem, delta_frames: u32) {
        for _ in 0..delta_frames {
            step(system);
        }
        self.frames += u64::from(delta_frames);
    }
}

fn step(system: &mut SolarSystem) {
    for i in 0..system.bodies.len() {
        let (parent, pivot, spin, revolution) = {
            let body = &system.bodies[i];
            (
                body.parent,
                body.pivot,
                body.spin_step(),
                body.revolution_step(),
            )
        };

        if spin != 0.0 {
            let body = &mut system.bodies[i];
            body.transform.rotate_local(VERTICAL_AXIS, spin);
            body.spin_angle = wrap_angle(body.spin_angle + spin);
        }

        if revolution != 0.0 {
            let center = pivot_in_parent(&system.bodies, pivot, parent);
            let body = &mut system.bodies[i];
            body.transform = rotate_about_pivot(body.transform, center, revolution, VERTICAL_AXIS);
            body.revolution_angle = wrap_angle(body.revolution_angle + revolution);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{BodyId, BodyKind, Direction, Pivot};
    use crate::catalog::{
        CATALOG, EARTH, JUPITER, MERCURY, MOON, MOON_PERIOD_DAYS, SATURN, SATURN_RING, SUN, URANUS,
        VENUS,
    };
    use crate::rates::RateParams;
    use crate::scale::ScaleParams;
    use crate::system::BodyDesc;
    use glam::DQuat;
    use orrery_math::angle_distance;
    use std::f64::consts::TAU;

    const EPS: f64 = 1e-9;

    fn catalog_system() -> SolarSystem {
        SolarSystem::from_catalog(&ScaleParams::default(), &RateParams::default()).unwrap()
    }

    fn id(system: &SolarSystem, name: &str) -> BodyId {
        system.find(name).unwrap()
    }

    /// Signed angle of the body's local frame about +Y relative to its parent.
    fn yaw(system: &SolarSystem, body: BodyId) -> f64 {
        let q = system.body(body).unwrap().transform().orientation;
        let (axis, angle) = q.to_axis_angle();
        if angle.abs() < 1e-12 {
            0.0
        } else {
            wrap_angle(angle * axis.y.signum())
        }
    }

    #[test]
    fn test_spin_accumulates_per_frame() {
        let mut system = catalog_system();
        let mut animator = OrbitalAnimator::new();
        animator.advance(&mut system, 250);
        for body in system.bodies() {
            let expected = wrap_angle(250.0 * body.spin_step());
            assert!(
                angle_distance(body.spin_angle(), expected) < EPS,
                "{}: {} vs {}",
                body.name,
                body.spin_angle(),
                expected
            );
        }
        assert_eq!(animator.frames_advanced(), 250);
    }

    #[test]
    fn test_thousand_frame_scenario() {
        let mut system = catalog_system();
        OrbitalAnimator::new().advance(&mut system, 1000);

        let earth = system.body(id(&system, EARTH)).unwrap();
        assert!(angle_distance(earth.spin_angle(), wrap_angle(20.0)) < 1e-9);

        let mercury = system.body(id(&system, MERCURY)).unwrap();
        assert!((mercury.spin_angle() - 20.0 / 58.6).abs() < 1e-9);
        assert!((mercury.spin_angle() - 0.341).abs() < 1e-3);
    }

    #[test]
    fn test_batched_equals_single_steps() {
        let mut batched = catalog_system();
        let mut single = catalog_system();
        OrbitalAnimator::new().advance(&mut batched, 40);
        let mut animator = OrbitalAnimator::new();
        for _ in 0..40 {
            animator.advance(&mut single, 1);
        }
        for id in batched.ids() {
            assert!(
                batched
                    .world_transform(id)
                    .unwrap()
                    .approx_eq(&single.world_transform(id).unwrap(), 1e-9)
            );
        }
    }

    #[test]
    fn test_earth_keeps_distance_from_sun() {
        let mut system = catalog_system();
        let sun = id(&system, SUN);
        let earth = id(&system, EARTH);
        let mut animator = OrbitalAnimator::new();
        for _ in 0..50 {
            animator.advance(&mut system, 97);
            let d = system
                .world_transform(earth)
                .unwrap()
                .position
                .distance(system.world_transform(sun).unwrap().position);
            assert!((d - 100.0).abs() < 1e-6, "distance drifted to {d}");
        }
    }

    #[test]
    fn test_every_revolving_body_keeps_its_orbital_radius() {
        let mut system = catalog_system();
        let mut animator = OrbitalAnimator::new();
        let revolving: Vec<_> = system
            .ids()
            .filter(|&id| matches!(system.body(id).unwrap().pivot, Pivot::Body(_)))
            .collect();
        assert_eq!(revolving.len(), CATALOG.len() - 1);

        for _ in 0..10 {
            animator.advance(&mut system, 10_000);
            for &id in &revolving {
                let body = system.body(id).unwrap();
                let centre = system.pivot_position(body.pivot).unwrap();
                let d = system.world_transform(id).unwrap().position.distance(centre);
                assert!(
                    (d - body.orbital_radius).abs() < 1e-6,
                    "{} drifted to {d}, expected {}",
                    body.name,
                    body.orbital_radius
                );
            }
        }
    }

    #[test]
    fn test_earth_actually_revolves() {
        let mut system = catalog_system();
        let earth = id(&system, EARTH);
        let before = system.world_transform(earth).unwrap().position;
        OrbitalAnimator::new().advance(&mut system, 5000);
        let after = system.world_transform(earth).unwrap().position;
        assert!(before.distance(after) > 1.0);
        assert!(after.y.abs() < 1e-9);
    }

    #[test]
    fn test_moon_tracks_moving_earth() {
        let mut system = catalog_system();
        let earth = id(&system, EARTH);
        let moon = id(&system, MOON);
        let radius = system.body(moon).unwrap().orbital_radius;
        let mut animator = OrbitalAnimator::new();
        for _ in 0..20 {
            animator.advance(&mut system, 333);
            let d = system
                .world_transform(moon)
                .unwrap()
                .position
                .distance(system.world_transform(earth).unwrap().position);
            assert!((d - radius).abs() < 1e-6);
        }
    }

    #[test]
    fn test_moon_is_tidally_locked() {
        let mut system = catalog_system();
        let moon = id(&system, MOON);
        let rates = RateParams::default();
        let moon_rotation = rates.earth_day / MOON_PERIOD_DAYS;
        let n = 600;
        OrbitalAnimator::new().advance(&mut system, n);
        let expected = wrap_angle(n as f64 * (moon_rotation - rates.earth_day));
        let body = system.body(moon).unwrap();
        assert!(angle_distance(body.spin_angle(), expected) < EPS);
    }

    #[test]
    fn test_moon_orientation_combines_spin_and_revolution() {
        let mut system = catalog_system();
        let moon = id(&system, MOON);
        let n = 200;
        OrbitalAnimator::new().advance(&mut system, n);
        let body = system.body(moon).unwrap();
        let expected = wrap_angle(n as f64 * (body.spin_step() + body.revolution_step()));
        assert!(angle_distance(yaw(&system, moon), expected) < 1e-9);
    }

    #[test]
    fn test_retrograde_bodies_turn_opposite() {
        let mut system = catalog_system();
        let n = 100;
        OrbitalAnimator::new().advance(&mut system, n);
        for name in [VENUS, URANUS] {
            let body = system.body(id(&system, name)).unwrap();
            assert!(body.spin_step() < 0.0, "{name}");
            let expected = wrap_angle(n as f64 * body.spin_step());
            assert!(angle_distance(body.spin_angle(), expected) < EPS);
            // Small negative turns wrap to just under 2π.
            assert!(body.spin_angle() > std::f64::consts::PI);
        }
        for name in [MERCURY, EARTH, JUPITER] {
            assert!(system.body(id(&system, name)).unwrap().spin_step() > 0.0);
        }
    }

    #[test]
    fn test_ring_stays_rigid_with_saturn() {
        let mut system = catalog_system();
        let saturn = id(&system, SATURN);
        let ring = id(&system, SATURN_RING);
        let initial_local = *system.body(ring).unwrap().transform();
        OrbitalAnimator::new().advance(&mut system, 1234);

        let ring_body = system.body(ring).unwrap();
        assert!(ring_body.transform().approx_eq(&initial_local, EPS));
        assert!(
            system
                .world_transform(ring)
                .unwrap()
                .position
                .abs_diff_eq(system.world_transform(saturn).unwrap().position, 1e-9)
        );
        let saturn_radius = system.body(saturn).unwrap().radius;
        let (inner, outer) = ring_body.ring_radii().unwrap();
        assert!((inner / saturn_radius - 1.1).abs() < 1e-12);
        assert!((outer / saturn_radius - 1.3).abs() < 1e-12);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut system = catalog_system();
        let pristine = system.clone();
        let mut animator = OrbitalAnimator::new();
        animator.advance(&mut system, 777);
        system.reset();
        animator.reset();
        assert_eq!(animator.frames_advanced(), 0);
        for id in system.ids() {
            let body = system.body(id).unwrap();
            assert_eq!(body.transform(), pristine.body(id).unwrap().transform());
            assert_eq!(body.spin_angle(), 0.0);
            assert_eq!(body.revolution_angle(), 0.0);
        }
    }

    #[test]
    fn test_full_revolution_returns_home() {
        let mut builder = SolarSystem::builder();
        let star = builder
            .add(BodyDesc::new("Star", BodyKind::Star, 1.0))
            .unwrap();
        let rock = builder
            .add(BodyDesc::new("Rock", BodyKind::Planet, 0.1).orbit(
                Pivot::Body(star),
                10.0,
                TAU / 8.0,
                Direction::Prograde,
            ))
            .unwrap();
        let mut system = builder.build();
        let start = system.world_transform(rock).unwrap();
        OrbitalAnimator::new().advance(&mut system, 8);
        assert!(system.world_transform(rock).unwrap().approx_eq(&start, 1e-9));
    }

    #[test]
    fn test_revolution_reorients_body() {
        let mut builder = SolarSystem::builder();
        let rock = builder
            .add(BodyDesc::new("Rock", BodyKind::Planet, 0.1).orbit(
                Pivot::Origin,
                10.0,
                std::f64::consts::FRAC_PI_2,
                Direction::Prograde,
            ))
            .unwrap();
        let mut system = builder.build();
        OrbitalAnimator::new().advance(&mut system, 1);
        let t = system.world_transform(rock).unwrap();
        assert!(t.position.abs_diff_eq(DVec3::new(-10.0, 0.0, 0.0), 1e-9));
        let expected = DQuat::from_rotation_y(std::f64::consts::FRAC_PI_2);
        assert!(t.orientation.abs_diff_eq(expected, 1e-9));
    }

    #[test]
    fn test_zero_frames_is_noop() {
        let mut system = catalog_system();
        let before = system.clone();
        OrbitalAnimator::new().advance(&mut system, 0);
        for id in system.ids() {
            assert_eq!(
                system.body(id).unwrap().transform(),
                before.body(id).unwrap().transform()
            );
        }
    }
}
