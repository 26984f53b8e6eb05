//! Converts loaded settings into the types the orbit, scene, and render
//! crates expect.

use glam::Vec3;
use orrery_config::Config;
use orrery_debug::BodySnapshot;
use orrery_input::{OrbitControl, OrbitLimits};
use orrery_orbit::{DEFAULT_EARTH_DAY, RateParams, ScaleParams, SolarSystem, SystemError};
use orrery_render::Camera;
use orrery_scene::SceneOptions;
use tracing::warn;

pub fn scale_params(config: &Config) -> ScaleParams {
    ScaleParams {
        earth_radius: config.scale.earth_radius,
        earth_distance: config.scale.earth_distance,
        sun_compression: config.scale.sun_compression,
    }
}

/// A non-finite `earth_day` would turn every transform into NaN; it falls
/// back to [`DEFAULT_EARTH_DAY`].
pub fn rate_params(config: &Config) -> RateParams {
    let earth_day = config.animation.earth_day;
    if !earth_day.is_finite() {
        warn!(earth_day, "invalid earth day, using {DEFAULT_EARTH_DAY}");
        return RateParams::new(DEFAULT_EARTH_DAY);
    }
    RateParams::new(earth_day)
}

/// The full catalog at the configured scale and speed.
pub fn build_system(config: &Config) -> Result<SolarSystem, SystemError> {
    SolarSystem::from_catalog(&scale_params(config), &rate_params(config))
}

pub fn scene_options(config: &Config) -> SceneOptions {
    SceneOptions {
        texture_dir: config.assets.texture_dir.clone(),
        sphere_segments: config.render.sphere_segments,
        ring_segments: config.render.ring_segments,
        sun_light_intensity: config.render.sun_light_intensity,
        ambient_intensity: config.render.ambient_intensity,
    }
}

/// Orbit control placed at the configured camera position.
pub fn orbit_control(config: &Config) -> OrbitControl {
    let mut control = OrbitControl::new(
        Vec3::from_array(config.camera.position),
        Vec3::from_array(config.camera.look_at),
        OrbitLimits {
            min_distance: config.controls.min_distance,
            max_distance: config.controls.max_distance,
        },
    );
    control.zoom_speed = config.controls.zoom_speed;
    control.rotate_speed = config.controls.rotate_speed;
    control
}

/// Camera looking from the control's eye toward its target.
pub fn camera(config: &Config, control: &OrbitControl, width: u32, height: u32) -> Camera {
    let mut camera = Camera::perspective(
        config.camera.fov_y_degrees,
        width.max(1) as f32 / height.max(1) as f32,
        config.camera.near,
        config.camera.far,
    );
    aim(&mut camera, control);
    camera
}

/// Moves the camera to the control's eye and faces the target.
pub fn aim(camera: &mut Camera, control: &OrbitControl) {
    camera.position = control.eye();
    camera.look_at(control.target, Vec3::Y);
}

/// World positions and accumulated angles for `GET /bodies`.
pub fn snapshot_bodies(system: &SolarSystem) -> Vec<BodySnapshot> {
    system
        .ids()
        .filter_map(|id| {
            let body = system.body(id)?;
            let world = system.world_transform(id)?;
            Some(BodySnapshot {
                name: body.name.clone(),
                position: world.position.to_array(),
                spin_angle: body.spin_angle(),
                revolution_angle: body.revolution_angle(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_orbit::{OrbitalAnimator, catalog};

    #[test]
    fn test_default_system_matches_catalog() {
        let system = build_system(&Config::default()).unwrap();
        assert_eq!(system.len(), catalog::CATALOG.len());
        let earth = system.find(catalog::EARTH).unwrap();
        let pos = system.world_transform(earth).unwrap().position;
        assert!((pos.length() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_follows_config() {
        let mut config = Config::default();
        config.scale.earth_distance = 250.0;
        let system = build_system(&config).unwrap();
        let earth = system.find(catalog::EARTH).unwrap();
        assert!((system.world_transform(earth).unwrap().position.length() - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_earth_day_drives_spin() {
        let mut config = Config::default();
        config.animation.earth_day = 0.05;
        let mut system = build_system(&config).unwrap();
        let earth = system.find(catalog::EARTH).unwrap();
        OrbitalAnimator::new().advance(&mut system, 10);
        let spin = system.body(earth).unwrap().spin_angle();
        assert!((spin - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_earth_day_falls_back() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut config = Config::default();
            config.animation.earth_day = bad;
            assert_eq!(rate_params(&config).earth_day, DEFAULT_EARTH_DAY);

            let mut system = build_system(&config).unwrap();
            OrbitalAnimator::new().advance(&mut system, 10);
            for id in system.ids() {
                let world = system.world_transform(id).unwrap();
                assert!(world.position.is_finite(), "{bad} broke body {id:?}");
                assert!(world.orientation.is_finite());
            }
        }
    }

    #[test]
    fn test_scene_options_from_config() {
        let mut config = Config::default();
        config.render.sphere_segments = 48;
        config.assets.texture_dir = "/srv/tex".into();
        let options = scene_options(&config);
        assert_eq!(options.sphere_segments, 48);
        assert_eq!(options.ring_segments, 64);
        assert_eq!(options.texture_dir, std::path::PathBuf::from("/srv/tex"));
    }

    #[test]
    fn test_camera_starts_at_configured_eye() {
        let config = Config::default();
        let control = orbit_control(&config);
        let camera = camera(&config, &control, 1280, 720);
        let expected = Vec3::from_array(config.camera.position);
        assert!((camera.position - expected).length() < 1e-2);
        assert!((camera.aspect_ratio - 1280.0 / 720.0).abs() < 1e-6);
        let to_target = (Vec3::ZERO - camera.position).normalize();
        assert!(camera.forward().dot(to_target) > 0.999);
    }

    #[test]
    fn test_zero_height_window_has_finite_aspect() {
        let config = Config::default();
        let camera = camera(&config, &orbit_control(&config), 800, 0);
        assert!(camera.aspect_ratio.is_finite());
    }

    #[test]
    fn test_snapshot_lists_every_body() {
        let mut system = build_system(&Config::default()).unwrap();
        OrbitalAnimator::new().advance(&mut system, 3);
        let snapshot = snapshot_bodies(&system);
        assert_eq!(snapshot.len(), system.len());
        let moon = snapshot.iter().find(|b| b.name == catalog::MOON).unwrap();
        assert!(moon.spin_angle > 0.0);
        let sun = snapshot.iter().find(|b| b.name == catalog::SUN).unwrap();
        assert_eq!(sun.position, [0.0, 0.0, 0.0]);
    }
}
