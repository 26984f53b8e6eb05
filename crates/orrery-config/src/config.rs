//! Configuration sections and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const CONFIG_FILE: &str = "config.ron";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub animation: AnimationConfig,
    pub scale: ScaleConfig,
    pub render: RenderConfig,
    pub assets: AssetConfig,
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Logical pixels.
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// `PresentMode::Fifo` when set.
    pub vsync: bool,
}

/// Initial viewpoint and projection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub look_at: [f32; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControlsConfig {
    /// Scroll sensitivity of the orbit control.
    pub zoom_speed: f32,
    pub rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

/// How redraws map to animation frames.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub enum Timestep {
    /// One animation frame per redraw; speed follows the display refresh rate.
    #[default]
    PerFrame,
    /// `hz` animation frames per second of wall time.
    Fixed { hz: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Radians Earth spins per animation frame. Every other rate derives from it.
    pub earth_day: f64,
    pub timestep: Timestep,
    pub start_paused: bool,
}

/// Scene-unit scale factors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScaleConfig {
    pub earth_radius: f64,
    pub earth_distance: f64,
    /// Factor applied to the sun's true radius ratio so it fits the scene.
    pub sun_compression: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub sphere_segments: u32,
    pub ring_segments: u32,
    /// Linear RGB.
    pub clear_color: [f64; 3],
    pub sun_light_intensity: f32,
    pub ambient_intensity: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetConfig {
    /// Resolved against the working directory when relative.
    pub texture_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Logs the smoothed frame rate once a second.
    pub show_fps: bool,
    /// Filter directive used when `RUST_LOG` is unset (e.g. "info", "debug").
    pub log_level: String,
    /// Starts the HTTP debug API in debug builds.
    pub debug_api: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Orrery".to_string(),
            vsync: true,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            near: 0.5,
            far: 10_000.0,
            position: [0.0, 150.0, 450.0],
            look_at: [0.0, 0.0, 0.0],
        }
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            zoom_speed: 2.0,
            rotate_speed: 1.0,
            min_distance: 5.0,
            max_distance: 5_000.0,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            earth_day: 0.02,
            timestep: Timestep::PerFrame,
            start_paused: false,
        }
    }
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            earth_radius: 2.0,
            earth_distance: 100.0,
            sun_compression: 0.1,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sphere_segments: 20,
            ring_segments: 64,
            clear_color: [0.0, 0.0, 0.0],
            sun_light_intensity: 1.0,
            ambient_intensity: 0.15,
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            texture_dir: PathBuf::from("texture"),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            show_fps: false,
            log_level: "info".to_string(),
            debug_api: true,
        }
    }
}

impl Config {
    /// Reads `config.ron` from `config_dir`, writing defaults there first if
    /// it does not exist.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE), serialized)
            .map_err(ConfigError::WriteError)?;
        Ok(())
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        ron::from_str(&contents).map_err(ConfigError::ParseError)
    }
}
