//! Runtime settings for the orrery, persisted as `config.ron`.
//!
//! Every section defaults independently, so a partial or older file still
//! loads. Command-line flags override whatever was read from disk.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AnimationConfig, AssetConfig, CameraConfig, Config, ControlsConfig, DebugConfig, RenderConfig,
    ScaleConfig, Timestep, WindowConfig, CONFIG_FILE,
};
pub use error::ConfigError;
