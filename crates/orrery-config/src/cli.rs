//! Command-line flags.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, Timestep};

/// Animated solar system viewer.
///
/// Flags override values loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orrery", about = "Animated solar system viewer")]
pub struct CliArgs {
    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub height: Option<u32>,

    /// Radians Earth spins per animation frame.
    #[arg(long)]
    pub earth_day: Option<f64>,

    /// Advance the animation at a fixed rate (frames per second) instead of
    /// once per redraw.
    #[arg(long, value_name = "HZ")]
    pub fixed_rate: Option<f64>,

    /// Directory holding the body textures.
    #[arg(long)]
    pub texture_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Config directory (overrides the platform default).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(day) = args.earth_day {
            self.animation.earth_day = day;
        }
        if let Some(hz) = args.fixed_rate {
            self.animation.timestep = Timestep::Fixed { hz };
        }
        if let Some(ref dir) = args.texture_dir {
            self.assets.texture_dir = dir.clone();
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
