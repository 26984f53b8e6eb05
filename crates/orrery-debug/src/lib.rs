//! HTTP debug API for a running orrery.
//!
//! A background server exposes frame metrics, the current body poses, and a
//! small command channel. The frame loop publishes into a shared
//! [`DebugState`] and drains queued commands from it; the server never sees
//! the solar system itself. Only compiled in debug builds.

#[cfg(debug_assertions)]
pub mod server;

#[cfg(debug_assertions)]
pub use server::{DebugServer, DebugServerError};


use serde::{Deserialize, Serialize};

pub const DEFAULT_DEBUG_PORT: u16 = 9999;
pub const DEBUG_PORT_ENV: &str = "ORRERY_DEBUG_PORT";

/// Commands accepted by `POST /command`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugCommand {
    Quit,
    Reset,
    Pause,
    Resume,
}

impl DebugCommand {
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "quit" => Some(Self::Quit),
            "reset" => Some(Self::Reset),
            "pause" => Some(Self::Pause),
            "resume" => Some(Self::Resume),
            _ => None,
        }
    }
}

/// Pose of one body as served by `GET /bodies`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodySnapshot {
    pub name: String,
    pub position: [f64; 3],
    /// Accumulated spin, radians in `[0, 2π)`.
    pub spin_angle: f64,
    pub revolution_angle: f64,
}

/// Shared between the frame loop and the debug server.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DebugState {
    pub frame_count: u64,
    /// Animation frames applied since start or the last reset.
    pub frames_advanced: u64,
    pub frame_time_ms: f64,
    pub fps: f64,
    pub window_width: u32,
    pub window_height: u32,
    pub uptime_seconds: f64,
    pub paused: bool,
    #[serde(skip)]
    pub bodies: Vec<BodySnapshot>,
    #[serde(skip)]
    pending: Vec<DebugCommand>,
}

impl DebugState {
    pub fn push_command(&mut self, command: DebugCommand) {
        self.pending.push(command);
    }

    /// Commands in arrival order; the queue is left empty.
    pub fn take_commands(&mut self) -> Vec<DebugCommand> {
        std::mem::take(&mut self.pending)
    }
}

/// `Some` in debug builds, `None` in release builds.
#[cfg(debug_assertions)]
#[must_use]
pub fn create_debug_server(port: u16) -> Option<DebugServer> {
    Some(DebugServer::new(port))
}

/// Reads [`DEBUG_PORT_ENV`], falling back to [`DEFAULT_DEBUG_PORT`].
#[must_use]
pub fn get_debug_port() -> u16 {
    parse_port(std::env::var(DEBUG_PORT_ENV).ok().as_deref())
}

fn parse_port(value: Option<&str>) -> u16 {
    value
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(DEFAULT_DEBUG_PORT)
}
