//! Keyboard and mouse state, key commands, and the orbiting camera control.

pub mod commands;
pub mod keyboard;
pub mod mouse;
pub mod orbit_control;

pub use commands::{Command, command_for};
pub use keyboard::{KeyboardState, RawKeyEvent};
pub use mouse::MouseState;
pub use orbit_control::{OrbitControl, OrbitLimits};
