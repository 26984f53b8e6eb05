//! Fixed key bindings for the viewer.

use winit::keyboard::{KeyCode, PhysicalKey};

use crate::keyboard::KeyboardState;

/// Viewer-level actions bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Stops or restarts the animation; rendering and camera control continue.
    TogglePause,
    /// Returns every body to its starting transform.
    Reset,
    /// Closes the window.
    Quit,
}

#[must_use]
pub fn command_for(key: PhysicalKey) -> Option<Command> {
    match key {
        PhysicalKey::Code(KeyCode::Space) => Some(Command::TogglePause),
        PhysicalKey::Code(KeyCode::KeyR) => Some(Command::Reset),
        PhysicalKey::Code(KeyCode::Escape) => Some(Command::Quit),
        _ => None,
    }
}

impl KeyboardState {
    /// Commands triggered by keys that went down this frame, in press order.
    pub fn commands(&self) -> impl Iterator<Item = Command> + '_ {
        self.pressed_this_frame().filter_map(command_for)
    }
}
