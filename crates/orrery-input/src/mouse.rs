//! Frame-coherent mouse state: cursor position, per-frame motion, buttons,
//! and wheel.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Roughly one wheel notch worth of pixels on touchpads.
const PIXELS_PER_LINE: f64 = 40.0;

#[derive(Debug, Clone, Copy, Default)]
struct ButtonFrame {
    pressed: bool,
    just_pressed: bool,
    just_released: bool,
}

fn button_index(button: MouseButton) -> Option<usize> {
    match button {
        MouseButton::Left => Some(0),
        MouseButton::Right => Some(1),
        MouseButton::Middle => Some(2),
        _ => None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct MouseState {
    position: Vec2,
    delta: Vec2,
    /// First move after entering the window has no previous position.
    has_position: bool,
    buttons: [ButtonFrame; 3],
    scroll: f32,
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let new_pos = Vec2::new(x as f32, y as f32);
        if self.has_position {
            self.delta += new_pos - self.position;
        }
        self.position = new_pos;
        self.has_position = true;
    }

    pub fn on_cursor_left(&mut self) {
        self.has_position = false;
    }

    /// Back and forward buttons are ignored.
    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        let Some(idx) = button_index(button) else {
            return;
        };
        let b = &mut self.buttons[idx];
        match state {
            ElementState::Pressed => {
                b.pressed = true;
                b.just_pressed = true;
            }
            ElementState::Released => {
                b.pressed = false;
                b.just_released = true;
            }
        }
    }

    /// Positive is away from the user (zoom in).
    pub fn on_scroll(&mut self, delta: MouseScrollDelta) {
        self.scroll += match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
        };
    }

    /// Resets the per-frame delta, scroll, and button edges.
    pub fn clear_transients(&mut self) {
        self.delta = Vec2::ZERO;
        self.scroll = 0.0;
        for b in &mut self.buttons {
            b.just_pressed = false;
            b.just_released = false;
        }
    }

    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    #[must_use]
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        button_index(button).is_some_and(|i| self.buttons[i].pressed)
    }

    #[must_use]
    pub fn just_button_pressed(&self, button: MouseButton) -> bool {
        button_index(button).is_some_and(|i| self.buttons[i].just_pressed)
    }

    #[must_use]
    pub fn just_button_released(&self, button: MouseButton) -> bool {
        button_index(button).is_some_and(|i| self.buttons[i].just_released)
    }

    #[must_use]
    pub fn scroll(&self) -> f32 {
        self.scroll
    }
}
