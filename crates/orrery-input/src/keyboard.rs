//! Frame-coherent keyboard state.
//!
//! Events are accumulated during a frame; queries answer whether a key is held,
//! went down this frame, or came up this frame. Keys are physical scan codes so
//! bindings do not move with the keyboard layout.

use std::collections::HashMap;

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::PhysicalKey;

#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    pub key: PhysicalKey,
    pub state: ElementState,
    pub repeat: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct KeyFrame {
    held: bool,
    went_down: bool,
    went_up: bool,
}

/// Per-frame keyboard tracker. Call [`end_frame`](Self::end_frame) once
/// the frame's input has been consumed.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    keys: HashMap<PhysicalKey, KeyFrame>,
    /// Keys that went down this frame, in arrival order.
    pressed_order: Vec<PhysicalKey>,
}

impl KeyboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_event(&mut self, event: &KeyEvent) {
        self.process_raw(RawKeyEvent {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        });
    }

    /// Applies one event. Auto-repeat is ignored.
    pub fn process_raw(&mut self, event: RawKeyEvent) {
        if event.repeat {
            return;
        }
        let frame = self.keys.entry(event.key).or_default();
        match event.state {
            ElementState::Pressed => {
                tracing::debug!(key = ?event.key, "key pressed");
                if !frame.went_down {
                    self.pressed_order.push(event.key);
                }
                frame.held = true;
                frame.went_down = true;
            }
            ElementState::Released => {
                frame.held = false;
                frame.went_up = true;
            }
        }
    }

    #[must_use]
    pub fn is_pressed(&self, key: PhysicalKey) -> bool {
        self.keys.get(&key).is_some_and(|f| f.held)
    }

    #[must_use]
    pub fn just_pressed(&self, key: PhysicalKey) -> bool {
        self.keys.get(&key).is_some_and(|f| f.went_down)
    }

    #[must_use]
    pub fn just_released(&self, key: PhysicalKey) -> bool {
        self.keys.get(&key).is_some_and(|f| f.went_up)
    }

    /// Keys that went down this frame, in the order they were pressed.
    pub fn pressed_this_frame(&self) -> impl Iterator<Item = PhysicalKey> + '_ {
        self.pressed_order.iter().copied()
    }

    /// Drops the per-frame edges and forgets keys that are no longer held.
    pub fn end_frame(&mut self) {
        self.pressed_order.clear();
        self.keys.retain(|_, f| {
            f.went_down = false;
            f.went_up = false;
            f.held
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    fn raw(code: KeyCode, state: ElementState, repeat: bool) -> RawKeyEvent {
        RawKeyEvent {
            key: PhysicalKey::Code(code),
            state,
            repeat,
        }
    }

    fn key(code: KeyCode) -> PhysicalKey {
        PhysicalKey::Code(code)
    }

    #[test]
    fn test_nothing_pressed_initially() {
        let kb = KeyboardState::new();
        for code in [KeyCode::Space, KeyCode::KeyR, KeyCode::Escape] {
            assert!(!kb.is_pressed(key(code)));
            assert!(!kb.just_pressed(key(code)));
            assert!(!kb.just_released(key(code)));
        }
    }

    #[test]
    fn test_press_then_release() {
        let mut kb = KeyboardState::new();
        kb.process_raw(raw(KeyCode::Space, ElementState::Pressed, false));
        assert!(kb.is_pressed(key(KeyCode::Space)));
        assert!(kb.just_pressed(key(KeyCode::Space)));

        kb.process_raw(raw(KeyCode::Space, ElementState::Released, false));
        assert!(!kb.is_pressed(key(KeyCode::Space)));
        assert!(kb.just_released(key(KeyCode::Space)));
    }

    #[test]
    fn test_edges_last_one_frame() {
        let mut kb = KeyboardState::new();
        kb.process_raw(raw(KeyCode::KeyR, ElementState::Pressed, false));
        kb.end_frame();
        assert!(!kb.just_pressed(key(KeyCode::KeyR)));
        assert!(kb.is_pressed(key(KeyCode::KeyR)));

        kb.process_raw(raw(KeyCode::KeyR, ElementState::Released, false));
        kb.end_frame();
        assert!(!kb.just_released(key(KeyCode::KeyR)));
        assert!(!kb.is_pressed(key(KeyCode::KeyR)));
    }

    #[test]
    fn test_repeat_ignored() {
        let mut kb = KeyboardState::new();
        kb.process_raw(raw(KeyCode::KeyA, ElementState::Pressed, false));
        kb.end_frame();
        kb.process_raw(raw(KeyCode::KeyA, ElementState::Pressed, true));
        assert!(!kb.just_pressed(key(KeyCode::KeyA)));
        assert!(kb.is_pressed(key(KeyCode::KeyA)));
    }

    #[test]
    fn test_pressed_this_frame() {
        let mut kb = KeyboardState::new();
        kb.process_raw(raw(KeyCode::KeyR, ElementState::Pressed, false));
        kb.process_raw(raw(KeyCode::Space, ElementState::Pressed, false));
        let pressed: Vec<_> = kb.pressed_this_frame().collect();
        assert_eq!(pressed, vec![key(KeyCode::KeyR), key(KeyCode::Space)]);
        kb.end_frame();
        assert_eq!(kb.pressed_this_frame().count(), 0);
    }
}
