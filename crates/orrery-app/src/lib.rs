//! Orrery application: window, frame loop, and wiring between the animated
//! system, the scene, and the renderer.

pub mod frame_clock;
pub mod platform;
pub mod setup;
pub mod window;

pub use window::{AppError, Viewer, run};
