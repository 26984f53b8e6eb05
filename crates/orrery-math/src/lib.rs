//! Rigid transforms and angle helpers shared by the animator and the scene graph.

mod angle;
mod transform;

pub use angle::{angle_distance, wrap_angle};
pub use transform::{Transform, rotate_about_pivot};
