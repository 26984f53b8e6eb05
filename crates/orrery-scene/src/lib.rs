//! Renderer-agnostic scene graph and the glue that mirrors a
//! [`SolarSystem`](orrery_orbit::SolarSystem) into it.

pub mod appearance;
pub mod binding;
pub mod error;
pub mod graph;
pub mod light;
pub mod material;

pub use appearance::{Appearance, appearance_for};
pub use binding::{BindError, SceneBinding, SceneOptions};
pub use error::SceneError;
pub use graph::{Node, NodeId, Scene};
pub use light::{AmbientLight, PointLight};
pub use material::{Material, MaterialKind, MeshFactory, MeshHandle};
pub use orrery_mesh::Shape;
