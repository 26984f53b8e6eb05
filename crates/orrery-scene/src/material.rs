//! Surface descriptions and the mesh-creation seam towards the renderer.

use std::path::PathBuf;

use orrery_mesh::Shape;

/// Lighting model for a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MaterialKind {
    /// Unlit; shows the texture at full brightness. Used for the Sun.
    Basic,
    /// Diffuse plus specular from the scene's point lights, plus ambient.
    #[default]
    Phong,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    /// Image to sample. `None` renders `color` flat.
    pub texture: Option<PathBuf>,
    /// Linear RGB tint, also the fallback when the texture cannot be read.
    pub color: [f32; 3],
    /// Blend with what is behind and draw both faces.
    pub transparent: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            kind: MaterialKind::Phong,
            texture: None,
            color: [0.8, 0.8, 0.8],
            transparent: false,
        }
    }
}

/// Opaque reference to a mesh owned by a [`MeshFactory`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

/// Creates GPU-side meshes from shapes and materials.
///
/// The scene only stores the returned handles; it never reads rendering state
/// back.
pub trait MeshFactory {
    type Error: std::error::Error + 'static;

    fn create_mesh(&mut self, shape: &Shape, material: &Material)
    -> Result<MeshHandle, Self::Error>;
}
