//! CPU-side geometry for the solar-system scene: UV spheres and flat rings.

mod ring;
mod sphere;

pub use ring::generate_ring;
pub use sphere::generate_sphere;

use glam::Vec3;

/// An indexed triangle mesh with per-vertex normals and texture coordinates.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// Texture coordinates, `v = 0` at the top row of the image.
    pub uvs: Vec<[f32; 2]>,
    /// Counter-clockwise triangles seen from the front face.
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A geometry recipe, resolved into a [`Mesh`] by [`Shape::generate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    /// Annulus lying in the XZ plane, facing `+Y`.
    Ring {
        inner_radius: f32,
        outer_radius: f32,
        segments: u32,
    },
}

impl Shape {
    /// A sphere with the same segment count around and across.
    pub fn sphere(radius: f32, segments: u32) -> Self {
        Shape::Sphere {
            radius,
            width_segments: segments,
            height_segments: segments,
        }
    }

    /// A flat annulus in the XZ plane.
    pub fn ring(inner_radius: f32, outer_radius: f32, segments: u32) -> Self {
        Shape::Ring {
            inner_radius,
            outer_radius,
            segments,
        }
    }

    /// Builds the vertex and index data.
    pub fn generate(&self) -> Mesh {
        match *self {
            Shape::Sphere {
                radius,
                width_segments,
                height_segments,
            } => generate_sphere(radius, width_segments, height_segments),
            Shape::Ring {
                inner_radius,
                outer_radius,
                segments,
            } => generate_ring(inner_radius, outer_radius, segments),
        }
    }

    /// Whether the shape is see-through from behind and needs blending.
    pub fn is_double_sided(&self) -> bool {
        matches!(self, Shape::Ring { .. })
    }
}
