//! Vertex and index buffers built from [`orrery_mesh::Mesh`] data.

use bytemuck::{Pod, Zeroable};
use orrery_mesh::Mesh;
use wgpu::util::DeviceExt;

/// Vertex and index buffers for one mesh, ready to draw.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl MeshBuffer {
    pub fn bind<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass) {
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

pub struct BufferAllocator<'a> {
    device: &'a wgpu::Device,
}

impl<'a> BufferAllocator<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }

    pub fn create_mesh(&self, label: &str, mesh: &Mesh) -> MeshBuffer {
        let vertices = interleave(mesh);
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}-vertices")),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}-indices")),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }
}

/// Position, normal, and UV, 32 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable, PartialEq)]
pub struct VertexPositionNormalUv {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(VertexPositionNormalUv, [u8; 32]);

impl VertexPositionNormalUv {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        use wgpu::{VertexAttribute, VertexFormat};

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<VertexPositionNormalUv>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: VertexFormat::Float32x3,
                },
                VertexAttribute {
                    offset: 12,
                    shader_location: 1,
                    format: VertexFormat::Float32x3,
                },
                VertexAttribute {
                    offset: 24,
                    shader_location: 2,
                    format: VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Packs a mesh's separate attribute arrays into one vertex stream.
pub fn interleave(mesh: &Mesh) -> Vec<VertexPositionNormalUv> {
    mesh.positions
        .iter()
        .zip(&mesh.normals)
        .zip(&mesh.uvs)
        .map(|((p, n), uv)| VertexPositionNormalUv {
            position: p.to_array(),
            normal: n.to_array(),
            uv: *uv,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::tests::create_test_device;
    use orrery_mesh::Shape;

    #[test]
    fn test_layout_stride() {
        let layout = VertexPositionNormalUv::layout();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.attributes.len(), 3);
    }

    #[test]
    fn test_interleave_keeps_vertex_order() {
        let mesh = Shape::sphere(2.0, 6).generate();
        let vertices = interleave(&mesh);
        assert_eq!(vertices.len(), mesh.vertex_count());
        assert_eq!(vertices[7].position, mesh.positions[7].to_array());
        assert_eq!(vertices[7].normal, mesh.normals[7].to_array());
        assert_eq!(vertices[7].uv, mesh.uvs[7]);
    }

    #[test]
    fn test_mesh_buffer_index_count() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let mesh = Shape::ring(1.0, 2.0, 16).generate();
        let buffer = BufferAllocator::new(&device).create_mesh("ring", &mesh);
        assert_eq!(buffer.index_count as usize, mesh.indices.len());
    }
}
