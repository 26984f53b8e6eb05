//! wgpu renderer for the orrery scene: device and surface management, a
//! perspective camera, textured sphere and ring meshes, and per-frame drawing.

pub mod buffer;
pub mod camera;
pub mod depth;
pub mod gpu;
pub mod pipeline;
pub mod renderer;
pub mod texture;

pub use buffer::{BufferAllocator, MeshBuffer, VertexPositionNormalUv};
pub use camera::Camera;
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use pipeline::{FrameUniform, MaterialUniform, ObjectUniform, SolarPipeline};
pub use renderer::{RenderError, Renderer};
pub use texture::{GpuTexture, TextureError, load_rgba};
