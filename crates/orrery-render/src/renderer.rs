//! Draws a [`Scene`] through the body pipelines.

use std::path::{Path, PathBuf};

use orrery_mesh::Shape;
use orrery_scene::{Material, MeshFactory, MeshHandle, Scene};
use rustc_hash::FxHashMap;
use wgpu::util::DeviceExt;

use crate::buffer::{BufferAllocator, MeshBuffer};
use crate::camera::Camera;
use crate::depth::DepthBuffer;
use crate::gpu::{RenderContext, SurfaceError};
use crate::pipeline::{FrameUniform, MaterialUniform, ObjectUniform, SolarPipeline};
use crate::texture::{GpuTexture, create_sampler, load_rgba};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error("invalid shape: {0}")]
    InvalidShape(String),
}

struct GpuMesh {
    buffer: MeshBuffer,
    material_bind_group: wgpu::BindGroup,
    transparent: bool,
}

struct ObjectSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct Draw {
    node: usize,
    mesh: usize,
    distance: f32,
}

/// Owns every GPU resource the scene needs besides the surface itself.
pub struct Renderer {
    pipeline: SolarPipeline,
    depth: DepthBuffer,
    sampler: wgpu::Sampler,
    white: GpuTexture,
    textures: Vec<GpuTexture>,
    /// `None` marks a path that failed to load; it is not tried again.
    texture_cache: FxHashMap<PathBuf, Option<usize>>,
    meshes: Vec<GpuMesh>,
    objects: Vec<ObjectSlot>,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    clear_color: wgpu::Color,
}

impl Renderer {
    pub fn new(ctx: &RenderContext, clear_color: [f64; 3]) -> Self {
        Self::with_device(
            &ctx.device,
            &ctx.queue,
            ctx.surface_format,
            ctx.size(),
            clear_color,
        )
    }

    fn with_device(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        (width, height): (u32, u32),
        clear_color: [f64; 3],
    ) -> Self {
        let pipeline = SolarPipeline::new(device, format);
        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("solar-frame-uniform"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("solar-frame-bg"),
            layout: &pipeline.frame_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        Self {
            depth: DepthBuffer::new(device, width, height),
            sampler: create_sampler(device),
            white: GpuTexture::white(device, queue),
            textures: Vec::new(),
            texture_cache: FxHashMap::default(),
            meshes: Vec::new(),
            objects: Vec::new(),
            frame_buffer,
            frame_bind_group,
            clear_color: wgpu::Color {
                r: clear_color[0],
                g: clear_color[1],
                b: clear_color[2],
                a: 1.0,
            },
            pipeline,
        }
    }

    /// A [`MeshFactory`] that uploads into this renderer.
    pub fn uploader<'a>(&'a mut self, ctx: &'a RenderContext) -> MeshUploader<'a> {
        MeshUploader {
            renderer: self,
            device: &ctx.device,
            queue: &ctx.queue,
        }
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Recreates the depth buffer. The surface is resized by [`RenderContext::resize`].
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth.resize(device, width, height);
    }

    /// Draws one frame and presents it.
    pub fn render(
        &mut self,
        ctx: &RenderContext,
        scene: &Scene,
        camera: &Camera,
    ) -> Result<(), RenderError> {
        let frame = ctx.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.ensure_object_slots(&ctx.device, scene.len());

        let light = scene
            .point_lights()
            .first()
            .map(|l| (scene.light_position(l), l.color * l.intensity));
        let frame_uniform = FrameUniform::new(
            camera.view_projection_matrix(),
            camera.position,
            light,
            scene.ambient.radiance(),
        );
        ctx.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::cast_slice(&[frame_uniform]));

        let mut opaque = Vec::new();
        let mut transparent = Vec::new();
        scene.traverse(|id, node, world| {
            let Some(MeshHandle(mesh)) = node.mesh else {
                return;
            };
            let mesh = mesh as usize;
            let Some(gpu_mesh) = self.meshes.get(mesh) else {
                log::debug!("node '{}' references unknown mesh {mesh}", node.name);
                return;
            };
            let model = world.to_matrix().as_mat4();
            let node_index = id.index();
            ctx.queue.write_buffer(
                &self.objects[node_index].buffer,
                0,
                bytemuck::cast_slice(&[ObjectUniform::new(model)]),
            );
            let draw = Draw {
                node: node_index,
                mesh,
                distance: world.position.as_vec3().distance(camera.position),
            };
            if gpu_mesh.transparent {
                transparent.push(draw);
            } else {
                opaque.push(draw);
            }
        });
        sort_back_to_front(&mut transparent);

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("solar-frame-encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("solar-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(DepthBuffer::CLEAR_VALUE),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            pass.set_bind_group(0, &self.frame_bind_group, &[]);

            pass.set_pipeline(&self.pipeline.opaque);
            for draw in &opaque {
                self.draw(&mut pass, draw);
            }
            pass.set_pipeline(&self.pipeline.transparent);
            for draw in &transparent {
                self.draw(&mut pass, draw);
            }
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>, draw: &Draw) {
        let mesh = &self.meshes[draw.mesh];
        pass.set_bind_group(1, &mesh.material_bind_group, &[]);
        pass.set_bind_group(2, &self.objects[draw.node].bind_group, &[]);
        mesh.buffer.bind(pass);
        mesh.buffer.draw(pass);
    }

    fn ensure_object_slots(&mut self, device: &wgpu::Device, count: usize) {
        while self.objects.len() < count {
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("solar-object-uniform"),
                size: std::mem::size_of::<ObjectUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("solar-object-bg"),
                layout: &self.pipeline.object_bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            self.objects.push(ObjectSlot { buffer, bind_group });
        }
    }

    /// Loads a texture once per path. Failures are logged and remembered.
    fn texture_index(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
    ) -> Option<usize> {
        if let Some(&cached) = self.texture_cache.get(path) {
            return cached;
        }
        let index = match load_rgba(path) {
            Ok(image) => {
                let label = path.to_string_lossy();
                self.textures
                    .push(GpuTexture::from_image(device, queue, &image, &label));
                log::debug!(
                    "loaded texture {} ({}x{})",
                    path.display(),
                    image.width(),
                    image.height()
                );
                Some(self.textures.len() - 1)
            }
            Err(err) => {
                log::warn!("{err}; using flat colour");
                None
            }
        };
        self.texture_cache.insert(path.to_path_buf(), index);
        index
    }
}

fn sort_back_to_front(draws: &mut [Draw]) {
    draws.sort_by(|a, b| b.distance.total_cmp(&a.distance));
}

fn validate_shape(shape: &Shape) -> Result<(), RenderError> {
    match *shape {
        Shape::Sphere { radius, .. } if !(radius.is_finite() && radius > 0.0) => Err(
            RenderError::InvalidShape(format!("sphere radius {radius} must be positive")),
        ),
        Shape::Ring {
            inner_radius,
            outer_radius,
            ..
        } if !(inner_radius >= 0.0 && outer_radius > inner_radius && outer_radius.is_finite()) => {
            Err(RenderError::InvalidShape(format!(
                "ring radii {inner_radius}..{outer_radius} are not an annulus"
            )))
        }
        _ => Ok(()),
    }
}

/// Borrow of a [`Renderer`] plus the device it uploads to.
pub struct MeshUploader<'a> {
    renderer: &'a mut Renderer,
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
}

impl MeshFactory for MeshUploader<'_> {
    type Error = RenderError;

    fn create_mesh(
        &mut self,
        shape: &Shape,
        material: &Material,
    ) -> Result<MeshHandle, RenderError> {
        validate_shape(shape)?;
        let renderer = &mut *self.renderer;
        let handle = MeshHandle(renderer.meshes.len() as u32);
        let label = format!("mesh-{}", handle.0);

        let mesh = shape.generate();
        let buffer = BufferAllocator::new(self.device).create_mesh(&label, &mesh);

        let texture = material
            .texture
            .as_deref()
            .and_then(|path| renderer.texture_index(self.device, self.queue, path));
        let uniform = MaterialUniform::new(material, texture.is_some());
        let material_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}-material")),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM,
            });
        let view = match texture {
            Some(i) => &renderer.textures[i].view,
            None => &renderer.white.view,
        };
        let material_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label}-material-bg")),
            layout: &renderer.pipeline.material_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&renderer.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: material_buffer.as_entire_binding(),
                },
            ],
        });

        renderer.meshes.push(GpuMesh {
            buffer,
            material_bind_group,
            transparent: material.transparent || shape.is_double_sided(),
        });
        Ok(handle)
    }
}
