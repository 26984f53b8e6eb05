//! Render pipelines and GPU uniform layouts for the body shader.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use orrery_scene::{Material, MaterialKind};

use crate::buffer::VertexPositionNormalUv;
use crate::depth::DepthBuffer;

pub const SOLAR_SHADER_SOURCE: &str = include_str!("solar.wgsl");

/// Per-frame data at `@group(0)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    /// xyz = world position, w = 1 if the light is active.
    pub light_pos: [f32; 4],
    /// rgb premultiplied by intensity.
    pub light_color: [f32; 4],
    pub ambient: [f32; 4],
}

static_assertions::assert_eq_size!(FrameUniform, [u8; 128]);

/// Per-material data at `@group(1) @binding(2)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable, PartialEq)]
pub struct MaterialUniform {
    pub color: [f32; 4],
    /// x = lit, y = alpha from texture green channel, z = shininess.
    pub params: [f32; 4],
}

static_assertions::assert_eq_size!(MaterialUniform, [u8; 32]);

const SHININESS: f32 = 16.0;

impl MaterialUniform {
    /// `textured` is whether an image was actually loaded; without one the
    /// material colour is shown flat.
    pub fn new(material: &Material, textured: bool) -> Self {
        let tint = if textured {
            [1.0, 1.0, 1.0]
        } else {
            material.color
        };
        let lit = match material.kind {
            MaterialKind::Basic => 0.0,
            MaterialKind::Phong => 1.0,
        };
        let alpha_from_texture = if material.transparent && textured { 1.0 } else { 0.0 };
        Self {
            color: [tint[0], tint[1], tint[2], 1.0],
            params: [lit, alpha_from_texture, SHININESS, 0.0],
        }
    }
}

/// Per-node data at `@group(2)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
}

static_assertions::assert_eq_size!(ObjectUniform, [u8; 64]);

impl ObjectUniform {
    pub fn new(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
        }
    }
}

impl FrameUniform {
    pub fn new(
        view_proj: Mat4,
        camera_pos: Vec3,
        light: Option<(Vec3, Vec3)>,
        ambient: Vec3,
    ) -> Self {
        let (light_pos, light_color) = match light {
            Some((pos, color)) => (pos.extend(1.0), color.extend(1.0)),
            None => (Vec3::ZERO.extend(0.0), Vec3::ZERO.extend(0.0)),
        };
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: camera_pos.extend(1.0).to_array(),
            light_pos: light_pos.to_array(),
            light_color: light_color.to_array(),
            ambient: ambient.extend(1.0).to_array(),
        }
    }
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages, size: usize) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: NonZeroU64::new(size as u64),
        },
        count: None,
    }
}

/// Opaque and blended variants of the body pipeline, sharing bind group
/// layouts.
pub struct SolarPipeline {
    pub opaque: wgpu::RenderPipeline,
    /// Alpha-blended, double-sided, no depth writes. Used for rings.
    pub transparent: wgpu::RenderPipeline,
    pub frame_bind_group_layout: wgpu::BindGroupLayout,
    pub material_bind_group_layout: wgpu::BindGroupLayout,
    pub object_bind_group_layout: wgpu::BindGroupLayout,
}

impl SolarPipeline {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("solar-shader"),
            source: wgpu::ShaderSource::Wgsl(SOLAR_SHADER_SOURCE.into()),
        });

        let frame_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("solar-frame-bgl"),
                entries: &[uniform_entry(
                    0,
                    wgpu::ShaderStages::VERTEX_FRAGMENT,
                    std::mem::size_of::<FrameUniform>(),
                )],
            });

        let material_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("solar-material-bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                    uniform_entry(
                        2,
                        wgpu::ShaderStages::FRAGMENT,
                        std::mem::size_of::<MaterialUniform>(),
                    ),
                ],
            });

        let object_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("solar-object-bgl"),
                entries: &[uniform_entry(
                    0,
                    wgpu::ShaderStages::VERTEX,
                    std::mem::size_of::<ObjectUniform>(),
                )],
            });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("solar-pipeline-layout"),
            bind_group_layouts: &[
                &frame_bind_group_layout,
                &material_bind_group_layout,
                &object_bind_group_layout,
            ],
            immediate_size: 0,
        });

        let opaque = create_variant(
            device,
            &layout,
            &shader,
            surface_format,
            Variant::Opaque,
        );
        let transparent = create_variant(
            device,
            &layout,
            &shader,
            surface_format,
            Variant::Transparent,
        );

        Self {
            opaque,
            transparent,
            frame_bind_group_layout,
            material_bind_group_layout,
            object_bind_group_layout,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Variant {
    Opaque,
    Transparent,
}

fn create_variant(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
    variant: Variant,
) -> wgpu::RenderPipeline {
    let transparent = variant == Variant::Transparent;
    let blend = transparent.then_some(wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent::OVER,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(if transparent {
            "solar-transparent-pipeline"
        } else {
            "solar-opaque-pipeline"
        }),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[VertexPositionNormalUv::layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: if transparent { None } else { Some(wgpu::Face::Back) },
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DepthBuffer::FORMAT,
            depth_write_enabled: !transparent,
            depth_compare: DepthBuffer::COMPARE_FUNCTION,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview_mask: None,
        cache: None,
    })
}
