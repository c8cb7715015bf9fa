//! Camera frustum pipeline
//!
//! Wireframe pyramids for the dataset camera poses. The pass uses the
//! accumulated scene transform as its model matrix so the frustums follow
//! gizmo edits along with the splats.

use wgpu::util::DeviceExt;

use glam::{Mat4, Vec3};
use splat_renderer::GizmoVertex;

use super::gizmo_pipeline::GizmoUniform;
use super::gpu_context::GpuContext;
use crate::shaders;

const FRUSTUM_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 0.6];

/// Wireframe line list for one camera pose. `pose` is camera-to-world with
/// the camera looking down its local -Z.
pub fn create_frustum_lines(pose: Mat4, scale: f32) -> Vec<GizmoVertex> {
    let apex = Vec3::ZERO;
    let corners = [
        Vec3::new(-0.4, 0.3, -1.0),
        Vec3::new(0.4, 0.3, -1.0),
        Vec3::new(0.4, -0.3, -1.0),
        Vec3::new(-0.4, -0.3, -1.0),
    ];

    let transform = |p: Vec3| pose.transform_point3(p * scale);

    let mut vertices = Vec::with_capacity(16);
    for corner in corners {
        vertices.push(GizmoVertex::new(transform(apex), FRUSTUM_COLOR));
        vertices.push(GizmoVertex::new(transform(corner), FRUSTUM_COLOR));
    }
    for i in 0..4 {
        vertices.push(GizmoVertex::new(transform(corners[i]), FRUSTUM_COLOR));
        vertices.push(GizmoVertex::new(transform(corners[(i + 1) % 4]), FRUSTUM_COLOR));
    }
    vertices
}

pub struct FrustumPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl FrustumPipeline {
    pub fn new(ctx: &GpuContext) -> Self {
        let uniform = GizmoUniform::identity();
        let uniform_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frustum Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Frustum Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frustum Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Frustum Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::GIZMO_SHADER.into()),
        });

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Frustum Pipeline Layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Frustum Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[GizmoVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            uniform_buffer,
            bind_group,
        }
    }
}
