//! Ground grid pipeline
//!
//! XZ plane line grid with a distance fade in the fragment shader. The line
//! list is built once; the shader handles the rest.

use wgpu::util::DeviceExt;

use glam::Vec3;
use splat_renderer::GizmoVertex;

use super::gizmo_pipeline::GizmoUniform;
use super::gpu_context::GpuContext;
use crate::shaders;

const GRID_HALF_EXTENT: i32 = 20;
const GRID_COLOR: [f32; 4] = [0.35, 0.35, 0.35, 0.6];
const AXIS_X_COLOR: [f32; 4] = [0.7, 0.3, 0.3, 0.8];
const AXIS_Z_COLOR: [f32; 4] = [0.3, 0.3, 0.7, 0.8];

/// Line-list vertices for the ground grid, axis lines tinted.
pub fn create_grid_vertices() -> Vec<GizmoVertex> {
    let mut vertices = Vec::new();
    let extent = GRID_HALF_EXTENT as f32;

    for i in -GRID_HALF_EXTENT..=GRID_HALF_EXTENT {
        let t = i as f32;
        let x_color = if i == 0 { AXIS_Z_COLOR } else { GRID_COLOR };
        let z_color = if i == 0 { AXIS_X_COLOR } else { GRID_COLOR };

        // Line parallel to Z at x = t
        vertices.push(GizmoVertex::new(Vec3::new(t, 0.0, -extent), x_color));
        vertices.push(GizmoVertex::new(Vec3::new(t, 0.0, extent), x_color));

        // Line parallel to X at z = t
        vertices.push(GizmoVertex::new(Vec3::new(-extent, 0.0, t), z_color));
        vertices.push(GizmoVertex::new(Vec3::new(extent, 0.0, t), z_color));
    }

    vertices
}

pub struct GridPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
}

impl GridPipeline {
    pub fn new(ctx: &GpuContext) -> Self {
        let vertices = create_grid_vertices();
        let vertex_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Grid Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniform = GizmoUniform::identity();
        let uniform_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Grid Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Grid Bind Group Layout"),
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
            label: Some("Grid Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Grid Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::GRID_SHADER.into()),
        });

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Grid Pipeline Layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Grid Render Pipeline"),
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
            vertex_buffer,
            vertex_count: vertices.len() as u32,
        }
    }
}
