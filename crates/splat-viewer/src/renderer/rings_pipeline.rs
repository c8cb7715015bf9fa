//! Ring post-process pipeline
//!
//! Owns the offscreen color target the splat pass renders into in rings
//! mode, plus the full-screen pass that hollows the result out. The whole
//! uniform set is written as one struct every ring frame; partially updated
//! uniforms would silently reuse stale GPU-side values.

use wgpu::util::DeviceExt;

use splat_core::SplatRenderConfig;

use super::gpu_context::GpuContext;
use crate::shaders;

/// Post-process uniforms, one write per ring frame.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RingUniform {
    pub render_mode: i32,
    pub ring_size: f32,
    pub selection_alpha: f32,
    pub show_overlay: u32,
    pub selected_color: [f32; 4],
    pub unselected_color: [f32; 4],
    pub locked_color: [f32; 4],
    pub screen_size: [f32; 2],
    pub _pad: [f32; 2],
}

impl RingUniform {
    pub fn from_config(config: &SplatRenderConfig, width: u32, height: u32) -> Self {
        Self {
            render_mode: config.mode().shader_index(),
            ring_size: config.ring_size(),
            selection_alpha: config.selection_alpha(),
            show_overlay: config.show_overlay() as u32,
            selected_color: config.selected_color(),
            unselected_color: config.unselected_color(),
            locked_color: config.locked_color(),
            screen_size: [width as f32, height as f32],
            _pad: [0.0; 2],
        }
    }
}

pub struct RingsPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    #[allow(dead_code)]
    offscreen_texture: wgpu::Texture,
    pub offscreen_view: wgpu::TextureView,
}

impl RingsPipeline {
    pub fn new(ctx: &GpuContext) -> Self {
        let uniform = RingUniform::from_config(
            &SplatRenderConfig::default(),
            ctx.width(),
            ctx.height(),
        );
        let uniform_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ring Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Ring Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Ring Bind Group Layout"),
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
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                ],
            });

        let (offscreen_texture, offscreen_view) =
            create_offscreen_target(ctx, ctx.width(), ctx.height());

        let bind_group = create_bind_group(
            ctx,
            &bind_group_layout,
            &offscreen_view,
            &sampler,
            &uniform_buffer,
        );

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Ring Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::RINGS_SHADER.into()),
        });

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Ring Pipeline Layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Ring Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
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
                topology: wgpu::PrimitiveTopology::TriangleList,
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
            bind_group_layout,
            sampler,
            offscreen_texture,
            offscreen_view,
        }
    }

    /// Recreate the offscreen target to match the new surface size.
    pub fn resize(&mut self, ctx: &GpuContext, width: u32, height: u32) {
        let (texture, view) = create_offscreen_target(ctx, width, height);
        self.offscreen_texture = texture;
        self.offscreen_view = view;
        self.bind_group = create_bind_group(
            ctx,
            &self.bind_group_layout,
            &self.offscreen_view,
            &self.sampler,
            &self.uniform_buffer,
        );
    }

    /// Write the full uniform set for this frame.
    pub fn write_uniform(&self, queue: &wgpu::Queue, uniform: &RingUniform) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniform));
    }
}

fn create_offscreen_target(
    ctx: &GpuContext,
    width: u32,
    height: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Ring Offscreen Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: ctx.config.format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

fn create_bind_group(
    ctx: &GpuContext,
    layout: &wgpu::BindGroupLayout,
    offscreen_view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
    uniform_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Ring Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(offscreen_view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: uniform_buffer.as_entire_binding(),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use splat_core::RenderMode;

    #[test]
    fn test_uniform_carries_whole_config() {
        let mut config = SplatRenderConfig::default();
        config.set_mode(RenderMode::Rings);
        config.set_ring_size(0.3);
        config.set_selection_alpha(0.5);
        config.set_show_overlay(false);

        let uniform = RingUniform::from_config(&config, 800, 600);
        assert_eq!(uniform.render_mode, 1);
        assert_eq!(uniform.ring_size, 0.3);
        assert_eq!(uniform.selection_alpha, 0.5);
        assert_eq!(uniform.show_overlay, 0);
        assert_eq!(uniform.selected_color, config.selected_color());
        assert_eq!(uniform.unselected_color, config.unselected_color());
        assert_eq!(uniform.locked_color, config.locked_color());
        assert_eq!(uniform.screen_size, [800.0, 600.0]);
    }

    #[test]
    fn test_uniform_size_and_alignment() {
        // vec4 fields must land on 16-byte boundaries for WGSL.
        assert_eq!(std::mem::size_of::<RingUniform>(), 80);
        assert_eq!(std::mem::offset_of!(RingUniform, selected_color), 16);
        assert_eq!(std::mem::offset_of!(RingUniform, screen_size), 64);
    }
}
