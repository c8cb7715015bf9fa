//! Renderer
//!
//! GPU-side half of the viewer: one pipeline per concern, orchestrated here
//! in the frame order the coordinator dictates — grid, camera frustums,
//! splats (centers or rings path), active gizmo, view cube.

pub mod frustum_pipeline;
mod gizmo_pipeline;
mod gpu_context;
mod grid_pipeline;
mod rings_pipeline;
pub mod splat_pipeline;

pub use gizmo_pipeline::GizmoUniform;
pub use gpu_context::{GpuContext, RenderError};
pub use rings_pipeline::RingUniform;

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use glam::{Mat4, Vec3};
use splat_core::RenderMode;
use splat_renderer::{GizmoAxis, GizmoVertex, axis_color, create_arrow_vertices};

use crate::scene::SceneRenderer;

use frustum_pipeline::FrustumPipeline;
use gizmo_pipeline::GizmoPipeline;
use grid_pipeline::GridPipeline;
use rings_pipeline::RingsPipeline;
use splat_pipeline::{SplatPipeline, SplatUniform};

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.08,
    g: 0.09,
    b: 0.11,
    a: 1.0,
};
const VIEW_CUBE_SIZE: f32 = 120.0;
const VIEW_CUBE_MARGIN: f32 = 10.0;

pub struct Renderer {
    ctx: GpuContext,
    splats: SplatPipeline,
    rings: RingsPipeline,
    gizmo: GizmoPipeline,
    grid: GridPipeline,
    frustums: FrustumPipeline,
    view_cube_buffer: wgpu::Buffer,
    view_cube_count: u32,
}

impl Renderer {
    pub async fn create(window: Arc<Window>) -> Result<Self, RenderError> {
        let ctx = GpuContext::new(window).await?;

        let splats = SplatPipeline::new(&ctx);
        let rings = RingsPipeline::new(&ctx);
        let gizmo = GizmoPipeline::new(&ctx);
        let grid = GridPipeline::new(&ctx);
        let frustums = FrustumPipeline::new(&ctx);

        let triad = view_cube_triad();
        let view_cube_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("View Cube Vertex Buffer"),
            contents: bytemuck::cast_slice(&triad),
            usage: wgpu::BufferUsages::VERTEX,
        });

        log::info!("Renderer initialized");

        Ok(Self {
            ctx,
            splats,
            rings,
            gizmo,
            grid,
            frustums,
            view_cube_buffer,
            view_cube_count: triad.len() as u32,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.resize(width, height);
            self.rings.resize(&self.ctx, width, height);
            log::debug!("Resized to {}x{}", width, height);
        }
    }

    pub fn width(&self) -> u32 {
        self.ctx.width()
    }

    pub fn height(&self) -> u32 {
        self.ctx.height()
    }

    /// Draw one frame from the coordinator's state.
    pub fn render(&mut self, scene: &SceneRenderer) -> Result<(), RenderError> {
        // CPU-side copies happen first; no lock is held past this point.
        let instances = scene.collect_instances();
        let frustum_vertices = scene.frustum_vertices();
        let gizmo_vertices = scene.gizmo_vertices();

        let output = self.ctx.surface.get_current_texture()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let ring_mode = scene.config().mode() == RenderMode::Rings;
        let view_proj = scene.viewport.view_projection_matrix();
        let scene_transform = scene.scene_transform();

        self.write_frame_uniforms(scene, view_proj, scene_transform);

        let instance_buffer = self.ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Splat Instance Buffer"),
            contents: bytemuck::cast_slice(&instances),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let frustum_buffer = self.ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frustum Vertex Buffer"),
            contents: bytemuck::cast_slice(&frustum_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let gizmo_buffer = self.ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Gizmo Vertex Buffer"),
            contents: bytemuck::cast_slice(&gizmo_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        // Background, grid, frustums, and the centers splat path.
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if scene.show_grid() {
                pass.set_pipeline(&self.grid.pipeline);
                pass.set_bind_group(0, &self.grid.bind_group, &[]);
                pass.set_vertex_buffer(0, self.grid.vertex_buffer.slice(..));
                pass.draw(0..self.grid.vertex_count, 0..1);
            }

            if scene.show_frustums() && !frustum_vertices.is_empty() {
                pass.set_pipeline(&self.frustums.pipeline);
                pass.set_bind_group(0, &self.frustums.bind_group, &[]);
                pass.set_vertex_buffer(0, frustum_buffer.slice(..));
                pass.draw(0..frustum_vertices.len() as u32, 0..1);
            }

            if !ring_mode && !instances.is_empty() {
                pass.set_pipeline(&self.splats.pipeline);
                pass.set_bind_group(0, &self.splats.bind_group, &[]);
                pass.set_vertex_buffer(0, instance_buffer.slice(..));
                pass.draw(0..6, 0..instances.len() as u32);
            }
        }

        if ring_mode {
            // First pass: splats into the offscreen target.
            {
                let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Ring Offscreen Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &self.rings.offscreen_view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                });

                if !instances.is_empty() {
                    pass.set_pipeline(&self.splats.pipeline);
                    pass.set_bind_group(0, &self.splats.bind_group, &[]);
                    pass.set_vertex_buffer(0, instance_buffer.slice(..));
                    pass.draw(0..6, 0..instances.len() as u32);
                }
            }

            // The whole uniform set is rewritten on every ring frame; a
            // partial update would leave stale values on the GPU.
            self.rings.write_uniform(
                &self.ctx.queue,
                &RingUniform::from_config(scene.config(), self.ctx.width(), self.ctx.height()),
            );

            // Second pass: full-screen post-process onto the surface.
            {
                let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Ring Post Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &surface_view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                });

                pass.set_pipeline(&self.rings.pipeline);
                pass.set_bind_group(0, &self.rings.bind_group, &[]);
                pass.draw(0..3, 0..1);
            }
        }

        // Active gizmo, always on top.
        if !gizmo_vertices.is_empty() {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Gizmo Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            pass.set_pipeline(&self.gizmo.pipeline);
            pass.set_bind_group(0, &self.gizmo.bind_group, &[]);
            pass.set_vertex_buffer(0, gizmo_buffer.slice(..));
            pass.draw(0..gizmo_vertices.len() as u32, 0..1);
        }

        // Corner view cube (axis triad) through a scissored viewport.
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("View Cube Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let width = self.ctx.width() as f32;
            pass.set_viewport(
                width - VIEW_CUBE_SIZE - VIEW_CUBE_MARGIN,
                VIEW_CUBE_MARGIN,
                VIEW_CUBE_SIZE,
                VIEW_CUBE_SIZE,
                0.0,
                1.0,
            );
            pass.set_pipeline(&self.gizmo.pipeline);
            pass.set_bind_group(0, &self.gizmo.cube_bind_group, &[]);
            pass.set_vertex_buffer(0, self.view_cube_buffer.slice(..));
            pass.draw(0..self.view_cube_count, 0..1);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn write_frame_uniforms(&self, scene: &SceneRenderer, view_proj: Mat4, scene_transform: Mat4) {
        let view = scene.viewport.view_matrix();
        let camera_right = Vec3::new(view.x_axis.x, view.y_axis.x, view.z_axis.x);
        let camera_up = Vec3::new(view.x_axis.y, view.y_axis.y, view.z_axis.y);

        let splat_uniform = SplatUniform {
            view_proj: view_proj.to_cols_array_2d(),
            model: scene_transform.to_cols_array_2d(),
            camera_right: camera_right.extend(0.0).to_array(),
            camera_up: camera_up.extend(0.0).to_array(),
        };
        self.ctx.queue.write_buffer(
            &self.splats.uniform_buffer,
            0,
            bytemuck::bytes_of(&splat_uniform),
        );

        let grid_uniform = GizmoUniform::new(view_proj, Mat4::IDENTITY);
        self.ctx
            .queue
            .write_buffer(&self.grid.uniform_buffer, 0, bytemuck::bytes_of(&grid_uniform));

        // Frustums follow the accumulated scene transform.
        let frustum_uniform = GizmoUniform::new(view_proj, scene_transform);
        self.ctx.queue.write_buffer(
            &self.frustums.uniform_buffer,
            0,
            bytemuck::bytes_of(&frustum_uniform),
        );

        let gizmo_uniform = GizmoUniform::new(view_proj, scene.active_gizmo_model());
        self.ctx.queue.write_buffer(
            &self.gizmo.uniform_buffer,
            0,
            bytemuck::bytes_of(&gizmo_uniform),
        );

        // Rotation-only view so the cube tracks camera orientation.
        let dir = (scene.viewport.camera_position() - scene.viewport.target).normalize_or_zero();
        let cube_view = Mat4::look_at_rh(dir * 3.0, Vec3::ZERO, Vec3::Y);
        let cube_proj = Mat4::perspective_rh(45.0_f32.to_radians(), 1.0, 0.1, 10.0);
        let cube_uniform = GizmoUniform::new(cube_proj * cube_view, Mat4::IDENTITY);
        self.ctx.queue.write_buffer(
            &self.gizmo.cube_uniform_buffer,
            0,
            bytemuck::bytes_of(&cube_uniform),
        );
    }
}

/// Axis triad rendered in the corner viewport.
fn view_cube_triad() -> Vec<GizmoVertex> {
    let mut vertices = Vec::new();
    for axis in [GizmoAxis::X, GizmoAxis::Y, GizmoAxis::Z] {
        vertices.extend(create_arrow_vertices(axis, axis_color(axis, GizmoAxis::None)));
    }
    vertices
}
