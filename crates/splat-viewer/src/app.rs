//! Application shell
//!
//! winit event loop handler: window bootstrap, event routing, redraw
//! orchestration, and frame pacing. Frame-level render errors are logged
//! and the loop proceeds to the next frame.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use splat_core::shared_cloud;
use splat_core::splat::SplatCloud;
use splat_renderer::GizmoMode;

use crate::input::{InputState, KeyAction, key_action};
use crate::renderer::Renderer;
use crate::scene::SceneRenderer;
use crate::settings::ViewerSettings;
use crate::trainer::{Trainer, seed_cloud};

/// Frames between scene-bounds recomputations.
const BOUNDS_REFRESH_INTERVAL: u32 = 30;

/// Target frame interval for the pacing sleep.
fn frame_interval(target_fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / target_fps.max(1) as f64)
}

pub struct ViewerApp {
    settings: ViewerSettings,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    scene: SceneRenderer,
    input: InputState,
    trainer: Trainer,
    last_frame_end: Instant,
    frame_count: u32,
}

impl ViewerApp {
    pub fn new(settings: ViewerSettings) -> Self {
        let cloud = shared_cloud(SplatCloud::with_capacity(settings.max_splats));
        seed_cloud(&cloud, settings.initial_splats);
        let trainer = Trainer::spawn(cloud.clone(), settings.max_splats);

        let scene = SceneRenderer::new(
            cloud,
            settings.window_width as f32,
            settings.window_height as f32,
        );

        Self {
            settings,
            window: None,
            renderer: None,
            scene,
            input: InputState::new(),
            trainer,
            last_frame_end: Instant::now(),
            frame_count: 0,
        }
    }

    fn redraw(&mut self) {
        self.frame_count = self.frame_count.wrapping_add(1);
        if self.frame_count % BOUNDS_REFRESH_INTERVAL == 1 {
            self.scene.update_bounds();
        }

        if let Some(renderer) = &mut self.renderer
            && let Err(e) = renderer.render(&self.scene)
        {
            log::warn!("Frame skipped: {}", e);
        }

        self.pace_frame();

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Sleep out the remainder of the target interval, measured from the end
    /// of the previous frame. Overruns are not compensated; a slow frame
    /// just starts the next interval late.
    fn pace_frame(&mut self) {
        let target = frame_interval(self.settings.target_fps);
        let elapsed = self.last_frame_end.elapsed();
        if elapsed < target {
            thread::sleep(target - elapsed);
        }
        self.last_frame_end = Instant::now();
    }

    fn apply_key_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::ToggleRingMode => self.scene.toggle_render_mode(),
            KeyAction::ToggleRotationGizmo => {
                self.scene.toggle_gizmo_mode(GizmoMode::Rotation);
            }
            KeyAction::ToggleTranslationGizmo => {
                self.scene.toggle_gizmo_mode(GizmoMode::Translation);
            }
            KeyAction::ToggleGrid => self.scene.toggle_grid(),
            KeyAction::ToggleFrustums => self.scene.toggle_frustums(),
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("splat-viewer")
            .with_inner_size(LogicalSize::new(
                self.settings.window_width,
                self.settings.window_height,
            ));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(Renderer::create(window.clone())) {
            Ok(renderer) => {
                let size = window.inner_size();
                self.scene
                    .viewport
                    .set_window_size(size.width as f32, size.height as f32);
                self.renderer = Some(renderer);
                self.window = Some(window.clone());
                self.last_frame_end = Instant::now();
                window.request_redraw();
            }
            Err(e) => {
                log::error!("Failed to initialize renderer: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.trainer.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
                self.scene
                    .viewport
                    .set_window_size(size.width as f32, size.height as f32);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && !event.repeat
                    && let PhysicalKey::Code(code) = event.physical_key
                    && let Some(action) = key_action(code)
                {
                    self.apply_key_action(action);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let delta = self
                    .input
                    .on_cursor_moved(position.x as f32, position.y as f32);
                // Position tracking above stays live even under a GUI claim
                // so the scene never sees a stale cursor afterwards.
                self.input
                    .set_pointer_claimed(gui_claims_pointer(self.input.position()));
                if self.input.pointer_claimed() {
                    return;
                }

                let pos = self.input.position();
                self.scene.on_pointer_moved(pos.x, pos.y);

                if !self.scene.is_dragging() {
                    if self.input.left_down() {
                        self.scene.viewport.orbit(delta.x, delta.y);
                    } else if self.input.right_down() || self.input.middle_down() {
                        self.scene.viewport.pan(delta.x, delta.y);
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = state == ElementState::Pressed;
                self.input.on_mouse_button(button, pressed);
                if self.input.pointer_claimed() {
                    return;
                }

                if button == MouseButton::Left {
                    if pressed {
                        let pos = self.input.position();
                        self.scene.on_pointer_pressed(pos.x, pos.y);
                    } else {
                        self.scene.on_pointer_released();
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if self.input.pointer_claimed() {
                    return;
                }
                let amount = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 50.0,
                };
                self.scene.viewport.zoom(amount);
            }
            _ => {}
        }
    }
}

/// Pointer-claim check for an embedding GUI layer. The bundled viewer draws
/// no panels, so no screen region ever claims the pointer; a host with
/// overlaid widgets replaces this with its hit test.
fn gui_claims_pointer(_position: glam::Vec2) -> bool {
    false
}
