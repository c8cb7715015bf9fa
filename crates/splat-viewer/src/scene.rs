//! Scene coordinator
//!
//! Owns both gizmos, the render configuration, and the scene bounds state,
//! and routes pointer events to whichever gizmo is active. The per-frame
//! draw order is grid, camera frustums, splats, active gizmo, view cube;
//! the renderer pulls everything it draws from here.

use glam::{Mat4, Vec3};

use splat_core::{
    RenderMode, SceneBounds, SharedCloud, SplatRenderConfig, with_cloud,
};
use splat_renderer::{
    GizmoAxis, GizmoMode, GizmoVertex, RotationGizmo, TranslationGizmo, Viewport, axis_color,
    create_arrow_vertices, create_center_sphere_vertices, create_plane_vertices,
    create_ring_vertices,
};

use crate::renderer::frustum_pipeline::create_frustum_lines;
use crate::renderer::splat_pipeline::SplatInstance;

const CAMERA_POSE_COUNT: usize = 8;
const FRUSTUM_SCALE_FACTOR: f32 = 0.15;

pub struct SceneRenderer {
    cloud: SharedCloud,
    pub viewport: Viewport,
    config: SplatRenderConfig,
    gizmo_mode: GizmoMode,
    rotation: RotationGizmo,
    translation: TranslationGizmo,
    bounds: Option<SceneBounds>,
    /// Set after the first valid bounds so later recomputations never
    /// overwrite the user's manual camera adjustments.
    camera_initialized: bool,
    show_grid: bool,
    show_frustums: bool,
    camera_poses: Vec<Mat4>,
}

impl SceneRenderer {
    pub fn new(cloud: SharedCloud, width: f32, height: f32) -> Self {
        Self {
            cloud,
            viewport: Viewport::new(width, height),
            config: SplatRenderConfig::default(),
            gizmo_mode: GizmoMode::None,
            rotation: RotationGizmo::new(),
            translation: TranslationGizmo::new(),
            bounds: None,
            camera_initialized: false,
            show_grid: true,
            show_frustums: true,
            camera_poses: Vec::new(),
        }
    }

    pub fn config(&self) -> &SplatRenderConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SplatRenderConfig {
        &mut self.config
    }

    pub fn gizmo_mode(&self) -> GizmoMode {
        self.gizmo_mode
    }

    pub fn bounds(&self) -> Option<SceneBounds> {
        self.bounds
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn show_frustums(&self) -> bool {
        self.show_frustums
    }

    pub fn toggle_grid(&mut self) {
        self.show_grid = !self.show_grid;
    }

    pub fn toggle_frustums(&mut self) {
        self.show_frustums = !self.show_frustums;
    }

    pub fn toggle_render_mode(&mut self) {
        let next = match self.config.mode() {
            RenderMode::Centers => RenderMode::Rings,
            RenderMode::Rings => RenderMode::Centers,
        };
        self.config.set_mode(next);
        log::info!("Render mode: {:?}", next);
    }

    // ========================================================================
    // Gizmo mode
    // ========================================================================

    /// Switch the active gizmo. A live drag is force-ended first so no
    /// dangling drag state survives the switch.
    pub fn set_gizmo_mode(&mut self, mode: GizmoMode) {
        if mode == self.gizmo_mode {
            return;
        }

        self.rotation.end_rotation();
        self.translation.end_translation();
        self.rotation.set_visible(false);
        self.translation.set_visible(false);

        match mode {
            GizmoMode::Rotation => self.rotation.set_visible(true),
            GizmoMode::Translation => self.translation.set_visible(true),
            GizmoMode::None => {}
        }
        self.gizmo_mode = mode;
        log::debug!("Gizmo mode: {:?}", mode);
    }

    /// Keybinding behavior: activating the current mode deactivates it.
    pub fn toggle_gizmo_mode(&mut self, mode: GizmoMode) {
        if self.gizmo_mode == mode {
            self.set_gizmo_mode(GizmoMode::None);
        } else {
            self.set_gizmo_mode(mode);
        }
    }

    pub fn rotation_gizmo(&self) -> &RotationGizmo {
        &self.rotation
    }

    pub fn translation_gizmo(&self) -> &TranslationGizmo {
        &self.translation
    }

    pub fn is_dragging(&self) -> bool {
        self.rotation.is_dragging() || self.translation.is_dragging()
    }

    /// Accumulated scene transform applied to splats and frustums.
    pub fn scene_transform(&self) -> Mat4 {
        self.rotation.transform_matrix() * self.translation.transform_matrix()
    }

    // ========================================================================
    // Pointer routing
    // ========================================================================

    /// Hit-test the active gizmo and begin a drag on a hit. Returns whether
    /// the press was consumed; a miss leaves the press to the camera.
    pub fn on_pointer_pressed(&mut self, x: f32, y: f32) -> bool {
        match self.gizmo_mode {
            GizmoMode::Rotation => {
                let axis = self.rotation.hit_test(&self.viewport, x, y);
                if axis != GizmoAxis::None {
                    self.rotation.start_rotation(axis, x, y, &self.viewport);
                    return true;
                }
            }
            GizmoMode::Translation => {
                let axis = self.translation.hit_test(&self.viewport, x, y);
                if axis != GizmoAxis::None {
                    self.translation.start_translation(axis, x, y, &self.viewport);
                    return true;
                }
            }
            GizmoMode::None => {}
        }
        false
    }

    /// Forward a move to whichever gizmo is dragging; both no-op when idle.
    pub fn on_pointer_moved(&mut self, x: f32, y: f32) {
        self.rotation.update_rotation(x, y, &self.viewport);
        self.translation.update_translation(x, y, &self.viewport);
        self.sync_rotation_pivot();
    }

    /// End any live drag. Safe to call on every release.
    pub fn on_pointer_released(&mut self) {
        self.rotation.end_rotation();
        self.translation.end_translation();
        self.sync_rotation_pivot();
    }

    /// The rotation pivot sits on the displaced cloud: scene center plus the
    /// accumulated translation. A live rotation drag keeps its own pivot.
    fn sync_rotation_pivot(&mut self) {
        if let Some(bounds) = self.bounds {
            self.rotation
                .set_position(bounds.center + self.translation.translation());
        }
    }

    // ========================================================================
    // Bounds
    // ========================================================================

    /// Recompute scene bounds from the shared cloud. The lock is held only
    /// for the position copy. Camera framing is initialized exactly once;
    /// gizmo pivots follow the new center unless a drag is live.
    pub fn update_bounds(&mut self) {
        let positions = with_cloud(&self.cloud, |c| c.positions());
        let Some(bounds) = SceneBounds::compute(&positions) else {
            return;
        };

        if !self.camera_initialized {
            self.viewport.target = bounds.center;
            self.viewport.distance = bounds.radius * 2.5;
            self.viewport.set_zoom_limits_from_radius(bounds.radius);
            self.seed_camera_poses(&bounds);
            self.camera_initialized = true;
            log::info!(
                "Camera framed: center {:?}, radius {}",
                bounds.center,
                bounds.radius
            );
        }

        // The position setters ignore re-seeding while their drag is live.
        self.rotation
            .set_position(bounds.center + self.translation.translation());
        self.translation.set_anchor(bounds.center);

        let handle_scale = (bounds.radius * 0.5).max(0.2);
        self.rotation.set_radius(handle_scale);
        self.translation.set_scale(handle_scale);

        self.bounds = Some(bounds);
    }

    fn seed_camera_poses(&mut self, bounds: &SceneBounds) {
        self.camera_poses.clear();
        let orbit_radius = bounds.radius * 1.5;
        let height = bounds.center.y + bounds.radius * 0.5;
        for i in 0..CAMERA_POSE_COUNT {
            let angle = std::f32::consts::TAU * i as f32 / CAMERA_POSE_COUNT as f32;
            let eye = Vec3::new(
                bounds.center.x + orbit_radius * angle.cos(),
                height,
                bounds.center.z + orbit_radius * angle.sin(),
            );
            let pose = Mat4::look_at_rh(eye, bounds.center, Vec3::Y).inverse();
            self.camera_poses.push(pose);
        }
    }

    // ========================================================================
    // Draw data
    // ========================================================================

    /// Copy splat instances out of the shared cloud. The lock covers only
    /// the CPU-side copy, never the upload or submission.
    pub fn collect_instances(&self) -> Vec<SplatInstance> {
        with_cloud(&self.cloud, |c| {
            c.splats().iter().map(SplatInstance::from_splat).collect()
        })
    }

    /// Gizmo-local model matrix for the active gizmo's vertex list.
    pub fn active_gizmo_model(&self) -> Mat4 {
        match self.gizmo_mode {
            GizmoMode::Rotation => {
                Mat4::from_translation(self.rotation.position())
                    * Mat4::from_scale(Vec3::splat(self.rotation.radius()))
            }
            GizmoMode::Translation => {
                Mat4::from_translation(self.translation.position())
                    * Mat4::from_scale(Vec3::splat(self.translation.scale()))
            }
            GizmoMode::None => Mat4::IDENTITY,
        }
    }

    /// Handle vertices for the active gizmo, active axis highlighted.
    pub fn gizmo_vertices(&self) -> Vec<GizmoVertex> {
        let mut vertices = Vec::new();

        match self.gizmo_mode {
            GizmoMode::Rotation => {
                let active = self.rotation.active_axis();
                for axis in [GizmoAxis::X, GizmoAxis::Y, GizmoAxis::Z] {
                    vertices.extend(create_ring_vertices(axis, axis_color(axis, active)));
                }
            }
            GizmoMode::Translation => {
                let active = self.translation.active_axis();
                for axis in [GizmoAxis::X, GizmoAxis::Y, GizmoAxis::Z] {
                    vertices.extend(create_arrow_vertices(axis, axis_color(axis, active)));
                }
                for plane in [GizmoAxis::PlaneXy, GizmoAxis::PlaneXz, GizmoAxis::PlaneYz] {
                    vertices.extend(create_plane_vertices(plane, axis_color(plane, active)));
                }
                vertices.extend(create_center_sphere_vertices(axis_color(
                    GizmoAxis::Center,
                    active,
                )));
            }
            GizmoMode::None => {}
        }

        vertices
    }

    /// Frustum wireframes for all dataset poses, in scene-local space.
    pub fn frustum_vertices(&self) -> Vec<GizmoVertex> {
        let scale = self
            .bounds
            .map(|b| b.radius * FRUSTUM_SCALE_FACTOR)
            .unwrap_or(0.3);

        let mut vertices = Vec::new();
        for pose in &self.camera_poses {
            vertices.extend(create_frustum_lines(*pose, scale));
        }
        vertices
    }
}
