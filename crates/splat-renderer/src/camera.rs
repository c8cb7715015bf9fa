//! Orbit viewport
//!
//! Holds the camera transform plus the screen/world projection queries the
//! interaction layer depends on: `world_to_screen` for gizmo hit-testing and
//! `screen_to_ray` for drag constraint solving.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::picking::Ray;

/// GPU camera uniform, column-major view-projection matrix.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 3],
    pub _pad: f32,
}

impl CameraUniform {
    pub fn new(view_proj: Mat4, camera_position: Vec3) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_position: camera_position.to_array(),
            _pad: 0.0,
        }
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Vec3::ZERO)
    }
}

/// Window-sized orbit camera.
///
/// The camera orbits `target` at `distance`; yaw/pitch are in radians. Zoom
/// limits are re-derived from the scene radius once bounds are known.
#[derive(Debug, Clone)]
pub struct Viewport {
    pub window_size: Vec2,
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

const PITCH_LIMIT: f32 = 1.55; // just shy of the poles

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            window_size: Vec2::new(width, height),
            target: Vec3::ZERO,
            distance: 5.0,
            yaw: 0.0,
            pitch: 0.0,
            fov: 45.0_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            min_zoom: 0.05,
            max_zoom: 500.0,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.window_size.x / self.window_size.y
    }

    pub fn set_window_size(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.window_size = Vec2::new(width, height);
        }
    }

    /// World-space camera position derived from the orbit parameters.
    pub fn camera_position(&self) -> Vec3 {
        let dir = Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        );
        self.target + dir * self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.camera_position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect(), self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform::new(self.view_projection_matrix(), self.camera_position())
    }

    // ========================================================================
    // Projection queries
    // ========================================================================

    /// Project a world point to window coordinates (origin top-left, y down).
    /// Returns `None` for points behind the camera.
    pub fn world_to_screen(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_projection_matrix() * Vec4::new(world.x, world.y, world.z, 1.0);
        if clip.w <= 1e-6 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.window_size.x,
            (1.0 - ndc.y) * 0.5 * self.window_size.y,
        ))
    }

    /// Build a world-space ray through a window coordinate.
    pub fn screen_to_ray(&self, screen_x: f32, screen_y: f32) -> Ray {
        let ndc_x = 2.0 * screen_x / self.window_size.x - 1.0;
        let ndc_y = 1.0 - 2.0 * screen_y / self.window_size.y;

        let inv = self.view_projection_matrix().inverse();
        let near = inv * Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
        let far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;

        Ray::new(near, far - near)
    }

    // ========================================================================
    // Orbit controls
    // ========================================================================

    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        const SENSITIVITY: f32 = 0.01;
        self.yaw -= delta_x * SENSITIVITY;
        self.pitch = (self.pitch + delta_y * SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn pan(&mut self, delta_x: f32, delta_y: f32) {
        let view = self.view_matrix();
        let right = Vec3::new(view.x_axis.x, view.y_axis.x, view.z_axis.x);
        let up = Vec3::new(view.x_axis.y, view.y_axis.y, view.z_axis.y);

        let scale = self.distance * 0.002;
        self.target += right * (-delta_x * scale) + up * (delta_y * scale);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta * 0.1)).clamp(self.min_zoom, self.max_zoom);
    }

    /// Derive zoom limits from the scene radius once bounds are known.
    pub fn set_zoom_limits_from_radius(&mut self, radius: f32) {
        self.min_zoom = radius * 0.01;
        self.max_zoom = radius * 100.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn front_viewport() -> Viewport {
        // Camera on +Z looking at the origin.
        let mut vp = Viewport::new(800.0, 600.0);
        vp.target = Vec3::ZERO;
        vp.distance = 5.0;
        vp.yaw = 0.0;
        vp.pitch = 0.0;
        vp
    }

    #[test]
    fn test_camera_position_front() {
        let vp = front_viewport();
        let pos = vp.camera_position();
        assert!((pos - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn test_target_projects_to_center() {
        let vp = front_viewport();
        let screen = vp.world_to_screen(Vec3::ZERO).unwrap();
        assert!((screen - Vec2::new(400.0, 300.0)).length() < 1e-3);
    }

    #[test]
    fn test_point_behind_camera_is_none() {
        let vp = front_viewport();
        assert!(vp.world_to_screen(Vec3::new(0.0, 0.0, 20.0)).is_none());
    }

    #[test]
    fn test_screen_to_ray_through_center_hits_target() {
        let vp = front_viewport();
        let ray = vp.screen_to_ray(400.0, 300.0);
        // Ray should point from the camera toward the origin.
        assert!((ray.direction - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-4);
    }

    #[test]
    fn test_project_unproject_roundtrip() {
        let vp = front_viewport();
        let world = Vec3::new(0.7, -0.3, 0.2);
        let screen = vp.world_to_screen(world).unwrap();
        let ray = vp.screen_to_ray(screen.x, screen.y);

        // The ray must pass through the original point.
        let t = (world - ray.origin).dot(ray.direction);
        let closest = ray.origin + ray.direction * t;
        assert!((closest - world).length() < 1e-3);
    }

    #[test]
    fn test_orbit_preserves_distance() {
        let mut vp = front_viewport();
        vp.orbit(35.0, -12.0);
        let dist = (vp.camera_position() - vp.target).length();
        assert!((dist - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_pitch_clamped() {
        let mut vp = front_viewport();
        vp.orbit(0.0, 10_000.0);
        assert!(vp.pitch <= PITCH_LIMIT);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut vp = front_viewport();
        vp.min_zoom = 1.0;
        vp.max_zoom = 10.0;
        for _ in 0..100 {
            vp.zoom(1.0);
        }
        assert_eq!(vp.distance, 1.0);
        for _ in 0..100 {
            vp.zoom(-1.0);
        }
        assert_eq!(vp.distance, 10.0);
    }

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
    }
}
