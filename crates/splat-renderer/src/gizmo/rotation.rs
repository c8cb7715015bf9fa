//! Rotation gizmo controller
//!
//! Three orthogonal rings around the scene pivot. Hit-testing projects each
//! ring silhouette into screen space; a drag tracks the cursor angle around
//! the projected pivot and composes a rotation about the fixed world axis.

use glam::{Mat4, Quat, Vec2, Vec3};

use super::{GIZMO_HIT_THRESHOLD_PX, GizmoAxis, plane_basis};
use crate::camera::Viewport;

const RING_HIT_SAMPLES: usize = 64;

#[derive(Debug, Clone)]
pub struct RotationGizmo {
    visible: bool,
    position: Vec3,
    radius: f32,
    /// Accumulated rotation committed across all drags.
    rotation: Quat,
    active_axis: GizmoAxis,
    dragging: bool,
    // Drag reference frame
    start_angle: f32,
    start_rotation: Quat,
}

impl Default for RotationGizmo {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationGizmo {
    pub fn new() -> Self {
        Self {
            visible: false,
            position: Vec3::ZERO,
            radius: 1.0,
            rotation: Quat::IDENTITY,
            active_axis: GizmoAxis::None,
            dragging: false,
            start_angle: 0.0,
            start_rotation: Quat::IDENTITY,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Re-seed the pivot. Ignored while a drag is live so the reference
    /// frame is not pulled out from under the cursor.
    pub fn set_position(&mut self, position: Vec3) {
        if !self.dragging {
            self.position = position;
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(1e-3);
    }

    pub fn active_axis(&self) -> GizmoAxis {
        self.active_axis
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Rotation about the pivot, as applied to the scene.
    pub fn transform_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_quat(self.rotation)
            * Mat4::from_translation(-self.position)
    }

    // ========================================================================
    // Hit testing
    // ========================================================================

    /// Test the cursor against the three ring silhouettes in screen space.
    /// Fixed order X, Y, Z; first ring within the pixel threshold wins.
    /// Pure: does not start a drag.
    pub fn hit_test(&self, viewport: &Viewport, screen_x: f32, screen_y: f32) -> GizmoAxis {
        if !self.visible {
            return GizmoAxis::None;
        }

        let cursor = Vec2::new(screen_x, screen_y);
        for axis in [GizmoAxis::X, GizmoAxis::Y, GizmoAxis::Z] {
            if self.ring_screen_distance(viewport, axis, cursor) < GIZMO_HIT_THRESHOLD_PX {
                return axis;
            }
        }

        GizmoAxis::None
    }

    /// Minimum screen-space distance from the cursor to sampled ring points.
    fn ring_screen_distance(&self, viewport: &Viewport, axis: GizmoAxis, cursor: Vec2) -> f32 {
        let Some(normal) = axis.direction() else {
            return f32::MAX;
        };
        let (right, up) = plane_basis(normal);

        let mut best = f32::MAX;
        for i in 0..RING_HIT_SAMPLES {
            let angle = (i as f32 / RING_HIT_SAMPLES as f32) * std::f32::consts::TAU;
            let world =
                self.position + (up * angle.cos() + right * angle.sin()) * self.radius;
            if let Some(screen) = viewport.world_to_screen(world) {
                best = best.min(cursor.distance(screen));
            }
        }
        best
    }

    // ========================================================================
    // Drag state machine
    // ========================================================================

    /// Begin a drag on a previously hit axis. Records the cursor's start
    /// angle around the projected pivot and the rotation at drag start.
    pub fn start_rotation(
        &mut self,
        axis: GizmoAxis,
        screen_x: f32,
        screen_y: f32,
        viewport: &Viewport,
    ) {
        if axis.direction().is_none() {
            return;
        }

        self.active_axis = axis;
        self.dragging = true;
        self.start_angle = self
            .cursor_angle(viewport, screen_x, screen_y)
            .unwrap_or(0.0);
        self.start_rotation = self.rotation;
    }

    /// Recompute the angle delta against the drag reference frame and
    /// rebuild the accumulated rotation. No-op while not dragging.
    pub fn update_rotation(&mut self, screen_x: f32, screen_y: f32, viewport: &Viewport) {
        if !self.dragging {
            return;
        }
        let Some(axis_dir) = self.active_axis.direction() else {
            return;
        };
        let Some(angle) = self.cursor_angle(viewport, screen_x, screen_y) else {
            return;
        };

        let mut delta = angle - self.start_angle;

        // Screen-space angles read counter-clockwise for an axis pointing at
        // the camera; flip when it points away.
        if axis_dir.dot(viewport.camera_position() - self.position) < 0.0 {
            delta = -delta;
        }

        // Rebuilt from the reference frame each move, so consecutive updates
        // compose exactly and repeated application cannot drift.
        self.rotation = Quat::from_axis_angle(axis_dir, delta) * self.start_rotation;
    }

    /// End the drag and clear the ephemeral reference frame. Idempotent.
    pub fn end_rotation(&mut self) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        self.active_axis = GizmoAxis::None;
        self.start_angle = 0.0;
        self.start_rotation = self.rotation;
    }

    /// Cursor angle around the projected pivot, mathematical convention
    /// (counter-clockwise positive, screen y points down).
    fn cursor_angle(&self, viewport: &Viewport, screen_x: f32, screen_y: f32) -> Option<f32> {
        let pivot = viewport.world_to_screen(self.position)?;
        let dx = screen_x - pivot.x;
        let dy = -(screen_y - pivot.y);
        if dx.abs() < 1e-6 && dy.abs() < 1e-6 {
            return None;
        }
        Some(dy.atan2(dx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn front_viewport() -> Viewport {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.target = Vec3::ZERO;
        vp.distance = 5.0;
        vp.yaw = 0.0;
        vp.pitch = 0.0;
        vp
    }

    fn visible_gizmo() -> RotationGizmo {
        let mut gizmo = RotationGizmo::new();
        gizmo.set_visible(true);
        gizmo.set_position(Vec3::ZERO);
        gizmo.set_radius(1.0);
        gizmo
    }

    /// Cursor position at `angle` (ccw from screen right) on a circle
    /// around the projected pivot.
    fn cursor_at(viewport: &Viewport, pivot: Vec3, angle: f32, radius_px: f32) -> Vec2 {
        let center = viewport.world_to_screen(pivot).unwrap();
        Vec2::new(
            center.x + radius_px * angle.cos(),
            center.y - radius_px * angle.sin(),
        )
    }

    #[test]
    fn test_invisible_never_hits() {
        let vp = front_viewport();
        let mut gizmo = visible_gizmo();
        gizmo.set_visible(false);

        let on_ring = vp.world_to_screen(Vec3::X).unwrap();
        assert_eq!(gizmo.hit_test(&vp, on_ring.x, on_ring.y), GizmoAxis::None);
        assert_eq!(gizmo.hit_test(&vp, 400.0, 300.0), GizmoAxis::None);
    }

    #[test]
    fn test_far_cursor_misses() {
        let vp = front_viewport();
        let gizmo = visible_gizmo();
        assert_eq!(gizmo.hit_test(&vp, 10.0, 10.0), GizmoAxis::None);
        assert_eq!(gizmo.hit_test(&vp, 790.0, 590.0), GizmoAxis::None);
    }

    #[test]
    fn test_hit_order_is_fixed() {
        let vp = front_viewport();
        let gizmo = visible_gizmo();

        // (1, 0, 0) lies on both the Y and Z rings; Y is tested first.
        let screen = vp.world_to_screen(Vec3::X).unwrap();
        assert_eq!(gizmo.hit_test(&vp, screen.x, screen.y), GizmoAxis::Y);

        // (0, 1, 0) lies on the X and Z rings; X wins.
        let screen = vp.world_to_screen(Vec3::Y).unwrap();
        assert_eq!(gizmo.hit_test(&vp, screen.x, screen.y), GizmoAxis::X);
    }

    #[test]
    fn test_hit_test_is_pure() {
        let vp = front_viewport();
        let gizmo = visible_gizmo();
        let screen = vp.world_to_screen(Vec3::X).unwrap();
        gizmo.hit_test(&vp, screen.x, screen.y);
        assert!(!gizmo.is_dragging());
        assert_eq!(gizmo.active_axis(), GizmoAxis::None);
    }

    #[test]
    fn test_drag_sets_active_axis() {
        let vp = front_viewport();
        let mut gizmo = visible_gizmo();

        let c = cursor_at(&vp, Vec3::ZERO, 0.0, 100.0);
        gizmo.start_rotation(GizmoAxis::Z, c.x, c.y, &vp);
        assert!(gizmo.is_dragging());
        assert_eq!(gizmo.active_axis(), GizmoAxis::Z);
    }

    #[test]
    fn test_incremental_updates_compose() {
        let vp = front_viewport();
        let start = cursor_at(&vp, Vec3::ZERO, 0.0, 100.0);
        let mid = cursor_at(&vp, Vec3::ZERO, 0.5, 100.0);
        let end = cursor_at(&vp, Vec3::ZERO, 1.3, 100.0);

        let mut stepped = visible_gizmo();
        stepped.start_rotation(GizmoAxis::Z, start.x, start.y, &vp);
        stepped.update_rotation(mid.x, mid.y, &vp);
        stepped.update_rotation(end.x, end.y, &vp);
        stepped.end_rotation();

        let mut direct = visible_gizmo();
        direct.start_rotation(GizmoAxis::Z, start.x, start.y, &vp);
        direct.update_rotation(end.x, end.y, &vp);
        direct.end_rotation();

        let dot = stepped.rotation().dot(direct.rotation()).abs();
        assert!(dot > 1.0 - 1e-5, "rotations diverged: dot = {dot}");
    }

    #[test]
    fn test_rotation_angle_matches_cursor_sweep() {
        let vp = front_viewport();
        let mut gizmo = visible_gizmo();

        // Z axis points at the camera: a ccw sweep of 0.8 rad should yield
        // a +0.8 rad rotation about Z.
        let start = cursor_at(&vp, Vec3::ZERO, 0.2, 100.0);
        let end = cursor_at(&vp, Vec3::ZERO, 1.0, 100.0);
        gizmo.start_rotation(GizmoAxis::Z, start.x, start.y, &vp);
        gizmo.update_rotation(end.x, end.y, &vp);

        let (axis, angle) = gizmo.rotation().to_axis_angle();
        assert!((axis - Vec3::Z).length() < 1e-4);
        assert!((angle - 0.8).abs() < 1e-3);
    }

    #[test]
    fn test_end_rotation_idempotent() {
        let vp = front_viewport();
        let mut gizmo = visible_gizmo();
        let start = cursor_at(&vp, Vec3::ZERO, 0.0, 100.0);
        let end = cursor_at(&vp, Vec3::ZERO, 0.7, 100.0);

        gizmo.start_rotation(GizmoAxis::Y, start.x, start.y, &vp);
        gizmo.update_rotation(end.x, end.y, &vp);
        gizmo.end_rotation();

        let after_first = gizmo.clone();
        gizmo.end_rotation();

        assert!(!gizmo.is_dragging());
        assert_eq!(gizmo.active_axis(), GizmoAxis::None);
        assert_eq!(gizmo.rotation(), after_first.rotation());
    }

    #[test]
    fn test_update_without_drag_is_noop() {
        let vp = front_viewport();
        let mut gizmo = visible_gizmo();
        gizmo.update_rotation(450.0, 250.0, &vp);
        assert_eq!(gizmo.rotation(), Quat::IDENTITY);
    }

    #[test]
    fn test_start_ignores_non_axis_handles() {
        let vp = front_viewport();
        let mut gizmo = visible_gizmo();
        gizmo.start_rotation(GizmoAxis::PlaneXy, 400.0, 300.0, &vp);
        assert!(!gizmo.is_dragging());
        gizmo.start_rotation(GizmoAxis::None, 400.0, 300.0, &vp);
        assert!(!gizmo.is_dragging());
    }

    #[test]
    fn test_pivot_not_reseeded_mid_drag() {
        let vp = front_viewport();
        let mut gizmo = visible_gizmo();
        let c = cursor_at(&vp, Vec3::ZERO, 0.0, 100.0);
        gizmo.start_rotation(GizmoAxis::Z, c.x, c.y, &vp);

        gizmo.set_position(Vec3::splat(9.0));
        assert_eq!(gizmo.position(), Vec3::ZERO);

        gizmo.end_rotation();
        gizmo.set_position(Vec3::splat(9.0));
        assert_eq!(gizmo.position(), Vec3::splat(9.0));
    }

    #[test]
    fn test_transform_rotates_about_pivot() {
        let vp = front_viewport();
        let mut gizmo = visible_gizmo();
        gizmo.set_position(Vec3::new(2.0, 0.0, 0.0));

        let start = cursor_at(&vp, gizmo.position(), 0.0, 100.0);
        let end = cursor_at(&vp, gizmo.position(), std::f32::consts::FRAC_PI_2, 100.0);
        gizmo.start_rotation(GizmoAxis::Z, start.x, start.y, &vp);
        gizmo.update_rotation(end.x, end.y, &vp);
        gizmo.end_rotation();

        // The pivot itself must stay fixed under the scene transform.
        let pivot = gizmo.transform_matrix().transform_point3(gizmo.position());
        assert!((pivot - gizmo.position()).length() < 1e-4);
    }
}
