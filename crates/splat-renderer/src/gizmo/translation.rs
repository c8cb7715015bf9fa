//! Translation gizmo controller
//!
//! Three axis arrows, three plane quads, and a center sphere around the
//! scene pivot. Drags unproject the cursor onto a constraint plane and
//! re-solve the grab point each move, so translation follows the cursor
//! without accumulating error.

use glam::{Mat4, Vec2, Vec3};

use super::{
    ARROW_INNER_OFFSET, GIZMO_HIT_THRESHOLD_PX, GizmoAxis, PLANE_OFFSET, PLANE_SIZE,
};
use crate::camera::Viewport;
use crate::picking::ray_plane_intersection_point;

const ARROW_HIT_SAMPLES: usize = 16;

#[derive(Debug, Clone)]
pub struct TranslationGizmo {
    visible: bool,
    /// Pivot the handles are drawn around, before translation.
    anchor: Vec3,
    /// Accumulated translation committed across all drags.
    translation: Vec3,
    /// Handle scale in world units.
    scale: f32,
    active_axis: GizmoAxis,
    dragging: bool,
    // Drag reference frame
    grab_offset: Vec3,
    drag_start_position: Vec3,
    drag_start_translation: Vec3,
}

impl Default for TranslationGizmo {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationGizmo {
    pub fn new() -> Self {
        Self {
            visible: false,
            anchor: Vec3::ZERO,
            translation: Vec3::ZERO,
            scale: 1.0,
            active_axis: GizmoAxis::None,
            dragging: false,
            grab_offset: Vec3::ZERO,
            drag_start_position: Vec3::ZERO,
            drag_start_translation: Vec3::ZERO,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Current handle center: anchor displaced by the accumulated translation.
    pub fn position(&self) -> Vec3 {
        self.anchor + self.translation
    }

    /// Re-seed the pivot. Ignored while a drag is live.
    pub fn set_anchor(&mut self, anchor: Vec3) {
        if !self.dragging {
            self.anchor = anchor;
        }
    }

    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.max(1e-3);
    }

    pub fn active_axis(&self) -> GizmoAxis {
        self.active_axis
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    /// Translation as applied to the scene.
    pub fn transform_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
    }

    // ========================================================================
    // Hit testing
    // ========================================================================

    /// Test the cursor against the handles in screen space. Fixed order:
    /// the three arrows, the three plane quads, then the center sphere.
    /// Pure: does not start a drag.
    pub fn hit_test(&self, viewport: &Viewport, screen_x: f32, screen_y: f32) -> GizmoAxis {
        if !self.visible {
            return GizmoAxis::None;
        }

        let cursor = Vec2::new(screen_x, screen_y);

        for axis in [GizmoAxis::X, GizmoAxis::Y, GizmoAxis::Z] {
            if self.arrow_screen_distance(viewport, axis, cursor) < GIZMO_HIT_THRESHOLD_PX {
                return axis;
            }
        }

        for plane in [GizmoAxis::PlaneXy, GizmoAxis::PlaneXz, GizmoAxis::PlaneYz] {
            if self.plane_screen_distance(viewport, plane, cursor) < GIZMO_HIT_THRESHOLD_PX {
                return plane;
            }
        }

        if let Some(center) = viewport.world_to_screen(self.position())
            && cursor.distance(center) < GIZMO_HIT_THRESHOLD_PX
        {
            return GizmoAxis::Center;
        }

        GizmoAxis::None
    }

    /// Minimum screen distance from the cursor to sampled points along the
    /// arrow shaft, inner offset to tip.
    fn arrow_screen_distance(&self, viewport: &Viewport, axis: GizmoAxis, cursor: Vec2) -> f32 {
        let Some(dir) = axis.direction() else {
            return f32::MAX;
        };

        let origin = self.position();
        let mut best = f32::MAX;
        for i in 0..=ARROW_HIT_SAMPLES {
            let t = ARROW_INNER_OFFSET
                + (1.0 - ARROW_INNER_OFFSET) * (i as f32 / ARROW_HIT_SAMPLES as f32);
            let world = origin + dir * (t * self.scale);
            if let Some(screen) = viewport.world_to_screen(world) {
                best = best.min(cursor.distance(screen));
            }
        }
        best
    }

    /// Screen distance from the cursor to the projected plane-quad center.
    fn plane_screen_distance(&self, viewport: &Viewport, plane: GizmoAxis, cursor: Vec2) -> f32 {
        let (v1, v2) = match plane {
            GizmoAxis::PlaneXy => (Vec3::X, Vec3::Y),
            GizmoAxis::PlaneXz => (Vec3::X, Vec3::Z),
            GizmoAxis::PlaneYz => (Vec3::Y, Vec3::Z),
            _ => return f32::MAX,
        };

        let offset = (PLANE_OFFSET + PLANE_SIZE * 0.5) * self.scale;
        let world = self.position() + (v1 + v2) * offset;
        match viewport.world_to_screen(world) {
            Some(screen) => cursor.distance(screen),
            None => f32::MAX,
        }
    }

    // ========================================================================
    // Drag state machine
    // ========================================================================

    /// Begin a drag on a previously hit handle. Records where on the
    /// constraint plane the cursor grabbed the gizmo.
    pub fn start_translation(
        &mut self,
        axis: GizmoAxis,
        screen_x: f32,
        screen_y: f32,
        viewport: &Viewport,
    ) {
        if axis == GizmoAxis::None {
            return;
        }

        self.drag_start_position = self.position();
        self.drag_start_translation = self.translation;

        let normal = self.drag_plane_normal(axis, viewport);
        let ray = viewport.screen_to_ray(screen_x, screen_y);
        let Some(hit) = ray_plane_intersection_point(&ray, self.drag_start_position, normal)
        else {
            return;
        };

        self.active_axis = axis;
        self.dragging = true;
        self.grab_offset = self.drag_start_position - hit;
    }

    /// Re-solve the constraint plane for the current cursor and move the
    /// accumulated translation. No-op while not dragging.
    pub fn update_translation(&mut self, screen_x: f32, screen_y: f32, viewport: &Viewport) {
        if !self.dragging {
            return;
        }

        let normal = self.drag_plane_normal(self.active_axis, viewport);
        let ray = viewport.screen_to_ray(screen_x, screen_y);
        let Some(hit) = ray_plane_intersection_point(&ray, self.drag_start_position, normal)
        else {
            return;
        };

        let delta = (hit + self.grab_offset) - self.drag_start_position;
        let delta = match self.active_axis {
            GizmoAxis::X | GizmoAxis::Y | GizmoAxis::Z => {
                // Keep only the component along the dragged axis.
                let dir = self.active_axis.direction().unwrap_or(Vec3::X);
                dir * delta.dot(dir)
            }
            GizmoAxis::PlaneXy | GizmoAxis::PlaneXz | GizmoAxis::PlaneYz => {
                // Already in-plane; strip numerical noise along the normal.
                let n = self.active_axis.plane_normal().unwrap_or(Vec3::Z);
                delta - n * delta.dot(n)
            }
            _ => delta,
        };

        self.translation = self.drag_start_translation + delta;
    }

    /// End the drag and clear the ephemeral reference frame. Idempotent.
    pub fn end_translation(&mut self) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        self.active_axis = GizmoAxis::None;
        self.grab_offset = Vec3::ZERO;
    }

    /// Constraint plane for a handle. Axis handles use the plane containing
    /// the axis that faces the camera most directly; plane handles use their
    /// own plane; the center handle uses the view plane.
    fn drag_plane_normal(&self, axis: GizmoAxis, viewport: &Viewport) -> Vec3 {
        let view_dir = (viewport.camera_position() - self.position()).normalize_or_zero();

        match axis {
            GizmoAxis::X => {
                if view_dir.y.abs() > view_dir.z.abs() {
                    Vec3::Y
                } else {
                    Vec3::Z
                }
            }
            GizmoAxis::Y => {
                if view_dir.x.abs() > view_dir.z.abs() {
                    Vec3::X
                } else {
                    Vec3::Z
                }
            }
            GizmoAxis::Z => {
                if view_dir.x.abs() > view_dir.y.abs() {
                    Vec3::X
                } else {
                    Vec3::Y
                }
            }
            GizmoAxis::PlaneXy => Vec3::Z,
            GizmoAxis::PlaneXz => Vec3::Y,
            GizmoAxis::PlaneYz => Vec3::X,
            _ => view_dir,
        }
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

    fn visible_gizmo() -> TranslationGizmo {
        let mut gizmo = TranslationGizmo::new();
        gizmo.set_visible(true);
        gizmo.set_anchor(Vec3::ZERO);
        gizmo.set_scale(1.0);
        gizmo
    }

    #[test]
    fn test_invisible_never_hits() {
        let vp = front_viewport();
        let mut gizmo = visible_gizmo();
        gizmo.set_visible(false);
        assert_eq!(gizmo.hit_test(&vp, 400.0, 300.0), GizmoAxis::None);
    }

    #[test]
    fn test_center_hit() {
        let vp = front_viewport();
        let gizmo = visible_gizmo();
        // Pivot projects to the window center; arrows start at the inner
        // offset so the cursor there hits the center sphere.
        assert_eq!(gizmo.hit_test(&vp, 400.0, 300.0), GizmoAxis::Center);
    }

    #[test]
    fn test_arrow_hit() {
        let vp = front_viewport();
        let gizmo = visible_gizmo();
        let on_x = vp.world_to_screen(Vec3::new(0.8, 0.0, 0.0)).unwrap();
        assert_eq!(gizmo.hit_test(&vp, on_x.x, on_x.y), GizmoAxis::X);

        let on_y = vp.world_to_screen(Vec3::new(0.0, 0.8, 0.0)).unwrap();
        assert_eq!(gizmo.hit_test(&vp, on_y.x, on_y.y), GizmoAxis::Y);
    }

    #[test]
    fn test_plane_hit() {
        let vp = front_viewport();
        let gizmo = visible_gizmo();
        let quad_center = (PLANE_OFFSET + PLANE_SIZE * 0.5) * Vec3::new(1.0, 1.0, 0.0);
        let screen = vp.world_to_screen(quad_center).unwrap();
        assert_eq!(gizmo.hit_test(&vp, screen.x, screen.y), GizmoAxis::PlaneXy);
    }

    #[test]
    fn test_far_cursor_misses() {
        let vp = front_viewport();
        let gizmo = visible_gizmo();
        assert_eq!(gizmo.hit_test(&vp, 10.0, 10.0), GizmoAxis::None);
    }

    #[test]
    fn test_hit_test_is_pure() {
        let vp = front_viewport();
        let gizmo = visible_gizmo();
        gizmo.hit_test(&vp, 400.0, 300.0);
        assert!(!gizmo.is_dragging());
        assert_eq!(gizmo.active_axis(), GizmoAxis::None);
    }

    #[test]
    fn test_axis_drag_constrained_to_axis() {
        let vp = front_viewport();
        let mut gizmo = visible_gizmo();

        let start = vp.world_to_screen(Vec3::new(0.8, 0.0, 0.0)).unwrap();
        let end = vp.world_to_screen(Vec3::new(1.3, 0.0, 0.0)).unwrap();

        gizmo.start_translation(GizmoAxis::X, start.x, start.y, &vp);
        assert!(gizmo.is_dragging());
        // Drag diagonally; only the x component may move.
        gizmo.update_translation(end.x, end.y + 40.0, &vp);
        gizmo.end_translation();

        let t = gizmo.translation();
        assert!((t.x - 0.5).abs() < 1e-2, "t.x = {}", t.x);
        assert_eq!(t.y, 0.0);
        assert_eq!(t.z, 0.0);
    }

    #[test]
    fn test_plane_drag_stays_in_plane() {
        let vp = front_viewport();
        let mut gizmo = visible_gizmo();

        let quad_center = (PLANE_OFFSET + PLANE_SIZE * 0.5) * Vec3::new(1.0, 1.0, 0.0);
        let start = vp.world_to_screen(quad_center).unwrap();

        gizmo.start_translation(GizmoAxis::PlaneXy, start.x, start.y, &vp);
        gizmo.update_translation(start.x + 60.0, start.y - 45.0, &vp);
        gizmo.end_translation();

        let t = gizmo.translation();
        assert!(t.x > 0.0);
        assert!(t.y > 0.0);
        assert_eq!(t.z, 0.0);
    }

    #[test]
    fn test_center_drag_follows_cursor() {
        let vp = front_viewport();
        let mut gizmo = visible_gizmo();

        gizmo.start_translation(GizmoAxis::Center, 400.0, 300.0, &vp);
        gizmo.update_translation(460.0, 300.0, &vp);
        gizmo.end_translation();

        let t = gizmo.translation();
        assert!(t.x > 0.0);
        // Camera on +Z: the view plane here is the XY plane.
        assert!(t.z.abs() < 1e-4);
    }

    #[test]
    fn test_updates_track_cursor_not_accumulate() {
        let vp = front_viewport();
        let start = vp.world_to_screen(Vec3::new(0.8, 0.0, 0.0)).unwrap();
        let end = vp.world_to_screen(Vec3::new(1.3, 0.0, 0.0)).unwrap();

        let mut stepped = visible_gizmo();
        stepped.start_translation(GizmoAxis::X, start.x, start.y, &vp);
        let mid = start.lerp(end, 0.5);
        stepped.update_translation(mid.x, mid.y, &vp);
        stepped.update_translation(end.x, end.y, &vp);
        stepped.end_translation();

        let mut direct = visible_gizmo();
        direct.start_translation(GizmoAxis::X, start.x, start.y, &vp);
        direct.update_translation(end.x, end.y, &vp);
        direct.end_translation();

        assert!((stepped.translation() - direct.translation()).length() < 1e-4);
    }

    #[test]
    fn test_end_translation_idempotent() {
        let vp = front_viewport();
        let mut gizmo = visible_gizmo();
        let start = vp.world_to_screen(Vec3::new(0.8, 0.0, 0.0)).unwrap();

        gizmo.start_translation(GizmoAxis::X, start.x, start.y, &vp);
        gizmo.update_translation(start.x + 30.0, start.y, &vp);
        gizmo.end_translation();
        let t = gizmo.translation();

        gizmo.end_translation();
        assert!(!gizmo.is_dragging());
        assert_eq!(gizmo.translation(), t);
    }

    #[test]
    fn test_update_without_drag_is_noop() {
        let vp = front_viewport();
        let mut gizmo = visible_gizmo();
        gizmo.update_translation(500.0, 200.0, &vp);
        assert_eq!(gizmo.translation(), Vec3::ZERO);
    }

    #[test]
    fn test_anchor_not_reseeded_mid_drag() {
        let vp = front_viewport();
        let mut gizmo = visible_gizmo();
        let start = vp.world_to_screen(Vec3::new(0.8, 0.0, 0.0)).unwrap();

        gizmo.start_translation(GizmoAxis::X, start.x, start.y, &vp);
        gizmo.set_anchor(Vec3::splat(5.0));
        assert_eq!(gizmo.anchor(), Vec3::ZERO);

        gizmo.end_translation();
        gizmo.set_anchor(Vec3::splat(5.0));
        assert_eq!(gizmo.anchor(), Vec3::splat(5.0));
    }

    #[test]
    fn test_transform_matrix_translates() {
        let vp = front_viewport();
        let mut gizmo = visible_gizmo();
        let start = vp.world_to_screen(Vec3::new(0.8, 0.0, 0.0)).unwrap();
        let end = vp.world_to_screen(Vec3::new(1.8, 0.0, 0.0)).unwrap();

        gizmo.start_translation(GizmoAxis::X, start.x, start.y, &vp);
        gizmo.update_translation(end.x, end.y, &vp);
        gizmo.end_translation();

        let moved = gizmo.transform_matrix().transform_point3(Vec3::ZERO);
        assert!((moved - gizmo.translation()).length() < 1e-6);
    }
}
