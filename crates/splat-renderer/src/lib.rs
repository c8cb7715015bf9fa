pub mod camera;
pub mod gizmo;
pub mod picking;

pub use camera::{CameraUniform, Viewport};
pub use gizmo::{
    GIZMO_HIT_THRESHOLD_PX, GizmoAxis, GizmoMode, GizmoVertex, axis_color,
    create_arrow_vertices, create_center_sphere_vertices, create_plane_vertices,
    create_ring_vertices,
};
pub use gizmo::{RotationGizmo, TranslationGizmo};
pub use picking::{Ray, ray_plane_intersection, ray_plane_intersection_point};

// Re-export glam types for consistent version usage
pub use glam;
