//! Gizmo system
//!
//! Rotation and translation manipulation widgets: shared geometry/vertex
//! builders here, the two drag controllers in `rotation` and `translation`.

mod rotation;
mod translation;

pub use rotation::RotationGizmo;
pub use translation::TranslationGizmo;

use glam::Vec3;

/// Which gizmo variant is active. Activating one deactivates the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GizmoMode {
    #[default]
    None,
    Rotation,
    Translation,
}

/// Handle identifier. Rotation uses only the axis variants; translation
/// additionally uses the plane and center handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GizmoAxis {
    #[default]
    None,
    X,
    Y,
    Z,
    PlaneXy,
    PlaneXz,
    PlaneYz,
    Center,
}

impl GizmoAxis {
    /// Unit direction for the axis variants.
    pub fn direction(self) -> Option<Vec3> {
        match self {
            GizmoAxis::X => Some(Vec3::X),
            GizmoAxis::Y => Some(Vec3::Y),
            GizmoAxis::Z => Some(Vec3::Z),
            _ => None,
        }
    }

    /// Normal of the plane variants.
    pub fn plane_normal(self) -> Option<Vec3> {
        match self {
            GizmoAxis::PlaneXy => Some(Vec3::Z),
            GizmoAxis::PlaneXz => Some(Vec3::Y),
            GizmoAxis::PlaneYz => Some(Vec3::X),
            _ => None,
        }
    }
}

/// Screen-space hit threshold in pixels. A handle is hit when the cursor is
/// closer than this to its projected silhouette.
pub const GIZMO_HIT_THRESHOLD_PX: f32 = 10.0;

/// Gizmo vertex data
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GizmoVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl GizmoVertex {
    pub fn new(position: Vec3, color: [f32; 4]) -> Self {
        Self {
            position: position.to_array(),
            color,
        }
    }

    /// Vertex buffer layout
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GizmoVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Handle colors
pub const COLOR_X: [f32; 4] = [0.9, 0.2, 0.2, 1.0];
pub const COLOR_Y: [f32; 4] = [0.2, 0.9, 0.2, 1.0];
pub const COLOR_Z: [f32; 4] = [0.2, 0.2, 0.9, 1.0];
pub const COLOR_X_ACTIVE: [f32; 4] = [1.0, 0.5, 0.5, 1.0];
pub const COLOR_Y_ACTIVE: [f32; 4] = [0.5, 1.0, 0.5, 1.0];
pub const COLOR_Z_ACTIVE: [f32; 4] = [0.5, 0.5, 1.0, 1.0];
pub const COLOR_PLANE_XY: [f32; 4] = [1.0, 1.0, 0.0, 0.4];
pub const COLOR_PLANE_XZ: [f32; 4] = [1.0, 0.0, 1.0, 0.4];
pub const COLOR_PLANE_YZ: [f32; 4] = [0.0, 1.0, 1.0, 0.4];
pub const COLOR_CENTER: [f32; 4] = [1.0, 1.0, 1.0, 0.8];

/// Color for an axis handle, highlighted while it is being dragged.
pub fn axis_color(axis: GizmoAxis, active_axis: GizmoAxis) -> [f32; 4] {
    let active = axis == active_axis;
    match axis {
        GizmoAxis::X => {
            if active {
                COLOR_X_ACTIVE
            } else {
                COLOR_X
            }
        }
        GizmoAxis::Y => {
            if active {
                COLOR_Y_ACTIVE
            } else {
                COLOR_Y
            }
        }
        GizmoAxis::Z => {
            if active {
                COLOR_Z_ACTIVE
            } else {
                COLOR_Z
            }
        }
        GizmoAxis::PlaneXy => COLOR_PLANE_XY,
        GizmoAxis::PlaneXz => COLOR_PLANE_XZ,
        GizmoAxis::PlaneYz => COLOR_PLANE_YZ,
        GizmoAxis::Center => COLOR_CENTER,
        GizmoAxis::None => [0.5, 0.5, 0.5, 0.5],
    }
}

/// Arrows start away from the pivot so the center handle stays reachable.
pub(crate) const ARROW_INNER_OFFSET: f32 = 0.25;
/// Plane quads sit diagonally off the pivot, in gizmo-local units.
pub(crate) const PLANE_OFFSET: f32 = 0.3;
pub(crate) const PLANE_SIZE: f32 = 0.25;

/// Orthonormal basis spanning the plane perpendicular to `normal`.
pub(crate) fn plane_basis(normal: Vec3) -> (Vec3, Vec3) {
    let up = if normal.y.abs() > 0.9 { Vec3::Z } else { Vec3::Y };
    let right = normal.cross(up).normalize();
    let up = right.cross(normal).normalize();
    (right, up)
}

// ========================================================================
// Vertex builders
// ========================================================================

/// Ring band for one rotation axis, unit radius in gizmo-local space.
pub fn create_ring_vertices(axis: GizmoAxis, color: [f32; 4]) -> Vec<GizmoVertex> {
    let mut vertices = Vec::new();

    let Some(normal) = axis.direction() else {
        return vertices;
    };

    let radius = 1.0;
    let thickness = 0.03;
    let segments = 48;

    let (right, up) = plane_basis(normal);

    for i in 0..segments {
        let angle1 = (i as f32 / segments as f32) * std::f32::consts::TAU;
        let angle2 = ((i + 1) as f32 / segments as f32) * std::f32::consts::TAU;

        let p1 = (up * angle1.cos() + right * angle1.sin()) * radius;
        let p2 = (up * angle2.cos() + right * angle2.sin()) * radius;

        let inner1 = p1 * (1.0 - thickness / radius);
        let outer1 = p1 * (1.0 + thickness / radius);
        let inner2 = p2 * (1.0 - thickness / radius);
        let outer2 = p2 * (1.0 + thickness / radius);

        vertices.push(GizmoVertex::new(inner1, color));
        vertices.push(GizmoVertex::new(outer1, color));
        vertices.push(GizmoVertex::new(outer2, color));

        vertices.push(GizmoVertex::new(inner1, color));
        vertices.push(GizmoVertex::new(outer2, color));
        vertices.push(GizmoVertex::new(inner2, color));
    }

    vertices
}

/// Axis arrow: square shaft from the inner offset out to a cone tip.
pub fn create_arrow_vertices(axis: GizmoAxis, color: [f32; 4]) -> Vec<GizmoVertex> {
    let mut vertices = Vec::new();

    let Some(dir) = axis.direction() else {
        return vertices;
    };
    let (right, up) = plane_basis(dir);

    let thickness = 0.02;
    let length = 1.0;
    let cone_length = 0.2;
    let cone_radius = 0.06;

    let shaft_start = dir * ARROW_INNER_OFFSET;
    let shaft_end = dir * (length - cone_length);

    let s0 = shaft_start + up * thickness + right * thickness;
    let s1 = shaft_start + up * thickness - right * thickness;
    let s2 = shaft_start - up * thickness - right * thickness;
    let s3 = shaft_start - up * thickness + right * thickness;

    let e0 = shaft_end + up * thickness + right * thickness;
    let e1 = shaft_end + up * thickness - right * thickness;
    let e2 = shaft_end - up * thickness - right * thickness;
    let e3 = shaft_end - up * thickness + right * thickness;

    // Four shaft faces
    for quad in [[s0, s1, e1, e0], [s2, s3, e3, e2], [s0, e0, e3, s3], [s1, s2, e2, e1]] {
        vertices.push(GizmoVertex::new(quad[0], color));
        vertices.push(GizmoVertex::new(quad[1], color));
        vertices.push(GizmoVertex::new(quad[2], color));
        vertices.push(GizmoVertex::new(quad[0], color));
        vertices.push(GizmoVertex::new(quad[2], color));
        vertices.push(GizmoVertex::new(quad[3], color));
    }

    // Cone tip
    let tip = dir * length;
    let cone_base = shaft_end;
    let segments = 12;

    for i in 0..segments {
        let angle1 = (i as f32 / segments as f32) * std::f32::consts::TAU;
        let angle2 = ((i + 1) as f32 / segments as f32) * std::f32::consts::TAU;

        let p1 = cone_base + (up * angle1.cos() + right * angle1.sin()) * cone_radius;
        let p2 = cone_base + (up * angle2.cos() + right * angle2.sin()) * cone_radius;

        vertices.push(GizmoVertex::new(p1, color));
        vertices.push(GizmoVertex::new(p2, color));
        vertices.push(GizmoVertex::new(tip, color));

        vertices.push(GizmoVertex::new(cone_base, color));
        vertices.push(GizmoVertex::new(p1, color));
        vertices.push(GizmoVertex::new(p2, color));
    }

    vertices
}

/// Two-sided plane handle quad.
pub fn create_plane_vertices(axis: GizmoAxis, color: [f32; 4]) -> Vec<GizmoVertex> {
    let mut vertices = Vec::new();

    let (v1, v2) = match axis {
        GizmoAxis::PlaneXy => (Vec3::X, Vec3::Y),
        GizmoAxis::PlaneXz => (Vec3::X, Vec3::Z),
        GizmoAxis::PlaneYz => (Vec3::Y, Vec3::Z),
        _ => return vertices,
    };

    let p0 = v1 * PLANE_OFFSET + v2 * PLANE_OFFSET;
    let p1 = v1 * (PLANE_OFFSET + PLANE_SIZE) + v2 * PLANE_OFFSET;
    let p2 = v1 * (PLANE_OFFSET + PLANE_SIZE) + v2 * (PLANE_OFFSET + PLANE_SIZE);
    let p3 = v1 * PLANE_OFFSET + v2 * (PLANE_OFFSET + PLANE_SIZE);

    for tri in [[p0, p1, p2], [p0, p2, p3], [p0, p2, p1], [p0, p3, p2]] {
        vertices.push(GizmoVertex::new(tri[0], color));
        vertices.push(GizmoVertex::new(tri[1], color));
        vertices.push(GizmoVertex::new(tri[2], color));
    }

    vertices
}

/// UV-sphere for the free-movement center handle.
pub fn create_center_sphere_vertices(color: [f32; 4]) -> Vec<GizmoVertex> {
    let mut vertices = Vec::new();

    let radius = 0.08;
    let rings = 8;
    let segments = 12;

    let point = |ring: usize, segment: usize| -> Vec3 {
        let phi = std::f32::consts::PI * ring as f32 / rings as f32;
        let theta = std::f32::consts::TAU * segment as f32 / segments as f32;
        Vec3::new(
            phi.sin() * theta.cos(),
            phi.cos(),
            phi.sin() * theta.sin(),
        ) * radius
    };

    for ring in 0..rings {
        for segment in 0..segments {
            let a = point(ring, segment);
            let b = point(ring + 1, segment);
            let c = point(ring + 1, segment + 1);
            let d = point(ring, segment + 1);

            vertices.push(GizmoVertex::new(a, color));
            vertices.push(GizmoVertex::new(b, color));
            vertices.push(GizmoVertex::new(c, color));

            vertices.push(GizmoVertex::new(a, color));
            vertices.push(GizmoVertex::new(c, color));
            vertices.push(GizmoVertex::new(d, color));
        }
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_direction() {
        assert_eq!(GizmoAxis::X.direction(), Some(Vec3::X));
        assert_eq!(GizmoAxis::PlaneXy.direction(), None);
        assert_eq!(GizmoAxis::None.direction(), None);
    }

    #[test]
    fn test_plane_normal() {
        assert_eq!(GizmoAxis::PlaneXy.plane_normal(), Some(Vec3::Z));
        assert_eq!(GizmoAxis::PlaneXz.plane_normal(), Some(Vec3::Y));
        assert_eq!(GizmoAxis::PlaneYz.plane_normal(), Some(Vec3::X));
        assert_eq!(GizmoAxis::X.plane_normal(), None);
    }

    #[test]
    fn test_ring_vertices_on_unit_circle() {
        let vertices = create_ring_vertices(GizmoAxis::Y, COLOR_Y);
        assert!(!vertices.is_empty());
        for v in &vertices {
            let p = Vec3::from_array(v.position);
            // Ring band around unit radius, flat in the XZ plane.
            assert!(p.y.abs() < 1e-6);
            assert!((p.length() - 1.0).abs() < 0.05);
        }
    }

    #[test]
    fn test_arrow_vertices_along_axis() {
        let vertices = create_arrow_vertices(GizmoAxis::X, COLOR_X);
        assert!(!vertices.is_empty());
        for v in &vertices {
            let p = Vec3::from_array(v.position);
            assert!(p.x >= ARROW_INNER_OFFSET - 1e-6 && p.x <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn test_plane_vertices_in_plane() {
        let vertices = create_plane_vertices(GizmoAxis::PlaneXz, COLOR_PLANE_XZ);
        assert!(!vertices.is_empty());
        for v in &vertices {
            assert_eq!(v.position[1], 0.0);
        }
    }

    #[test]
    fn test_sphere_vertices_on_sphere() {
        let vertices = create_center_sphere_vertices(COLOR_CENTER);
        assert!(!vertices.is_empty());
        for v in &vertices {
            let p = Vec3::from_array(v.position);
            assert!((p.length() - 0.08).abs() < 1e-4);
        }
    }

    #[test]
    fn test_active_axis_highlight() {
        assert_eq!(axis_color(GizmoAxis::X, GizmoAxis::X), COLOR_X_ACTIVE);
        assert_eq!(axis_color(GizmoAxis::X, GizmoAxis::None), COLOR_X);
    }
}
