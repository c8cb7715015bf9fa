//! Ray casting helpers
//!
//! World-space rays and ray/plane intersections used by the translation
//! gizmo's drag constraint solving.

use glam::Vec3;

/// Ray for raycasting
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point
    pub origin: Vec3,
    /// Ray direction (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Ray/plane intersection distance, or `None` when the ray is parallel to
/// the plane.
pub fn ray_plane_intersection(ray: &Ray, plane_point: Vec3, plane_normal: Vec3) -> Option<f32> {
    let denom = ray.direction.dot(plane_normal);
    if denom.abs() < 1e-6 {
        return None;
    }

    let t = (plane_point - ray.origin).dot(plane_normal) / denom;
    Some(t)
}

/// Ray/plane intersection point in front of the ray origin.
pub fn ray_plane_intersection_point(
    ray: &Ray,
    plane_point: Vec3,
    plane_normal: Vec3,
) -> Option<Vec3> {
    let t = ray_plane_intersection(ray, plane_point, plane_normal)?;
    if t < 0.0 {
        return None;
    }
    Some(ray.at(t))
}
