//! Splat cloud storage
//!
//! CPU-side storage for the point cloud being trained. The training thread
//! mutates this through the shared mutex in `sync`; the render thread copies
//! what it needs inside a short critical section and uploads afterwards.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A single splat primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Splat {
    pub position: Vec3,
    /// RGBA, each channel in [0, 1].
    pub color: [f32; 4],
    /// World-space radius used for billboard sizing.
    pub radius: f32,
}

impl Splat {
    pub fn new(position: Vec3, color: [f32; 4], radius: f32) -> Self {
        Self {
            position,
            color,
            radius,
        }
    }
}

/// The point cloud under training.
///
/// Grows while the trainer runs; positions move every optimization step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SplatCloud {
    splats: Vec<Splat>,
}

impl SplatCloud {
    pub fn new() -> Self {
        Self { splats: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            splats: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.splats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.splats.is_empty()
    }

    pub fn push(&mut self, splat: Splat) {
        self.splats.push(splat);
    }

    pub fn splats(&self) -> &[Splat] {
        &self.splats
    }

    pub fn splats_mut(&mut self) -> &mut [Splat] {
        &mut self.splats
    }

    /// Copy out all positions. Used for bounds recomputation so the lock can
    /// be dropped before any further work.
    pub fn positions(&self) -> Vec<Vec3> {
        self.splats.iter().map(|s| s.position).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cloud() {
        let cloud = SplatCloud::new();
        assert_eq!(cloud.len(), 0);
        assert!(cloud.is_empty());
    }

    #[test]
    fn test_push_and_positions() {
        let mut cloud = SplatCloud::new();
        cloud.push(Splat::new(Vec3::new(1.0, 2.0, 3.0), [1.0; 4], 0.1));
        cloud.push(Splat::new(Vec3::ZERO, [0.5; 4], 0.2));

        assert_eq!(cloud.len(), 2);
        let positions = cloud.positions();
        assert_eq!(positions, vec![Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO]);
    }
}
