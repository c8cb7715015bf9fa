//! Scene bounds computation
//!
//! Center and radius enclosing the current splat positions, used to frame the
//! camera on first sight of the model and to seed the gizmo pivot.

use glam::Vec3;

/// Radius clamp range in world units.
pub const MIN_SCENE_RADIUS: f32 = 0.1;
pub const MAX_SCENE_RADIUS: f32 = 100.0;

/// Computed scene bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBounds {
    /// Per-axis median of all positions. The median resists the stray
    /// far-away splats a half-trained model tends to accumulate.
    pub center: Vec3,
    /// Half the diagonal of the axis-aligned min/max box, clamped to
    /// [MIN_SCENE_RADIUS, MAX_SCENE_RADIUS].
    pub radius: f32,
}

impl SceneBounds {
    /// Compute bounds over a set of positions. Returns `None` for an empty
    /// set.
    pub fn compute(positions: &[Vec3]) -> Option<Self> {
        if positions.is_empty() {
            return None;
        }

        let mut min = positions[0];
        let mut max = positions[0];
        for p in positions.iter().skip(1) {
            min = min.min(*p);
            max = max.max(*p);
        }

        let center = Vec3::new(
            axis_median(positions, |p| p.x),
            axis_median(positions, |p| p.y),
            axis_median(positions, |p| p.z),
        );

        let radius = ((max - min).length() * 0.5).clamp(MIN_SCENE_RADIUS, MAX_SCENE_RADIUS);

        Some(Self { center, radius })
    }
}

/// Median of one coordinate axis. Even-length sets average the two middle
/// values.
fn axis_median(positions: &[Vec3], axis: impl Fn(&Vec3) -> f32) -> f32 {
    let mut values: Vec<f32> = positions.iter().map(axis).collect();
    values.sort_by(|a, b| a.total_cmp(b));

    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_positions() {
        assert_eq!(SceneBounds::compute(&[]), None);
    }

    #[test]
    fn test_median_center_collinear() {
        let positions = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
        ];
        let bounds = SceneBounds::compute(&positions).unwrap();
        assert_eq!(bounds.center, Vec3::new(2.0, 0.0, 0.0));
        assert!((bounds.radius - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_median_y_is_zero() {
        let positions = [
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        ];
        let bounds = SceneBounds::compute(&positions).unwrap();
        assert_eq!(bounds.center.y, 0.0);
    }

    #[test]
    fn test_median_resists_outlier() {
        let positions = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(1000.0, 0.0, 0.0),
        ];
        let bounds = SceneBounds::compute(&positions).unwrap();
        // Mean would be ~201; median stays with the bulk of the cloud.
        assert_eq!(bounds.center.x, 2.0);
    }

    #[test]
    fn test_radius_clamp_low() {
        let positions = [Vec3::ZERO, Vec3::splat(1e-4)];
        let bounds = SceneBounds::compute(&positions).unwrap();
        assert_eq!(bounds.radius, MIN_SCENE_RADIUS);
    }

    #[test]
    fn test_radius_clamp_high() {
        let positions = [Vec3::splat(-500.0), Vec3::splat(500.0)];
        let bounds = SceneBounds::compute(&positions).unwrap();
        assert_eq!(bounds.radius, MAX_SCENE_RADIUS);
    }

    #[test]
    fn test_single_point() {
        let bounds = SceneBounds::compute(&[Vec3::new(3.0, 4.0, 5.0)]).unwrap();
        assert_eq!(bounds.center, Vec3::new(3.0, 4.0, 5.0));
        assert_eq!(bounds.radius, MIN_SCENE_RADIUS);
    }

    #[test]
    fn test_even_count_averages_middle() {
        let positions = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
        ];
        let bounds = SceneBounds::compute(&positions).unwrap();
        assert_eq!(bounds.center.x, 1.5);
    }
}
