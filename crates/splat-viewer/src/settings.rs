//! Viewer settings

use serde::{Deserialize, Serialize};

/// Startup configuration for the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewerSettings {
    pub window_width: u32,
    pub window_height: u32,
    pub target_fps: u32,
    /// Splats seeded before the trainer starts.
    pub initial_splats: usize,
    /// Densification cap for the simulated trainer.
    pub max_splats: usize,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            target_fps: 60,
            initial_splats: 2000,
            max_splats: 8000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_serde_roundtrip() {
        let settings = ViewerSettings {
            target_fps: 30,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: ViewerSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
