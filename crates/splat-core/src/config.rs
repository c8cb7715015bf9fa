//! Splat render configuration
//!
//! Mutable from GUI controls at any time; read once per frame by the render
//! pipeline. Out-of-range values are clamped at the setter, never rejected.

use serde::{Deserialize, Serialize};

/// Which draw path the splat cloud takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderMode {
    /// Filled splats drawn directly into the framebuffer.
    #[default]
    Centers,
    /// Offscreen pass plus the ring-highlighting post-process.
    Rings,
}

impl RenderMode {
    /// Integer selector for the post-process shader.
    pub fn shader_index(self) -> i32 {
        match self {
            RenderMode::Centers => 0,
            RenderMode::Rings => 1,
        }
    }
}

/// Ring-mode rendering configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplatRenderConfig {
    mode: RenderMode,
    ring_size: f32,
    selection_alpha: f32,
    show_overlay: bool,
    selected_color: [f32; 4],
    unselected_color: [f32; 4],
    locked_color: [f32; 4],
}

impl Default for SplatRenderConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::Centers,
            ring_size: 0.04,
            selection_alpha: 1.0,
            show_overlay: true,
            selected_color: [1.0, 1.0, 0.2, 1.0],
            unselected_color: [0.5, 0.5, 0.5, 0.3],
            locked_color: [0.8, 0.2, 0.2, 0.8],
        }
    }
}

impl SplatRenderConfig {
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: RenderMode) {
        self.mode = mode;
    }

    /// Ring-band thickness, [0, 1].
    pub fn ring_size(&self) -> f32 {
        self.ring_size
    }

    pub fn set_ring_size(&mut self, size: f32) {
        self.ring_size = size.clamp(0.0, 1.0);
    }

    /// Alpha multiplier applied after the band rescale, [0, 1].
    pub fn selection_alpha(&self) -> f32 {
        self.selection_alpha
    }

    pub fn set_selection_alpha(&mut self, alpha: f32) {
        self.selection_alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn show_overlay(&self) -> bool {
        self.show_overlay
    }

    pub fn set_show_overlay(&mut self, show: bool) {
        self.show_overlay = show;
    }

    pub fn selected_color(&self) -> [f32; 4] {
        self.selected_color
    }

    pub fn set_selected_color(&mut self, color: [f32; 4]) {
        self.selected_color = clamp_color(color);
    }

    pub fn unselected_color(&self) -> [f32; 4] {
        self.unselected_color
    }

    pub fn set_unselected_color(&mut self, color: [f32; 4]) {
        self.unselected_color = clamp_color(color);
    }

    pub fn locked_color(&self) -> [f32; 4] {
        self.locked_color
    }

    pub fn set_locked_color(&mut self, color: [f32; 4]) {
        self.locked_color = clamp_color(color);
    }
}

fn clamp_color(color: [f32; 4]) -> [f32; 4] {
    color.map(|c| c.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SplatRenderConfig::default();
        assert_eq!(config.mode(), RenderMode::Centers);
        assert!((config.ring_size() - 0.04).abs() < 1e-6);
        assert_eq!(config.selection_alpha(), 1.0);
        assert!(config.show_overlay());
    }

    #[test]
    fn test_ring_size_clamp_boundaries() {
        let mut config = SplatRenderConfig::default();
        config.set_ring_size(-5.0);
        assert_eq!(config.ring_size(), 0.0);
        config.set_ring_size(5.0);
        assert_eq!(config.ring_size(), 1.0);
        config.set_ring_size(0.25);
        assert_eq!(config.ring_size(), 0.25);
    }

    #[test]
    fn test_selection_alpha_clamp() {
        let mut config = SplatRenderConfig::default();
        config.set_selection_alpha(-0.1);
        assert_eq!(config.selection_alpha(), 0.0);
        config.set_selection_alpha(1.5);
        assert_eq!(config.selection_alpha(), 1.0);
    }

    #[test]
    fn test_color_channels_clamped() {
        let mut config = SplatRenderConfig::default();
        config.set_selected_color([2.0, -1.0, 0.5, 3.0]);
        assert_eq!(config.selected_color(), [1.0, 0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_shader_index() {
        assert_eq!(RenderMode::Centers.shader_index(), 0);
        assert_eq!(RenderMode::Rings.shader_index(), 1);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = SplatRenderConfig::default();
        config.set_mode(RenderMode::Rings);
        config.set_ring_size(0.2);

        let json = serde_json::to_string(&config).unwrap();
        let back: SplatRenderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
