//! Shader sources
//!
//! WGSL shaders loaded from external files at compile time.

/// Splat billboard shader (centers pass and rings first pass)
pub const SPLAT_SHADER: &str = include_str!("splat.wgsl");

/// Ring-mode full-screen post-process shader
pub const RINGS_SHADER: &str = include_str!("rings.wgsl");

/// Gizmo shader (also used for camera frustum wireframes and the view cube)
pub const GIZMO_SHADER: &str = include_str!("gizmo.wgsl");

/// Ground grid shader with distance fade
pub const GRID_SHADER: &str = include_str!("grid.wgsl");
