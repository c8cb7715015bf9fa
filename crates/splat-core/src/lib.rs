pub mod bounds;
pub mod config;
pub mod splat;
pub mod sync;

// Re-exports
pub use bounds::SceneBounds;
pub use config::{RenderMode, SplatRenderConfig};
pub use splat::SplatCloud;
pub use sync::{SharedCloud, shared_cloud, with_cloud, with_cloud_mut};
