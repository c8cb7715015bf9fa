//! splat-viewer
//!
//! Interactive viewer for a point-cloud scene under concurrent training:
//! orbit camera, rotation/translation gizmos, and a ring-mode render path
//! for occlusion visibility.

mod app;
mod input;
mod renderer;
mod scene;
mod settings;
mod shaders;
mod trainer;

use winit::error::EventLoopError;
use winit::event_loop::{ControlFlow, EventLoop};

use app::ViewerApp;
use settings::ViewerSettings;

fn main() -> Result<(), EventLoopError> {
    env_logger::init();

    let settings = ViewerSettings::default();
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::new(settings);
    event_loop.run_app(&mut app)
}
