//! Input routing
//!
//! Tracks pointer state and maps key bindings to viewer actions. Pointer
//! events are forwarded to the scene only while no GUI panel has claimed
//! the pointer.

use glam::Vec2;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Actions bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    ToggleRingMode,
    ToggleRotationGizmo,
    ToggleTranslationGizmo,
    ToggleGrid,
    ToggleFrustums,
}

/// Key bindings: Q ring mode, R rotation gizmo, T translation gizmo,
/// G grid, C camera frustums.
pub fn key_action(code: KeyCode) -> Option<KeyAction> {
    match code {
        KeyCode::KeyQ => Some(KeyAction::ToggleRingMode),
        KeyCode::KeyR => Some(KeyAction::ToggleRotationGizmo),
        KeyCode::KeyT => Some(KeyAction::ToggleTranslationGizmo),
        KeyCode::KeyG => Some(KeyAction::ToggleGrid),
        KeyCode::KeyC => Some(KeyAction::ToggleFrustums),
        _ => None,
    }
}

/// Pointer state tracker.
#[derive(Debug, Default)]
pub struct InputState {
    position: Vec2,
    left_down: bool,
    right_down: bool,
    middle_down: bool,
    /// Set by the (external) GUI layer while a panel owns the pointer;
    /// scene and camera never see events while this holds.
    pointer_claimed: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn left_down(&self) -> bool {
        self.left_down
    }

    pub fn right_down(&self) -> bool {
        self.right_down
    }

    pub fn middle_down(&self) -> bool {
        self.middle_down
    }

    pub fn pointer_claimed(&self) -> bool {
        self.pointer_claimed
    }

    /// Integration point for an embedding GUI layer: set with the equivalent
    /// of ImGui's `WantCaptureMouse` before each pointer event is routed.
    pub fn set_pointer_claimed(&mut self, claimed: bool) {
        self.pointer_claimed = claimed;
    }

    /// Record a cursor move and return the delta from the last position.
    pub fn on_cursor_moved(&mut self, x: f32, y: f32) -> Vec2 {
        let next = Vec2::new(x, y);
        let delta = next - self.position;
        self.position = next;
        delta
    }

    pub fn on_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.left_down = pressed,
            MouseButton::Right => self.right_down = pressed,
            MouseButton::Middle => self.middle_down = pressed,
            _ => {}
        }
    }
}
