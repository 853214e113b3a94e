//! Input handling for keyboard and mouse.
//!
//! The host feeds raw device events in; gameplay reads one [`FrameInput`]
//! snapshot per frame.

pub mod look;

pub use look::{LookControl, LookError, LookMode, PITCH_LIMIT};

use glam::Vec2;
use std::collections::HashSet;

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;

/// Everything the simulation needs from input for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// +1 forward, -1 back, 0 when neither or both are held.
    pub forward: f32,
    /// +1 right, -1 left, 0 when neither or both are held.
    pub strafe: f32,
    pub sprint: bool,
    /// Edge-triggered: true only on the frame the key went down.
    pub jump: bool,
    pub fire: bool,
    pub reload: bool,
    /// Camera yaw in radians (rotation about +Y).
    pub yaw: f32,
    /// Camera pitch in radians, already clamped.
    pub pitch: f32,
}

impl FrameInput {
    /// Whether any movement key contributes this frame.
    pub fn has_move_intent(&self) -> bool {
        self.forward != 0.0 || self.strafe != 0.0
    }
}

/// Signed axis from two opposing held states.
fn axis(positive: bool, negative: bool) -> f32 {
    match (positive, negative) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,

    /// Mouse buttons currently held.
    mouse_held: HashSet<MouseButton>,
    /// Mouse buttons pressed this frame.
    mouse_pressed: HashSet<MouseButton>,

    /// Mouse movement delta for this frame.
    mouse_delta: Vec2,
    /// Accumulated mouse delta since the last `begin_frame`.
    accumulated_delta: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.mouse_pressed.clear();
        self.mouse_delta = self.accumulated_delta;
        self.accumulated_delta = Vec2::ZERO;
    }

    /// Process a keyboard event. Auto-repeat presses do not re-trigger edges.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.keys_held.insert(key) {
                    self.keys_pressed.insert(key);
                }
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    /// Process a mouse button event.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.mouse_held.insert(button) {
                    self.mouse_pressed.insert(button);
                }
            }
            ElementState::Released => {
                self.mouse_held.remove(&button);
            }
        }
    }

    /// Process relative mouse movement.
    pub fn process_mouse_motion(&mut self, delta: (f64, f64)) {
        self.accumulated_delta.x += delta.0 as f32;
        self.accumulated_delta.y += delta.1 as f32;
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn is_mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_pressed.contains(&button)
    }

    /// Mouse movement delta for this frame.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    pub fn is_sprinting(&self) -> bool {
        self.is_key_held(KeyCode::ShiftLeft) || self.is_key_held(KeyCode::ShiftRight)
    }

    /// Build this frame's snapshot, feeding the mouse delta through `look`.
    pub fn frame_input(&self, look: &mut LookControl) -> FrameInput {
        look.apply_motion(self.mouse_delta, self.is_mouse_held(MouseButton::Right));
        FrameInput {
            forward: axis(self.is_key_held(KeyCode::KeyW), self.is_key_held(KeyCode::KeyS)),
            strafe: axis(self.is_key_held(KeyCode::KeyD), self.is_key_held(KeyCode::KeyA)),
            sprint: self.is_sprinting(),
            jump: self.is_key_pressed(KeyCode::Space),
            fire: self.is_mouse_pressed(MouseButton::Left),
            reload: self.is_key_pressed(KeyCode::KeyR),
            yaw: look.yaw(),
            pitch: look.pitch(),
        }
    }
}
