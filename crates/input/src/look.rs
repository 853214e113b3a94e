//! Mouse look: pointer-lock when the host grants it, drag-to-look otherwise.

use glam::Vec2;
use thiserror::Error;

/// Pitch limit just short of straight up/down so the view basis never degenerates.
pub const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Radians of rotation per pixel of mouse travel at sensitivity 1.0.
const RADIANS_PER_PIXEL: f32 = 0.002;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookError {
    #[error("pointer lock is not supported by this host")]
    Unsupported,
    #[error("pointer lock request was denied: {0}")]
    Denied(String),
}

/// How mouse motion turns into camera rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookMode {
    /// Not yet acquired; motion is ignored.
    Idle,
    /// Cursor captured; every motion event rotates the view.
    PointerLock,
    /// Degraded mode: the view rotates only while the drag button is held.
    Drag,
}

/// Camera yaw/pitch driven by relative mouse motion.
#[derive(Debug, Clone)]
pub struct LookControl {
    mode: LookMode,
    yaw: f32,
    pitch: f32,
    sensitivity: f32,
}

impl LookControl {
    pub fn new(sensitivity: f32) -> Self {
        Self {
            mode: LookMode::Idle,
            yaw: 0.0,
            pitch: 0.0,
            sensitivity,
        }
    }

    /// Record the outcome of a pointer-lock request.
    ///
    /// On failure the control drops to drag-look and returns a one-line
    /// diagnostic for the on-screen log. Success returns `None`.
    pub fn acquire(&mut self, result: Result<(), LookError>) -> Option<String> {
        match result {
            Ok(()) => {
                self.mode = LookMode::PointerLock;
                log::info!("Pointer lock acquired");
                None
            }
            Err(e) => {
                self.mode = LookMode::Drag;
                let line = format!("Mouse look unavailable ({e}); drag with right mouse to look");
                log::warn!("{line}");
                Some(line)
            }
        }
    }

    /// Pointer lock was lost (e.g. Escape); motion is ignored until re-acquired.
    pub fn release(&mut self) {
        if self.mode == LookMode::PointerLock {
            self.mode = LookMode::Idle;
        }
    }

    /// Apply one frame of mouse motion. `drag_held` matters only in drag mode.
    pub fn apply_motion(&mut self, delta: Vec2, drag_held: bool) {
        let active = match self.mode {
            LookMode::Idle => false,
            LookMode::PointerLock => true,
            LookMode::Drag => drag_held,
        };
        if !active {
            return;
        }
        let k = self.radians_per_pixel();
        self.yaw -= delta.x * k;
        self.pitch = (self.pitch - delta.y * k).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Reset the view to look down -Z, level.
    pub fn reset(&mut self) {
        self.yaw = 0.0;
        self.pitch = 0.0;
    }

    pub fn mode(&self) -> LookMode {
        self.mode
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// View rotation per pixel of motion at the current sensitivity.
    pub fn radians_per_pixel(&self) -> f32 {
        RADIANS_PER_PIXEL * self.sensitivity
    }
}
