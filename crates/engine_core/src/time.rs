//! Time management for the game loop.
//!
//! The host owns the frame callback and hands us its timestamp (milliseconds,
//! monotonic). Nothing here reads a wall clock, so the same sequence of
//! timestamps always produces the same sequence of deltas.

/// Default upper bound for a single frame delta (seconds).
pub const DEFAULT_MAX_DELTA: f32 = 0.1;

/// Manages frame timing and delta time calculation.
#[derive(Debug, Clone)]
pub struct Time {
    /// Timestamp of the first frame (ms).
    start_ms: Option<f64>,
    /// Timestamp of the last frame (ms).
    last_frame_ms: Option<f64>,
    /// Total elapsed time since the first frame (ms).
    elapsed_ms: f64,
    /// Frame count since start.
    frame_count: u64,
    /// Largest delta handed to the simulation (seconds).
    max_delta: f32,
}

impl Default for Time {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DELTA)
    }
}

impl Time {
    /// Create a new time manager with the given delta clamp.
    pub fn new(max_delta: f32) -> Self {
        Self {
            start_ms: None,
            last_frame_ms: None,
            elapsed_ms: 0.0,
            frame_count: 0,
            max_delta: max_delta.max(0.0),
        }
    }

    /// Advance to a new frame at host time `now_ms`. Returns the clamped
    /// delta in seconds. The first frame and any backwards step yield 0.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let start = *self.start_ms.get_or_insert(now_ms);
        let raw = match self.last_frame_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);
        self.elapsed_ms = (now_ms - start).max(0.0);
        self.frame_count += 1;
        raw.clamp(0.0, self.max_delta)
    }

    /// Host timestamp of the current frame (ms), 0 before the first tick.
    pub fn now_ms(&self) -> f64 {
        self.last_frame_ms.unwrap_or(0.0)
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        (self.elapsed_ms / 1000.0) as f32
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
