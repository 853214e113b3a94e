//! Deferred events the simulation schedules on its timer queue.

use crate::effects::EffectId;

/// Everything that happens "later": drained between frames, applied in due order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// The in-flight reload finishes and tops up the magazine.
    ReloadComplete,
    /// The dead player comes back and the world resets.
    Respawn,
    /// A cosmetic pulse has run its course.
    EffectExpired(EffectId),
    /// Periodic enemy wave.
    WaveSpawn,
}
