//! Cosmetic feedback pulses: muzzle flash, hit flash, attack pulse, damage flash.
//!
//! Gameplay code fires effects into an [`EffectsSink`] and never hears back.
//! The simulation turns queued requests into timed pulses and schedules
//! their reversion on the timer queue. Pulses are independent: two hits on
//! the same enemy make two pulses, each expiring on its own.

use hecs::Entity;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    MuzzleFlash,
    HitFlash(Entity),
    AttackFlash(Entity),
    DamageFlash,
}

impl EffectKind {
    /// How long the pulse stays visible.
    pub fn duration_ms(&self) -> f64 {
        match self {
            EffectKind::MuzzleFlash => 50.0,
            EffectKind::HitFlash(_) => 100.0,
            EffectKind::AttackFlash(_) => 150.0,
            EffectKind::DamageFlash => 200.0,
        }
    }

    fn tint(&self) -> [f32; 4] {
        match self {
            EffectKind::MuzzleFlash => [1.0, 0.9, 0.5, 1.0],
            EffectKind::HitFlash(_) => [1.0, 1.0, 1.0, 1.0],
            EffectKind::AttackFlash(_) => [1.0, 0.2, 0.2, 1.0],
            EffectKind::DamageFlash => [1.0, 0.0, 0.0, 0.35],
        }
    }

    fn scale(&self) -> f32 {
        match self {
            EffectKind::AttackFlash(_) => 1.2,
            _ => 1.0,
        }
    }

    fn target(&self) -> Option<Entity> {
        match self {
            EffectKind::HitFlash(e) | EffectKind::AttackFlash(e) => Some(*e),
            _ => None,
        }
    }
}

/// Fire-and-forget visual feedback.
pub trait EffectsSink {
    fn muzzle_flash(&mut self);
    fn hit_flash(&mut self, enemy: Entity);
    fn attack_flash(&mut self, enemy: Entity);
    fn damage_flash(&mut self);
}

/// Requests collected during a frame, turned into pulses afterwards.
#[derive(Debug, Default)]
pub struct EffectQueue {
    pending: Vec<EffectKind>,
}

impl EffectQueue {
    pub fn drain(&mut self) -> std::vec::Drain<'_, EffectKind> {
        self.pending.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl EffectsSink for EffectQueue {
    fn muzzle_flash(&mut self) {
        self.pending.push(EffectKind::MuzzleFlash);
    }

    fn hit_flash(&mut self, enemy: Entity) {
        self.pending.push(EffectKind::HitFlash(enemy));
    }

    fn attack_flash(&mut self, enemy: Entity) {
        self.pending.push(EffectKind::AttackFlash(enemy));
    }

    fn damage_flash(&mut self) {
        self.pending.push(EffectKind::DamageFlash);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    pub kind: EffectKind,
    pub tint: [f32; 4],
    pub scale: f32,
    pub started_ms: f64,
}

/// Table of live pulses, keyed by id.
#[derive(Debug, Default)]
pub struct ActiveEffects {
    pulses: HashMap<EffectId, Pulse>,
    next_id: u64,
}

impl ActiveEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a pulse. Returns its id and how long until it should expire.
    pub fn start(&mut self, kind: EffectKind, now_ms: f64) -> (EffectId, f64) {
        let id = EffectId(self.next_id);
        self.next_id += 1;
        self.pulses.insert(
            id,
            Pulse {
                kind,
                tint: kind.tint(),
                scale: kind.scale(),
                started_ms: now_ms,
            },
        );
        (id, kind.duration_ms())
    }

    /// End a pulse. Returns false if it was already gone.
    pub fn expire(&mut self, id: EffectId) -> bool {
        self.pulses.remove(&id).is_some()
    }

    /// Latest-started pulse on an enemy, if any.
    pub fn enemy_pulse(&self, enemy: Entity) -> Option<&Pulse> {
        self.pulses
            .values()
            .filter(|p| p.kind.target() == Some(enemy))
            .max_by(|a, b| a.started_ms.total_cmp(&b.started_ms))
    }

    pub fn muzzle_flash_active(&self) -> bool {
        self.pulses.values().any(|p| p.kind == EffectKind::MuzzleFlash)
    }

    /// Screen overlay strength from active damage flashes.
    pub fn damage_overlay(&self) -> f32 {
        self.pulses
            .values()
            .filter(|p| p.kind == EffectKind::DamageFlash)
            .map(|p| p.tint[3])
            .fold(0.0, f32::max)
    }

    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }

    pub fn clear(&mut self) {
        self.pulses.clear();
    }
}
