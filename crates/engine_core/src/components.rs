//! Common ECS components used across the engine.

use glam::Vec3;

/// Velocity component for moving entities.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity {
    pub linear: Vec3,
}

impl Velocity {
    /// Horizontal (XZ) part of the velocity.
    pub fn horizontal(&self) -> Vec3 {
        Vec3::new(self.linear.x, 0.0, self.linear.z)
    }
}

/// Health component for damageable entities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Subtract damage, never dropping below zero.
    pub fn take_damage(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }

    /// Restore to full.
    pub fn restore(&mut self) {
        self.current = self.max;
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn percentage(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

/// Melee attack timing for an enemy.
///
/// `cooldown_remaining` counts down every tick and never goes negative;
/// `interval` is fixed for the lifetime of the entity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AttackTimer {
    pub interval: f32,
    pub cooldown_remaining: f32,
}

impl AttackTimer {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            cooldown_remaining: 0.0,
        }
    }

    pub fn can_attack(&self) -> bool {
        self.cooldown_remaining <= 0.0
    }

    pub fn trigger_attack(&mut self) {
        self.cooldown_remaining = self.interval;
    }

    pub fn update_cooldown(&mut self, dt: f32) {
        self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
    }
}

/// Damage applied by a single hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Damage {
    pub amount: f32,
}

impl Damage {
    pub fn bullet(amount: f32) -> Self {
        Self { amount }
    }

    pub fn melee(amount: f32) -> Self {
        Self { amount }
    }

    /// Apply this damage to a health pool. Returns true if the hit was lethal.
    pub fn apply(&self, health: &mut Health) -> bool {
        health.take_damage(self.amount);
        health.is_dead()
    }
}
