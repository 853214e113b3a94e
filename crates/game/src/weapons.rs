//! The player's rifle: magazine, reserve, fire-rate limit and the reload state machine.
//!
//! Timing lives outside: `try_fire` is handed the current time, and a reload
//! only completes when the simulation's scheduled `ReloadComplete` arrives.

use crate::config::Tuning;

/// Result of pulling the trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// Shot accepted: one round spent.
    Fired,
    /// Magazine empty; the caller should try to reload instead.
    OutOfAmmo,
    /// Reload in progress.
    Reloading,
    /// Too soon after the previous shot.
    CoolingDown,
}

/// Weapon instance with current state.
#[derive(Debug, Clone)]
pub struct Weapon {
    pub magazine_size: u32,
    pub current_ammo: u32,
    pub reserve_ammo: u32,
    pub reserve_capacity: u32,
    /// Minimum gap between accepted shots.
    pub cooldown_ms: f64,
    pub reload_ms: f64,
    is_reloading: bool,
    last_shot_ms: Option<f64>,
}

impl Weapon {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            magazine_size: tuning.magazine_capacity,
            current_ammo: tuning.magazine_capacity,
            reserve_ammo: tuning.reserve_capacity,
            reserve_capacity: tuning.reserve_capacity,
            cooldown_ms: tuning.shot_cooldown_ms,
            reload_ms: tuning.reload_ms,
            is_reloading: false,
            last_shot_ms: None,
        }
    }

    /// Fire the weapon at `now_ms`, consuming ammo when accepted.
    pub fn try_fire(&mut self, now_ms: f64) -> FireOutcome {
        if self.current_ammo == 0 {
            return FireOutcome::OutOfAmmo;
        }
        if self.is_reloading {
            return FireOutcome::Reloading;
        }
        if let Some(last) = self.last_shot_ms {
            if now_ms - last < self.cooldown_ms {
                return FireOutcome::CoolingDown;
            }
        }

        self.current_ammo -= 1;
        self.last_shot_ms = Some(now_ms);
        FireOutcome::Fired
    }

    /// Enter the reload state. Returns false (and changes nothing) when
    /// already reloading, the magazine is full, or the reserve is empty.
    pub fn start_reload(&mut self) -> bool {
        if self.is_reloading || self.reserve_ammo == 0 || self.current_ammo >= self.magazine_size {
            return false;
        }

        self.is_reloading = true;
        true
    }

    /// Complete the reload: move rounds from reserve into the magazine.
    /// Returns how many were moved; 0 if no reload was in flight.
    pub fn finish_reload(&mut self) -> u32 {
        if !self.is_reloading {
            return 0;
        }
        let needed = self.magazine_size - self.current_ammo;
        let moved = needed.min(self.reserve_ammo);

        self.current_ammo += moved;
        self.reserve_ammo -= moved;
        self.is_reloading = false;
        moved
    }

    /// Drop an in-flight reload without moving any rounds.
    pub fn cancel_reload(&mut self) {
        self.is_reloading = false;
    }

    pub fn is_reloading(&self) -> bool {
        self.is_reloading
    }

    pub fn last_shot_ms(&self) -> Option<f64> {
        self.last_shot_ms
    }

    /// Get ammo display string.
    pub fn ammo_display(&self) -> String {
        if self.is_reloading {
            format!("RELOADING... {}", self.reserve_ammo)
        } else {
            format!("{} / {}", self.current_ammo, self.reserve_ammo)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rifle() -> Weapon {
        Weapon::new(&Tuning::default())
    }

    #[test]
    fn second_shot_inside_cooldown_is_ignored() {
        let mut w = rifle();
        assert_eq!(w.try_fire(1_000.0), FireOutcome::Fired);
        assert_eq!(w.current_ammo, 29);
        assert_eq!(w.try_fire(1_050.0), FireOutcome::CoolingDown);
        assert_eq!(w.current_ammo, 29);
        assert_eq!(w.try_fire(1_100.0), FireOutcome::Fired);
        assert_eq!(w.current_ammo, 28);
    }

    #[test]
    fn first_shot_needs_no_history() {
        let mut w = rifle();
        assert_eq!(w.try_fire(0.0), FireOutcome::Fired);
    }

    #[test]
    fn empty_magazine_asks_for_reload() {
        let mut w = rifle();
        w.current_ammo = 0;
        assert_eq!(w.try_fire(0.0), FireOutcome::OutOfAmmo);
        assert_eq!(w.current_ammo, 0);
        assert!(w.last_shot_ms().is_none());
    }

    #[test]
    fn reloading_blocks_fire() {
        let mut w = rifle();
        w.current_ammo = 10;
        assert!(w.start_reload());
        assert_eq!(w.try_fire(0.0), FireOutcome::Reloading);
        assert_eq!(w.current_ammo, 10);
    }

    #[test]
    fn reload_rejected_when_full_or_dry_or_busy() {
        let mut full = rifle();
        assert!(!full.start_reload());
        assert!(!full.is_reloading());

        let mut dry = rifle();
        dry.current_ammo = 3;
        dry.reserve_ammo = 0;
        assert!(!dry.start_reload());
        assert!(!dry.is_reloading());

        let mut busy = rifle();
        busy.current_ammo = 3;
        assert!(busy.start_reload());
        assert!(!busy.start_reload());
    }

    #[test]
    fn reload_tops_up_from_reserve() {
        let mut w = rifle();
        w.current_ammo = 12;
        w.reserve_ammo = 10;
        assert!(w.start_reload());
        assert_eq!(w.finish_reload(), 10);
        assert_eq!((w.current_ammo, w.reserve_ammo), (22, 0));
        assert!(!w.is_reloading());
        // A stray completion does nothing
        assert_eq!(w.finish_reload(), 0);
    }

    #[test]
    fn cancelled_reload_moves_nothing() {
        let mut w = rifle();
        w.current_ammo = 5;
        assert!(w.start_reload());
        w.cancel_reload();
        assert_eq!(w.finish_reload(), 0);
        assert_eq!(w.current_ammo, 5);
    }

    proptest! {
        #[test]
        fn reload_conserves_rounds(ammo in 0u32..=30, reserve in 0u32..=120) {
            let mut w = rifle();
            w.current_ammo = ammo;
            w.reserve_ammo = reserve;
            let before = ammo + reserve;
            if w.start_reload() {
                w.finish_reload();
            }
            prop_assert_eq!(w.current_ammo + w.reserve_ammo, before);
            prop_assert!(w.current_ammo <= w.magazine_size);
            prop_assert!(!w.is_reloading());
        }
    }
}
