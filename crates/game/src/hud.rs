//! HUD (Heads-Up Display) data pushed to the display once per frame.

use crate::state::GameMessages;

/// All HUD data for a frame
#[derive(Debug, Clone, PartialEq)]
pub struct HudStatus {
    /// Health as a fraction of max, 0..=1.
    pub health_fraction: f32,
    pub ammo: u32,
    pub reserve_ammo: u32,
    pub is_reloading: bool,
    pub kills: u32,
    pub enemies_alive: usize,
    /// MM:SS since the last reset.
    pub time_survived: String,
    pub is_alive: bool,
}

impl HudStatus {
    /// Ammo counter text as shown under the crosshair.
    pub fn ammo_text(&self) -> String {
        if self.is_reloading {
            format!("RELOADING... {}", self.reserve_ammo)
        } else {
            format!("{} / {}", self.ammo, self.reserve_ammo)
        }
    }
}

/// Receives HUD state and the message log each frame.
pub trait HudSink {
    fn update(&mut self, status: &HudStatus, messages: &GameMessages);
}

/// HUD that writes to the log: every new message once, and status changes at debug level.
#[derive(Debug, Default)]
pub struct LogHud {
    next_message: u64,
    last_status: Option<HudStatus>,
}

impl LogHud {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HudSink for LogHud {
    fn update(&mut self, status: &HudStatus, messages: &GameMessages) {
        for msg in messages.since(self.next_message) {
            log::info!("[hud] {}", msg.text);
        }
        self.next_message = messages.next_id();

        let changed = self.last_status.as_ref().map_or(true, |last| {
            last.kills != status.kills
                || last.health_fraction != status.health_fraction
                || last.is_alive != status.is_alive
        });
        if changed {
            log::debug!(
                "[hud] hp {:.0}% | {} | kills {} | alive {} | {}",
                status.health_fraction * 100.0,
                status.ammo_text(),
                status.kills,
                status.enemies_alive,
                status.time_survived
            );
            self.last_status = Some(status.clone());
        }
    }
}
