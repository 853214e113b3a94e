//! Game configuration (look, clock, seed, world tuning). Loaded from config.ron at startup.

use serde::{Deserialize, Serialize};

/// Persistent game settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Mouse sensitivity multiplier (1.0 = default).
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    /// Largest frame delta handed to the simulation, in seconds.
    #[serde(default = "default_max_frame_dt")]
    pub max_frame_dt: f32,
    /// Seed for spawn placement and enemy stats. `None` draws from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    /// How long the headless host runs, in simulated seconds.
    #[serde(default = "default_headless_seconds")]
    pub headless_seconds: f32,
    /// Synthetic frame rate of the headless host.
    #[serde(default = "default_headless_fps")]
    pub headless_fps: f32,
    /// World constants.
    #[serde(default)]
    pub tuning: Tuning,
}

fn default_sensitivity() -> f32 {
    1.0
}
fn default_max_frame_dt() -> f32 {
    engine_core::DEFAULT_MAX_DELTA
}
fn default_headless_seconds() -> f32 {
    120.0
}
fn default_headless_fps() -> f32 {
    60.0
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            sensitivity: default_sensitivity(),
            max_frame_dt: default_max_frame_dt(),
            seed: None,
            headless_seconds: default_headless_seconds(),
            headless_fps: default_headless_fps(),
            tuning: Tuning::default(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(data) => Self::from_ron(&data).unwrap_or_else(|e| {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }),
            Err(_) => {
                log::info!("No config at {:?}, using defaults", path);
                Self::default()
            }
        }
    }

    pub fn from_ron(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }
}

fn config_path() -> std::path::PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| std::path::PathBuf::from("."))
        .join("config.ron")
}

/// Read-only world constants. Speeds are units/s, times are ms unless the
/// name says seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // ── Player movement ─────────────────────────────────────────────────
    pub walk_speed: f32,
    pub sprint_speed: f32,
    /// Horizontal damping rate; velocity keeps `1 - damping * dt` per tick.
    pub damping: f32,
    pub gravity: f32,
    pub jump_velocity: f32,
    /// Camera height above the player's feet.
    pub eye_height: f32,
    pub player_radius: f32,
    pub player_max_health: f32,

    // ── Weapon ──────────────────────────────────────────────────────────
    pub magazine_capacity: u32,
    pub reserve_capacity: u32,
    pub reload_ms: f64,
    pub shot_cooldown_ms: f64,
    pub shot_damage: f32,
    /// Ray start distance in front of the eye.
    pub muzzle_offset: f32,
    pub ray_length: f32,

    // ── Enemies ─────────────────────────────────────────────────────────
    pub enemy_radius: f32,
    pub enemy_health: f32,
    pub enemy_attack_damage: f32,
    pub enemy_base_speed: f32,
    pub enemy_speed_range: f32,
    pub attack_interval_secs: f32,
    pub attack_interval_range_secs: f32,
    /// Extra gap between an attacking enemy and the player.
    pub melee_buffer: f32,
    /// Extra gap enforced between two enemies.
    pub separation_epsilon: f32,

    // ── Spawning ────────────────────────────────────────────────────────
    pub enemy_cap: usize,
    pub initial_enemies: usize,
    pub wave_size: usize,
    pub wave_interval_ms: f64,
    /// Side of the square spawn area centred on the origin.
    pub spawn_area: f32,
    /// Half-width of the no-spawn square around the origin.
    pub exclusion_radius: f32,
    /// Width of the band just outside the exclusion square.
    pub exclusion_band: f32,
    /// Minimum spawn distance from the player.
    pub player_clearance: f32,
    pub obstacle_count: usize,

    // ── Death / reset ───────────────────────────────────────────────────
    pub respawn_delay_ms: f64,
    /// Drop an in-flight reload when the game resets.
    pub cancel_reload_on_reset: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            walk_speed: 25.0,
            sprint_speed: 45.0,
            damping: 10.0,
            gravity: 30.0,
            jump_velocity: 15.0,
            eye_height: 2.0,
            player_radius: 1.0,
            player_max_health: 100.0,

            magazine_capacity: 30,
            reserve_capacity: 120,
            reload_ms: 800.0,
            shot_cooldown_ms: 100.0,
            shot_damage: 50.0,
            muzzle_offset: 0.5,
            ray_length: 1000.0,

            enemy_radius: 1.5,
            enemy_health: 100.0,
            enemy_attack_damage: 10.0,
            enemy_base_speed: 6.0,
            enemy_speed_range: 3.0,
            attack_interval_secs: 1.0,
            attack_interval_range_secs: 0.8,
            melee_buffer: 0.15,
            separation_epsilon: 0.05,

            enemy_cap: 120,
            initial_enemies: 30,
            wave_size: 6,
            wave_interval_ms: 10_000.0,
            spawn_area: 800.0,
            exclusion_radius: 50.0,
            exclusion_band: 200.0,
            player_clearance: 30.0,
            obstacle_count: 150,

            respawn_delay_ms: 2_000.0,
            cancel_reload_on_reset: false,
        }
    }
}

impl Tuning {
    /// Distance at which an enemy stops chasing and starts attacking.
    pub fn melee_range(&self) -> f32 {
        self.enemy_radius + self.player_radius + self.melee_buffer
    }
}
