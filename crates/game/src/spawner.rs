//! Enemy spawning: initial population and capped waves.
//!
//! Positions are drawn uniformly over the spawn area. Anything landing in
//! the square around the origin is thrown out into a band just beyond it,
//! and anything too close to the player is pushed away from them. A push
//! that ends back inside the square is redrawn.

use engine_core::Vec3;
use procgen::{height, scatter_obstacles, Obstacle};
use rand::prelude::*;

use crate::config::Tuning;
use crate::enemy::{EnemyBundle, Horde};

/// Radius around the origin kept clear of decorative scenery.
const OBSTACLE_CLEARANCE: f32 = 40.0;
/// Redraws allowed before falling back to a fixed point.
const SAMPLE_ATTEMPTS: usize = 16;

/// Rolls enemy placement and stats from a seedable RNG.
pub struct EnemySpawner {
    rng: StdRng,
    /// Enemies created since construction.
    pub total_spawned: u64,
}

impl EnemySpawner {
    /// `None` seeds from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            total_spawned: 0,
        }
    }

    /// Pick a spawn position on the ground.
    ///
    /// The player push can land a point back inside the origin square, so
    /// each draw is re-checked and redrawn a bounded number of times.
    pub fn sample_position(&mut self, player_pos: Vec3, tuning: &Tuning) -> Vec3 {
        let ex = tuning.exclusion_radius;
        for _ in 0..SAMPLE_ATTEMPTS {
            let (x, z) = self.draw(player_pos, tuning);
            if !(x.abs() < ex && z.abs() < ex) {
                return Vec3::new(x, height(x, z), z);
            }
        }

        // Band corner on the far side of the origin from the player
        let edge = ex + tuning.exclusion_band * 0.5;
        let x = -sign(player_pos.x) * edge;
        let z = -sign(player_pos.z) * edge;
        log::debug!("Spawn draws exhausted near {:?}, using ({}, {})", player_pos, x, z);
        Vec3::new(x, height(x, z), z)
    }

    fn draw(&mut self, player_pos: Vec3, tuning: &Tuning) -> (f32, f32) {
        let area = tuning.spawn_area;
        let mut x = (self.rng.gen::<f32>() - 0.5) * area;
        let mut z = (self.rng.gen::<f32>() - 0.5) * area;

        let ex = tuning.exclusion_radius;
        if x.abs() < ex && z.abs() < ex {
            x = sign(x) * (ex + self.rng.gen::<f32>() * tuning.exclusion_band);
            z = sign(z) * (ex + self.rng.gen::<f32>() * tuning.exclusion_band);
        }

        let dx = x - player_pos.x;
        let dz = z - player_pos.z;
        let dist = (dx * dx + dz * dz).sqrt();
        let clearance = tuning.player_clearance;
        if dist < clearance {
            let (ux, uz) = if dist > 0.0 {
                (dx / dist, dz / dist)
            } else {
                (1.0, 0.0)
            };
            x = player_pos.x + ux * clearance;
            z = player_pos.z + uz * clearance;
        }
        (x, z)
    }

    /// Roll stats for a new enemy at a fresh position.
    pub fn roll_enemy(&mut self, player_pos: Vec3, tuning: &Tuning) -> EnemyBundle {
        let position = self.sample_position(player_pos, tuning);
        let speed = tuning.enemy_base_speed + self.rng.gen::<f32>() * tuning.enemy_speed_range;
        let interval =
            tuning.attack_interval_secs + self.rng.gen::<f32>() * tuning.attack_interval_range_secs;
        EnemyBundle::new(position, speed, tuning.enemy_radius, tuning.enemy_health, interval)
    }

    /// Spawn up to `count` enemies without exceeding the cap. Returns how many were created.
    pub fn spawn_enemies(
        &mut self,
        horde: &mut Horde,
        count: usize,
        player_pos: Vec3,
        tuning: &Tuning,
    ) -> usize {
        let room = tuning.enemy_cap.saturating_sub(horde.live_count());
        let n = count.min(room);
        for _ in 0..n {
            let bundle = self.roll_enemy(player_pos, tuning);
            horde.spawn(bundle);
        }
        self.total_spawned += n as u64;
        n
    }

    /// Initial batch of enemies.
    pub fn populate_world(&mut self, horde: &mut Horde, player_pos: Vec3, tuning: &Tuning) -> usize {
        let n = self.spawn_enemies(horde, tuning.initial_enemies, player_pos, tuning);
        log::info!("Populated world with {} enemies", n);
        n
    }

    /// Decorative scenery; not part of gameplay state.
    pub fn scatter_scenery(&mut self, tuning: &Tuning) -> Vec<Obstacle> {
        scatter_obstacles(
            &mut self.rng,
            tuning.obstacle_count,
            tuning.spawn_area,
            OBSTACLE_CLEARANCE,
        )
    }
}

/// Sign with zero counted as positive.
fn sign(v: f32) -> f32 {
    if v < 0.0 {
        -1.0
    } else {
        1.0
    }
}
