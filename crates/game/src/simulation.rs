//! The simulation context: owns the player, the horde and every timer, and
//! advances them one host frame at a time.
//!
//! Frame order: due timers, player movement, firing, separation,
//! pursuit/attack, death sweep, effects, camera sync, then render and HUD.
//! Nothing else mutates the player or the horde.

use engine_core::{Scheduler, TimerId, Time, Transform, Vec3};
use input::FrameInput;
use procgen::{Obstacle, ObstacleKind};
use renderer::{Camera, InstanceData, Renderer, SceneSnapshot};
use std::collections::HashMap;

use crate::combat::fire_hitscan;
use crate::config::{GameConfig, Tuning};
use crate::effects::{ActiveEffects, EffectId, EffectQueue};
use crate::enemy::{part_spheres, Enemy, Horde, PART_COLORS};
use crate::error::SimError;
use crate::events::TimerEvent;
use crate::horde_ai::{apply_separation, sweep_dead, update_horde};
use crate::hud::{HudSink, HudStatus};
use crate::player::Player;
use crate::spawner::EnemySpawner;
use crate::state::{GameMessages, GamePhase, SessionStats};
use crate::weapons::FireOutcome;

pub struct Simulation {
    tuning: Tuning,
    time: Time,
    scheduler: Scheduler<TimerEvent>,

    player: Player,
    horde: Horde,
    spawner: EnemySpawner,
    phase: GamePhase,
    stats: SessionStats,

    effects: ActiveEffects,
    effect_queue: EffectQueue,
    effect_timers: HashMap<EffectId, TimerId>,
    messages: GameMessages,

    camera: Camera,
    obstacles: Vec<Obstacle>,
    obstacle_instances: Vec<InstanceData>,

    wave_timer: Option<TimerId>,
    reload_timer: Option<TimerId>,
    respawn_timer: Option<TimerId>,
    /// Set on reset until the host resets its look control.
    look_reset: bool,
}

impl Simulation {
    pub fn new(config: &GameConfig) -> Self {
        let tuning = config.tuning.clone();
        let mut spawner = EnemySpawner::new(config.seed);
        let player = Player::new(&tuning);
        let mut horde = Horde::new();

        let obstacles = spawner.scatter_scenery(&tuning);
        let obstacle_instances = obstacles.iter().map(obstacle_instance).collect();
        spawner.populate_world(&mut horde, player.position, &tuning);

        let mut camera = Camera::new(player.eye(&tuning));
        camera.set_yaw_pitch(0.0, 0.0);

        log::info!(
            "Simulation ready: {} enemies, {} obstacles",
            horde.live_count(),
            obstacles.len()
        );

        Self {
            time: Time::new(config.max_frame_dt),
            scheduler: Scheduler::new(),
            player,
            horde,
            spawner,
            phase: GamePhase::Playing,
            stats: SessionStats::default(),
            effects: ActiveEffects::new(),
            effect_queue: EffectQueue::default(),
            effect_timers: HashMap::new(),
            messages: GameMessages::new(),
            camera,
            obstacles,
            obstacle_instances,
            wave_timer: None,
            reload_timer: None,
            respawn_timer: None,
            look_reset: false,
            tuning,
        }
    }

    /// Advance one host frame, then draw it and update the HUD.
    ///
    /// A fault aborts the rest of the tick but the frame is still drawn;
    /// the next call starts clean.
    pub fn frame(
        &mut self,
        now_ms: f64,
        input: &FrameInput,
        renderer: &mut dyn Renderer,
        hud: &mut dyn HudSink,
    ) -> Result<(), SimError> {
        let result = self.step(now_ms, input);
        renderer.render_frame(&self.snapshot());
        hud.update(&self.hud_status(), &self.messages);
        result
    }

    /// Advance the simulation to host time `now_ms` without drawing.
    pub fn step(&mut self, now_ms: f64, input: &FrameInput) -> Result<(), SimError> {
        let dt = self.time.tick(now_ms);
        if self.wave_timer.is_none() {
            self.restart_wave_timer(now_ms);
        }
        self.process_timers(now_ms);

        let alive = self.phase == GamePhase::Playing;
        if alive {
            self.player.update_movement(input, &self.tuning, dt);
            if input.reload {
                self.request_reload(now_ms);
            }
            if input.fire {
                self.fire(now_ms, input)?;
            }
        }

        apply_separation(&mut self.horde, self.tuning.separation_epsilon);
        update_horde(
            &mut self.horde,
            self.player.position,
            &mut self.player.health,
            alive,
            &self.tuning,
            dt,
            &mut self.effect_queue,
        );
        if alive && self.player.is_dead() {
            self.on_player_death(now_ms);
        }

        for entity in sweep_dead(&mut self.horde)? {
            self.stats.kills += 1;
            log::debug!("Enemy {:?} killed ({} total)", entity, self.stats.kills);
            self.messages
                .success(format!("Enemy down! ({} kills)", self.stats.kills));
        }
        self.horde.sync_hitboxes();

        self.flush_effects(now_ms);
        self.messages.update(dt);
        if self.phase == GamePhase::Playing {
            self.stats.time_survived += dt;
        }

        self.camera.set_position(self.player.eye(&self.tuning));
        self.camera.set_yaw_pitch(input.yaw, input.pitch);
        Ok(())
    }

    fn process_timers(&mut self, now_ms: f64) {
        for (id, event) in self.scheduler.drain_due(now_ms) {
            match event {
                TimerEvent::ReloadComplete => {
                    if self.reload_timer == Some(id) {
                        self.reload_timer = None;
                        let moved = self.player.weapon.finish_reload();
                        log::debug!("Reload complete: +{} rounds", moved);
                    }
                }
                TimerEvent::Respawn => {
                    if self.respawn_timer == Some(id) {
                        self.respawn_timer = None;
                        self.reset(now_ms);
                    }
                }
                TimerEvent::EffectExpired(effect) => {
                    self.effect_timers.remove(&effect);
                    self.effects.expire(effect);
                }
                TimerEvent::WaveSpawn => {
                    // A wave drained alongside a reset belongs to the cancelled timer
                    if self.wave_timer == Some(id) {
                        self.spawn_wave();
                    }
                }
            }
        }
    }

    fn fire(&mut self, now_ms: f64, input: &FrameInput) -> Result<(), SimError> {
        match self.player.weapon.try_fire(now_ms) {
            FireOutcome::Fired => {
                self.stats.shots_fired += 1;
                let eye = self.player.eye(&self.tuning);
                let direction = Transform::from_yaw_pitch(eye, input.yaw, input.pitch).forward();
                let hit = fire_hitscan(
                    &mut self.horde,
                    eye,
                    direction,
                    &self.tuning,
                    &mut self.effect_queue,
                )?;
                if let Some(hit) = hit {
                    self.stats.shots_hit += 1;
                    self.stats.damage_dealt += hit.damage_dealt;
                }
            }
            FireOutcome::OutOfAmmo => {
                self.request_reload(now_ms);
            }
            FireOutcome::Reloading | FireOutcome::CoolingDown => {}
        }
        Ok(())
    }

    /// Start a reload if the weapon allows it. Returns whether one started.
    pub fn request_reload(&mut self, now_ms: f64) -> bool {
        if !self.player.weapon.start_reload() {
            return false;
        }
        let id = self
            .scheduler
            .schedule_once(now_ms, self.tuning.reload_ms, TimerEvent::ReloadComplete);
        self.reload_timer = Some(id);
        log::debug!("Reloading ({} in reserve)", self.player.weapon.reserve_ammo);
        true
    }

    fn on_player_death(&mut self, now_ms: f64) {
        self.phase = GamePhase::Dead;
        self.stats.deaths += 1;
        let id = self
            .scheduler
            .schedule_once(now_ms, self.tuning.respawn_delay_ms, TimerEvent::Respawn);
        self.respawn_timer = Some(id);
        self.messages.warning("You died! Respawning...");
        log::info!(
            "Player died after {} with {} kills; respawn in {} ms",
            self.stats.time_survived_str(),
            self.stats.kills,
            self.tuning.respawn_delay_ms
        );
    }

    fn spawn_wave(&mut self) {
        let n = self.spawner.spawn_enemies(
            &mut self.horde,
            self.tuning.wave_size,
            self.player.position,
            &self.tuning,
        );
        if n > 0 {
            log::debug!("Wave: +{} enemies ({} alive)", n, self.horde.live_count());
        }
    }

    /// Cancel the running wave timer (if any) and start a fresh one.
    fn restart_wave_timer(&mut self, now_ms: f64) {
        if let Some(old) = self.wave_timer.take() {
            self.scheduler.cancel(old);
        }
        self.wave_timer = Some(self.scheduler.schedule_repeating(
            now_ms,
            self.tuning.wave_interval_ms,
            TimerEvent::WaveSpawn,
        ));
    }

    /// Full game reset: player back at the origin with full health, fresh
    /// horde, new wave timer. Ammo carries over.
    pub fn reset(&mut self, now_ms: f64) {
        log::info!("Resetting game");

        if let Some(id) = self.respawn_timer.take() {
            self.scheduler.cancel(id);
        }
        if self.tuning.cancel_reload_on_reset {
            if let Some(id) = self.reload_timer.take() {
                self.scheduler.cancel(id);
                self.player.weapon.cancel_reload();
            }
        }
        for (_, id) in self.effect_timers.drain() {
            self.scheduler.cancel(id);
        }
        self.effects.clear();
        self.effect_queue.drain();

        self.player.respawn();
        self.horde.clear();
        self.spawner
            .populate_world(&mut self.horde, self.player.position, &self.tuning);
        self.restart_wave_timer(now_ms);

        self.stats.reset_for_new_life();
        self.phase = GamePhase::Playing;
        self.look_reset = true;
        self.messages.info("Back in the fight");
    }

    fn flush_effects(&mut self, now_ms: f64) {
        for kind in self.effect_queue.drain() {
            let (id, duration) = self.effects.start(kind, now_ms);
            let timer = self
                .scheduler
                .schedule_once(now_ms, duration, TimerEvent::EffectExpired(id));
            self.effect_timers.insert(id, timer);
        }
    }

    /// Everything the renderer needs for this frame.
    pub fn snapshot(&self) -> SceneSnapshot {
        let mut scene = SceneSnapshot::new(&self.camera);
        for (entity, (transform, enemy)) in self.horde.world.query::<(&Transform, &Enemy)>().iter() {
            let pulse = self.effects.enemy_pulse(entity);
            for ((centre, radius), base) in part_spheres(transform.position, enemy.radius).zip(PART_COLORS) {
                let tint = pulse.map_or(base, |p| p.tint);
                let scale = radius * pulse.map_or(1.0, |p| p.scale);
                scene.enemies.push(InstanceData::from_parts(
                    centre,
                    transform.rotation,
                    Vec3::splat(scale),
                    tint,
                ));
            }
        }
        scene.obstacles = self.obstacle_instances.clone();
        scene.muzzle_flash = self.effects.muzzle_flash_active();
        scene.damage_overlay = self.effects.damage_overlay();
        scene
    }

    pub fn hud_status(&self) -> HudStatus {
        HudStatus {
            health_fraction: self.player.health.percentage(),
            ammo: self.player.weapon.current_ammo,
            reserve_ammo: self.player.weapon.reserve_ammo,
            is_reloading: self.player.weapon.is_reloading(),
            kills: self.stats.kills,
            enemies_alive: self.horde.live_count(),
            time_survived: self.stats.time_survived_str(),
            is_alive: self.phase == GamePhase::Playing,
        }
    }

    /// True once after each reset; the host then recentres its look control.
    pub fn take_look_reset(&mut self) -> bool {
        std::mem::take(&mut self.look_reset)
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn horde(&self) -> &Horde {
        &self.horde
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn messages_mut(&mut self) -> &mut GameMessages {
        &mut self.messages
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    #[cfg(test)]
    pub(crate) fn horde_mut(&mut self) -> &mut Horde {
        &mut self.horde
    }

    #[cfg(test)]
    pub(crate) fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }
}

fn obstacle_instance(o: &Obstacle) -> InstanceData {
    let color = match o.kind {
        ObstacleKind::Rock => [0.45, 0.42, 0.38, 1.0],
        ObstacleKind::Pillar => [0.5, 0.5, 0.55, 1.0],
    };
    InstanceData::from_parts(o.position, o.rotation, o.scale, color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::EnemyBundle;
    use crate::hud::LogHud;
    use procgen::height;
    use renderer::HeadlessRenderer;

    fn sim() -> Simulation {
        let config = GameConfig {
            seed: Some(7),
            ..GameConfig::default()
        };
        Simulation::new(&config)
    }

    fn idle() -> FrameInput {
        FrameInput::default()
    }

    fn firing() -> FrameInput {
        FrameInput {
            fire: true,
            ..FrameInput::default()
        }
    }

    /// Empty the horde and put one enemy on the -Z axis at `z`.
    fn lone_enemy(sim: &mut Simulation, z: f32) -> hecs::Entity {
        sim.horde.clear();
        sim.horde.spawn(EnemyBundle::new(
            Vec3::new(0.0, height(0.0, z), z),
            6.0,
            1.5,
            100.0,
            1.0,
        ))
    }

    #[test]
    fn starts_with_initial_population() {
        let mut s = sim();
        assert_eq!(s.horde().live_count(), 30);
        assert_eq!(s.phase(), GamePhase::Playing);
        s.step(0.0, &idle()).unwrap();
        assert!(s.wave_timer.is_some_and(|id| s.scheduler.is_pending(id)));
    }

    #[test]
    fn wave_arrives_on_the_interval() {
        let mut s = sim();
        s.horde.clear();
        for frame in 0..100 {
            s.step(frame as f64 * 100.0, &idle()).unwrap();
        }
        assert_eq!(s.horde().live_count(), 0);
        s.step(10_000.0, &idle()).unwrap();
        assert_eq!(s.horde().live_count(), 6);
    }

    #[test]
    fn two_strikes_leave_eighty_health() {
        let mut s = sim();
        lone_enemy(&mut s, -2.0);
        for frame in 0..=15 {
            s.step(frame as f64 * 100.0, &idle()).unwrap();
        }
        assert_eq!(s.player().health.current, 80.0);
        assert_eq!(s.phase(), GamePhase::Playing);
        assert!(s.respawn_timer.is_none());
    }

    #[test]
    fn death_then_respawn_after_delay() {
        let mut s = sim();
        lone_enemy(&mut s, -2.0);
        s.player.health.current = 5.0;

        s.step(0.0, &idle()).unwrap();
        assert_eq!(s.phase(), GamePhase::Dead);
        assert!(s.player().is_dead());
        assert_eq!(s.stats().deaths, 1);

        // Still down just before the delay; further strikes neither land nor reschedule
        s.step(1000.0, &idle()).unwrap();
        s.step(1999.0, &idle()).unwrap();
        assert_eq!(s.phase(), GamePhase::Dead);
        assert_eq!(s.stats().deaths, 1);

        s.step(2000.0, &idle()).unwrap();
        assert_eq!(s.phase(), GamePhase::Playing);
        assert_eq!(s.player().health.current, 100.0);
        assert_eq!(s.player().position, Player::spawn_point());
        assert_eq!(s.horde().live_count(), 30);
        assert_eq!(s.stats().deaths, 1);
        assert_eq!(s.stats().kills, 0);
        assert!(s.take_look_reset());
        assert!(!s.take_look_reset());
    }

    #[test]
    fn empty_magazine_reloads_instead_of_firing() {
        let mut s = sim();
        s.horde.clear();
        s.player.weapon.current_ammo = 0;

        s.step(0.0, &firing()).unwrap();
        assert!(s.player().weapon.is_reloading());
        assert_eq!(s.stats().shots_fired, 0);

        s.step(799.0, &idle()).unwrap();
        assert!(s.player().weapon.is_reloading());

        s.step(800.0, &idle()).unwrap();
        assert!(!s.player().weapon.is_reloading());
        assert_eq!(s.player().weapon.current_ammo, 30);
        assert_eq!(s.player().weapon.reserve_ammo, 90);
    }

    #[test]
    fn shots_inside_cooldown_are_ignored() {
        let mut s = sim();
        s.horde.clear();
        s.step(0.0, &firing()).unwrap();
        assert_eq!(s.player().weapon.current_ammo, 29);
        s.step(50.0, &firing()).unwrap();
        assert_eq!(s.player().weapon.current_ammo, 29);
        s.step(100.0, &firing()).unwrap();
        assert_eq!(s.player().weapon.current_ammo, 28);
        assert_eq!(s.stats().shots_fired, 2);
    }

    #[test]
    fn two_hits_kill_and_count_once() {
        let mut s = sim();
        let e = lone_enemy(&mut s, -20.0);

        s.step(0.0, &firing()).unwrap();
        assert!(s.horde().contains(e));
        assert_eq!(s.stats().shots_hit, 1);

        s.step(100.0, &firing()).unwrap();
        assert!(!s.horde().contains(e));
        assert_eq!(s.horde().live_count(), 0);
        assert!(s.horde().hitboxes.is_empty());
        assert_eq!(s.stats().kills, 1);
        assert_eq!(s.stats().damage_dealt, 100.0);

        s.step(200.0, &idle()).unwrap();
        assert_eq!(s.stats().kills, 1);
    }

    #[test]
    fn reset_replaces_the_wave_timer() {
        let mut s = sim();
        s.step(0.0, &idle()).unwrap();
        let old = s.wave_timer.unwrap();
        s.reset(500.0);
        let new = s.wave_timer.unwrap();
        assert_ne!(old, new);
        assert!(!s.scheduler.is_pending(old));
        assert!(s.scheduler.is_pending(new));

        // One wave at 10.5s, not one at 10s as well
        s.step(10_000.0, &idle()).unwrap();
        assert_eq!(s.horde().live_count(), 30);
        s.step(10_500.0, &idle()).unwrap();
        assert_eq!(s.horde().live_count(), 36);
    }

    #[test]
    fn reset_keeps_ammo() {
        let mut s = sim();
        s.horde.clear();
        s.step(0.0, &firing()).unwrap();
        s.reset(100.0);
        assert_eq!(s.player().weapon.current_ammo, 29);
    }

    #[test]
    fn reload_survives_reset_by_default() {
        let mut s = sim();
        s.horde.clear();
        s.player.weapon.current_ammo = 0;
        s.step(0.0, &firing()).unwrap();
        s.reset(100.0);
        assert!(s.player().weapon.is_reloading());
        s.horde.clear();
        s.step(800.0, &idle()).unwrap();
        assert_eq!(s.player().weapon.current_ammo, 30);
    }

    #[test]
    fn reload_can_be_cancelled_by_reset() {
        let mut config = GameConfig {
            seed: Some(7),
            ..GameConfig::default()
        };
        config.tuning.cancel_reload_on_reset = true;
        let mut s = Simulation::new(&config);
        s.horde.clear();
        s.player.weapon.current_ammo = 0;
        s.step(0.0, &firing()).unwrap();
        s.reset(100.0);
        assert!(!s.player().weapon.is_reloading());
        s.horde.clear();
        s.step(800.0, &idle()).unwrap();
        assert_eq!(s.player().weapon.current_ammo, 0);
        assert_eq!(s.player().weapon.reserve_ammo, 120);
    }

    #[test]
    fn muzzle_flash_expires_after_fifty_ms() {
        let mut s = sim();
        s.horde.clear();
        s.step(0.0, &firing()).unwrap();
        assert!(s.snapshot().muzzle_flash);
        s.step(49.0, &idle()).unwrap();
        assert!(s.snapshot().muzzle_flash);
        s.step(50.0, &idle()).unwrap();
        assert!(!s.snapshot().muzzle_flash);
        assert!(s.effects.is_empty());
        assert!(s.effect_timers.is_empty());
    }

    #[test]
    fn hit_enemy_is_tinted_in_snapshot() {
        let mut s = sim();
        lone_enemy(&mut s, -20.0);
        s.step(0.0, &firing()).unwrap();
        let scene = s.snapshot();
        assert_eq!(scene.enemies.len(), 2);
        assert!(scene.enemies.iter().all(|i| i.color == [1.0, 1.0, 1.0, 1.0]));
        s.step(100.0, &idle()).unwrap();
        assert_eq!(s.snapshot().enemies[0].color, PART_COLORS[0]);
    }

    #[test]
    fn reset_drops_pending_effects() {
        let mut s = sim();
        s.horde.clear();
        s.step(0.0, &firing()).unwrap();
        let before = s.pending_timers();
        s.reset(10.0);
        assert!(s.effects.is_empty());
        // Muzzle flash expiry gone, wave timer replaced
        assert_eq!(s.pending_timers(), before - 1);
    }

    #[test]
    fn fault_aborts_one_frame_only() {
        let mut s = sim();
        lone_enemy(&mut s, -20.0);
        s.horde.hitboxes.clear();
        let mut renderer = HeadlessRenderer::new();
        let mut hud = LogHud::new();

        let res = s.frame(0.0, &firing(), &mut renderer, &mut hud);
        assert!(matches!(res, Err(SimError::OrphanCollider(_))));
        assert_eq!(renderer.frames(), 1);

        assert!(s.frame(100.0, &idle(), &mut renderer, &mut hud).is_ok());
        assert_eq!(renderer.frames(), 2);
    }

    #[test]
    fn frame_draws_every_part_and_obstacle() {
        let mut s = sim();
        let mut renderer = HeadlessRenderer::new();
        let mut hud = LogHud::new();
        s.frame(0.0, &idle(), &mut renderer, &mut hud).unwrap();
        assert_eq!(
            renderer.last_instance_count(),
            s.horde().live_count() * 2 + s.obstacles().len()
        );
        let status = s.hud_status();
        assert_eq!(status.ammo_text(), "30 / 120");
        assert!(status.is_alive);
    }
}
