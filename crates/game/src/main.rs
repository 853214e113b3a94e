//! Horde Survival - first-person wave shooter, headless host.
//!
//! Runs the simulation on a synthetic clock with the autopilot at the
//! controls, drawing into the headless renderer and logging the HUD.

mod autopilot;
mod combat;
mod config;
mod effects;
mod enemy;
mod error;
mod events;
mod horde_ai;
mod hud;
mod player;
mod simulation;
mod spawner;
mod state;
mod weapons;

use anyhow::Result;
use input::{InputState, LookControl, LookError};
use procgen::{TerrainConfig, TerrainData};
use renderer::HeadlessRenderer;

use autopilot::Autopilot;
use config::GameConfig;
use hud::LogHud;
use simulation::Simulation;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║                   Horde Survival                     ║");
    println!("╠══════════════════════════════════════════════════════╣");
    println!("║  WASD  - Move          │  Mouse       - Look         ║");
    println!("║  Shift - Sprint        │  Left Click  - Fire         ║");
    println!("║  Space - Jump          │  R           - Reload       ║");
    println!("║  Right mouse drag looks when the cursor can't lock   ║");
    println!("╚══════════════════════════════════════════════════════╝");

    let config = GameConfig::load();

    let terrain = TerrainData::generate(TerrainConfig::default());
    log::info!(
        "Terrain: {} vertices, {} triangles",
        terrain.vertices.len(),
        terrain.indices.len() / 3
    );

    let mut sim = Simulation::new(&config);
    let mut renderer = HeadlessRenderer::new();
    let mut hud = LogHud::new();
    let mut input = InputState::new();
    let mut look = LookControl::new(config.sensitivity);
    let mut pilot = Autopilot::new();

    // No window, so no cursor to capture
    if let Some(line) = look.acquire(Err(LookError::Unsupported)) {
        sim.messages_mut().warning(line);
    }

    let fps = config.headless_fps.max(1.0);
    let frame_ms = 1000.0 / fps as f64;
    let frames = (config.headless_seconds.max(0.0) * fps) as u64;
    let mut faults = 0u32;

    log::info!(
        "Running {} frames at {} fps ({}s)",
        frames,
        fps,
        config.headless_seconds
    );

    for i in 0..frames {
        let now_ms = i as f64 * frame_ms;
        input.begin_frame();
        pilot.drive(&sim, &look, &mut input, (frame_ms / 1000.0) as f32);
        let frame = input.frame_input(&mut look);

        if let Err(e) = sim.frame(now_ms, &frame, &mut renderer, &mut hud) {
            faults += 1;
            log::error!("Frame {} aborted: {}", i, e);
        }

        if sim.take_look_reset() {
            look.reset();
            pilot.reset();
        }
    }

    let stats = sim.stats();
    log::info!(
        "Session over at {:.1}s after {} frames: {} kills this life, {} deaths, {:.0}% accuracy",
        sim.time().elapsed_seconds(),
        sim.time().frame_count(),
        stats.kills,
        stats.deaths,
        stats.accuracy() * 100.0
    );
    log::info!(
        "{} enemies alive, ammo {}, {} frames drawn, {} faults",
        sim.horde().live_count(),
        sim.player().weapon.ammo_display(),
        renderer.frames(),
        faults
    );
    log::debug!("{} timers still pending", sim.pending_timers());

    Ok(())
}
