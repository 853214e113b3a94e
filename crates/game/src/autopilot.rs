//! Scripted player for the headless host.
//!
//! The pilot produces the same device events a person would (keys, buttons,
//! relative mouse motion), so the full input path runs without a window.

use engine_core::{flat_distance, Vec3};
use input::{ElementState, InputState, KeyCode, LookControl, MouseButton, PITCH_LIMIT};
use std::f32::consts::{PI, TAU};

use crate::simulation::Simulation;
use crate::state::GamePhase;

/// Back off (and sprint) when the nearest enemy is closer than this.
const BACK_OFF_DISTANCE: f32 = 15.0;
/// Seconds between strafe direction changes.
const STRAFE_PERIOD: f32 = 2.0;
/// Top up the magazine below this many rounds, but only when nothing is near.
const LOW_AMMO: u32 = 5;
const CALM_DISTANCE: f32 = 40.0;

#[derive(Debug, Default)]
pub struct Autopilot {
    strafe_clock: f32,
    strafe_right: bool,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this frame's events into `input`.
    ///
    /// Call between `input.begin_frame()` and `input.frame_input(look)`.
    /// Mouse motion lands one frame late, so aim is measured against where
    /// the view will be once the delta already in flight is applied.
    pub fn drive(&mut self, sim: &Simulation, look: &LookControl, input: &mut InputState, dt: f32) {
        if sim.phase() == GamePhase::Dead {
            release_all(input);
            return;
        }
        // Drag-look only turns while this is held; harmless under pointer lock
        set_button(input, MouseButton::Right, true);

        self.strafe_clock += dt;
        if self.strafe_clock >= STRAFE_PERIOD {
            self.strafe_clock -= STRAFE_PERIOD;
            self.strafe_right = !self.strafe_right;
        }
        set_key(input, KeyCode::KeyD, self.strafe_right);
        set_key(input, KeyCode::KeyA, !self.strafe_right);

        let tuning = sim.tuning();
        let player = sim.player();
        let target = sim
            .horde()
            .positions()
            .into_iter()
            .map(|(_, feet)| feet)
            .min_by(|a, b| {
                flat_distance(*a, player.position).total_cmp(&flat_distance(*b, player.position))
            });

        let Some(feet) = target else {
            set_key(input, KeyCode::KeyS, false);
            set_key(input, KeyCode::ShiftLeft, false);
            set_button(input, MouseButton::Left, false);
            return;
        };
        let range = flat_distance(feet, player.position);
        let close = range < BACK_OFF_DISTANCE;
        set_key(input, KeyCode::KeyS, close);
        set_key(input, KeyCode::ShiftLeft, close);

        let k = look.radians_per_pixel();
        let in_flight = input.mouse_delta();
        let yaw_now = look.yaw() - in_flight.x * k;
        let pitch_now = (look.pitch() - in_flight.y * k).clamp(-PITCH_LIMIT, PITCH_LIMIT);

        let eye = player.eye(tuning);
        let aim = feet + Vec3::Y * tuning.enemy_radius;
        let (yaw, pitch) = aim_angles(eye, aim);
        let yaw_err = wrap_angle(yaw - yaw_now);
        let pitch_err = pitch - pitch_now;
        if k > 0.0 {
            input.process_mouse_motion(((-yaw_err / k) as f64, (-pitch_err / k) as f64));
        }

        let dist = (aim - eye).length().max(1.0);
        let tolerance = (tuning.enemy_radius * 0.5 / dist).max(0.002);
        let on_target =
            yaw_err.abs() < tolerance && pitch_err.abs() < tolerance && dist < tuning.ray_length;
        tap_button(input, MouseButton::Left, on_target);

        let weapon = &player.weapon;
        let top_up =
            weapon.current_ammo < LOW_AMMO && !weapon.is_reloading() && range > CALM_DISTANCE;
        tap_key(input, KeyCode::KeyR, top_up);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Yaw and pitch that point the view from `eye` at `target`.
pub fn aim_angles(eye: Vec3, target: Vec3) -> (f32, f32) {
    let d = target - eye;
    let horizontal = (d.x * d.x + d.z * d.z).sqrt();
    let yaw = (-d.x).atan2(-d.z);
    let pitch = d.y.atan2(horizontal).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    (yaw, pitch)
}

/// Wrap to [-π, π).
fn wrap_angle(a: f32) -> f32 {
    (a + PI).rem_euclid(TAU) - PI
}

fn state(held: bool) -> ElementState {
    if held {
        ElementState::Pressed
    } else {
        ElementState::Released
    }
}

fn set_key(input: &mut InputState, key: KeyCode, held: bool) {
    if held != input.is_key_held(key) {
        input.process_keyboard(key, state(held));
    }
}

fn set_button(input: &mut InputState, button: MouseButton, held: bool) {
    if held != input.is_mouse_held(button) {
        input.process_mouse_button(button, state(held));
    }
}

/// Release then press, so each tap is a fresh edge.
fn tap_key(input: &mut InputState, key: KeyCode, on: bool) {
    set_key(input, key, false);
    if on {
        input.process_keyboard(key, ElementState::Pressed);
    }
}

fn tap_button(input: &mut InputState, button: MouseButton, on: bool) {
    set_button(input, button, false);
    if on {
        input.process_mouse_button(button, ElementState::Pressed);
    }
}

fn release_all(input: &mut InputState) {
    for key in [
        KeyCode::KeyW,
        KeyCode::KeyA,
        KeyCode::KeyS,
        KeyCode::KeyD,
        KeyCode::KeyR,
        KeyCode::Space,
        KeyCode::ShiftLeft,
    ] {
        set_key(input, key, false);
    }
    for button in [MouseButton::Left, MouseButton::Right] {
        set_button(input, button, false);
    }
}
