//! Player controller and state.
//!
//! `position` is the player's feet; the camera sits `eye_height` above it.

use engine_core::{Health, Transform, Vec3, Velocity};
use input::FrameInput;
use procgen::height;

use crate::config::Tuning;
use crate::weapons::Weapon;

/// Player record: movement state, health and the rifle.
#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec3,
    pub velocity: Velocity,
    pub is_grounded: bool,
    pub health: Health,
    pub weapon: Weapon,
}

impl Player {
    /// A fresh player standing on the ground at the origin.
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            position: Self::spawn_point(),
            velocity: Velocity::default(),
            is_grounded: true,
            health: Health::new(tuning.player_max_health),
            weapon: Weapon::new(tuning),
        }
    }

    pub fn spawn_point() -> Vec3 {
        Vec3::new(0.0, height(0.0, 0.0), 0.0)
    }

    /// Back to the spawn point at full health, at rest. Ammo is untouched.
    pub fn respawn(&mut self) {
        self.position = Self::spawn_point();
        self.velocity = Velocity::default();
        self.is_grounded = true;
        self.health.restore();
    }

    /// One tick of movement: damping, gravity, jump, integrate, ground clamp.
    pub fn update_movement(&mut self, input: &FrameInput, tuning: &Tuning, dt: f32) {
        let v = &mut self.velocity.linear;

        // Ease horizontal velocity toward the intended velocity.
        // `keep` never goes negative, so the damped part cannot flip sign.
        let keep = (1.0 - tuning.damping * dt).max(0.0);
        let wish = wish_direction(input);
        let speed = if input.sprint {
            tuning.sprint_speed
        } else {
            tuning.walk_speed
        };
        let target = wish * speed;
        v.x = v.x * keep + target.x * (1.0 - keep);
        v.z = v.z * keep + target.z * (1.0 - keep);

        v.y -= tuning.gravity * dt;
        if input.jump && self.is_grounded {
            v.y = tuning.jump_velocity;
        }

        self.position += *v * dt;

        let ground = height(self.position.x, self.position.z);
        if self.position.y <= ground {
            self.velocity.linear.y = 0.0;
            self.position.y = ground;
            self.is_grounded = true;
        } else {
            self.is_grounded = false;
        }
    }

    /// Camera position.
    pub fn eye(&self, tuning: &Tuning) -> Vec3 {
        self.position + Vec3::Y * tuning.eye_height
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }
}

/// Unit world-space direction from the movement axes, turned by yaw only.
pub fn wish_direction(input: &FrameInput) -> Vec3 {
    if !input.has_move_intent() {
        return Vec3::ZERO;
    }
    let view = Transform::from_yaw_pitch(Vec3::ZERO, input.yaw, 0.0);
    (view.forward() * input.forward + view.right() * input.strafe).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tuning() -> Tuning {
        Tuning::default()
    }

    fn idle() -> FrameInput {
        FrameInput::default()
    }

    #[test]
    fn diagonal_is_not_faster() {
        let axis = wish_direction(&FrameInput {
            forward: 1.0,
            ..idle()
        });
        let diag = wish_direction(&FrameInput {
            forward: 1.0,
            strafe: -1.0,
            ..idle()
        });
        assert!((axis.length() - 1.0).abs() < 1e-6);
        assert!((diag.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn pitch_does_not_tilt_movement() {
        let level = wish_direction(&FrameInput {
            forward: 1.0,
            yaw: 0.4,
            ..idle()
        });
        let pitched = wish_direction(&FrameInput {
            forward: 1.0,
            yaw: 0.4,
            pitch: 1.3,
            ..idle()
        });
        assert_eq!(level, pitched);
        assert_eq!(level.y, 0.0);
    }

    #[test]
    fn walking_approaches_walk_speed() {
        let t = tuning();
        let mut p = Player::new(&t);
        let input = FrameInput {
            forward: 1.0,
            ..idle()
        };
        for _ in 0..300 {
            p.update_movement(&input, &t, 1.0 / 60.0);
        }
        let speed = p.velocity.horizontal().length();
        assert!((speed - t.walk_speed).abs() < 0.01, "speed {speed}");
        // Yaw 0 looks down -Z
        assert!(p.position.z < -50.0);
    }

    #[test]
    fn falls_onto_the_ground() {
        let t = tuning();
        let mut p = Player::new(&t);
        p.position = Vec3::new(37.0, 60.0, -81.0);
        p.is_grounded = false;
        for _ in 0..400 {
            p.update_movement(&idle(), &t, 1.0 / 60.0);
        }
        assert_eq!(p.position.y, height(37.0, -81.0));
        assert!(p.is_grounded);
        assert_eq!(p.velocity.linear.y, 0.0);
    }

    #[test]
    fn jump_leaves_ground_next_tick_and_no_double_jump() {
        let t = tuning();
        let mut p = Player::new(&t);
        p.update_movement(&idle(), &t, 1.0 / 60.0);
        assert!(p.is_grounded);

        let jump = FrameInput {
            jump: true,
            ..idle()
        };
        p.update_movement(&jump, &t, 1.0 / 60.0);
        assert!(!p.is_grounded);
        let vy = p.velocity.linear.y;
        assert_eq!(vy, t.jump_velocity);

        // Airborne jump request is ignored; gravity keeps pulling
        p.update_movement(&jump, &t, 1.0 / 60.0);
        assert!(p.velocity.linear.y < vy);
    }

    #[test]
    fn respawn_restores_health_but_not_ammo() {
        let t = tuning();
        let mut p = Player::new(&t);
        p.health.take_damage(100.0);
        p.weapon.current_ammo = 4;
        p.position = Vec3::new(100.0, 50.0, 100.0);
        p.velocity.linear = Vec3::new(3.0, -2.0, 1.0);
        p.respawn();
        assert_eq!(p.health.current, 100.0);
        assert_eq!(p.position, Player::spawn_point());
        assert_eq!(p.velocity.linear, Vec3::ZERO);
        assert_eq!(p.weapon.current_ammo, 4);
    }

    proptest! {
        #[test]
        fn zero_intent_damps_without_sign_flips(
            vx in -100.0f32..100.0,
            vz in -100.0f32..100.0,
            dt in 0.0f32..0.5,
        ) {
            let t = tuning();
            let mut p = Player::new(&t);
            p.velocity.linear = Vec3::new(vx, 0.0, vz);
            let mut prev = p.velocity.horizontal();
            for _ in 0..50 {
                p.update_movement(&idle(), &t, dt);
                let now = p.velocity.horizontal();
                prop_assert!(now.x * vx >= 0.0);
                prop_assert!(now.z * vz >= 0.0);
                prop_assert!(now.length() <= prev.length() + 1e-4);
                prev = now;
            }
        }
    }
}
