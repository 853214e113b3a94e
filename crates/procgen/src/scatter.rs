//! Decorative scenery placement.
//!
//! Obstacles are pure set dressing: nothing collides with them and they are
//! not part of gameplay state. They are placed once per world build.

use glam::{Quat, Vec3};
use rand::Rng;

use crate::terrain::height;

/// Kind of decorative obstacle (picks the mesh on the render side).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Rock,
    Pillar,
}

/// A static decorative obstacle resting on the terrain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

/// Scatter `count` obstacles uniformly over a `range`×`range` square centred on
/// the origin, skipping anything within `clearance` of the origin so the
/// spawn point stays open. Fewer than `count` may be returned.
pub fn scatter_obstacles<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    range: f32,
    clearance: f32,
) -> Vec<Obstacle> {
    let clearance_sq = clearance * clearance;
    let mut obstacles = Vec::with_capacity(count);

    for _ in 0..count {
        let x = (rng.gen::<f32>() - 0.5) * range;
        let z = (rng.gen::<f32>() - 0.5) * range;
        if x * x + z * z < clearance_sq {
            continue;
        }

        let (kind, scale) = if rng.gen::<f32>() < 0.75 {
            let s = 2.0 + rng.gen::<f32>() * 4.0;
            (ObstacleKind::Rock, Vec3::splat(s))
        } else {
            let w = 1.5 + rng.gen::<f32>() * 1.5;
            let h = 6.0 + rng.gen::<f32>() * 10.0;
            (ObstacleKind::Pillar, Vec3::new(w, h, w))
        };

        let y = height(x, z);
        obstacles.push(Obstacle {
            kind,
            position: Vec3::new(x, y + scale.y * 0.5, z),
            rotation: Quat::from_rotation_y(rng.gen::<f32>() * std::f32::consts::TAU),
            scale,
        });
    }

    obstacles
}
