//! Horde AI: separation, straight-line pursuit, melee attacks and the death sweep.
//!
//! All distances here are measured on the XZ plane. Enemy height always
//! follows the terrain.

use engine_core::{AttackTimer, Damage, Health, Transform, Vec3};
use hecs::Entity;
use procgen::height;

use crate::config::Tuning;
use crate::effects::EffectsSink;
use crate::enemy::{Enemy, Horde};
use crate::error::SimError;

/// Slack so a pinned enemy stays pinned.
const PIN_SLACK: f32 = 1e-3;

fn flat(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Push overlapping enemies apart, pair by pair.
///
/// A pair closer than `r_a + r_b + epsilon` is moved apart symmetrically
/// along the line joining them until it sits exactly at that distance.
/// Pairs at the same spot are left alone. O(n²); fine for a capped horde.
pub fn apply_separation(horde: &mut Horde, epsilon: f32) {
    let mut bodies: Vec<(Entity, Vec3, f32)> = horde
        .world
        .query::<(&Transform, &Enemy)>()
        .iter()
        .map(|(e, (t, enemy))| (e, t.position, enemy.radius))
        .collect();

    if bodies.len() < 2 {
        return;
    }

    let mut moved = vec![false; bodies.len()];
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let diff = flat(bodies[i].1 - bodies[j].1);
            let dist = diff.length();
            let min_dist = bodies[i].2 + bodies[j].2 + epsilon;
            if dist >= min_dist || dist <= 0.0 {
                continue;
            }
            let push = diff / dist * ((min_dist - dist) * 0.5);
            bodies[i].1 += push;
            bodies[j].1 -= push;
            moved[i] = true;
            moved[j] = true;
        }
    }

    for (idx, (entity, pos, _)) in bodies.into_iter().enumerate() {
        if !moved[idx] {
            continue;
        }
        if let Ok(mut transform) = horde.world.get::<&mut Transform>(entity) {
            transform.position = Vec3::new(pos.x, height(pos.x, pos.z), pos.z);
        }
    }
}

/// Chase, attack and cool down every live enemy.
///
/// Enemies outside melee range close in at their own speed, never past the
/// melee ring. Inside it they
/// are pinned to the melee distance and strike when their cooldown is spent,
/// but only while `can_be_hit`. Returns the number of attacks that landed.
pub fn update_horde(
    horde: &mut Horde,
    player_pos: Vec3,
    player_health: &mut Health,
    can_be_hit: bool,
    tuning: &Tuning,
    dt: f32,
    effects: &mut dyn EffectsSink,
) -> u32 {
    let melee_range = tuning.melee_range();
    let strike = Damage::melee(tuning.enemy_attack_damage);
    let mut landed = 0;

    for (entity, (transform, enemy, attack, health)) in horde
        .world
        .query_mut::<(&mut Transform, &Enemy, &mut AttackTimer, &Health)>()
    {
        // Dead but not yet swept
        if health.is_dead() {
            continue;
        }

        let offset = flat(transform.position - player_pos);
        let distance = offset.length();

        if distance > melee_range + PIN_SLACK {
            // Stop at the melee ring rather than stepping through it
            let travel = (enemy.speed * dt).min(distance - melee_range);
            transform.position += -offset / distance * travel;
        } else {
            if distance > 0.0 {
                let pinned = player_pos + offset / distance * melee_range;
                transform.position.x = pinned.x;
                transform.position.z = pinned.z;
            }
            if can_be_hit && attack.can_attack() {
                strike.apply(player_health);
                attack.trigger_attack();
                effects.attack_flash(entity);
                effects.damage_flash();
                landed += 1;
            }
        }

        transform.position.y = height(transform.position.x, transform.position.z);
        transform.face_towards_flat(player_pos);
        attack.update_cooldown(dt);
    }

    landed
}

/// Remove every enemy at zero health. Returns the removed entities.
pub fn sweep_dead(horde: &mut Horde) -> Result<Vec<Entity>, SimError> {
    let dead: Vec<Entity> = horde
        .world
        .query::<(&Health, &Enemy)>()
        .iter()
        .filter(|(_, (health, _))| health.is_dead())
        .map(|(e, _)| e)
        .collect();

    for &entity in &dead {
        horde.despawn(entity)?;
    }
    Ok(dead)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{EffectKind, EffectQueue};
    use crate::enemy::EnemyBundle;
    use engine_core::flat_distance;

    fn spawn(horde: &mut Horde, x: f32, z: f32, interval: f32) -> Entity {
        horde.spawn(EnemyBundle::new(
            Vec3::new(x, height(x, z), z),
            6.0,
            1.5,
            100.0,
            interval,
        ))
    }

    fn pos(horde: &Horde, e: Entity) -> Vec3 {
        horde.world.get::<&Transform>(e).unwrap().position
    }

    #[test]
    fn overlapping_pair_ends_exactly_apart() {
        let mut horde = Horde::new();
        let a = spawn(&mut horde, 100.0, 100.0, 1.0);
        let b = spawn(&mut horde, 101.0, 100.0, 1.0);
        apply_separation(&mut horde, 0.05);
        let (pa, pb) = (pos(&horde, a), pos(&horde, b));
        assert!((flat_distance(pa, pb) - 3.05).abs() < 1e-4);
        // Symmetric about the old midpoint
        assert!(((pa.x + pb.x) * 0.5 - 100.5).abs() < 1e-4);
        assert_eq!(pa.y, height(pa.x, pa.z));
    }

    #[test]
    fn coincident_pair_is_left_alone() {
        let mut horde = Horde::new();
        let a = spawn(&mut horde, 50.0, 50.0, 1.0);
        let b = spawn(&mut horde, 50.0, 50.0, 1.0);
        apply_separation(&mut horde, 0.05);
        assert_eq!(pos(&horde, a), pos(&horde, b));
    }

    #[test]
    fn far_enemy_chases_at_its_speed() {
        let t = Tuning::default();
        let mut horde = Horde::new();
        let e = spawn(&mut horde, 0.0, -100.0, 1.0);
        let mut hp = Health::new(100.0);
        let mut fx = EffectQueue::default();
        let landed = update_horde(&mut horde, Vec3::ZERO, &mut hp, true, &t, 0.5, &mut fx);
        assert_eq!(landed, 0);
        let p = pos(&horde, e);
        assert!((p.z - -97.0).abs() < 1e-4);
        assert!(p.x.abs() < 1e-5);
        assert_eq!(p.y, height(p.x, p.z));
    }

    #[test]
    fn two_attacks_take_twenty_health() {
        let t = Tuning::default();
        let mut horde = Horde::new();
        spawn(&mut horde, 0.0, -2.0, 1.0);
        let mut hp = Health::new(100.0);
        let mut fx = EffectQueue::default();

        // First strike lands immediately, the next once the 1s interval is spent
        assert_eq!(update_horde(&mut horde, Vec3::ZERO, &mut hp, true, &t, 0.25, &mut fx), 1);
        for _ in 0..3 {
            assert_eq!(update_horde(&mut horde, Vec3::ZERO, &mut hp, true, &t, 0.25, &mut fx), 0);
        }
        assert_eq!(update_horde(&mut horde, Vec3::ZERO, &mut hp, true, &t, 0.25, &mut fx), 1);
        assert_eq!(hp.current, 80.0);

        let kinds: Vec<_> = fx.drain().collect();
        assert_eq!(kinds.len(), 4);
        assert!(matches!(kinds[0], EffectKind::AttackFlash(_)));
        assert_eq!(kinds[1], EffectKind::DamageFlash);
    }

    #[test]
    fn melee_enemy_is_pinned_to_range() {
        let t = Tuning::default();
        let mut horde = Horde::new();
        let e = spawn(&mut horde, 1.0, 0.0, 1.0);
        let mut hp = Health::new(100.0);
        let mut fx = EffectQueue::default();
        update_horde(&mut horde, Vec3::ZERO, &mut hp, true, &t, 0.016, &mut fx);
        let p = pos(&horde, e);
        assert!((flat_distance(p, Vec3::ZERO) - t.melee_range()).abs() < 1e-5);
        assert!(p.x > 0.0);
    }

    #[test]
    fn chase_stops_at_the_melee_ring() {
        let t = Tuning::default();
        let mut horde = Horde::new();
        // 6 u/s for 0.1s would carry it to 2.4, inside the 2.65 ring
        let e = spawn(&mut horde, 0.0, -3.0, 1.0);
        let mut hp = Health::new(100.0);
        let mut fx = EffectQueue::default();
        let landed = update_horde(&mut horde, Vec3::ZERO, &mut hp, true, &t, 0.1, &mut fx);
        assert_eq!(landed, 0);
        let p = pos(&horde, e);
        assert!((flat_distance(p, Vec3::ZERO) - t.melee_range()).abs() < 1e-4);
        assert!(p.z < 0.0);

        // Next frame it is in range and strikes
        assert_eq!(update_horde(&mut horde, Vec3::ZERO, &mut hp, true, &t, 0.1, &mut fx), 1);
    }

    #[test]
    fn enemy_on_top_of_the_player_still_strikes() {
        let t = Tuning::default();
        let mut horde = Horde::new();
        let e = spawn(&mut horde, 0.0, 0.0, 1.0);
        let mut hp = Health::new(100.0);
        let mut fx = EffectQueue::default();
        let landed = update_horde(&mut horde, Vec3::ZERO, &mut hp, true, &t, 0.1, &mut fx);
        assert_eq!(landed, 1);
        assert_eq!(hp.current, 90.0);
        let p = pos(&horde, e);
        assert!(p.is_finite());
        assert_eq!((p.x, p.z), (0.0, 0.0));
        assert_eq!(p.y, height(0.0, 0.0));
    }

    #[test]
    fn no_strikes_while_player_is_down() {
        let t = Tuning::default();
        let mut horde = Horde::new();
        spawn(&mut horde, 0.0, 2.0, 1.0);
        let mut hp = Health::new(100.0);
        let mut fx = EffectQueue::default();
        assert_eq!(update_horde(&mut horde, Vec3::ZERO, &mut hp, false, &t, 0.1, &mut fx), 0);
        assert_eq!(hp.current, 100.0);
        assert!(fx.is_empty());
    }

    #[test]
    fn cooldown_decays_out_of_range_too() {
        let t = Tuning::default();
        let mut horde = Horde::new();
        let e = spawn(&mut horde, 0.0, -300.0, 1.0);
        horde.world.get::<&mut AttackTimer>(e).unwrap().cooldown_remaining = 0.5;
        let mut hp = Health::new(100.0);
        let mut fx = EffectQueue::default();
        update_horde(&mut horde, Vec3::ZERO, &mut hp, true, &t, 0.3, &mut fx);
        update_horde(&mut horde, Vec3::ZERO, &mut hp, true, &t, 0.3, &mut fx);
        assert_eq!(horde.world.get::<&AttackTimer>(e).unwrap().cooldown_remaining, 0.0);
    }

    #[test]
    fn sweep_removes_exactly_the_dead() {
        let mut horde = Horde::new();
        let dead = spawn(&mut horde, 10.0, 10.0, 1.0);
        let alive = spawn(&mut horde, -10.0, 10.0, 1.0);
        horde.world.get::<&mut Health>(dead).unwrap().take_damage(150.0);
        horde.world.get::<&mut Health>(alive).unwrap().take_damage(50.0);

        let removed = sweep_dead(&mut horde).unwrap();
        assert_eq!(removed, vec![dead]);
        assert!(!horde.contains(dead));
        assert!(horde.contains(alive));
        assert!(sweep_dead(&mut horde).unwrap().is_empty());
    }
}
