//! Hitscan resolution for the player's rifle.

use engine_core::{Damage, Health, Vec3};
use hecs::Entity;

use crate::config::Tuning;
use crate::effects::EffectsSink;
use crate::enemy::Horde;
use crate::error::SimError;

/// Combat hit result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    pub entity: Entity,
    pub position: Vec3,
    pub distance: f32,
    pub damage_dealt: f32,
    /// Health reached zero; the death sweep removes the enemy.
    pub was_kill: bool,
}

/// Resolve one accepted shot along `direction` from the eye.
///
/// The ray starts `muzzle_offset` in front of the eye and only enemies are
/// valid targets. At most one enemy (the nearest) takes damage. The muzzle
/// flash fires whether or not anything is hit.
pub fn fire_hitscan(
    horde: &mut Horde,
    eye: Vec3,
    direction: Vec3,
    tuning: &Tuning,
    effects: &mut dyn EffectsSink,
) -> Result<Option<HitResult>, SimError> {
    effects.muzzle_flash();

    let direction = direction.normalize_or_zero();
    let origin = eye + direction * tuning.muzzle_offset;

    horde.physics.update_query_pipeline();
    let Some(hit) = horde
        .physics
        .raycast_enemies(origin, direction, tuning.ray_length)
    else {
        return Ok(None);
    };

    let entity = horde
        .hitboxes
        .owner(hit.collider)
        .ok_or(SimError::OrphanCollider(hit.collider))?;
    let mut health = horde
        .world
        .get::<&mut Health>(entity)
        .map_err(|_| SimError::MissingEnemy(entity))?;

    let damage = Damage::bullet(tuning.shot_damage);
    let was_kill = damage.apply(&mut health);
    drop(health);

    effects.hit_flash(entity);
    log::debug!("Hit {:?} at {:.1}m (kill: {})", entity, hit.distance, was_kill);

    Ok(Some(HitResult {
        entity,
        position: hit.point,
        distance: hit.distance,
        damage_dealt: damage.amount,
        was_kill,
    }))
}
