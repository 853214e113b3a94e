//! Raycasting for weapon hit detection.

use crate::{CollisionGroup, PhysicsWorld};
use engine_core::Vec3;
use rapier3d::prelude::*;

/// Result of a raycast query.
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// The collider that was hit.
    pub collider: ColliderHandle,
    /// Distance along the ray to the hit point.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec3,
    /// Surface normal at the hit point.
    pub normal: Vec3,
}

impl PhysicsWorld {
    /// Cast a ray and return the nearest hit among colliders passing `groups`.
    ///
    /// The query pipeline must be current; call
    /// [`PhysicsWorld::update_query_pipeline`] after moving colliders.
    pub fn raycast_filtered(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        groups: InteractionGroups,
    ) -> Option<RaycastHit> {
        let direction = direction.try_normalize()?;
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        let filter = QueryFilter::default().groups(groups);

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                filter,
            )
            .map(|(collider, intersection)| {
                let point = ray.point_at(intersection.time_of_impact);
                RaycastHit {
                    collider,
                    distance: intersection.time_of_impact,
                    point: Vec3::new(point.x, point.y, point.z),
                    normal: Vec3::new(
                        intersection.normal.x,
                        intersection.normal.y,
                        intersection.normal.z,
                    ),
                }
            })
    }

    /// Hitscan from the player's weapon: enemies only.
    pub fn raycast_enemies(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<RaycastHit> {
        self.raycast_filtered(origin, direction, max_distance, CollisionGroup::player_hitscan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_sphere_wins() {
        let mut world = PhysicsWorld::new();
        let far = world.add_enemy_sphere(Vec3::new(0.0, 0.0, -20.0), 1.0);
        let near = world.add_enemy_sphere(Vec3::new(0.0, 0.0, -10.0), 1.0);
        world.update_query_pipeline();

        let hit = world
            .raycast_enemies(Vec3::ZERO, Vec3::NEG_Z, 100.0)
            .expect("ray should hit");
        assert_eq!(hit.collider, near);
        assert_ne!(hit.collider, far);
        assert!((hit.distance - 9.0).abs() < 1e-3);
    }

    #[test]
    fn miss_returns_none() {
        let mut world = PhysicsWorld::new();
        world.add_enemy_sphere(Vec3::new(5.0, 0.0, -10.0), 1.0);
        world.update_query_pipeline();
        assert!(world.raycast_enemies(Vec3::ZERO, Vec3::NEG_Z, 100.0).is_none());
    }

    #[test]
    fn moved_collider_is_seen_after_update() {
        let mut world = PhysicsWorld::new();
        let h = world.add_enemy_sphere(Vec3::new(5.0, 0.0, -10.0), 1.0);
        world.update_query_pipeline();
        world.set_collider_translation(h, Vec3::new(0.0, 0.0, -10.0));
        assert!(world.needs_update());
        world.update_query_pipeline();
        let hit = world.raycast_enemies(Vec3::ZERO, Vec3::NEG_Z, 100.0);
        assert_eq!(hit.map(|h| h.collider), Some(h));
    }

    #[test]
    fn removed_collider_is_not_hit() {
        let mut world = PhysicsWorld::new();
        let h = world.add_enemy_sphere(Vec3::new(0.0, 0.0, -10.0), 1.0);
        world.update_query_pipeline();
        world.remove_collider(h);
        world.update_query_pipeline();
        assert_eq!(world.collider_count(), 0);
        assert!(world.raycast_enemies(Vec3::ZERO, Vec3::NEG_Z, 100.0).is_none());
    }
}
