//! Collision world for hit queries, backed by Rapier3D.
//!
//! Nothing here is simulated: there are no dynamics and no ground collider.
//! The world only holds parentless hit volumes that gameplay code moves
//! around each frame, and a query pipeline to cast rays against them.

use crate::collision::CollisionGroup;
use engine_core::Vec3;
use rapier3d::prelude::*;

/// Hit volumes plus the acceleration structure used by ray casts.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub island_manager: IslandManager,
    pub query_pipeline: QueryPipeline,
    /// Set whenever a collider is added, moved or removed; cleared by
    /// [`PhysicsWorld::update_query_pipeline`].
    dirty: bool,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            island_manager: IslandManager::new(),
            query_pipeline: QueryPipeline::new(),
            dirty: false,
        }
    }

    /// Rebuild the query pipeline if anything moved since the last rebuild.
    pub fn update_query_pipeline(&mut self) {
        if self.dirty {
            self.query_pipeline.update(&self.collider_set);
            self.dirty = false;
        }
    }

    /// Whether a ray cast right now would see stale positions.
    pub fn needs_update(&self) -> bool {
        self.dirty
    }

    /// Add a sphere hit volume for an enemy body part at a world position.
    pub fn add_enemy_sphere(&mut self, center: Vec3, radius: f32) -> ColliderHandle {
        let (membership, filter) = CollisionGroup::enemy();
        let collider = ColliderBuilder::ball(radius)
            .translation(vector![center.x, center.y, center.z])
            .collision_groups(InteractionGroups::new(membership, filter))
            .build();
        self.dirty = true;
        self.collider_set.insert(collider)
    }

    /// Move a parentless collider to a new world position.
    pub fn set_collider_translation(&mut self, handle: ColliderHandle, center: Vec3) {
        if let Some(collider) = self.collider_set.get_mut(handle) {
            collider.set_translation(vector![center.x, center.y, center.z]);
            self.dirty = true;
        }
    }

    /// World position of a collider, if it still exists.
    pub fn collider_translation(&self, handle: ColliderHandle) -> Option<Vec3> {
        self.collider_set.get(handle).map(|c| {
            let t = c.translation();
            Vec3::new(t.x, t.y, t.z)
        })
    }

    /// Remove a collider by its handle.
    pub fn remove_collider(&mut self, handle: ColliderHandle) {
        if self
            .collider_set
            .remove(
                handle,
                &mut self.island_manager,
                &mut self.rigid_body_set,
                true,
            )
            .is_some()
        {
            self.dirty = true;
        }
    }

    /// Number of live colliders.
    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }

    /// Drop every collider.
    pub fn clear(&mut self) {
        let handles: Vec<ColliderHandle> = self.collider_set.iter().map(|(h, _)| h).collect();
        for handle in handles {
            self.remove_collider(handle);
        }
        self.dirty = true;
    }
}
