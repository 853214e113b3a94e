//! Enemy components and the live enemy collection.
//!
//! An enemy is one ECS entity made of several sphere hit volumes (body and
//! head). Each volume's collider handle is registered against the owning
//! entity at spawn time, so a ray hit on any part resolves to one enemy.

use engine_core::{AttackTimer, Health, Transform, Vec3};
use hecs::{Entity, World};
use physics::{ColliderHandle, PhysicsWorld};
use std::collections::HashMap;

use crate::error::SimError;

/// Body part layout as (centre height, radius), both in multiples of the enemy radius.
pub const PARTS: [(f32, f32); 2] = [
    // Body
    (1.0, 1.0),
    // Head
    (2.2, 0.5),
];

/// Base colour for each part, same order as [`PARTS`].
pub const PART_COLORS: [[f32; 4]; 2] = [[0.35, 0.28, 0.22, 1.0], [0.22, 0.17, 0.13, 1.0]];

/// Enemy stats rolled at spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    /// Chase speed (units/s).
    pub speed: f32,
    /// Collision radius used for separation and melee range.
    pub radius: f32,
}

/// Collider handles for each body part, same order as [`PARTS`].
#[derive(Debug, Clone, PartialEq)]
pub struct Hitbox {
    pub parts: Vec<ColliderHandle>,
}

/// World-space centre and radius of every part of an enemy standing at `feet`.
pub fn part_spheres(feet: Vec3, radius: f32) -> impl Iterator<Item = (Vec3, f32)> {
    PARTS
        .iter()
        .map(move |&(h, r)| (feet + Vec3::Y * (h * radius), r * radius))
}

/// Bundle of components for spawning an enemy.
pub struct EnemyBundle {
    pub transform: Transform,
    pub health: Health,
    pub attack: AttackTimer,
    pub enemy: Enemy,
}

impl EnemyBundle {
    pub fn new(position: Vec3, speed: f32, radius: f32, health: f32, attack_interval: f32) -> Self {
        Self {
            transform: Transform::from_position(position),
            health: Health::new(health),
            attack: AttackTimer::new(attack_interval),
            enemy: Enemy { speed, radius },
        }
    }
}

/// Maps collider handles back to the enemy that owns them.
#[derive(Debug, Default)]
pub struct HitboxRegistry {
    owners: HashMap<ColliderHandle, Entity>,
}

impl HitboxRegistry {
    pub fn register(&mut self, owner: Entity, parts: &[ColliderHandle]) {
        for &handle in parts {
            self.owners.insert(handle, owner);
        }
    }

    pub fn unregister(&mut self, parts: &[ColliderHandle]) {
        for handle in parts {
            self.owners.remove(handle);
        }
    }

    pub fn owner(&self, collider: ColliderHandle) -> Option<Entity> {
        self.owners.get(&collider).copied()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn clear(&mut self) {
        self.owners.clear();
    }
}

/// The live enemy collection: ECS world, hit volumes and the owner map,
/// always mutated together.
#[derive(Default)]
pub struct Horde {
    pub world: World,
    pub physics: PhysicsWorld,
    pub hitboxes: HitboxRegistry,
}

impl Horde {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn an enemy and register its hit volumes.
    pub fn spawn(&mut self, bundle: EnemyBundle) -> Entity {
        let feet = bundle.transform.position;
        let radius = bundle.enemy.radius;
        let parts: Vec<ColliderHandle> = part_spheres(feet, radius)
            .map(|(centre, r)| self.physics.add_enemy_sphere(centre, r))
            .collect();

        let entity = self.world.spawn((
            bundle.transform,
            bundle.health,
            bundle.attack,
            bundle.enemy,
            Hitbox {
                parts: parts.clone(),
            },
        ));
        self.hitboxes.register(entity, &parts);
        entity
    }

    /// Remove an enemy and its hit volumes.
    pub fn despawn(&mut self, entity: Entity) -> Result<(), SimError> {
        let parts = self
            .world
            .get::<&Hitbox>(entity)
            .map(|h| h.parts.clone())
            .unwrap_or_default();
        for &handle in &parts {
            self.physics.remove_collider(handle);
        }
        self.hitboxes.unregister(&parts);
        self.world
            .despawn(entity)
            .map_err(|source| SimError::Despawn { entity, source })
    }

    /// Move every hit volume to where its enemy now stands.
    pub fn sync_hitboxes(&mut self) {
        for (_, (transform, enemy, hitbox)) in self.world.query::<(&Transform, &Enemy, &Hitbox)>().iter() {
            for (&handle, (centre, _)) in hitbox
                .parts
                .iter()
                .zip(part_spheres(transform.position, enemy.radius))
            {
                self.physics.set_collider_translation(handle, centre);
            }
        }
    }

    pub fn live_count(&self) -> usize {
        self.world.query::<&Enemy>().iter().count()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.world.contains(entity)
    }

    /// Feet position of every live enemy.
    pub fn positions(&self) -> Vec<(Entity, Vec3)> {
        self.world
            .query::<(&Transform, &Enemy)>()
            .iter()
            .map(|(e, (t, _))| (e, t.position))
            .collect()
    }

    /// Drop every enemy and hit volume.
    pub fn clear(&mut self) {
        self.world.clear();
        self.physics.clear();
        self.hitboxes.clear();
    }
}
