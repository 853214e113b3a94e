//! Faults inside a simulation frame. None of these should happen; when one
//! does, the host logs it and carries on with the next frame.

use hecs::Entity;
use physics::ColliderHandle;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("collider {0:?} was hit but has no registered owner")]
    OrphanCollider(ColliderHandle),
    #[error("enemy {0:?} is registered but missing from the world")]
    MissingEnemy(Entity),
    #[error("failed to despawn enemy {entity:?}")]
    Despawn {
        entity: Entity,
        #[source]
        source: hecs::NoSuchEntity,
    },
}
