//! Collision groups and filtering.

use rapier3d::prelude::*;

/// Collision groups for different entity types.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// Static environment (scenery)
    Environment = 1 << 0,
    /// Player character
    Player = 1 << 1,
    /// Enemy hit volumes
    Enemy = 1 << 2,
}

impl CollisionGroup {
    pub fn bits(self) -> Group {
        Group::from_bits_retain(self as u32)
    }

    /// Membership/filter pair for enemy hit volumes.
    pub fn enemy() -> (Group, Group) {
        (Self::Enemy.bits(), Group::ALL)
    }

    /// Query groups for the player's weapon: only enemies are valid targets.
    pub fn player_hitscan() -> InteractionGroups {
        InteractionGroups::new(Self::Player.bits(), Self::Enemy.bits())
    }
}
