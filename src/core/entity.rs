//! Entity identification system.
//!
//! Every combatant (the player and each enemy) has a unique `EntityId`.
//!
//! ## ID Layout
//!
//! - `0`: Reserved for the player
//! - `1..`: Enemies, allocated in spawn order for the lifetime of a combat
//!
//! ```
//! use deckrun::core::EntityId;
//!
//! assert!(EntityId::PLAYER.is_player());
//! assert!(!EntityId::first_enemy().is_player());
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// The player entity. There is exactly one per combat.
    pub const PLAYER: EntityId = EntityId(0);

    /// Create an entity ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// First ID handed out to enemies.
    #[must_use]
    pub const fn first_enemy() -> Self {
        Self(1)
    }

    /// Check if this entity ID refers to the player.
    #[must_use]
    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_player() {
            write!(f, "Player")
        } else {
            write!(f, "Enemy({})", self.0)
        }
    }
}
