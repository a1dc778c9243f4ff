//! Lifecycle events that powers and relics react to.
//!
//! A power definition declares effect lists keyed by `PowerEvent`. When the
//! engine reaches one of these moments it looks up every matching power on
//! the affected entity and re-enters the effect executor.

use serde::{Deserialize, Serialize};

use crate::cards::CardTheme;

/// A combat lifecycle event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerEvent {
    /// Fired once for the player (and relics) when combat begins.
    CombatStart,
    TurnStart,
    TurnEnd,
    /// The owner dealt attack damage.
    Attack,
    /// The owner was targeted by attack damage.
    Attacked,
    /// The owner lost health.
    Damaged,
    /// The owner gained block.
    Block,
    /// Any card was played by the owner.
    CardPlayed,
    AttackPlayed,
    SkillPlayed,
    PowerPlayed,
    /// The owner died.
    Death,
    /// The owner killed an entity.
    Kill,
}

impl PowerEvent {
    /// Theme-specific card-played event, if any.
    #[must_use]
    pub fn for_theme(theme: CardTheme) -> Option<PowerEvent> {
        match theme {
            CardTheme::Attack => Some(PowerEvent::AttackPlayed),
            CardTheme::Skill => Some(PowerEvent::SkillPlayed),
            CardTheme::Power => Some(PowerEvent::PowerPlayed),
            CardTheme::Status | CardTheme::Curse => None,
        }
    }
}

impl std::fmt::Display for PowerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
