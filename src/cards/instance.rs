//! Card instances - one physical copy of a card.
//!
//! A `CardInstance` references its immutable `CardDefinition` by id and
//! layers per-copy overlays on top. Which pile a card is in is tracked by
//! pile membership (see `zones::Piles`), not by a field here.

use serde::{Deserialize, Serialize};

use super::definition::{CardCost, CardDefinition, CardId};

/// Unique id of a physical card copy, distinct even for the same definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardUid(pub u64);

impl std::fmt::Display for CardUid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A card copy with instance-local overlays.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInstance {
    pub uid: CardUid,
    pub definition_id: CardId,
    #[serde(default)]
    pub upgraded: bool,
    /// Keep in hand at the next end of turn.
    #[serde(default)]
    pub retained: bool,
    #[serde(default)]
    pub ethereal: bool,
    #[serde(default)]
    pub innate: bool,
    #[serde(default)]
    pub unplayable: bool,
    /// Added to the definition cost; the result never drops below zero.
    #[serde(default)]
    pub cost_modifier: i32,
}

impl CardInstance {
    #[must_use]
    pub fn new(uid: CardUid, definition_id: impl Into<CardId>) -> Self {
        Self {
            uid,
            definition_id: definition_id.into(),
            upgraded: false,
            retained: false,
            ethereal: false,
            innate: false,
            unplayable: false,
            cost_modifier: 0,
        }
    }

    /// A fresh copy with a new uid and the same overlays.
    #[must_use]
    pub fn copy_with_uid(&self, uid: CardUid) -> Self {
        Self {
            uid,
            ..self.clone()
        }
    }

    /// Energy this copy costs to play, given the current energy (for X cards).
    #[must_use]
    pub fn effective_cost(&self, definition: &CardDefinition, energy: i32) -> i32 {
        match definition.cost_for(self.upgraded) {
            CardCost::Fixed(cost) => (cost + self.cost_modifier).max(0),
            CardCost::X => energy.max(0),
        }
    }

    #[must_use]
    pub fn is_unplayable(&self, definition: &CardDefinition) -> bool {
        self.unplayable || definition.keywords.unplayable
    }

    #[must_use]
    pub fn is_ethereal(&self, definition: &CardDefinition) -> bool {
        self.ethereal || definition.keywords.ethereal
    }

    #[must_use]
    pub fn is_innate(&self, definition: &CardDefinition) -> bool {
        self.innate || definition.keywords.innate
    }

    #[must_use]
    pub fn keeps_in_hand(&self, definition: &CardDefinition) -> bool {
        self.retained || definition.keywords.retain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardKeywords, CardTheme};

    fn def(cost: CardCost) -> CardDefinition {
        CardDefinition::new("test", "Test", CardTheme::Skill, cost)
    }

    #[test]
    fn test_effective_cost_with_modifier() {
        let mut card = CardInstance::new(CardUid(1), "test");
        assert_eq!(card.effective_cost(&def(CardCost::Fixed(2)), 3), 2);

        card.cost_modifier = -1;
        assert_eq!(card.effective_cost(&def(CardCost::Fixed(2)), 3), 1);

        card.cost_modifier = -5;
        assert_eq!(card.effective_cost(&def(CardCost::Fixed(2)), 3), 0);
    }

    #[test]
    fn test_x_cost_uses_all_energy() {
        let card = CardInstance::new(CardUid(1), "test");
        assert_eq!(card.effective_cost(&def(CardCost::X), 4), 4);
        assert_eq!(card.effective_cost(&def(CardCost::X), 0), 0);
    }

    #[test]
    fn test_overlays_combine_with_keywords() {
        let definition = def(CardCost::Fixed(1)).with_keywords(CardKeywords {
            retain: true,
            ..CardKeywords::default()
        });
        let card = CardInstance::new(CardUid(1), "test");
        assert!(card.keeps_in_hand(&definition));
        assert!(!card.is_ethereal(&definition));

        let mut flagged = card.copy_with_uid(CardUid(2));
        flagged.ethereal = true;
        assert_eq!(flagged.uid, CardUid(2));
        assert!(flagged.is_ethereal(&definition));
    }
}
