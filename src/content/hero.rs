//! Hero templates: starting stats, deck, relics and the hero ability.

use serde::{Deserialize, Serialize};

use super::relic::RelicId;
use crate::cards::CardId;
use crate::core::RunState;
use crate::effects::Effect;

fn three() -> i32 {
    3
}

/// A chargeable once-per-turn ability.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroAbility {
    pub name: String,
    /// Charge needed before the ability can be used.
    pub charge_required: u32,
    pub effects: Vec<Effect>,
}

/// Static hero content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroTemplate {
    pub id: String,
    pub name: String,
    pub max_health: i32,
    #[serde(default = "three")]
    pub max_energy: i32,
    pub starting_deck: Vec<CardId>,
    #[serde(default)]
    pub starting_relics: Vec<RelicId>,
    #[serde(default)]
    pub ability: Option<HeroAbility>,
}

impl HeroTemplate {
    #[must_use]
    pub fn new(id: &str, name: impl Into<String>, max_health: i32) -> Self {
        Self {
            id: id.to_string(),
            name: name.into(),
            max_health,
            max_energy: 3,
            starting_deck: Vec::new(),
            starting_relics: Vec::new(),
            ability: None,
        }
    }

    #[must_use]
    pub fn with_cards(mut self, card: &str, copies: usize) -> Self {
        self.starting_deck
            .extend(std::iter::repeat_with(|| CardId::from(card)).take(copies));
        self
    }

    #[must_use]
    pub fn with_relic(mut self, relic: &str) -> Self {
        self.starting_relics.push(RelicId::from(relic));
        self
    }

    #[must_use]
    pub fn with_ability(mut self, name: impl Into<String>, charge_required: u32, effects: Vec<Effect>) -> Self {
        self.ability = Some(HeroAbility {
            name: name.into(),
            charge_required,
            effects,
        });
        self
    }

    /// Start a fresh run with this hero's deck and relics.
    #[must_use]
    pub fn new_run(&self, seed: u64) -> RunState {
        let mut run = RunState::new(self.id.clone(), self.max_health, seed);
        for card in &self.starting_deck {
            run.add_to_deck(card.clone(), false);
        }
        run.relics = self.starting_relics.clone();
        run
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_deck_has_unique_uids() {
        let hero = HeroTemplate::new("knight", "Knight", 70)
            .with_cards("strike", 4)
            .with_cards("defend", 3)
            .with_relic("anchor");
        let run = hero.new_run(7);

        assert_eq!(run.deck.len(), 7);
        assert_eq!(run.player_health, 70);
        assert_eq!(run.relics, vec![RelicId::from("anchor")]);

        let mut uids: Vec<_> = run.deck.iter().map(|c| c.uid).collect();
        uids.sort();
        uids.dedup();
        assert_eq!(uids.len(), 7);
    }

    #[test]
    fn test_hero_json_defaults() {
        let json = r#"{ "id": "mage", "name": "Mage", "maxHealth": 60, "startingDeck": ["zap"] }"#;
        let hero: HeroTemplate = serde_json::from_str(json).unwrap();
        assert_eq!(hero.max_energy, 3);
        assert!(hero.ability.is_none());
        assert!(hero.starting_relics.is_empty());
    }
}
