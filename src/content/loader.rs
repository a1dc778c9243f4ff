//! JSON content loading and reference validation.
//!
//! A content pack is one JSON object with optional `cards`, `powers`,
//! `enemies`, `heroes` and `relics` arrays. Loading validates every card,
//! power and relic id referenced by an effect or template, so dangling
//! references surface at load time rather than as silent no-ops in combat.
//!
//! ```
//! use deckrun::content::Content;
//!
//! let content = Content::from_json(r#"{
//!     "cards": [{
//!         "id": "strike", "name": "Strike", "theme": "attack",
//!         "cost": { "fixed": 1 },
//!         "effects": [{ "type": "damage", "amount": 6 }]
//!     }]
//! }"#).unwrap();
//!
//! assert!(content.cards.contains(&"strike".into()));
//! ```

use serde::{Deserialize, Serialize};

use super::{Content, EnemyTemplate, HeroTemplate, RelicDefinition};
use crate::cards::CardDefinition;
use crate::effects::Effect;
use crate::error::ContentError;
use crate::powers::{PowerDefinition, PowerId};

/// Serialized form of a content bundle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentPack {
    pub cards: Vec<CardDefinition>,
    /// Added to (or replacing) the built-in powers.
    pub powers: Vec<PowerDefinition>,
    pub enemies: Vec<EnemyTemplate>,
    pub heroes: Vec<HeroTemplate>,
    pub relics: Vec<RelicDefinition>,
}

impl Content {
    /// Load and validate a JSON content pack on top of the built-in powers.
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let pack: ContentPack = serde_json::from_str(json)?;
        Self::from_pack(pack)
    }

    /// Build and validate content from a pack.
    pub fn from_pack(pack: ContentPack) -> Result<Self, ContentError> {
        let mut content = Self::new();
        content.extend(pack)?;
        Ok(content)
    }

    /// Merge a pack into this content, then validate the whole bundle.
    pub fn extend(&mut self, pack: ContentPack) -> Result<(), ContentError> {
        for card in pack.cards {
            self.add_card(card)?;
        }
        for power in pack.powers {
            self.powers.register_or_replace(power);
        }
        for enemy in pack.enemies {
            self.add_enemy(enemy);
        }
        for hero in pack.heroes {
            self.add_hero(hero);
        }
        for relic in pack.relics {
            self.add_relic(relic);
        }
        self.validate()
    }

    /// Check that every referenced card, power and relic exists.
    pub fn validate(&self) -> Result<(), ContentError> {
        for card in self.cards.iter() {
            let owner = format!("card:{}", card.id);
            self.check_effects(&owner, &card.effects)?;
            if let Some(upgraded) = &card.upgraded_effects {
                self.check_effects(&owner, upgraded)?;
            }
        }

        for enemy in self.enemies() {
            let owner = format!("enemy:{}", enemy.id);
            for start in &enemy.starting_powers {
                self.check_power(&owner, &start.power)?;
            }
            for enemy_move in &enemy.moves {
                self.check_effects(&owner, &enemy_move.effects)?;
            }
        }

        for hero in self.heroes() {
            let owner = format!("hero:{}", hero.id);
            for card in &hero.starting_deck {
                if !self.cards.contains(card) {
                    return Err(ContentError::UnknownCard {
                        owner,
                        card: card.to_string(),
                    });
                }
            }
            for relic in &hero.starting_relics {
                if self.relic(relic).is_none() {
                    return Err(ContentError::UnknownRelic {
                        owner,
                        relic: relic.to_string(),
                    });
                }
            }
            if let Some(ability) = &hero.ability {
                self.check_effects(&owner, &ability.effects)?;
            }
        }

        for relic in self.relics() {
            let owner = format!("relic:{}", relic.id);
            for trigger in &relic.triggers {
                self.check_effects(&owner, &trigger.effects)?;
            }
        }
        Ok(())
    }

    fn check_power(&self, owner: &str, power: &PowerId) -> Result<(), ContentError> {
        if self.powers.contains(power.as_str()) {
            Ok(())
        } else {
            Err(ContentError::UnknownPower {
                owner: owner.to_string(),
                power: power.to_string(),
            })
        }
    }

    fn check_effects(&self, owner: &str, effects: &[Effect]) -> Result<(), ContentError> {
        for effect in effects {
            match effect {
                Effect::AddCard { card_id, .. } | Effect::AddStatusCard { card_id, .. } => {
                    if !self.cards.contains(card_id) {
                        return Err(ContentError::UnknownCard {
                            owner: owner.to_string(),
                            card: card_id.to_string(),
                        });
                    }
                }
                Effect::ApplyPower { power, .. }
                | Effect::RemovePower { power, .. }
                | Effect::TransferPower { power, .. } => self.check_power(owner, power)?,
                Effect::StealPower { power: Some(power), .. }
                | Effect::SilencePower { power: Some(power), .. } => self.check_power(owner, power)?,
                _ => {}
            }
            for nested in nested_effects(effect) {
                self.check_effects(owner, nested)?;
            }
        }
        Ok(())
    }
}

/// Effect lists nested directly inside an effect.
fn nested_effects(effect: &Effect) -> Vec<&[Effect]> {
    match effect {
        Effect::Damage { on_hit, .. } => vec![on_hit.as_slice()],
        Effect::Conditional { then, otherwise, .. } => vec![then.as_slice(), otherwise.as_slice()],
        Effect::Repeat { effects, .. } | Effect::Sequence { effects } | Effect::ForEach { effects, .. } => {
            vec![effects.as_slice()]
        }
        Effect::RandomChoice { choices } => choices.iter().map(|c| c.effects.as_slice()).collect(),
        _ => Vec::new(),
    }
}
