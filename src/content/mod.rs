//! Game content: the lookup collaborator the engine reads from.
//!
//! ## Key Types
//!
//! - `Content`: cards, powers, enemies, heroes and relics in one bundle
//! - `EnemyTemplate` / `EnemyMove`: enemy stats and weighted moves
//! - `HeroTemplate` / `HeroAbility`: starting deck, relics and ability
//! - `RelicDefinition`: event-triggered passive effects
//!
//! Content is plain data. Build it in code, load it from JSON with
//! [`Content::from_json`], or start from [`starter`].

mod enemy;
mod hero;
mod loader;
mod relic;
pub mod starter;

use rustc_hash::FxHashMap;

pub use enemy::{EnemyMove, EnemyTemplate, StartingPower};
pub use hero::{HeroAbility, HeroTemplate};
pub use loader::ContentPack;
pub use relic::{RelicDefinition, RelicId};

use crate::cards::{CardDefinition, CardId, CardRegistry};
use crate::error::ContentError;
use crate::powers::PowerRegistry;

/// Everything the engine looks up by id.
#[derive(Clone, Debug)]
pub struct Content {
    pub cards: CardRegistry,
    pub powers: PowerRegistry,
    enemies: FxHashMap<String, EnemyTemplate>,
    heroes: FxHashMap<String, HeroTemplate>,
    relics: FxHashMap<RelicId, RelicDefinition>,
}

impl Default for Content {
    fn default() -> Self {
        Self::new()
    }
}

impl Content {
    /// Empty content with the built-in powers registered.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cards: CardRegistry::new(),
            powers: PowerRegistry::builtin(),
            enemies: FxHashMap::default(),
            heroes: FxHashMap::default(),
            relics: FxHashMap::default(),
        }
    }

    pub fn add_card(&mut self, card: CardDefinition) -> Result<(), ContentError> {
        self.cards.register(card)
    }

    pub fn add_enemy(&mut self, template: EnemyTemplate) {
        self.enemies.insert(template.id.clone(), template);
    }

    pub fn add_hero(&mut self, template: HeroTemplate) {
        self.heroes.insert(template.id.clone(), template);
    }

    pub fn add_relic(&mut self, relic: RelicDefinition) {
        self.relics.insert(relic.id.clone(), relic);
    }

    #[must_use]
    pub fn card(&self, id: &CardId) -> Option<&CardDefinition> {
        self.cards.get(id)
    }

    #[must_use]
    pub fn enemy(&self, id: &str) -> Option<&EnemyTemplate> {
        self.enemies.get(id)
    }

    #[must_use]
    pub fn hero(&self, id: &str) -> Option<&HeroTemplate> {
        self.heroes.get(id)
    }

    #[must_use]
    pub fn relic(&self, id: &RelicId) -> Option<&RelicDefinition> {
        self.relics.get(id)
    }

    pub fn enemies(&self) -> impl Iterator<Item = &EnemyTemplate> {
        self.enemies.values()
    }

    pub fn heroes(&self) -> impl Iterator<Item = &HeroTemplate> {
        self.heroes.values()
    }

    pub fn relics(&self) -> impl Iterator<Item = &RelicDefinition> {
        self.relics.values()
    }
}
