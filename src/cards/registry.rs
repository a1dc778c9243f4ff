//! Card registry for definition lookup.
//!
//! The engine's content collaborator: `get(id)` may return `None` for
//! stale or unregistered ids, and every caller treats that as
//! "nothing happens".

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId, CardRarity, CardTheme};
use crate::error::ContentError;

/// Registry of card definitions.
///
/// ```
/// use deckrun::cards::{CardCost, CardDefinition, CardRegistry, CardTheme};
///
/// let mut registry = CardRegistry::new();
/// registry
///     .register(CardDefinition::new("strike", "Strike", CardTheme::Attack, CardCost::Fixed(1)))
///     .unwrap();
///
/// assert_eq!(registry.get(&"strike".into()).unwrap().name, "Strike");
/// assert!(registry.get(&"missing".into()).is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardDefinition>,
    /// Registration order, so iteration (and random generation) is deterministic.
    order: Vec<CardId>,
}

impl CardRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition. Duplicate ids are rejected.
    pub fn register(&mut self, card: CardDefinition) -> Result<(), ContentError> {
        if self.cards.contains_key(&card.id) {
            return Err(ContentError::DuplicateCard(card.id.to_string()));
        }
        self.order.push(card.id.clone());
        self.cards.insert(card.id.clone(), card);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: &CardId) -> Option<&CardDefinition> {
        self.cards.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        self.cards.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.order.iter().filter_map(|id| self.cards.get(id))
    }

    /// Cards eligible for random generation, optionally restricted to a theme.
    ///
    /// Status, curse and special cards are never generated.
    #[must_use]
    pub fn generatable(&self, theme: Option<CardTheme>) -> Vec<CardId> {
        self.iter()
            .filter(|c| !matches!(c.theme, CardTheme::Status | CardTheme::Curse))
            .filter(|c| c.rarity != CardRarity::Special)
            .filter(|c| theme.map_or(true, |t| c.theme == t))
            .map(|c| c.id.clone())
            .collect()
    }
}
