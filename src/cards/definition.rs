//! Card definitions - immutable card content.
//!
//! `CardDefinition` holds what every copy of a card shares: cost, theme,
//! keywords and the effect list (plus an optional upgraded variant).
//! Per-copy overlays (upgraded, cost modifier, retain) live on
//! `CardInstance`.

use serde::{Deserialize, Serialize};

use crate::effects::Effect;

/// Identifier for a card definition (e.g. `"strike"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CardId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Card theme. Power-themed cards exhaust after being played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardTheme {
    Attack,
    Skill,
    Power,
    Status,
    Curse,
}

/// Card rarity, used when generating random cards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardRarity {
    Starter,
    #[default]
    Common,
    Uncommon,
    Rare,
    Special,
}

/// Energy cost of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardCost {
    Fixed(i32),
    /// Consumes all current energy.
    X,
}

impl Default for CardCost {
    fn default() -> Self {
        CardCost::Fixed(0)
    }
}

/// Definition-level keywords.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardKeywords {
    /// Exhausts after being played.
    pub exhaust: bool,
    /// Stays in hand at end of turn.
    pub retain: bool,
    /// Exhausts if still in hand at end of turn.
    pub ethereal: bool,
    /// Starts each combat on top of the draw pile.
    pub innate: bool,
    /// Cannot be played.
    pub unplayable: bool,
}

/// Static card definition.
///
/// ```
/// use deckrun::cards::{CardCost, CardDefinition, CardTheme};
/// use deckrun::effects::{Effect, EntityTarget};
///
/// let strike = CardDefinition::new("strike", "Strike", CardTheme::Attack, CardCost::Fixed(1))
///     .with_effect(Effect::damage(6, EntityTarget::Enemy));
///
/// assert_eq!(strike.effects_for(false).len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDefinition {
    pub id: CardId,
    pub name: String,
    pub theme: CardTheme,
    #[serde(default)]
    pub rarity: CardRarity,
    pub cost: CardCost,
    #[serde(default)]
    pub upgraded_cost: Option<CardCost>,
    #[serde(default)]
    pub keywords: CardKeywords,
    #[serde(default)]
    pub effects: Vec<Effect>,
    /// Replacement effect list when upgraded. Falls back to `effects`.
    #[serde(default)]
    pub upgraded_effects: Option<Vec<Effect>>,
}

impl CardDefinition {
    #[must_use]
    pub fn new(
        id: impl Into<CardId>,
        name: impl Into<String>,
        theme: CardTheme,
        cost: CardCost,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            theme,
            rarity: CardRarity::default(),
            cost,
            upgraded_cost: None,
            keywords: CardKeywords::default(),
            effects: Vec::new(),
            upgraded_effects: None,
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_upgrade(mut self, cost: Option<CardCost>, effects: Vec<Effect>) -> Self {
        self.upgraded_cost = cost;
        self.upgraded_effects = Some(effects);
        self
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: CardRarity) -> Self {
        self.rarity = rarity;
        self
    }

    #[must_use]
    pub fn with_keywords(mut self, keywords: CardKeywords) -> Self {
        self.keywords = keywords;
        self
    }

    /// Effects for the base or upgraded version.
    #[must_use]
    pub fn effects_for(&self, upgraded: bool) -> &[Effect] {
        match (&self.upgraded_effects, upgraded) {
            (Some(effects), true) => effects,
            _ => &self.effects,
        }
    }

    /// Cost for the base or upgraded version.
    #[must_use]
    pub fn cost_for(&self, upgraded: bool) -> CardCost {
        if upgraded {
            self.upgraded_cost.unwrap_or(self.cost)
        } else {
            self.cost
        }
    }

    /// Whether playing this card sends it to the exhaust pile.
    #[must_use]
    pub fn exhausts_on_play(&self) -> bool {
        self.keywords.exhaust || self.theme == CardTheme::Power
    }
}
