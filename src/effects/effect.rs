//! Effect definitions.
//!
//! Effects are plain tagged data: cards, powers, relics, hero abilities and
//! enemy moves all declare behaviour as `Effect` trees, and the executor
//! interprets them with one flat `match`.
//!
//! ```json
//! { "type": "damage", "amount": 6, "target": "enemy", "element": "fire" }
//! { "type": "applyPower", "power": "weak", "amount": 1, "target": "enemy" }
//! { "type": "conditional",
//!   "condition": { "type": "enemyCount", "op": ">", "value": 1 },
//!   "then": [{ "type": "draw", "amount": 1 }] }
//! ```
//!
//! ## Families
//!
//! - combat: damage, block, heal and the advanced attack variants
//! - resource: energy and gold
//! - card: pile movement, generation and per-card overlays
//! - power: apply, remove, transfer, steal, silence
//! - meta: conditional, repeat, random choice, sequence, forEach

use serde::{Deserialize, Serialize};

use super::targeting::{AnyTarget, CardFilter, CardTarget, EntityTarget};
use super::value::Value;
use crate::cards::{CardId, CardTheme};
use crate::elements::Element;
use crate::powers::PowerId;
use crate::triggers::Condition;
use crate::zones::{Pile, PilePosition};

/// How a resource effect changes its value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceOp {
    #[default]
    Gain,
    /// Clamped at zero.
    #[serde(alias = "spend")]
    Lose,
    Set,
}

/// A per-instance card flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardFlag {
    Innate,
    Ethereal,
    Unplayable,
    Retained,
}

impl CardFlag {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            CardFlag::Innate => "innate",
            CardFlag::Ethereal => "ethereal",
            CardFlag::Unplayable => "unplayable",
            CardFlag::Retained => "retained",
        }
    }
}

/// One weighted branch of a `randomChoice`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedEffects {
    pub weight: f32,
    pub effects: Vec<Effect>,
}

fn yes() -> bool {
    true
}

fn hundred() -> i32 {
    100
}

fn fifty() -> i32 {
    50
}

fn seventy_five() -> i32 {
    75
}

fn hand() -> Pile {
    Pile::Hand
}

fn discard_pile() -> Pile {
    Pile::DiscardPile
}

fn top() -> PilePosition {
    PilePosition::Top
}

/// An atomic or composite effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Effect {
    // === Combat ===
    Damage {
        amount: Value,
        #[serde(default)]
        target: EntityTarget,
        #[serde(default)]
        element: Element,
        /// Skips block and barrier.
        #[serde(default)]
        piercing: bool,
        /// Run per target after the hit, with that target as current target.
        #[serde(default)]
        on_hit: Vec<Effect>,
    },
    Block {
        amount: Value,
        #[serde(default = "EntityTarget::self_target")]
        target: EntityTarget,
    },
    /// Block that does not clear at turn start.
    Barrier {
        amount: Value,
        #[serde(default = "EntityTarget::self_target")]
        target: EntityTarget,
    },
    Heal {
        amount: Value,
        #[serde(default = "EntityTarget::self_target")]
        target: EntityTarget,
        #[serde(default)]
        overheal: bool,
    },
    /// Damage, then heal the source by a percentage of health removed.
    Lifesteal {
        amount: Value,
        #[serde(default)]
        target: EntityTarget,
        #[serde(default)]
        element: Element,
        #[serde(default = "hundred")]
        percent: i32,
    },
    DestroyBlock {
        #[serde(default)]
        target: EntityTarget,
        #[serde(default)]
        include_barrier: bool,
    },
    MaxHealth {
        amount: Value,
        #[serde(default = "EntityTarget::self_target")]
        target: EntityTarget,
    },
    SetHealth {
        amount: Value,
        #[serde(default = "EntityTarget::self_target")]
        target: EntityTarget,
    },
    /// Kill targets whose health percent is at or below the threshold.
    Execute {
        threshold: i32,
        #[serde(default)]
        target: EntityTarget,
    },
    /// Damage the target and a percentage of it to every other enemy.
    Splash {
        amount: Value,
        #[serde(default)]
        target: EntityTarget,
        #[serde(default)]
        element: Element,
        #[serde(default = "fifty")]
        splash_percent: i32,
    },
    /// Damage the target; the source loses `recoil` health.
    Recoil {
        amount: Value,
        #[serde(default)]
        target: EntityTarget,
        #[serde(default)]
        element: Element,
        recoil: Value,
    },
    /// Gain counter: strike back at the next attackers this round.
    Counter {
        amount: Value,
        #[serde(default = "EntityTarget::self_target")]
        target: EntityTarget,
    },
    /// Hit the target, then bounce to random other enemies with falloff.
    Chain {
        amount: Value,
        #[serde(default)]
        target: EntityTarget,
        #[serde(default)]
        element: Element,
        bounces: u32,
        #[serde(default = "seventy_five")]
        falloff_percent: i32,
    },
    /// Reduce the per-hit damage of the target's declared intent.
    WeakenIntent {
        amount: Value,
        #[serde(default)]
        target: EntityTarget,
    },
    Mark {
        amount: Value,
        #[serde(default)]
        target: EntityTarget,
    },
    Reflect {
        amount: Value,
        #[serde(default = "EntityTarget::self_target")]
        target: EntityTarget,
    },
    Amplify {
        amount: Value,
        #[serde(default = "EntityTarget::self_target")]
        target: EntityTarget,
    },

    // === Resource ===
    Energy {
        amount: Value,
        #[serde(default)]
        operation: ResourceOp,
    },
    Gold {
        amount: Value,
        #[serde(default)]
        operation: ResourceOp,
    },
    EnergyNextTurn {
        amount: Value,
    },

    // === Card ===
    Draw {
        amount: Value,
    },
    Discard {
        #[serde(default = "Value::one")]
        amount: Value,
        #[serde(default = "CardTarget::random_in_hand")]
        target: CardTarget,
        #[serde(default)]
        player_choice: bool,
    },
    Exhaust {
        #[serde(default = "Value::one")]
        amount: Value,
        #[serde(default = "CardTarget::random_in_hand")]
        target: CardTarget,
    },
    /// Remove cards from every pile permanently.
    Banish {
        #[serde(default = "Value::one")]
        amount: Value,
        #[serde(default = "CardTarget::this_card")]
        target: CardTarget,
        #[serde(default)]
        player_choice: bool,
    },
    AddCard {
        card_id: CardId,
        #[serde(default = "hand")]
        destination: Pile,
        #[serde(default = "Value::one")]
        count: Value,
        #[serde(default)]
        upgraded: bool,
        #[serde(default)]
        position: PilePosition,
    },
    Shuffle {
        #[serde(default)]
        include_discard: bool,
    },
    Retain {
        #[serde(default = "CardTarget::hand")]
        target: CardTarget,
    },
    CopyCard {
        #[serde(default = "CardTarget::this_card")]
        target: CardTarget,
        #[serde(default = "hand")]
        destination: Pile,
        #[serde(default = "Value::one")]
        count: Value,
    },
    PutOnDeck {
        #[serde(default = "CardTarget::this_card")]
        target: CardTarget,
        #[serde(default = "top")]
        position: PilePosition,
    },
    ModifyCost {
        amount: Value,
        #[serde(default = "CardTarget::hand")]
        target: CardTarget,
    },
    /// Run a card's effect list again without paying for it.
    ReplayCard {
        #[serde(default = "CardTarget::last_played")]
        target: CardTarget,
        #[serde(default = "Value::one")]
        times: Value,
    },
    /// Play cards from the top of the draw pile for free.
    PlayTopCard {
        #[serde(default = "Value::one")]
        count: Value,
    },
    Discover {
        #[serde(default)]
        theme: Option<CardTheme>,
        #[serde(default)]
        choices: Option<usize>,
        #[serde(default = "hand")]
        destination: Pile,
        #[serde(default)]
        upgraded: bool,
    },
    /// Look at the top cards of the draw pile and discard any of them.
    Scry {
        amount: Value,
    },
    /// Fetch a card from the draw pile.
    Tutor {
        #[serde(default)]
        filter: Option<CardFilter>,
        #[serde(default = "hand")]
        destination: Pile,
        #[serde(default)]
        player_choice: bool,
    },
    Upgrade {
        #[serde(default = "CardTarget::hand")]
        target: CardTarget,
    },
    /// Turn cards into random other cards.
    Transform {
        #[serde(default = "CardTarget::this_card")]
        target: CardTarget,
        #[serde(default)]
        theme: Option<CardTheme>,
    },
    /// Move cards from the top of the draw pile to the discard pile.
    Mill {
        amount: Value,
    },
    CreateRandomCard {
        #[serde(default)]
        theme: Option<CardTheme>,
        #[serde(default = "hand")]
        destination: Pile,
        #[serde(default = "Value::one")]
        count: Value,
        /// Costs nothing this combat.
        #[serde(default)]
        free: bool,
        #[serde(default)]
        upgraded: bool,
    },
    SetCardFlag {
        #[serde(default = "CardTarget::this_card")]
        target: CardTarget,
        flag: CardFlag,
        #[serde(default = "yes")]
        value: bool,
    },
    /// Shuffle status cards (wounds, burns) into the player's piles.
    AddStatusCard {
        card_id: CardId,
        #[serde(default = "discard_pile")]
        destination: Pile,
        #[serde(default = "Value::one")]
        count: Value,
    },

    // === Power ===
    ApplyPower {
        power: PowerId,
        amount: Value,
        #[serde(default)]
        target: EntityTarget,
        #[serde(default)]
        duration: Option<i32>,
    },
    RemovePower {
        power: PowerId,
        /// Remove the whole entry when absent.
        #[serde(default)]
        amount: Option<Value>,
        #[serde(default = "EntityTarget::self_target")]
        target: EntityTarget,
    },
    TransferPower {
        power: PowerId,
        /// The whole source stack when absent.
        #[serde(default)]
        amount: Option<Value>,
        #[serde(default = "EntityTarget::self_target")]
        from: EntityTarget,
        #[serde(default)]
        to: EntityTarget,
    },
    /// Take a power (or a random buff) from the target for the source.
    StealPower {
        #[serde(default)]
        power: Option<PowerId>,
        #[serde(default)]
        amount: Option<Value>,
        #[serde(default)]
        target: EntityTarget,
    },
    /// Suppress a power (or all powers) for some turns.
    SilencePower {
        #[serde(default)]
        power: Option<PowerId>,
        #[serde(default = "one_turn")]
        turns: u32,
        #[serde(default)]
        target: EntityTarget,
    },

    // === Meta ===
    Conditional {
        condition: Condition,
        then: Vec<Effect>,
        #[serde(default, rename = "else")]
        otherwise: Vec<Effect>,
    },
    Repeat {
        times: Value,
        effects: Vec<Effect>,
    },
    RandomChoice {
        choices: Vec<WeightedEffects>,
    },
    Sequence {
        effects: Vec<Effect>,
    },
    ForEach {
        target: AnyTarget,
        effects: Vec<Effect>,
    },
}

fn one_turn() -> u32 {
    1
}

impl Effect {
    /// Plain physical damage.
    pub fn damage(amount: impl Into<Value>, target: EntityTarget) -> Self {
        Effect::Damage {
            amount: amount.into(),
            target,
            element: Element::Physical,
            piercing: false,
            on_hit: Vec::new(),
        }
    }

    /// Elemental damage.
    pub fn elemental(amount: impl Into<Value>, target: EntityTarget, element: Element) -> Self {
        Effect::Damage {
            amount: amount.into(),
            target,
            element,
            piercing: false,
            on_hit: Vec::new(),
        }
    }

    pub fn block(amount: impl Into<Value>, target: EntityTarget) -> Self {
        Effect::Block {
            amount: amount.into(),
            target,
        }
    }

    pub fn heal(amount: impl Into<Value>, target: EntityTarget) -> Self {
        Effect::Heal {
            amount: amount.into(),
            target,
            overheal: false,
        }
    }

    pub fn draw(amount: impl Into<Value>) -> Self {
        Effect::Draw {
            amount: amount.into(),
        }
    }

    pub fn energy(amount: impl Into<Value>, operation: ResourceOp) -> Self {
        Effect::Energy {
            amount: amount.into(),
            operation,
        }
    }

    pub fn gold(amount: impl Into<Value>, operation: ResourceOp) -> Self {
        Effect::Gold {
            amount: amount.into(),
            operation,
        }
    }

    pub fn apply_power(power: &str, amount: impl Into<Value>, target: EntityTarget) -> Self {
        Effect::ApplyPower {
            power: PowerId::from(power),
            amount: amount.into(),
            target,
            duration: None,
        }
    }

    /// The `type` tag.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Damage { .. } => "damage",
            Effect::Block { .. } => "block",
            Effect::Barrier { .. } => "barrier",
            Effect::Heal { .. } => "heal",
            Effect::Lifesteal { .. } => "lifesteal",
            Effect::DestroyBlock { .. } => "destroyBlock",
            Effect::MaxHealth { .. } => "maxHealth",
            Effect::SetHealth { .. } => "setHealth",
            Effect::Execute { .. } => "execute",
            Effect::Splash { .. } => "splash",
            Effect::Recoil { .. } => "recoil",
            Effect::Counter { .. } => "counter",
            Effect::Chain { .. } => "chain",
            Effect::WeakenIntent { .. } => "weakenIntent",
            Effect::Mark { .. } => "mark",
            Effect::Reflect { .. } => "reflect",
            Effect::Amplify { .. } => "amplify",
            Effect::Energy { .. } => "energy",
            Effect::Gold { .. } => "gold",
            Effect::EnergyNextTurn { .. } => "energyNextTurn",
            Effect::Draw { .. } => "draw",
            Effect::Discard { .. } => "discard",
            Effect::Exhaust { .. } => "exhaust",
            Effect::Banish { .. } => "banish",
            Effect::AddCard { .. } => "addCard",
            Effect::Shuffle { .. } => "shuffle",
            Effect::Retain { .. } => "retain",
            Effect::CopyCard { .. } => "copyCard",
            Effect::PutOnDeck { .. } => "putOnDeck",
            Effect::ModifyCost { .. } => "modifyCost",
            Effect::ReplayCard { .. } => "replayCard",
            Effect::PlayTopCard { .. } => "playTopCard",
            Effect::Discover { .. } => "discover",
            Effect::Scry { .. } => "scry",
            Effect::Tutor { .. } => "tutor",
            Effect::Upgrade { .. } => "upgrade",
            Effect::Transform { .. } => "transform",
            Effect::Mill { .. } => "mill",
            Effect::CreateRandomCard { .. } => "createRandomCard",
            Effect::SetCardFlag { .. } => "setCardFlag",
            Effect::AddStatusCard { .. } => "addStatusCard",
            Effect::ApplyPower { .. } => "applyPower",
            Effect::RemovePower { .. } => "removePower",
            Effect::TransferPower { .. } => "transferPower",
            Effect::StealPower { .. } => "stealPower",
            Effect::SilencePower { .. } => "silencePower",
            Effect::Conditional { .. } => "conditional",
            Effect::Repeat { .. } => "repeat",
            Effect::RandomChoice { .. } => "randomChoice",
            Effect::Sequence { .. } => "sequence",
            Effect::ForEach { .. } => "forEach",
        }
    }

    /// Whether this is a control-flow effect that only re-dispatches.
    #[must_use]
    pub fn is_meta(&self) -> bool {
        matches!(
            self,
            Effect::Conditional { .. }
                | Effect::Repeat { .. }
                | Effect::RandomChoice { .. }
                | Effect::Sequence { .. }
                | Effect::ForEach { .. }
        )
    }
}
