//! Visual notifications.
//!
//! Every state-changing handler appends one event per affected target to
//! `CombatState::visual_queue`. The engine only writes the queue; the
//! presentation layer drains it.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, CardUid};
use crate::core::{EntityId, SelectionKind};
use crate::elements::Element;
use crate::powers::PowerId;
use crate::zones::Pile;

/// A tagged record of something that changed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum VisualEvent {
    Damage {
        target: EntityId,
        amount: i32,
        blocked: i32,
        element: Element,
    },
    Block {
        target: EntityId,
        amount: i32,
    },
    Barrier {
        target: EntityId,
        amount: i32,
    },
    Heal {
        target: EntityId,
        amount: i32,
    },
    DestroyBlock {
        target: EntityId,
        amount: i32,
    },
    MaxHealth {
        target: EntityId,
        delta: i32,
    },
    SetHealth {
        target: EntityId,
        value: i32,
    },
    Execute {
        target: EntityId,
    },
    Death {
        target: EntityId,
    },
    Combo {
        target: EntityId,
        name: String,
    },
    Energy {
        delta: i32,
        value: i32,
    },
    EnergyNextTurn {
        amount: i32,
    },
    Gold {
        delta: i32,
        value: i32,
    },
    Draw {
        count: usize,
    },
    Discard {
        card: CardUid,
    },
    Exhaust {
        card: CardUid,
    },
    Banish {
        card: CardUid,
    },
    AddCard {
        card: CardUid,
        card_id: CardId,
        pile: Pile,
    },
    Shuffle {
        count: usize,
    },
    Retain {
        card: CardUid,
    },
    PutOnDeck {
        card: CardUid,
    },
    CostChange {
        card: CardUid,
        delta: i32,
    },
    Upgrade {
        card: CardUid,
    },
    Transform {
        card: CardUid,
        into: CardId,
    },
    Mill {
        card: CardUid,
    },
    CardFlag {
        card: CardUid,
        flag: String,
        value: bool,
    },
    Replay {
        card: CardUid,
    },
    SelectionRequested {
        kind: SelectionKind,
        count: usize,
    },
    PowerApplied {
        target: EntityId,
        power: PowerId,
        amount: i32,
    },
    /// Stacks were taken but some remain; `amount` is what is left.
    PowerReduced {
        target: EntityId,
        power: PowerId,
        amount: i32,
    },
    PowerRemoved {
        target: EntityId,
        power: PowerId,
    },
    PowerSilenced {
        target: EntityId,
        power: PowerId,
        turns: u32,
    },
    Intent {
        enemy: EntityId,
        name: String,
    },
    IntentWeakened {
        enemy: EntityId,
        amount: i32,
    },
    HeroAbility,
    TurnStart {
        turn: u32,
    },
}

impl VisualEvent {
    /// The `type` tag, for logging and tests.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            VisualEvent::Damage { .. } => "damage",
            VisualEvent::Block { .. } => "block",
            VisualEvent::Barrier { .. } => "barrier",
            VisualEvent::Heal { .. } => "heal",
            VisualEvent::DestroyBlock { .. } => "destroyBlock",
            VisualEvent::MaxHealth { .. } => "maxHealth",
            VisualEvent::SetHealth { .. } => "setHealth",
            VisualEvent::Execute { .. } => "execute",
            VisualEvent::Death { .. } => "death",
            VisualEvent::Combo { .. } => "combo",
            VisualEvent::Energy { .. } => "energy",
            VisualEvent::EnergyNextTurn { .. } => "energyNextTurn",
            VisualEvent::Gold { .. } => "gold",
            VisualEvent::Draw { .. } => "draw",
            VisualEvent::Discard { .. } => "discard",
            VisualEvent::Exhaust { .. } => "exhaust",
            VisualEvent::Banish { .. } => "banish",
            VisualEvent::AddCard { .. } => "addCard",
            VisualEvent::Shuffle { .. } => "shuffle",
            VisualEvent::Retain { .. } => "retain",
            VisualEvent::PutOnDeck { .. } => "putOnDeck",
            VisualEvent::CostChange { .. } => "costChange",
            VisualEvent::Upgrade { .. } => "upgrade",
            VisualEvent::Transform { .. } => "transform",
            VisualEvent::Mill { .. } => "mill",
            VisualEvent::CardFlag { .. } => "cardFlag",
            VisualEvent::Replay { .. } => "replay",
            VisualEvent::SelectionRequested { .. } => "selectionRequested",
            VisualEvent::PowerApplied { .. } => "powerApplied",
            VisualEvent::PowerReduced { .. } => "powerReduced",
            VisualEvent::PowerRemoved { .. } => "powerRemoved",
            VisualEvent::PowerSilenced { .. } => "powerSilenced",
            VisualEvent::Intent { .. } => "intent",
            VisualEvent::IntentWeakened { .. } => "intentWeakened",
            VisualEvent::HeroAbility => "heroAbility",
            VisualEvent::TurnStart { .. } => "turnStart",
        }
    }
}
