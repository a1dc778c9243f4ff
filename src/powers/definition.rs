//! Power definitions and instances.
//!
//! A `PowerDefinition` is content: how a status stacks, when it decays,
//! which damage/block modifiers it contributes and which effect lists it
//! fires on lifecycle events. A `Power` is one entity's instance of it.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::effects::Effect;
use crate::triggers::PowerEvent;

/// Identifier of a power definition (e.g. `"strength"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PowerId(pub String);

impl PowerId {
    pub const STRENGTH: &'static str = "strength";
    pub const DEXTERITY: &'static str = "dexterity";
    pub const WEAK: &'static str = "weak";
    pub const VULNERABLE: &'static str = "vulnerable";
    pub const FRAIL: &'static str = "frail";
    pub const POISON: &'static str = "poison";
    pub const BURNING: &'static str = "burning";
    pub const FROZEN: &'static str = "frozen";
    pub const CHARGED: &'static str = "charged";
    pub const OILED: &'static str = "oiled";
    pub const WET: &'static str = "wet";
    pub const THORNS: &'static str = "thorns";
    pub const REFLECT: &'static str = "reflect";
    pub const COUNTER: &'static str = "counter";
    pub const MARKED: &'static str = "marked";
    pub const AMPLIFY: &'static str = "amplify";
    pub const REGENERATION: &'static str = "regeneration";
    pub const METALLICIZE: &'static str = "metallicize";
    pub const RITUAL: &'static str = "ritual";
    pub const PLATED: &'static str = "plated";

    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PowerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::borrow::Borrow<str> for PowerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PowerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a power helps or hinders its owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerKind {
    Buff,
    Debuff,
}

/// How repeated applications combine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StackBehavior {
    /// Amount is magnitude; applications sum.
    Intensity,
    /// Amount is turns remaining; applications take the max.
    Duration,
    /// Amount sums; an explicit duration takes the max.
    Both,
}

/// Turn boundary at which a power ticks down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DecayOn {
    TurnStart,
    TurnEnd,
}

/// Decay rule: lose one stack (or all stacks) at a turn boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decay {
    pub on: DecayOn,
    #[serde(default)]
    pub remove_all: bool,
}

/// Table-driven damage and block modifiers.
///
/// Flat values are per stack; percentages apply once while the power is
/// present.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PowerModifiers {
    pub outgoing_flat: i32,
    pub outgoing_percent: i32,
    pub incoming_flat: i32,
    pub incoming_percent: i32,
    pub block_flat: i32,
    pub block_percent: i32,
}

impl PowerModifiers {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == PowerModifiers::default()
    }
}

/// An effect list fired on a lifecycle event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerTrigger {
    pub event: PowerEvent,
    pub effects: Vec<Effect>,
}

/// Static power content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerDefinition {
    pub id: PowerId,
    pub name: String,
    pub kind: PowerKind,
    pub stacking: StackBehavior,
    /// Delete the entry once its amount reaches zero or below.
    #[serde(default)]
    pub remove_at_zero: bool,
    #[serde(default)]
    pub decay: Option<Decay>,
    #[serde(default)]
    pub modifiers: PowerModifiers,
    #[serde(default)]
    pub triggers: Vec<PowerTrigger>,
}

impl PowerDefinition {
    #[must_use]
    pub fn new(id: &str, kind: PowerKind, stacking: StackBehavior) -> Self {
        let mut name = id.to_string();
        if let Some(first) = name.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        Self {
            id: PowerId::from(id),
            name,
            kind,
            stacking,
            remove_at_zero: false,
            decay: None,
            modifiers: PowerModifiers::default(),
            triggers: Vec::new(),
        }
    }

    #[must_use]
    pub fn removed_at_zero(mut self) -> Self {
        self.remove_at_zero = true;
        self
    }

    #[must_use]
    pub fn decays_on(mut self, on: DecayOn) -> Self {
        self.decay = Some(Decay { on, remove_all: false });
        self
    }

    #[must_use]
    pub fn expires_on(mut self, on: DecayOn) -> Self {
        self.decay = Some(Decay { on, remove_all: true });
        self
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: PowerModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn on(mut self, event: PowerEvent, effects: Vec<Effect>) -> Self {
        self.triggers.push(PowerTrigger { event, effects });
        self
    }

    /// Effect lists declared for an event.
    pub fn triggers_for(&self, event: PowerEvent) -> impl Iterator<Item = &[Effect]> {
        self.triggers
            .iter()
            .filter(move |t| t.event == event)
            .map(|t| t.effects.as_slice())
    }
}

/// A power instance on an entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Power {
    pub id: PowerId,
    /// Magnitude or turns remaining, per the definition's stacking.
    pub amount: i32,
    #[serde(default)]
    pub duration: Option<i32>,
    /// Triggers and modifiers are suppressed while non-zero.
    #[serde(default)]
    pub silenced_turns: u32,
}

impl Power {
    #[must_use]
    pub fn new(id: PowerId, amount: i32, duration: Option<i32>) -> Self {
        Self {
            id,
            amount,
            duration,
            silenced_turns: 0,
        }
    }

    #[must_use]
    pub fn is_silenced(&self) -> bool {
        self.silenced_turns > 0
    }
}

/// Powers on one entity, in application order.
///
/// Insertion order is trigger order, which keeps resolution deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PowerSet(SmallVec<[Power; 4]>);

impl PowerSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Power> {
        self.0.iter().find(|p| p.id.as_str() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Power> {
        self.0.iter_mut().find(|p| p.id.as_str() == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Stack amount, 0 if absent.
    #[must_use]
    pub fn amount(&self, id: &str) -> i32 {
        self.get(id).map_or(0, |p| p.amount)
    }

    pub fn insert(&mut self, power: Power) {
        match self.get_mut(power.id.as_str()) {
            Some(existing) => *existing = power,
            None => self.0.push(power),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Power> {
        let index = self.0.iter().position(|p| p.id.as_str() == id)?;
        Some(self.0.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Power> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Power> {
        self.0.iter_mut()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
