//! Power registry with the built-in status table.

use rustc_hash::FxHashMap;

use super::definition::{DecayOn, PowerDefinition, PowerId, PowerKind, PowerModifiers, StackBehavior};
use crate::effects::{Effect, EntityTarget, Value};
use crate::error::ContentError;
use crate::triggers::PowerEvent;

/// Registry of power definitions.
///
/// Powers applied with an id that is not registered are skipped by the
/// effect executor.
#[derive(Clone, Debug, Default)]
pub struct PowerRegistry {
    powers: FxHashMap<PowerId, PowerDefinition>,
}

impl PowerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in statuses.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for def in builtin_powers() {
            registry.powers.insert(def.id.clone(), def);
        }
        registry
    }

    /// Register a definition. Duplicate ids are rejected.
    pub fn register(&mut self, def: PowerDefinition) -> Result<(), ContentError> {
        if self.powers.contains_key(&def.id) {
            return Err(ContentError::DuplicatePower(def.id.to_string()));
        }
        self.powers.insert(def.id.clone(), def);
        Ok(())
    }

    /// Register a definition, replacing any existing one with the same id.
    pub fn register_or_replace(&mut self, def: PowerDefinition) {
        self.powers.insert(def.id.clone(), def);
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&PowerDefinition> {
        self.powers.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.powers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.powers.is_empty()
    }
}

fn stacks() -> Value {
    Value::power_amount()
}

fn builtin_powers() -> Vec<PowerDefinition> {
    use DecayOn::{TurnEnd, TurnStart};
    use PowerKind::{Buff, Debuff};
    use StackBehavior::{Duration, Intensity};

    let hurt_self = Effect::Damage {
        amount: stacks(),
        target: EntityTarget::SelfTarget,
        element: Default::default(),
        piercing: true,
        on_hit: Vec::new(),
    };
    let hit_back = Effect::damage(stacks(), EntityTarget::Source);

    vec![
        PowerDefinition::new(PowerId::STRENGTH, Buff, Intensity).with_modifiers(PowerModifiers {
            outgoing_flat: 1,
            ..Default::default()
        }),
        PowerDefinition::new(PowerId::DEXTERITY, Buff, Intensity).with_modifiers(PowerModifiers {
            block_flat: 1,
            ..Default::default()
        }),
        PowerDefinition::new(PowerId::WEAK, Debuff, Duration)
            .removed_at_zero()
            .decays_on(TurnEnd)
            .with_modifiers(PowerModifiers {
                outgoing_percent: -25,
                ..Default::default()
            }),
        PowerDefinition::new(PowerId::VULNERABLE, Debuff, Duration)
            .removed_at_zero()
            .decays_on(TurnEnd)
            .with_modifiers(PowerModifiers {
                incoming_percent: 50,
                ..Default::default()
            }),
        PowerDefinition::new(PowerId::FRAIL, Debuff, Duration)
            .removed_at_zero()
            .decays_on(TurnEnd)
            .with_modifiers(PowerModifiers {
                block_percent: -25,
                ..Default::default()
            }),
        PowerDefinition::new(PowerId::POISON, Debuff, Intensity)
            .removed_at_zero()
            .decays_on(TurnStart)
            .on(PowerEvent::TurnStart, vec![hurt_self.clone()]),
        PowerDefinition::new(PowerId::BURNING, Debuff, Intensity)
            .removed_at_zero()
            .decays_on(TurnStart)
            .on(PowerEvent::TurnStart, vec![hurt_self]),
        PowerDefinition::new(PowerId::FROZEN, Debuff, Duration)
            .removed_at_zero()
            .decays_on(TurnEnd)
            .with_modifiers(PowerModifiers {
                outgoing_percent: -25,
                ..Default::default()
            }),
        PowerDefinition::new(PowerId::CHARGED, Debuff, Intensity)
            .removed_at_zero()
            .decays_on(TurnEnd)
            .with_modifiers(PowerModifiers {
                incoming_flat: 1,
                ..Default::default()
            }),
        PowerDefinition::new(PowerId::OILED, Debuff, Duration)
            .removed_at_zero()
            .decays_on(TurnEnd),
        PowerDefinition::new(PowerId::WET, Debuff, Duration)
            .removed_at_zero()
            .decays_on(TurnEnd),
        PowerDefinition::new(PowerId::THORNS, Buff, Intensity)
            .on(PowerEvent::Attacked, vec![hit_back.clone()]),
        PowerDefinition::new(PowerId::REFLECT, Buff, Intensity)
            .removed_at_zero()
            .expires_on(TurnStart)
            .on(PowerEvent::Damaged, vec![hit_back.clone()]),
        PowerDefinition::new(PowerId::COUNTER, Buff, Intensity)
            .removed_at_zero()
            .expires_on(TurnStart)
            .on(PowerEvent::Attacked, vec![hit_back]),
        PowerDefinition::new(PowerId::MARKED, Debuff, Intensity)
            .removed_at_zero()
            .decays_on(TurnEnd)
            .with_modifiers(PowerModifiers {
                incoming_flat: 1,
                ..Default::default()
            }),
        PowerDefinition::new(PowerId::AMPLIFY, Buff, Intensity)
            .removed_at_zero()
            .expires_on(TurnEnd)
            .with_modifiers(PowerModifiers {
                outgoing_percent: 50,
                ..Default::default()
            }),
        PowerDefinition::new(PowerId::REGENERATION, Buff, Intensity)
            .removed_at_zero()
            .decays_on(TurnEnd)
            .on(
                PowerEvent::TurnEnd,
                vec![Effect::Heal {
                    amount: stacks(),
                    target: EntityTarget::SelfTarget,
                    overheal: false,
                }],
            ),
        PowerDefinition::new(PowerId::METALLICIZE, Buff, Intensity)
            .on(PowerEvent::TurnEnd, vec![Effect::block(stacks(), EntityTarget::SelfTarget)]),
        PowerDefinition::new(PowerId::RITUAL, Buff, Intensity).on(
            PowerEvent::TurnEnd,
            vec![Effect::apply_power(PowerId::STRENGTH, stacks(), EntityTarget::SelfTarget)],
        ),
        PowerDefinition::new(PowerId::PLATED, Buff, Intensity)
            .removed_at_zero()
            .on(PowerEvent::TurnEnd, vec![Effect::block(stacks(), EntityTarget::SelfTarget)])
            .on(
                PowerEvent::Damaged,
                vec![Effect::RemovePower {
                    power: PowerId::from(PowerId::PLATED),
                    amount: Some(Value::Fixed(1)),
                    target: EntityTarget::SelfTarget,
                }],
            ),
    ]
}
