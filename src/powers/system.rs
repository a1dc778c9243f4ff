//! Power operations on entities.
//!
//! Everything here is a plain function over `&mut Entity` (or `&Entity`)
//! plus the registry; no combat state, no visuals. The effect handlers wrap
//! these with target resolution and notifications.
//!
//! ## Stacking
//!
//! - intensity: amounts sum
//! - duration: the larger of existing and incoming wins
//! - both: amounts sum, an explicit duration takes the max
//!
//! ## Removal
//!
//! Without an amount the entry is deleted. With an amount it is subtracted,
//! and the entry is deleted only when the result is `<= 0` and the
//! definition is `remove_at_zero`. Strength-like powers can sit at zero or
//! below.

use super::definition::{DecayOn, PowerId, Power, StackBehavior};
use super::registry::PowerRegistry;
use crate::core::Entity;
use crate::effects::Effect;
use crate::triggers::PowerEvent;

/// Apply `amount` stacks of a power.
///
/// Returns the resulting amount, `Some(0)`-or-less only for powers that
/// persist at zero, or `None` if the power is unregistered or was removed
/// by the application.
pub fn apply_power_to_entity(
    entity: &mut Entity,
    registry: &PowerRegistry,
    id: &PowerId,
    amount: i32,
    duration: Option<i32>,
) -> Option<i32> {
    let def = registry.get(id.as_str())?;

    let (new_amount, new_duration) = match entity.powers.get(id.as_str()) {
        None => (amount, duration),
        Some(existing) => match def.stacking {
            StackBehavior::Intensity => (existing.amount + amount, existing.duration),
            StackBehavior::Duration => (existing.amount.max(amount), existing.duration),
            StackBehavior::Both => (
                existing.amount + amount,
                match (existing.duration, duration) {
                    (Some(a), Some(b)) => Some(a.max(b)),
                    (a, b) => a.or(b),
                },
            ),
        },
    };

    if new_amount <= 0 && def.remove_at_zero {
        entity.powers.remove(id.as_str());
        return None;
    }

    let silenced_turns = entity.powers.get(id.as_str()).map_or(0, |p| p.silenced_turns);
    entity.powers.insert(Power {
        id: id.clone(),
        amount: new_amount,
        duration: new_duration,
        silenced_turns,
    });
    Some(new_amount)
}

/// Remove stacks of a power, or the whole entry when `amount` is `None`.
///
/// Returns the remaining amount, or `None` if the entry is gone (or was
/// never there).
pub fn remove_power_from_entity(
    entity: &mut Entity,
    registry: &PowerRegistry,
    id: &str,
    amount: Option<i32>,
) -> Option<i32> {
    let Some(amount) = amount else {
        entity.powers.remove(id);
        return None;
    };

    let remove_at_zero = registry.get(id).is_some_and(|d| d.remove_at_zero);
    let power = entity.powers.get_mut(id)?;
    power.amount -= amount;
    let remaining = power.amount;

    if remaining <= 0 && remove_at_zero {
        entity.powers.remove(id);
        return None;
    }
    Some(remaining)
}

/// One power's response to an event.
#[derive(Clone, Copy, Debug)]
pub struct TriggeredPower<'r> {
    pub power: &'r PowerId,
    pub stacks: i32,
    pub effects: &'r [Effect],
}

/// Effect lists that fire for `event` on this entity, in power order.
///
/// Silenced powers do not fire. The returned slices borrow the registry,
/// not the entity, so the entity can be mutated while they run.
pub fn power_triggers<'r>(
    entity: &Entity,
    registry: &'r PowerRegistry,
    event: PowerEvent,
) -> Vec<TriggeredPower<'r>> {
    let mut triggered = Vec::new();
    for power in entity.powers.iter().filter(|p| !p.is_silenced()) {
        let Some(def) = registry.get(power.id.as_str()) else {
            continue;
        };
        for effects in def.triggers_for(event) {
            triggered.push(TriggeredPower {
                power: &def.id,
                stacks: power.amount,
                effects,
            });
        }
    }
    triggered
}

fn scale_percent(value: i32, percent: i32) -> i32 {
    (value * (100 + percent)).div_euclid(100).max(0)
}

fn active_modifiers<'a>(
    entity: &'a Entity,
    registry: &'a PowerRegistry,
) -> impl Iterator<Item = (i32, &'a super::definition::PowerModifiers)> + 'a {
    entity
        .powers
        .iter()
        .filter(|p| !p.is_silenced())
        .filter_map(move |p| {
            registry
                .get(p.id.as_str())
                .filter(|d| !d.modifiers.is_empty())
                .map(|d| (p.amount, &d.modifiers))
        })
}

/// Damage after the attacker's modifiers: flat per-stack bonuses first,
/// then each percentage in power order, flooring after every step.
#[must_use]
pub fn outgoing_damage(base: i32, attacker: &Entity, registry: &PowerRegistry) -> i32 {
    let mods: Vec<_> = active_modifiers(attacker, registry).collect();
    let flat: i32 = mods.iter().map(|(stacks, m)| m.outgoing_flat * stacks).sum();
    let mut damage = (base + flat).max(0);
    for (stacks, m) in &mods {
        if m.outgoing_percent != 0 && *stacks > 0 {
            damage = scale_percent(damage, m.outgoing_percent);
        }
    }
    damage
}

/// Damage after the defender's modifiers.
#[must_use]
pub fn incoming_damage(amount: i32, defender: &Entity, registry: &PowerRegistry) -> i32 {
    let mods: Vec<_> = active_modifiers(defender, registry).collect();
    let flat: i32 = mods.iter().map(|(stacks, m)| m.incoming_flat * stacks).sum();
    let mut damage = (amount + flat).max(0);
    for (stacks, m) in &mods {
        if m.incoming_percent != 0 && *stacks > 0 {
            damage = scale_percent(damage, m.incoming_percent);
        }
    }
    damage
}

/// Block after the owner's modifiers.
#[must_use]
pub fn outgoing_block(base: i32, entity: &Entity, registry: &PowerRegistry) -> i32 {
    let mods: Vec<_> = active_modifiers(entity, registry).collect();
    let flat: i32 = mods.iter().map(|(stacks, m)| m.block_flat * stacks).sum();
    let mut block = (base + flat).max(0);
    for (stacks, m) in &mods {
        if m.block_percent != 0 && *stacks > 0 {
            block = scale_percent(block, m.block_percent);
        }
    }
    block
}

/// Result of a decay tick on one power.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecayTick {
    pub power: PowerId,
    /// Remaining amount, `None` if the power expired.
    pub remaining: Option<i32>,
}

/// Tick every power that decays at `on`.
///
/// A decaying power loses one stack (or all of them for `remove_all`) and
/// is deleted once it reaches zero.
pub fn decay_powers(entity: &mut Entity, registry: &PowerRegistry, on: DecayOn) -> Vec<DecayTick> {
    let mut ticks = Vec::new();
    for power in entity.powers.iter_mut() {
        let Some(decay) = registry.get(power.id.as_str()).and_then(|d| d.decay) else {
            continue;
        };
        if decay.on != on {
            continue;
        }
        power.amount = if decay.remove_all { 0 } else { power.amount - 1 };
        ticks.push(DecayTick {
            power: power.id.clone(),
            remaining: (power.amount > 0).then_some(power.amount),
        });
    }
    for tick in ticks.iter().filter(|t| t.remaining.is_none()) {
        entity.powers.remove(tick.power.as_str());
    }
    ticks
}

/// Count down silence on every power by one turn.
pub fn tick_silence(entity: &mut Entity) {
    for power in entity.powers.iter_mut() {
        power.silenced_turns = power.silenced_turns.saturating_sub(1);
    }
}
