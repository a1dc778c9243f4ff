//! Power family: apply, remove, transfer, steal and silence.

use tracing::debug;

use crate::core::{CombatDraft, EntityId};
use crate::effects::{EffectContext, EffectExecutor, EntityTarget, Value, VisualEvent};
use crate::powers::{apply_power_to_entity, remove_power_from_entity, PowerId, PowerKind};

/// Apply stacks to one entity and report it. Returns false if nothing
/// changed (unregistered power, absent entity).
fn grant(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    target: EntityId,
    id: &PowerId,
    amount: i32,
    duration: Option<i32>,
) -> bool {
    let registry = &exec.content().powers;
    if !registry.contains(id.as_str()) {
        debug!(power = %id, "unknown power, skipping");
        return false;
    }
    let Some(entity) = draft.combat.entity_mut(target).filter(|e| e.is_alive()) else {
        return false;
    };
    let had = entity.powers.contains(id.as_str());
    match apply_power_to_entity(entity, registry, id, amount, duration) {
        Some(_) => draft.combat.emit(VisualEvent::PowerApplied {
            target,
            power: id.clone(),
            amount,
        }),
        None if had => draft.combat.emit(VisualEvent::PowerRemoved {
            target,
            power: id.clone(),
        }),
        None => {}
    }
    true
}

/// Take stacks from one entity, returning how many were taken.
fn take(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    target: EntityId,
    id: &PowerId,
    amount: Option<i32>,
) -> i32 {
    let registry = &exec.content().powers;
    let Some(entity) = draft.combat.entity_mut(target) else {
        return 0;
    };
    let Some(held) = entity.powers.get(id.as_str()).map(|p| p.amount) else {
        return 0;
    };
    let taken = amount.map_or(held, |a| a.min(held));
    let remaining = remove_power_from_entity(entity, registry, id.as_str(), amount.map(|_| taken));
    match remaining {
        None => draft.combat.emit(VisualEvent::PowerRemoved {
            target,
            power: id.clone(),
        }),
        Some(left) if taken != 0 => draft.combat.emit(VisualEvent::PowerReduced {
            target,
            power: id.clone(),
            amount: left,
        }),
        Some(_) => {}
    }
    taken
}

/// Shorthand effects (`counter`, `mark`, `reflect`, `amplify`) that only
/// apply a built-in power.
pub(crate) fn apply_named(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    power: &str,
    amount: &Value,
    target: EntityTarget,
) {
    apply(exec, draft, ctx, &PowerId::from(power), amount, target, None);
}

pub(crate) fn apply(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    id: &PowerId,
    amount: &Value,
    target: EntityTarget,
    duration: Option<i32>,
) {
    let amount = exec.value(draft, amount, ctx);
    if amount == 0 {
        return;
    }
    for target in exec.targets(draft, target, ctx) {
        grant(exec, draft, target, id, amount, duration);
    }
}

pub(crate) fn remove(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    id: &PowerId,
    amount: Option<&Value>,
    target: EntityTarget,
) {
    let amount = amount.map(|v| exec.value(draft, v, ctx));
    for target in exec.targets(draft, target, ctx) {
        take(exec, draft, target, id, amount);
    }
}

pub(crate) fn transfer(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    id: &PowerId,
    amount: Option<&Value>,
    from: EntityTarget,
    to: EntityTarget,
) {
    let amount = amount.map(|v| exec.value(draft, v, ctx));
    let Some(source) = exec.targets(draft, from, ctx).first().copied() else {
        return;
    };
    let Some(held) = draft
        .combat
        .entity(source)
        .and_then(|e| e.powers.get(id.as_str()).map(|p| p.amount))
    else {
        return;
    };
    let moved = amount.unwrap_or(held);
    if moved <= 0 {
        return;
    }
    take(exec, draft, source, id, Some(moved));
    for target in exec.targets(draft, to, ctx) {
        grant(exec, draft, target, id, moved, None);
    }
}

pub(crate) fn steal(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    id: Option<&PowerId>,
    amount: Option<&Value>,
    target: EntityTarget,
) {
    let amount = amount.map(|v| exec.value(draft, v, ctx));
    let registry = &exec.content().powers;
    for victim in exec.targets(draft, target, ctx) {
        let Some(entity) = draft.combat.entity(victim) else {
            continue;
        };
        let id = match id {
            Some(id) => id.clone(),
            None => {
                let buffs: Vec<PowerId> = entity
                    .powers
                    .iter()
                    .filter(|p| !p.is_silenced() && p.amount > 0)
                    .filter(|p| registry.get(p.id.as_str()).is_some_and(|d| d.kind == PowerKind::Buff))
                    .map(|p| p.id.clone())
                    .collect();
                match draft.rng.choose(&buffs) {
                    Some(id) => id.clone(),
                    None => continue,
                }
            }
        };
        let taken = take(exec, draft, victim, &id, amount);
        if taken > 0 {
            grant(exec, draft, ctx.source, &id, taken, None);
        }
    }
}

pub(crate) fn silence(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    id: Option<&PowerId>,
    turns: u32,
    target: EntityTarget,
) {
    if turns == 0 {
        return;
    }
    for target in exec.targets(draft, target, ctx) {
        let Some(entity) = draft.combat.entity_mut(target) else {
            continue;
        };
        let mut silenced = Vec::new();
        for power in entity.powers.iter_mut() {
            if id.map_or(true, |id| power.id == *id) {
                power.silenced_turns = power.silenced_turns.max(turns);
                silenced.push(power.id.clone());
            }
        }
        for power in silenced {
            draft.combat.emit(VisualEvent::PowerSilenced { target, power, turns });
        }
    }
}
