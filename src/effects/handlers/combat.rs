//! Combat family: damage, block, healing and the advanced attack variants.
//!
//! ## Damage pipeline
//!
//! Per resolved target, independently:
//!
//! 1. base value, minus any intent penalty
//! 2. attacker's outgoing modifiers (skipped for trigger damage)
//! 3. defender's incoming modifiers
//! 4. elemental vulnerability x1.5 / resistance x0.5
//! 5. elemental combo, which consumes the existing status
//! 6. block, barrier, then health
//! 7. on-hit effects with the target as current target
//! 8. signature status, unless a combo fired
//! 9. attack, attacked, damaged, death and kill triggers
//!
//! Every multiplication floors.

use tracing::debug;

use crate::core::{CombatDraft, DamageOutcome, EntityId};
use crate::effects::{Effect, EffectContext, EffectExecutor, EntityTarget, Value, VisualEvent};
use crate::elements::{affinity_multiplier, find_combo, Combo, Element};
use crate::powers::{apply_power_to_entity, incoming_damage, outgoing_block, outgoing_damage, PowerId};
use crate::triggers::PowerEvent;

/// One incoming hit before modifiers.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Hit<'e> {
    pub base: i32,
    pub element: Element,
    pub piercing: bool,
    pub on_hit: &'e [Effect],
}

impl Hit<'_> {
    pub(crate) fn plain(base: i32, element: Element) -> Self {
        Hit {
            base,
            element,
            piercing: false,
            on_hit: &[],
        }
    }
}

fn floor_mul(value: i32, factor: f64) -> i32 {
    (f64::from(value) * factor).floor() as i32
}

/// Run the full damage pipeline against one target.
///
/// Returns `None` if the target is absent or already dead.
pub(crate) fn strike(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    target: EntityId,
    hit: Hit<'_>,
) -> Option<DamageOutcome> {
    let registry = &exec.content().powers;

    let Some(defender) = draft.combat.entity(target).filter(|e| e.is_alive()) else {
        debug!(%target, "damage target gone");
        return None;
    };

    let mut amount = (hit.base - ctx.damage_penalty).max(0);
    if !ctx.triggered {
        if let Some(attacker) = draft.combat.entity(ctx.source) {
            amount = outgoing_damage(amount, attacker, registry);
        }
    }
    amount = incoming_damage(amount, defender, registry);
    amount = floor_mul(
        amount,
        affinity_multiplier(defender.is_vulnerable_to(hit.element), defender.resists(hit.element)),
    );

    let combo = find_combo(hit.element, |status| defender.powers.contains(status));
    if let Some(combo) = combo {
        amount = combo.scale(amount);
        if let Some(entity) = draft.combat.entity_mut(target) {
            entity.powers.remove(combo.existing);
        }
        draft.combat.emit(VisualEvent::Combo {
            target,
            name: combo.name.to_string(),
        });
        draft.combat.emit(VisualEvent::PowerRemoved {
            target,
            power: PowerId::from(combo.existing),
        });
    }

    let mut outcome = land(draft, ctx.source, target, amount, hit.element, hit.piercing)?;

    if let Some(combo) = combo {
        outcome.killed |= combo_followup(exec, draft, ctx, target, combo, amount);
    }

    if !hit.on_hit.is_empty() {
        exec.execute_all(draft, hit.on_hit, &ctx.with_current_target(target));
    }

    if combo.is_none() {
        if let Some((status, stacks)) = hit.element.signature_status() {
            inflict(exec, draft, target, &status, stacks);
        }
    }

    aftermath(exec, draft, ctx, target, outcome, true);
    Some(outcome)
}

/// Apply final damage to an entity: block, barrier, health, visual, stats.
fn land(
    draft: &mut CombatDraft<'_>,
    source: EntityId,
    target: EntityId,
    amount: i32,
    element: Element,
    piercing: bool,
) -> Option<DamageOutcome> {
    let entity = draft.combat.entity_mut(target)?;
    let outcome = entity.take_damage(amount, piercing);

    draft.combat.emit(VisualEvent::Damage {
        target,
        amount,
        blocked: outcome.blocked,
        element,
    });

    let lost = u64::try_from(outcome.health_lost).unwrap_or(0);
    if target.is_player() {
        draft.stats.damage_taken += lost;
    } else if source.is_player() {
        draft.stats.damage_dealt += lost;
    }
    Some(outcome)
}

/// Combo side effects after the main hit. Returns true if the target was
/// executed.
fn combo_followup(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    target: EntityId,
    combo: &Combo,
    dealt: i32,
) -> bool {
    if let Some((status, stacks)) = combo.apply {
        inflict(exec, draft, target, &PowerId::from(status), stacks);
    }

    if let Some(percent) = combo.chain_percent {
        let spill = dealt * percent / 100;
        let others: Vec<EntityId> = draft
            .combat
            .living_enemy_ids()
            .into_iter()
            .filter(|&id| id != target)
            .collect();
        for other in others {
            if let Some(outcome) = land(draft, ctx.source, other, spill, combo.element, false) {
                aftermath(exec, draft, ctx, other, outcome, false);
            }
        }
    }

    if let Some(threshold) = combo.execute_below_percent {
        let Some(entity) = draft.combat.entity_mut(target) else {
            return false;
        };
        if entity.is_alive() && entity.health_percent() < threshold {
            entity.set_health(0);
            draft.combat.emit(VisualEvent::Execute { target });
            return true;
        }
    }
    false
}

/// Force-apply a status, skipping dead targets.
fn inflict(exec: &EffectExecutor<'_>, draft: &mut CombatDraft<'_>, target: EntityId, status: &PowerId, stacks: i32) {
    let registry = &exec.content().powers;
    let Some(entity) = draft.combat.entity_mut(target).filter(|e| e.is_alive()) else {
        return;
    };
    if apply_power_to_entity(entity, registry, status, stacks, None).is_some() {
        draft.combat.emit(VisualEvent::PowerApplied {
            target,
            power: status.clone(),
            amount: stacks,
        });
    }
}

/// Fire the post-damage triggers for one target.
fn aftermath(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    target: EntityId,
    outcome: DamageOutcome,
    attack: bool,
) {
    if attack && !ctx.triggered {
        exec.fire(draft, ctx.source, PowerEvent::Attack, Some(target), ctx);
        exec.fire(draft, target, PowerEvent::Attacked, Some(ctx.source), ctx);
    }
    if outcome.health_lost > 0 {
        exec.fire(draft, target, PowerEvent::Damaged, Some(ctx.source), ctx);
    }
    if outcome.killed {
        on_death(exec, draft, ctx, target, Some(ctx.source));
    }
}

/// Death bookkeeping: visual, stats, death and kill triggers, then the
/// corpse is removed from the enemy list.
pub(crate) fn on_death(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    victim: EntityId,
    killer: Option<EntityId>,
) {
    draft.combat.emit(VisualEvent::Death { target: victim });
    if !victim.is_player() {
        draft.stats.enemies_killed += 1;
    }
    exec.fire(draft, victim, PowerEvent::Death, killer, ctx);
    draft.combat.reap_dead();
    if let Some(killer) = killer.filter(|&k| k != victim) {
        exec.fire(draft, killer, PowerEvent::Kill, Some(victim), ctx);
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn damage(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    amount: &Value,
    target: EntityTarget,
    element: Element,
    piercing: bool,
    on_hit: &[Effect],
) {
    let base = exec.value(draft, amount, ctx);
    let hit = Hit {
        base,
        element,
        piercing,
        on_hit,
    };
    for id in exec.targets(draft, target, ctx) {
        strike(exec, draft, ctx, id, hit);
    }
}

pub(crate) fn block(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    amount: &Value,
    target: EntityTarget,
) {
    let base = exec.value(draft, amount, ctx);
    let gained = match draft.combat.entity(ctx.source) {
        Some(source) if !ctx.triggered => outgoing_block(base, source, &exec.content().powers),
        _ => base.max(0),
    };
    if gained == 0 {
        return;
    }
    for id in exec.targets(draft, target, ctx) {
        let Some(entity) = draft.combat.entity_mut(id) else {
            continue;
        };
        entity.block += gained;
        draft.combat.emit(VisualEvent::Block { target: id, amount: gained });
        exec.fire(draft, id, PowerEvent::Block, Some(ctx.source), ctx);
    }
}

pub(crate) fn barrier(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    amount: &Value,
    target: EntityTarget,
) {
    let gained = exec.value(draft, amount, ctx).max(0);
    if gained == 0 {
        return;
    }
    for id in exec.targets(draft, target, ctx) {
        let Some(entity) = draft.combat.entity_mut(id) else {
            continue;
        };
        entity.barrier += gained;
        draft.combat.emit(VisualEvent::Barrier { target: id, amount: gained });
    }
}

pub(crate) fn heal(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    amount: &Value,
    target: EntityTarget,
    overheal: bool,
) {
    let amount = exec.value(draft, amount, ctx);
    for id in exec.targets(draft, target, ctx) {
        let Some(entity) = draft.combat.entity_mut(id) else {
            continue;
        };
        let healed = entity.heal(amount, overheal);
        if healed > 0 {
            draft.combat.emit(VisualEvent::Heal { target: id, amount: healed });
        }
    }
}

pub(crate) fn lifesteal(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    amount: &Value,
    target: EntityTarget,
    element: Element,
    percent: i32,
) {
    let base = exec.value(draft, amount, ctx);
    let mut drained = 0;
    for id in exec.targets(draft, target, ctx) {
        if let Some(outcome) = strike(exec, draft, ctx, id, Hit::plain(base, element)) {
            drained += outcome.health_lost;
        }
    }

    let healing = drained * percent / 100;
    let Some(source) = draft.combat.entity_mut(ctx.source) else {
        return;
    };
    let healed = source.heal(healing, false);
    if healed > 0 {
        draft.combat.emit(VisualEvent::Heal {
            target: ctx.source,
            amount: healed,
        });
    }
}

pub(crate) fn destroy_block(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    target: EntityTarget,
    include_barrier: bool,
) {
    for id in exec.targets(draft, target, ctx) {
        let Some(entity) = draft.combat.entity_mut(id) else {
            continue;
        };
        let mut removed = std::mem::take(&mut entity.block);
        if include_barrier {
            removed += std::mem::take(&mut entity.barrier);
        }
        if removed > 0 {
            draft.combat.emit(VisualEvent::DestroyBlock { target: id, amount: removed });
        }
    }
}

pub(crate) fn max_health(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    amount: &Value,
    target: EntityTarget,
) {
    let delta = exec.value(draft, amount, ctx);
    if delta == 0 {
        return;
    }
    for id in exec.targets(draft, target, ctx) {
        let Some(entity) = draft.combat.entity_mut(id) else {
            continue;
        };
        let before = entity.max_health;
        entity.change_max_health(delta);
        let delta = entity.max_health - before;
        if delta != 0 {
            draft.combat.emit(VisualEvent::MaxHealth { target: id, delta });
        }
    }
}

pub(crate) fn set_health(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    amount: &Value,
    target: EntityTarget,
) {
    let value = exec.value(draft, amount, ctx);
    for id in exec.targets(draft, target, ctx) {
        let Some(entity) = draft.combat.entity_mut(id) else {
            continue;
        };
        entity.set_health(value);
        let value = entity.current_health;
        let died = !entity.is_alive();
        draft.combat.emit(VisualEvent::SetHealth { target: id, value });
        if died {
            on_death(exec, draft, ctx, id, Some(ctx.source));
        }
    }
}

pub(crate) fn execute(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    threshold: i32,
    target: EntityTarget,
) {
    for id in exec.targets(draft, target, ctx) {
        let Some(entity) = draft.combat.entity_mut(id) else {
            continue;
        };
        if entity.health_percent() > threshold {
            continue;
        }
        entity.set_health(0);
        draft.combat.emit(VisualEvent::Execute { target: id });
        on_death(exec, draft, ctx, id, Some(ctx.source));
    }
}

pub(crate) fn splash(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    amount: &Value,
    target: EntityTarget,
    element: Element,
    splash_percent: i32,
) {
    let base = exec.value(draft, amount, ctx);
    let Some(primary) = exec.targets(draft, target, ctx).first().copied() else {
        return;
    };
    let others: Vec<EntityId> = draft
        .combat
        .living_enemy_ids()
        .into_iter()
        .filter(|&id| id != primary)
        .collect();

    strike(exec, draft, ctx, primary, Hit::plain(base, element));
    let splashed = base * splash_percent / 100;
    for id in others {
        strike(exec, draft, ctx, id, Hit::plain(splashed, element));
    }
}

pub(crate) fn recoil(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    amount: &Value,
    target: EntityTarget,
    element: Element,
    recoil: &Value,
) {
    let base = exec.value(draft, amount, ctx);
    let recoil = exec.value(draft, recoil, ctx).max(0);
    let mut struck = false;
    for id in exec.targets(draft, target, ctx) {
        struck |= strike(exec, draft, ctx, id, Hit::plain(base, element)).is_some();
    }
    if !struck || recoil == 0 {
        return;
    }
    if draft.combat.entity(ctx.source).is_some_and(|e| e.is_alive()) {
        if let Some(outcome) = land(draft, ctx.source, ctx.source, recoil, Element::Physical, true) {
            aftermath(exec, draft, ctx, ctx.source, outcome, false);
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn chain(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    amount: &Value,
    target: EntityTarget,
    element: Element,
    bounces: u32,
    falloff_percent: i32,
) {
    let mut base = exec.value(draft, amount, ctx);
    let Some(mut current) = exec.targets(draft, target, ctx).first().copied() else {
        return;
    };
    strike(exec, draft, ctx, current, Hit::plain(base, element));

    for _ in 0..bounces {
        base = base * falloff_percent / 100;
        if base <= 0 {
            break;
        }
        let candidates: Vec<EntityId> = draft
            .combat
            .living_enemy_ids()
            .into_iter()
            .filter(|&id| id != current)
            .collect();
        let Some(&next) = draft.rng.choose(&candidates) else {
            break;
        };
        strike(exec, draft, ctx, next, Hit::plain(base, element));
        current = next;
    }
}

pub(crate) fn weaken_intent(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    amount: &Value,
    target: EntityTarget,
) {
    let amount = exec.value(draft, amount, ctx);
    if amount <= 0 {
        return;
    }
    for id in exec.targets(draft, target, ctx) {
        let Some(intent) = draft
            .combat
            .entity_mut(id)
            .and_then(|e| e.enemy.as_mut())
            .and_then(|e| e.intent.as_mut())
        else {
            continue;
        };
        intent.weakened += amount;
        draft.combat.emit(VisualEvent::IntentWeakened { enemy: id, amount });
    }
}
