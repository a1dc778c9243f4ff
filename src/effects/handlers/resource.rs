//! Resource family: energy and gold.

use crate::core::CombatDraft;
use crate::effects::{EffectContext, EffectExecutor, ResourceOp, Value, VisualEvent};

/// Apply `op` to `current`. `Lose` floors at zero; `Set` is taken as is.
fn apply_op(current: i32, amount: i32, op: ResourceOp) -> i32 {
    match op {
        ResourceOp::Gain => current + amount,
        ResourceOp::Lose => (current - amount).max(0),
        ResourceOp::Set => amount,
    }
}

pub(crate) fn energy(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    amount: &Value,
    op: ResourceOp,
) {
    let amount = exec.value(draft, amount, ctx);
    let resources = &mut draft.combat.resources;
    let before = resources.energy;
    resources.energy = apply_op(before, amount, op);
    let value = resources.energy;
    if value != before {
        draft.combat.emit(VisualEvent::Energy {
            delta: value - before,
            value,
        });
    }
}

pub(crate) fn gold(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    amount: &Value,
    op: ResourceOp,
) {
    let amount = exec.value(draft, amount, ctx);
    let before = *draft.gold;
    let value = apply_op(before, amount, op).max(0);
    *draft.gold = value;

    let delta = value - before;
    if delta > 0 {
        draft.stats.gold_earned += u64::try_from(delta).unwrap_or(0);
    }
    if delta != 0 {
        draft.combat.emit(VisualEvent::Gold { delta, value });
    }
}

pub(crate) fn energy_next_turn(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    amount: &Value,
) {
    let amount = exec.value(draft, amount, ctx);
    if amount == 0 {
        return;
    }
    draft.combat.resources.energy_next_turn += amount;
    draft.combat.emit(VisualEvent::EnergyNextTurn { amount });
}
