//! Meta family: effects that run other effects.

use crate::core::CombatDraft;
use crate::effects::{AnyTarget, Effect, EffectContext, EffectExecutor, Value, WeightedEffects};
use crate::triggers::{Condition, ConditionEvaluator};

pub(crate) fn conditional(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    condition: &Condition,
    then: &[Effect],
    otherwise: &[Effect],
) {
    let branch = if ConditionEvaluator::evaluate(condition, draft.combat, *draft.gold, ctx) {
        then
    } else {
        otherwise
    };
    exec.execute_all(draft, branch, &ctx.child());
}

pub(crate) fn repeat(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    times: &Value,
    effects: &[Effect],
) {
    let times = exec.count(draft, times, ctx);
    let child = ctx.child();
    for _ in 0..times {
        exec.execute_all(draft, effects, &child);
    }
}

pub(crate) fn random_choice(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    choices: &[WeightedEffects],
) {
    let weights: Vec<f32> = choices.iter().map(|c| c.weight).collect();
    let Some(index) = draft.rng.choose_weighted(&weights) else {
        return;
    };
    if let Some(choice) = choices.get(index) {
        exec.execute_all(draft, &choice.effects, &ctx.child());
    }
}

/// Run `effects` once per resolved entity or card. The target set is fixed
/// before the first iteration.
pub(crate) fn for_each(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    target: &AnyTarget,
    effects: &[Effect],
) {
    match target {
        AnyTarget::Entity(target) => {
            for id in exec.targets(draft, *target, ctx) {
                exec.execute_all(draft, effects, &ctx.with_current_target(id));
            }
        }
        AnyTarget::Card(target) => {
            for card in exec.cards(draft, target, None, ctx) {
                exec.execute_all(draft, effects, &ctx.with_current_card(card));
            }
        }
    }
}
