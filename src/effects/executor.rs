//! Effect executor.
//!
//! The central interpreter. `execute` is one flat `match` over the effect
//! tag, delegating to the family handlers in `handlers/`. Handlers receive
//! the executor explicitly so nested effect lists (on-hit, replays, power
//! triggers, meta effects) re-enter the same dispatcher.
//!
//! ## Contracts
//!
//! - Handlers never fail. Missing cards, powers or entities skip the step
//!   (logged at debug level); sibling effects still run.
//! - Every observable change appends a `VisualEvent` per affected target.
//! - Nested dispatch is bounded by `CombatConfig::max_effect_depth`.

use tracing::{debug, warn};

use super::context::EffectContext;
use super::effect::Effect;
use super::handlers::{card, combat, meta, power, resource};
use super::targeting::{CardTarget, EntityTarget, TargetResolver};
use super::value::{Value, ValueResolver};
use crate::cards::CardInstance;
use crate::content::Content;
use crate::core::{CombatConfig, CombatDraft, EntityId};
use crate::powers::{power_triggers, PowerId};
use crate::triggers::PowerEvent;

/// Interprets effects against a combat draft.
#[derive(Clone, Copy)]
pub struct EffectExecutor<'c> {
    content: &'c Content,
    config: &'c CombatConfig,
}

impl<'c> EffectExecutor<'c> {
    #[must_use]
    pub fn new(content: &'c Content, config: &'c CombatConfig) -> Self {
        Self { content, config }
    }

    #[must_use]
    pub fn content(&self) -> &'c Content {
        self.content
    }

    #[must_use]
    pub fn config(&self) -> &'c CombatConfig {
        self.config
    }

    /// Execute an effect list in order.
    pub fn execute_all(&self, draft: &mut CombatDraft<'_>, effects: &[Effect], ctx: &EffectContext) {
        for effect in effects {
            self.execute(draft, effect, ctx);
        }
    }

    /// Execute a single effect.
    pub fn execute(&self, draft: &mut CombatDraft<'_>, effect: &Effect, ctx: &EffectContext) {
        if ctx.depth > self.config.max_effect_depth {
            warn!(
                effect = effect.name(),
                depth = ctx.depth,
                "effect recursion limit reached, skipping"
            );
            return;
        }
        debug!(effect = effect.name(), source = %ctx.source, depth = ctx.depth, "dispatch");

        match effect {
            // === Combat ===
            Effect::Damage {
                amount,
                target,
                element,
                piercing,
                on_hit,
            } => combat::damage(self, draft, ctx, amount, *target, *element, *piercing, on_hit),
            Effect::Block { amount, target } => combat::block(self, draft, ctx, amount, *target),
            Effect::Barrier { amount, target } => combat::barrier(self, draft, ctx, amount, *target),
            Effect::Heal {
                amount,
                target,
                overheal,
            } => combat::heal(self, draft, ctx, amount, *target, *overheal),
            Effect::Lifesteal {
                amount,
                target,
                element,
                percent,
            } => combat::lifesteal(self, draft, ctx, amount, *target, *element, *percent),
            Effect::DestroyBlock {
                target,
                include_barrier,
            } => combat::destroy_block(self, draft, ctx, *target, *include_barrier),
            Effect::MaxHealth { amount, target } => combat::max_health(self, draft, ctx, amount, *target),
            Effect::SetHealth { amount, target } => combat::set_health(self, draft, ctx, amount, *target),
            Effect::Execute { threshold, target } => combat::execute(self, draft, ctx, *threshold, *target),
            Effect::Splash {
                amount,
                target,
                element,
                splash_percent,
            } => combat::splash(self, draft, ctx, amount, *target, *element, *splash_percent),
            Effect::Recoil {
                amount,
                target,
                element,
                recoil,
            } => combat::recoil(self, draft, ctx, amount, *target, *element, recoil),
            Effect::Chain {
                amount,
                target,
                element,
                bounces,
                falloff_percent,
            } => combat::chain(self, draft, ctx, amount, *target, *element, *bounces, *falloff_percent),
            Effect::WeakenIntent { amount, target } => combat::weaken_intent(self, draft, ctx, amount, *target),
            Effect::Counter { amount, target } => {
                power::apply_named(self, draft, ctx, PowerId::COUNTER, amount, *target)
            }
            Effect::Mark { amount, target } => {
                power::apply_named(self, draft, ctx, PowerId::MARKED, amount, *target)
            }
            Effect::Reflect { amount, target } => {
                power::apply_named(self, draft, ctx, PowerId::REFLECT, amount, *target)
            }
            Effect::Amplify { amount, target } => {
                power::apply_named(self, draft, ctx, PowerId::AMPLIFY, amount, *target)
            }

            // === Resource ===
            Effect::Energy { amount, operation } => resource::energy(self, draft, ctx, amount, *operation),
            Effect::Gold { amount, operation } => resource::gold(self, draft, ctx, amount, *operation),
            Effect::EnergyNextTurn { amount } => resource::energy_next_turn(self, draft, ctx, amount),

            // === Card ===
            Effect::Draw { amount } => {
                let count = self.count(draft, amount, ctx);
                card::draw(self, draft, count);
            }
            Effect::Discard {
                amount,
                target,
                player_choice,
            } => card::discard(self, draft, ctx, amount, target, *player_choice),
            Effect::Exhaust { amount, target } => card::exhaust(self, draft, ctx, amount, target),
            Effect::Banish {
                amount,
                target,
                player_choice,
            } => card::banish(self, draft, ctx, amount, target, *player_choice),
            Effect::AddCard {
                card_id,
                destination,
                count,
                upgraded,
                position,
            } => card::add_card(self, draft, ctx, card_id, *destination, count, *upgraded, *position),
            Effect::Shuffle { include_discard } => card::shuffle(draft, *include_discard),
            Effect::Retain { target } => card::retain(self, draft, ctx, target),
            Effect::CopyCard {
                target,
                destination,
                count,
            } => card::copy_card(self, draft, ctx, target, *destination, count),
            Effect::PutOnDeck { target, position } => card::put_on_deck(self, draft, ctx, target, *position),
            Effect::ModifyCost { amount, target } => card::modify_cost(self, draft, ctx, amount, target),
            Effect::ReplayCard { target, times } => card::replay_card(self, draft, ctx, target, times),
            Effect::PlayTopCard { count } => card::play_top_card(self, draft, ctx, count),
            Effect::Discover {
                theme,
                choices,
                destination,
                upgraded,
            } => card::discover(self, draft, *theme, *choices, *destination, *upgraded),
            Effect::Scry { amount } => card::scry(self, draft, ctx, amount),
            Effect::Tutor {
                filter,
                destination,
                player_choice,
            } => card::tutor(self, draft, ctx, filter.as_ref(), *destination, *player_choice),
            Effect::Upgrade { target } => card::upgrade(self, draft, ctx, target),
            Effect::Transform { target, theme } => card::transform(self, draft, ctx, target, *theme),
            Effect::Mill { amount } => card::mill(self, draft, ctx, amount),
            Effect::CreateRandomCard {
                theme,
                destination,
                count,
                free,
                upgraded,
            } => card::create_random_card(self, draft, ctx, *theme, *destination, count, *free, *upgraded),
            Effect::SetCardFlag { target, flag, value } => {
                card::set_card_flag(self, draft, ctx, target, *flag, *value)
            }
            Effect::AddStatusCard {
                card_id,
                destination,
                count,
            } => card::add_status_card(self, draft, ctx, card_id, *destination, count),

            // === Power ===
            Effect::ApplyPower {
                power: id,
                amount,
                target,
                duration,
            } => power::apply(self, draft, ctx, id, amount, *target, *duration),
            Effect::RemovePower {
                power: id,
                amount,
                target,
            } => power::remove(self, draft, ctx, id, amount.as_ref(), *target),
            Effect::TransferPower {
                power: id,
                amount,
                from,
                to,
            } => power::transfer(self, draft, ctx, id, amount.as_ref(), *from, *to),
            Effect::StealPower {
                power: id,
                amount,
                target,
            } => power::steal(self, draft, ctx, id.as_ref(), amount.as_ref(), *target),
            Effect::SilencePower {
                power: id,
                turns,
                target,
            } => power::silence(self, draft, ctx, id.as_ref(), *turns, *target),

            // === Meta ===
            Effect::Conditional {
                condition,
                then,
                otherwise,
            } => meta::conditional(self, draft, ctx, condition, then, otherwise),
            Effect::Repeat { times, effects } => meta::repeat(self, draft, ctx, times, effects),
            Effect::RandomChoice { choices } => meta::random_choice(self, draft, ctx, choices),
            Effect::Sequence { effects } => self.execute_all(draft, effects, &ctx.child()),
            Effect::ForEach { target, effects } => meta::for_each(self, draft, ctx, target, effects),
        }
    }

    /// Fire every power (and, for the player, relic) trigger for `event`
    /// on `owner`.
    ///
    /// Each trigger runs with the owner as source and `cause` as current
    /// target.
    pub fn fire(
        &self,
        draft: &mut CombatDraft<'_>,
        owner: EntityId,
        event: PowerEvent,
        cause: Option<EntityId>,
        parent: &EffectContext,
    ) {
        let Some(entity) = draft.combat.entity(owner) else {
            return;
        };
        let triggered = power_triggers(entity, &self.content.powers, event);
        let relic_effects: Vec<&'c [Effect]> = if owner.is_player() {
            draft
                .relics
                .iter()
                .filter_map(|id| self.content.relic(id))
                .flat_map(|relic| relic.triggers_for(event))
                .collect()
        } else {
            Vec::new()
        };

        if !triggered.is_empty() || !relic_effects.is_empty() {
            debug!(%owner, %event, powers = triggered.len(), relics = relic_effects.len(), "triggers");
        }

        for trigger in triggered {
            let ctx = parent
                .for_trigger(owner, cause)
                .for_power(trigger.power.clone(), trigger.stacks);
            self.execute_all(draft, trigger.effects, &ctx);
        }
        for effects in relic_effects {
            self.execute_all(draft, effects, &parent.for_trigger(owner, cause));
        }
    }

    /// Resolve a value against the current combat.
    pub(crate) fn value(&self, draft: &CombatDraft<'_>, value: &Value, ctx: &EffectContext) -> i32 {
        ValueResolver::resolve(value, draft.combat, ctx)
    }

    /// Resolve a non-negative count.
    pub(crate) fn count(&self, draft: &CombatDraft<'_>, value: &Value, ctx: &EffectContext) -> usize {
        usize::try_from(self.value(draft, value, ctx)).unwrap_or(0)
    }

    /// Resolve an entity target.
    pub(crate) fn targets(
        &self,
        draft: &mut CombatDraft<'_>,
        target: EntityTarget,
        ctx: &EffectContext,
    ) -> Vec<EntityId> {
        TargetResolver::entities(target, draft.combat, ctx, draft.rng)
    }

    /// Resolve a card target, optionally limited.
    pub(crate) fn cards(
        &self,
        draft: &mut CombatDraft<'_>,
        target: &CardTarget,
        limit: Option<usize>,
        ctx: &EffectContext,
    ) -> Vec<CardInstance> {
        TargetResolver::cards(target, limit, draft.combat, &self.content.cards, ctx, draft.rng)
    }
}
