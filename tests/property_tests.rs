//! Property tests for the engine's numeric invariants.
//!
//! Health stays within bounds, resources never go negative, stacking obeys
//! its rule and card moves never create or lose cards.

use proptest::prelude::*;

use deckrun::cards::{CardInstance, CardUid};
use deckrun::content::starter;
use deckrun::core::{Entity, EntityId, RunState};
use deckrun::effects::{Effect, EffectContext, EntityTarget, ResourceOp};
use deckrun::powers::{apply_power_to_entity, PowerId, PowerRegistry};
use deckrun::rules::CombatEngine;
use deckrun::zones::Piles;

fn engine() -> CombatEngine {
    CombatEngine::new(starter::content().unwrap())
}

fn setup(engine: &CombatEngine) -> RunState {
    let mut run = engine.new_run(starter::KNIGHT, 99).unwrap();
    engine.start_combat(&mut run, &[starter::CULTIST]).unwrap();
    run
}

fn execute(engine: &CombatEngine, run: &mut RunState, effect: &Effect) {
    let executor = engine.executor();
    let mut draft = run.draft().unwrap();
    executor.execute(&mut draft, effect, &EffectContext::new(EntityId::PLAYER));
}

fn resource_op() -> impl Strategy<Value = ResourceOp> {
    prop_oneof![Just(ResourceOp::Gain), Just(ResourceOp::Lose), Just(ResourceOp::Set)]
}

#[derive(Clone, Debug)]
enum HealthChange {
    Damage(i32),
    Pierce(i32),
    Heal(i32),
    MaxHealth(i32),
}

fn health_change() -> impl Strategy<Value = HealthChange> {
    prop_oneof![
        (0..40i32).prop_map(HealthChange::Damage),
        (0..40i32).prop_map(HealthChange::Pierce),
        (0..40i32).prop_map(HealthChange::Heal),
        (-30..30i32).prop_map(HealthChange::MaxHealth),
    ]
}

impl HealthChange {
    fn effect(&self) -> Effect {
        let target = EntityTarget::SelfTarget;
        match *self {
            HealthChange::Damage(amount) => Effect::damage(amount, target),
            HealthChange::Pierce(amount) => Effect::Damage {
                amount: amount.into(),
                target,
                element: Default::default(),
                piercing: true,
                on_hit: Vec::new(),
            },
            HealthChange::Heal(amount) => Effect::heal(amount, target),
            HealthChange::MaxHealth(amount) => Effect::MaxHealth {
                amount: amount.into(),
                target,
            },
        }
    }
}

proptest! {
    /// Without overheal, health stays within zero and max health.
    #[test]
    fn prop_health_within_bounds(changes in prop::collection::vec(health_change(), 1..30)) {
        let engine = engine();
        let mut run = setup(&engine);
        for change in &changes {
            execute(&engine, &mut run, &change.effect());
            let hero = &run.combat.as_ref().unwrap().player;
            prop_assert!(hero.max_health >= 1);
            prop_assert!(hero.current_health >= 0);
            prop_assert!(hero.current_health <= hero.max_health);
        }
    }

    /// Gold never drops below zero; neither does energy under gain and spend.
    #[test]
    fn prop_resources_never_negative(
        ops in prop::collection::vec((resource_op(), -50..100i32, any::<bool>()), 1..40)
    ) {
        let engine = engine();
        let mut run = setup(&engine);
        for (op, amount, is_gold) in ops {
            let effect = if is_gold {
                Effect::gold(amount, op)
            } else if matches!(op, ResourceOp::Set) {
                continue;
            } else {
                Effect::energy(amount.abs(), op)
            };
            execute(&engine, &mut run, &effect);
            prop_assert!(run.gold >= 0);
            prop_assert!(run.combat.as_ref().unwrap().resources.energy >= 0);
        }
    }

    /// Duration statuses keep the maximum; intensity statuses sum.
    #[test]
    fn prop_stacking_rules(amounts in prop::collection::vec(1..10i32, 1..8)) {
        let registry = PowerRegistry::builtin();
        let mut entity = Entity::player("Hero", 50, 50);
        for &amount in &amounts {
            apply_power_to_entity(&mut entity, &registry, &PowerId::from("weak"), amount, None);
            apply_power_to_entity(&mut entity, &registry, &PowerId::from("strength"), amount, None);
        }
        prop_assert_eq!(entity.powers.amount("weak"), amounts.iter().copied().max().unwrap_or(0));
        prop_assert_eq!(entity.powers.amount("strength"), amounts.iter().sum::<i32>());
    }

    /// Drawing moves cards between piles without creating or losing any.
    #[test]
    fn prop_draw_conserves_cards(
        draw_size in 0..12usize,
        discard_size in 0..12usize,
        count in 0..15i32,
    ) {
        let engine = engine();
        let mut run = setup(&engine);
        let combat = run.combat.as_mut().unwrap();
        combat.piles = Piles::new();
        for uid in 0..draw_size {
            combat.piles.draw_pile.push_back(CardInstance::new(CardUid(100 + uid as u64), "strike"));
        }
        for uid in 0..discard_size {
            combat.piles.discard_pile.push_back(CardInstance::new(CardUid(200 + uid as u64), "defend"));
        }
        let total = combat.piles.total();

        execute(&engine, &mut run, &Effect::draw(count));

        let piles = &run.combat.as_ref().unwrap().piles;
        prop_assert_eq!(piles.total(), total);
        prop_assert!(piles.hand.len() <= engine.config().hand_limit);
        let expected = (count as usize).min(total).min(engine.config().hand_limit);
        prop_assert_eq!(piles.hand.len(), expected);
    }
}
