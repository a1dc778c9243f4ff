//! Effect executor integration tests.
//!
//! These run single effects against a live combat built from the starter
//! content and check both the state change and the visual notifications.

use deckrun::cards::{CardInstance, CardTheme, CardUid};
use deckrun::content::starter;
use deckrun::core::{CombatConfig, CombatState, EntityId, RunState};
use deckrun::effects::{
    AnyTarget, CardFilter, CardFlag, CardTarget, Effect, EffectContext, EntityTarget, ResourceOp, ScaleSource,
    Value, VisualEvent, WeightedEffects,
};
use deckrun::elements::Element;
use deckrun::powers::{apply_power_to_entity, PowerId};
use deckrun::rules::CombatEngine;
use deckrun::triggers::{Comparison, Condition, Resource};
use deckrun::zones::{Pile, PilePosition, Piles};

fn engine() -> CombatEngine {
    CombatEngine::new(starter::content().unwrap())
}

/// A fresh combat with empty piles, no block and a drained visual queue.
fn setup(engine: &CombatEngine, enemies: &[&str]) -> RunState {
    let mut run = engine.new_run(starter::KNIGHT, 42).unwrap();
    engine.start_combat(&mut run, enemies).unwrap();
    let combat = run.combat.as_mut().unwrap();
    combat.player.block = 0;
    combat.piles = Piles::new();
    combat.drain_visuals();
    run
}

fn combat(run: &mut RunState) -> &mut CombatState {
    run.combat.as_mut().unwrap()
}

fn execute(engine: &CombatEngine, run: &mut RunState, effect: &Effect, ctx: &EffectContext) -> Vec<VisualEvent> {
    let executor = engine.executor();
    let mut draft = run.draft().unwrap();
    executor.execute(&mut draft, effect, ctx);
    draft.combat.drain_visuals()
}

fn player() -> EffectContext {
    EffectContext::new(EntityId::PLAYER)
}

fn card(uid: u64, id: &str) -> CardInstance {
    CardInstance::new(CardUid(uid), id)
}

/// Drawing two cards takes them from the top in order with one visual.
#[test]
fn test_draw_preserves_order() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    combat(&mut run).piles.draw_pile.push_back(card(100, "strike"));
    combat(&mut run).piles.draw_pile.push_back(card(101, "defend"));

    let visuals = execute(&engine, &mut run, &Effect::draw(2), &player());

    let hand: Vec<u64> = combat(&mut run).piles.hand.iter().map(|c| c.uid.0).collect();
    assert_eq!(hand, vec![100, 101]);
    assert!(combat(&mut run).piles.draw_pile.is_empty());
    assert_eq!(visuals, vec![VisualEvent::Draw { count: 2 }]);
}

/// Drawing with both piles empty is a quiet no-op.
#[test]
fn test_draw_from_empty_piles() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    combat(&mut run).piles.hand.push_back(card(100, "strike"));

    let visuals = execute(&engine, &mut run, &Effect::draw(3), &player());

    assert_eq!(combat(&mut run).piles.hand.len(), 1);
    assert!(visuals.is_empty());
}

/// An empty draw pile is refilled from the discard pile mid-draw.
#[test]
fn test_draw_reshuffles_discard() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    for uid in 100..103 {
        combat(&mut run).piles.discard_pile.push_back(card(uid, "strike"));
    }

    let visuals = execute(&engine, &mut run, &Effect::draw(2), &player());

    let piles = &combat(&mut run).piles;
    assert_eq!(piles.hand.len(), 2);
    assert_eq!(piles.draw_pile.len(), 1);
    assert!(piles.discard_pile.is_empty());
    assert_eq!(
        visuals,
        vec![VisualEvent::Shuffle { count: 3 }, VisualEvent::Draw { count: 2 }]
    );
}

/// Draws stop at the hand limit.
#[test]
fn test_draw_respects_hand_limit() {
    let engine = engine().with_config(CombatConfig::new().with_hand_limit(2));
    let mut run = setup(&engine, &[starter::CULTIST]);
    for uid in 100..105 {
        combat(&mut run).piles.draw_pile.push_back(card(uid, "strike"));
    }

    execute(&engine, &mut run, &Effect::draw(5), &player());
    assert_eq!(combat(&mut run).piles.hand.len(), 2);
}

/// Losing more gold than held leaves zero, never a negative balance.
#[test]
fn test_gold_loss_clamps() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    run.gold = 10;

    let visuals = execute(&engine, &mut run, &Effect::gold(50, ResourceOp::Lose), &player());
    assert_eq!(run.gold, 0);
    assert_eq!(visuals, vec![VisualEvent::Gold { delta: -10, value: 0 }]);

    execute(&engine, &mut run, &Effect::gold(-5, ResourceOp::Set), &player());
    assert_eq!(run.gold, 0);

    execute(&engine, &mut run, &Effect::gold(25, ResourceOp::Gain), &player());
    assert_eq!(run.gold, 25);
    assert_eq!(run.stats.gold_earned, 25);
}

/// Spending energy floors at zero; setting it takes the value as given.
#[test]
fn test_energy_spend_clamps_set_does_not() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    combat(&mut run).resources.energy = 2;

    let visuals = execute(&engine, &mut run, &Effect::energy(5, ResourceOp::Lose), &player());
    assert_eq!(combat(&mut run).resources.energy, 0);
    assert_eq!(visuals, vec![VisualEvent::Energy { delta: -2, value: 0 }]);

    let visuals = execute(&engine, &mut run, &Effect::energy(-1, ResourceOp::Set), &player());
    assert_eq!(combat(&mut run).resources.energy, -1);
    assert_eq!(visuals, vec![VisualEvent::Energy { delta: -1, value: -1 }]);

    execute(&engine, &mut run, &Effect::energy(7, ResourceOp::Set), &player());
    assert_eq!(combat(&mut run).resources.energy, 7);
}

/// Heals cap at max health unless overheal is set.
#[test]
fn test_heal_caps_at_max() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    combat(&mut run).player.current_health = 50;

    let visuals = execute(&engine, &mut run, &Effect::heal(30, EntityTarget::SelfTarget), &player());
    assert_eq!(combat(&mut run).player.current_health, 70);
    assert_eq!(
        visuals,
        vec![VisualEvent::Heal {
            target: EntityId::PLAYER,
            amount: 20
        }]
    );

    let overheal = Effect::Heal {
        amount: Value::Fixed(10),
        target: EntityTarget::SelfTarget,
        overheal: true,
    };
    execute(&engine, &mut run, &overheal, &player());
    assert_eq!(combat(&mut run).player.current_health, 80);
}

/// Max health never drops below one and current health follows it down.
#[test]
fn test_max_health_floor() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    let shrink = Effect::MaxHealth {
        amount: Value::Fixed(-1000),
        target: EntityTarget::SelfTarget,
    };

    execute(&engine, &mut run, &shrink, &player());
    let hero = &combat(&mut run).player;
    assert_eq!(hero.max_health, 1);
    assert_eq!(hero.current_health, 1);
}

/// Targets that resolve to nothing produce no visuals.
#[test]
fn test_empty_target_set_is_silent() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    combat(&mut run).enemies.clear();

    assert!(execute(&engine, &mut run, &Effect::damage(6, EntityTarget::Enemy), &player()).is_empty());
    assert!(execute(&engine, &mut run, &Effect::block(6, EntityTarget::AllEnemies), &player()).is_empty());
    assert!(execute(
        &engine,
        &mut run,
        &Effect::apply_power("weak", 1, EntityTarget::RandomEnemy),
        &player()
    )
    .is_empty());
}

/// Block gains include dexterity.
#[test]
fn test_block_with_dexterity() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    let registry = &engine.content().powers;
    apply_power_to_entity(&mut combat(&mut run).player, registry, &PowerId::from("dexterity"), 2, None);

    let visuals = execute(&engine, &mut run, &Effect::block(5, EntityTarget::SelfTarget), &player());
    assert_eq!(combat(&mut run).player.block, 7);
    assert_eq!(
        visuals,
        vec![VisualEvent::Block {
            target: EntityId::PLAYER,
            amount: 7
        }]
    );
}

/// Block and barrier absorb damage in that order.
#[test]
fn test_barrier_absorbs_after_block() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    let cultist = combat(&mut run).enemies[0].id;
    let barrier = Effect::Barrier {
        amount: Value::Fixed(4),
        target: EntityTarget::SelfTarget,
    };
    execute(&engine, &mut run, &barrier, &player());
    execute(&engine, &mut run, &Effect::block(3, EntityTarget::SelfTarget), &player());

    execute(&engine, &mut run, &Effect::damage(10, EntityTarget::Player), &EffectContext::new(cultist));

    let hero = &combat(&mut run).player;
    assert_eq!(hero.block, 0);
    assert_eq!(hero.barrier, 0);
    assert_eq!(hero.current_health, 67);
}

/// Lifesteal heals the source by the health it removed.
#[test]
fn test_lifesteal_heals_source() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    combat(&mut run).player.current_health = 50;
    let bite = Effect::Lifesteal {
        amount: Value::Fixed(7),
        target: EntityTarget::Enemy,
        element: Element::Physical,
        percent: 100,
    };

    execute(&engine, &mut run, &bite, &player());
    assert_eq!(combat(&mut run).enemies[0].current_health, 41);
    assert_eq!(combat(&mut run).player.current_health, 57);
}

/// Conditionals pick their branch from current state.
#[test]
fn test_conditional_branches() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    let rich = Effect::Conditional {
        condition: Condition::Resource {
            resource: Resource::Gold,
            op: Comparison::Ge,
            value: 10,
        },
        then: vec![Effect::gold(5, ResourceOp::Gain)],
        otherwise: vec![Effect::gold(1, ResourceOp::Gain)],
    };

    execute(&engine, &mut run, &rich, &player());
    assert_eq!(run.gold, 1);

    run.gold = 10;
    execute(&engine, &mut run, &rich, &player());
    assert_eq!(run.gold, 15);
}

/// Repeat counts can scale with the energy spent on an X card.
#[test]
fn test_repeat_scales_with_x() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    let whirl = Effect::Repeat {
        times: Value::scaled(0, 1.0, ScaleSource::XCost),
        effects: vec![Effect::damage(5, EntityTarget::AllEnemies)],
    };

    execute(&engine, &mut run, &whirl, &player().with_x_cost(3));
    assert_eq!(combat(&mut run).enemies[0].current_health, 33);
}

/// A random choice where every weight is zero does nothing.
#[test]
fn test_random_choice_without_weight() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    let choice = Effect::RandomChoice {
        choices: vec![WeightedEffects {
            weight: 0.0,
            effects: vec![Effect::gold(5, ResourceOp::Gain)],
        }],
    };

    assert!(execute(&engine, &mut run, &choice, &player()).is_empty());
    assert_eq!(run.gold, 0);
}

/// For-each binds every enemy as the current target in turn.
#[test]
fn test_for_each_enemy() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST, starter::SLIME]);
    let sweep = Effect::ForEach {
        target: AnyTarget::Entity(EntityTarget::AllEnemies),
        effects: vec![Effect::damage(3, EntityTarget::Enemy)],
    };

    execute(&engine, &mut run, &sweep, &player());
    let health: Vec<i32> = combat(&mut run).enemies.iter().map(|e| e.current_health).collect();
    assert_eq!(health, vec![45, 17]);
}

/// Nested dispatch beyond the depth limit is skipped, not run.
#[test]
fn test_recursion_depth_guard() {
    let nested = Effect::Sequence {
        effects: vec![Effect::Sequence {
            effects: vec![Effect::Sequence {
                effects: vec![Effect::gold(5, ResourceOp::Gain)],
            }],
        }],
    };

    let shallow = engine().with_config(CombatConfig::new().with_max_effect_depth(2));
    let mut run = setup(&shallow, &[starter::CULTIST]);
    execute(&shallow, &mut run, &nested, &player());
    assert_eq!(run.gold, 0);

    let deep = engine().with_config(CombatConfig::new().with_max_effect_depth(3));
    let mut run = setup(&deep, &[starter::CULTIST]);
    execute(&deep, &mut run, &nested, &player());
    assert_eq!(run.gold, 5);
}

/// Replaying the last played card reruns its effects without moving it.
#[test]
fn test_replay_last_played() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    combat(&mut run).last_played = Some(card(100, "strike"));
    let replay = Effect::ReplayCard {
        target: CardTarget::LastPlayed,
        times: Value::Fixed(2),
    };

    let energy = combat(&mut run).resources.energy;

    let visuals = execute(&engine, &mut run, &replay, &player());
    assert_eq!(combat(&mut run).enemies[0].current_health, 36);
    assert_eq!(combat(&mut run).resources.energy, energy);
    let replays = visuals.iter().filter(|v| v.kind() == "replay").count();
    assert_eq!(replays, 2);
}

/// Generated cards overflow into the discard pile when the hand is full.
#[test]
fn test_add_card_overflows_to_discard() {
    let engine = engine().with_config(CombatConfig::new().with_hand_limit(1));
    let mut run = setup(&engine, &[starter::CULTIST]);
    combat(&mut run).piles.hand.push_back(card(100, "defend"));
    let add = Effect::AddCard {
        card_id: "strike".into(),
        destination: Pile::Hand,
        count: Value::Fixed(1),
        upgraded: false,
        position: Default::default(),
    };

    execute(&engine, &mut run, &add, &player());
    let piles = &combat(&mut run).piles;
    assert_eq!(piles.hand.len(), 1);
    assert_eq!(piles.discard_pile.len(), 1);
    assert_eq!(piles.discard_pile[0].definition_id.as_str(), "strike");
}

/// Unknown card ids are skipped without touching the piles.
#[test]
fn test_add_unknown_card_skipped() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    let add = Effect::AddCard {
        card_id: "ghost".into(),
        destination: Pile::Hand,
        count: Value::Fixed(2),
        upgraded: false,
        position: Default::default(),
    };

    assert!(execute(&engine, &mut run, &add, &player()).is_empty());
    assert_eq!(combat(&mut run).piles.total(), 0);
}

/// Playing the top card resolves it for free and discards it.
#[test]
fn test_play_top_card() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    combat(&mut run).piles.draw_pile.push_back(card(100, "strike"));
    let energy = combat(&mut run).resources.energy;

    execute(&engine, &mut run, &Effect::PlayTopCard { count: Value::Fixed(1) }, &player());

    let combat = combat(&mut run);
    assert_eq!(combat.enemies[0].current_health, 42);
    assert_eq!(combat.resources.energy, energy);
    assert!(combat.piles.contains(Pile::DiscardPile, CardUid(100)));
    assert!(combat.in_play.is_empty());
}

/// Stealing without a named power takes a random buff.
#[test]
fn test_steal_random_buff() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    let registry = &engine.content().powers;
    let cultist = &mut combat(&mut run).enemies[0];
    apply_power_to_entity(cultist, registry, &PowerId::from("strength"), 3, None);
    apply_power_to_entity(cultist, registry, &PowerId::from("weak"), 2, None);

    let steal = Effect::StealPower {
        power: None,
        amount: None,
        target: EntityTarget::Enemy,
    };
    execute(&engine, &mut run, &steal, &player());

    assert_eq!(combat(&mut run).player.powers.amount("strength"), 3);
    let cultist = &combat(&mut run).enemies[0];
    assert!(!cultist.powers.contains("strength"));
    assert_eq!(cultist.powers.amount("weak"), 2);
}

fn hand_uids(run: &mut RunState) -> Vec<CardUid> {
    combat(run).piles.hand.iter().map(|c| c.uid).collect()
}

fn first_in_hand(count: usize) -> CardTarget {
    CardTarget::Filtered(Box::new(CardFilter {
        base: CardTarget::Hand,
        count: Some(count),
        random: false,
        theme: None,
        max_cost: None,
    }))
}

/// Splash hits the target in full and every other enemy for a share.
#[test]
fn test_splash() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST, starter::SLIME]);
    let splash = Effect::Splash {
        amount: Value::Fixed(10),
        target: EntityTarget::Enemy,
        element: Element::Physical,
        splash_percent: 50,
    };

    let visuals = execute(&engine, &mut run, &splash, &player());

    let health: Vec<i32> = combat(&mut run).enemies.iter().map(|e| e.current_health).collect();
    assert_eq!(health, vec![38, 15]);
    assert_eq!(
        visuals,
        vec![
            VisualEvent::Damage {
                target: EntityId::new(1),
                amount: 10,
                blocked: 0,
                element: Element::Physical,
            },
            VisualEvent::Damage {
                target: EntityId::new(2),
                amount: 5,
                blocked: 0,
                element: Element::Physical,
            },
        ]
    );
}

/// Chains bounce between enemies, losing a quarter each time.
#[test]
fn test_chain_bounces_with_falloff() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST, starter::SLIME]);
    let chain = Effect::Chain {
        amount: Value::Fixed(8),
        target: EntityTarget::Enemy,
        element: Element::Physical,
        bounces: 2,
        falloff_percent: 75,
    };

    let visuals = execute(&engine, &mut run, &chain, &player());

    let health: Vec<i32> = combat(&mut run).enemies.iter().map(|e| e.current_health).collect();
    assert_eq!(health, vec![36, 14]);
    let hits: Vec<(EntityId, i32)> = visuals
        .iter()
        .filter_map(|v| match v {
            VisualEvent::Damage { target, amount, .. } => Some((*target, *amount)),
            _ => None,
        })
        .collect();
    assert_eq!(hits, vec![(EntityId::new(1), 8), (EntityId::new(2), 6), (EntityId::new(1), 4)]);
}

/// Recoil costs the attacker health, ignoring its block.
#[test]
fn test_recoil_hurts_source() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    combat(&mut run).player.block = 5;
    let recoil = Effect::Recoil {
        amount: Value::Fixed(8),
        target: EntityTarget::Enemy,
        element: Element::Physical,
        recoil: Value::Fixed(3),
    };

    let visuals = execute(&engine, &mut run, &recoil, &player());

    assert_eq!(combat(&mut run).enemies[0].current_health, 40);
    assert_eq!(combat(&mut run).player.current_health, 67);
    assert_eq!(combat(&mut run).player.block, 5);
    assert_eq!(
        visuals.last(),
        Some(&VisualEvent::Damage {
            target: EntityId::PLAYER,
            amount: 3,
            blocked: 0,
            element: Element::Physical,
        })
    );
    assert_eq!(run.stats.damage_taken, 3);
}

/// Destroying block leaves barrier alone unless asked.
#[test]
fn test_destroy_block() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    let cultist = &mut combat(&mut run).enemies[0];
    cultist.block = 7;
    cultist.barrier = 4;

    let strip = |include_barrier| Effect::DestroyBlock {
        target: EntityTarget::Enemy,
        include_barrier,
    };

    let visuals = execute(&engine, &mut run, &strip(false), &player());
    assert_eq!(visuals, vec![VisualEvent::DestroyBlock { target: EntityId::new(1), amount: 7 }]);
    assert_eq!(combat(&mut run).enemies[0].barrier, 4);

    let visuals = execute(&engine, &mut run, &strip(true), &player());
    assert_eq!(visuals, vec![VisualEvent::DestroyBlock { target: EntityId::new(1), amount: 4 }]);

    assert!(execute(&engine, &mut run, &strip(true), &player()).is_empty());
}

/// Setting health clamps to max health and kills at zero.
#[test]
fn test_set_health() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    let set = |value| Effect::SetHealth {
        amount: Value::Fixed(value),
        target: EntityTarget::Enemy,
    };

    let visuals = execute(&engine, &mut run, &set(30), &player());
    assert_eq!(visuals, vec![VisualEvent::SetHealth { target: EntityId::new(1), value: 30 }]);

    execute(&engine, &mut run, &set(500), &player());
    assert_eq!(combat(&mut run).enemies[0].current_health, 48);

    let visuals = execute(&engine, &mut run, &set(0), &player());
    assert_eq!(
        visuals,
        vec![
            VisualEvent::SetHealth { target: EntityId::new(1), value: 0 },
            VisualEvent::Death { target: EntityId::new(1) },
        ]
    );
    assert!(combat(&mut run).enemies.is_empty());
    assert_eq!(run.stats.enemies_killed, 1);
}

/// A filtered target's count caps how many cards are touched.
#[test]
fn test_upgrade_respects_filter_count() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    for uid in 100..103 {
        combat(&mut run).piles.hand.push_back(card(uid, "strike"));
    }

    let visuals = execute(&engine, &mut run, &Effect::Upgrade { target: first_in_hand(1) }, &player());

    let upgraded: Vec<bool> = combat(&mut run).piles.hand.iter().map(|c| c.upgraded).collect();
    assert_eq!(upgraded, vec![true, false, false]);
    assert_eq!(visuals, vec![VisualEvent::Upgrade { card: CardUid(100) }]);
}

/// A card forEach over a filtered target visits only the counted cards.
#[test]
fn test_for_each_card_respects_filter_count() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    for uid in 100..104 {
        combat(&mut run).piles.hand.push_back(card(uid, "defend"));
    }
    let each = Effect::ForEach {
        target: AnyTarget::Card(first_in_hand(2)),
        effects: vec![Effect::Upgrade { target: CardTarget::Current }],
    };

    execute(&engine, &mut run, &each, &player());

    let upgraded: Vec<bool> = combat(&mut run).piles.hand.iter().map(|c| c.upgraded).collect();
    assert_eq!(upgraded, vec![true, true, false, false]);
}

/// Cost changes stack on the instance and are announced per card.
#[test]
fn test_modify_cost() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    combat(&mut run).piles.hand.push_back(card(100, "bash"));
    combat(&mut run).piles.hand.push_back(card(101, "strike"));
    let cheaper = Effect::ModifyCost {
        amount: Value::Fixed(-1),
        target: first_in_hand(1),
    };

    let visuals = execute(&engine, &mut run, &cheaper, &player());

    let hand = &combat(&mut run).piles.hand;
    assert_eq!(hand[0].cost_modifier, -1);
    assert_eq!(hand[1].cost_modifier, 0);
    assert_eq!(visuals, vec![VisualEvent::CostChange { card: CardUid(100), delta: -1 }]);
}

/// Transforming swaps the definition and clears the overlays.
#[test]
fn test_transform() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    let mut strike = card(100, "strike");
    strike.upgraded = true;
    strike.cost_modifier = 2;
    combat(&mut run).piles.hand.push_back(strike);
    let transform = Effect::Transform {
        target: CardTarget::Hand,
        theme: Some(CardTheme::Skill),
    };

    let visuals = execute(&engine, &mut run, &transform, &player());

    let changed = combat(&mut run).piles.hand[0].clone();
    let skills = ["defend", "oilFlask", "downpour", "shrugItOff", "battleTrance", "ghostlyArmor"];
    assert!(skills.contains(&changed.definition_id.as_str()));
    assert!(!changed.upgraded);
    assert_eq!(changed.cost_modifier, 0);
    assert_eq!(
        visuals,
        vec![VisualEvent::Transform {
            card: CardUid(100),
            into: changed.definition_id,
        }]
    );
}

/// Milling moves cards from the top of the draw pile to the discard pile.
#[test]
fn test_mill() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    for uid in 100..103 {
        combat(&mut run).piles.draw_pile.push_back(card(uid, "strike"));
    }

    let visuals = execute(&engine, &mut run, &Effect::Mill { amount: Value::Fixed(2) }, &player());

    let piles = &combat(&mut run).piles;
    let discard: Vec<CardUid> = piles.discard_pile.iter().map(|c| c.uid).collect();
    assert_eq!(discard, vec![CardUid(100), CardUid(101)]);
    assert_eq!(piles.draw_pile.len(), 1);
    assert_eq!(
        visuals,
        vec![VisualEvent::Mill { card: CardUid(100) }, VisualEvent::Mill { card: CardUid(101) }]
    );
}

/// Copies keep the original's overlays under fresh uids.
#[test]
fn test_copy_card() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    let mut strike = card(100, "strike");
    strike.upgraded = true;
    combat(&mut run).piles.hand.push_back(strike);
    let copy = Effect::CopyCard {
        target: CardTarget::Hand,
        destination: Pile::DiscardPile,
        count: Value::Fixed(2),
    };

    let visuals = execute(&engine, &mut run, &copy, &player());

    let discard = &combat(&mut run).piles.discard_pile;
    assert_eq!(discard.len(), 2);
    assert!(discard.iter().all(|c| c.definition_id.as_str() == "strike" && c.upgraded));
    assert!(discard.iter().all(|c| c.uid != CardUid(100)));
    assert_ne!(discard[0].uid, discard[1].uid);
    assert_eq!(visuals.len(), 2);
    assert!(visuals
        .iter()
        .all(|v| matches!(v, VisualEvent::AddCard { pile: Pile::DiscardPile, .. })));
    assert_eq!(hand_uids(&mut run), vec![CardUid(100)]);
}

/// Putting a card on the deck moves it to the top of the draw pile.
#[test]
fn test_put_on_deck() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    combat(&mut run).piles.hand.push_back(card(100, "strike"));
    combat(&mut run).piles.hand.push_back(card(101, "defend"));
    combat(&mut run).piles.draw_pile.push_back(card(102, "bash"));
    let put = Effect::PutOnDeck {
        target: CardTarget::RightmostHand,
        position: PilePosition::Top,
    };

    let visuals = execute(&engine, &mut run, &put, &player());

    let draw: Vec<CardUid> = combat(&mut run).piles.draw_pile.iter().map(|c| c.uid).collect();
    assert_eq!(draw, vec![CardUid(101), CardUid(102)]);
    assert_eq!(hand_uids(&mut run), vec![CardUid(100)]);
    assert_eq!(visuals, vec![VisualEvent::PutOnDeck { card: CardUid(101) }]);
}

/// Free random cards cost nothing this combat.
#[test]
fn test_create_random_free_card() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    let create = Effect::CreateRandomCard {
        theme: Some(CardTheme::Power),
        destination: Pile::Hand,
        count: Value::Fixed(1),
        free: true,
        upgraded: false,
    };

    let visuals = execute(&engine, &mut run, &create, &player());

    let created = combat(&mut run).piles.hand[0].clone();
    assert_eq!(created.definition_id.as_str(), "inflame");
    assert_eq!(created.cost_modifier, -1);
    assert_eq!(
        visuals,
        vec![VisualEvent::AddCard {
            card: created.uid,
            card_id: created.definition_id,
            pile: Pile::Hand,
        }]
    );
}

/// Flags are set per instance and announced by name.
#[test]
fn test_set_card_flag() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    combat(&mut run).piles.hand.push_back(card(100, "strike"));
    let flag = Effect::SetCardFlag {
        target: CardTarget::Hand,
        flag: CardFlag::Ethereal,
        value: true,
    };

    let visuals = execute(&engine, &mut run, &flag, &player());

    assert!(combat(&mut run).piles.hand[0].ethereal);
    assert_eq!(
        visuals,
        vec![VisualEvent::CardFlag {
            card: CardUid(100),
            flag: "ethereal".to_string(),
            value: true,
        }]
    );
}

/// Retaining marks each card once.
#[test]
fn test_retain_hand() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    combat(&mut run).piles.hand.push_back(card(100, "strike"));
    combat(&mut run).piles.hand.push_back(card(101, "defend"));
    let retain = Effect::Retain { target: CardTarget::Hand };

    let visuals = execute(&engine, &mut run, &retain, &player());
    assert!(combat(&mut run).piles.hand.iter().all(|c| c.retained));
    assert_eq!(
        visuals,
        vec![VisualEvent::Retain { card: CardUid(100) }, VisualEvent::Retain { card: CardUid(101) }]
    );

    assert!(execute(&engine, &mut run, &retain, &player()).is_empty());
}

/// Banked energy is added on top of the refill next turn.
#[test]
fn test_energy_next_turn() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::SLIME]);

    let visuals = execute(&engine, &mut run, &Effect::EnergyNextTurn { amount: Value::Fixed(2) }, &player());
    assert_eq!(visuals, vec![VisualEvent::EnergyNextTurn { amount: 2 }]);
    assert_eq!(combat(&mut run).resources.energy_next_turn, 2);

    engine.end_turn(&mut run).unwrap();

    let resources = &combat(&mut run).resources;
    assert_eq!(resources.energy, resources.max_energy + 2);
    assert_eq!(resources.energy_next_turn, 0);
}

/// Immediate banish takes the first copy it finds: hand, draw, discard, exhaust.
#[test]
fn test_banish_search_order() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    for pile in [Pile::ExhaustPile, Pile::DiscardPile, Pile::DrawPile, Pile::Hand] {
        combat(&mut run).piles.get_mut(pile).push_back(card(100, "strike"));
    }
    let banish = Effect::Banish {
        amount: Value::Fixed(1),
        target: CardTarget::ThisCard,
        player_choice: false,
    };
    let ctx = player().with_card(CardUid(100));

    for pile in [Pile::Hand, Pile::DrawPile, Pile::DiscardPile, Pile::ExhaustPile] {
        let visuals = execute(&engine, &mut run, &banish, &ctx);
        assert_eq!(visuals, vec![VisualEvent::Banish { card: CardUid(100) }]);
        assert!(!combat(&mut run).piles.contains(pile, CardUid(100)), "copy in {pile:?} should be gone");
    }
    assert_eq!(combat(&mut run).piles.total(), 0);
    assert!(execute(&engine, &mut run, &banish, &ctx).is_empty());
}

/// Other enemies skips the chosen target inside a forEach.
#[test]
fn test_for_each_other_enemies() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST, starter::SLIME, starter::FIRE_IMP]);
    let sweep = Effect::ForEach {
        target: AnyTarget::Entity(EntityTarget::OtherEnemies),
        effects: vec![Effect::damage(4, EntityTarget::Enemy)],
    };
    let ctx = player().with_target(Some(EntityId::new(2)));

    let visuals = execute(&engine, &mut run, &sweep, &ctx);

    let health: Vec<i32> = combat(&mut run).enemies.iter().map(|e| e.current_health).collect();
    assert_eq!(health, vec![44, 20, 20]);
    let hit: Vec<EntityId> = visuals
        .iter()
        .filter_map(|v| match v {
            VisualEvent::Damage { target, .. } => Some(*target),
            _ => None,
        })
        .collect();
    assert_eq!(hit, vec![EntityId::new(1), EntityId::new(3)]);
}

/// Effects round-trip through their camelCase JSON form.
#[test]
fn test_effect_json_shape() {
    let json = r#"{ "type": "damage", "amount": 8, "element": "fire", "target": "allEnemies" }"#;
    let effect: Effect = serde_json::from_str(json).unwrap();
    assert_eq!(effect, Effect::elemental(8, EntityTarget::AllEnemies, Element::Fire));

    let json = r#"{ "type": "gold", "amount": 50, "operation": "lose" }"#;
    let effect: Effect = serde_json::from_str(json).unwrap();
    assert_eq!(effect, Effect::gold(50, ResourceOp::Lose));
}
