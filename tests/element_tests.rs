//! Elemental damage integration tests.
//!
//! Signature statuses, combos and enemy affinities, driven through the
//! damage pipeline.

use deckrun::content::starter;
use deckrun::core::{CombatState, EntityId, RunState};
use deckrun::effects::{Effect, EffectContext, EntityTarget, VisualEvent};
use deckrun::elements::Element;
use deckrun::powers::PowerId;
use deckrun::rules::CombatEngine;
use deckrun::zones::Piles;

fn engine() -> CombatEngine {
    CombatEngine::new(starter::content().unwrap())
}

fn setup(engine: &CombatEngine, enemies: &[&str]) -> RunState {
    let mut run = engine.new_run(starter::KNIGHT, 11).unwrap();
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

fn execute(engine: &CombatEngine, run: &mut RunState, effect: &Effect) -> Vec<VisualEvent> {
    let executor = engine.executor();
    let mut draft = run.draft().unwrap();
    executor.execute(&mut draft, effect, &EffectContext::new(EntityId::PLAYER));
    draft.combat.drain_visuals()
}

fn hit(engine: &CombatEngine, run: &mut RunState, amount: i32, element: Element) -> Vec<VisualEvent> {
    execute(engine, run, &Effect::elemental(amount, EntityTarget::Enemy, element))
}

fn afflict(engine: &CombatEngine, run: &mut RunState, status: &str, amount: i32) {
    execute(engine, run, &Effect::apply_power(status, amount, EntityTarget::Enemy));
}

fn combos(visuals: &[VisualEvent]) -> Vec<&str> {
    visuals
        .iter()
        .filter_map(|v| match v {
            VisualEvent::Combo { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect()
}

/// Each element leaves its signature status on a clean target.
#[test]
fn test_signature_statuses_applied() {
    let engine = engine();
    let cases = [
        (Element::Fire, "burning", 3),
        (Element::Ice, "frozen", 1),
        (Element::Lightning, "charged", 2),
        (Element::Void, "oiled", 2),
    ];
    for (element, status, stacks) in cases {
        let mut run = setup(&engine, &[starter::CULTIST]);
        hit(&engine, &mut run, 3, element);
        assert_eq!(
            combat(&mut run).enemies[0].powers.amount(status),
            stacks,
            "{element:?} should apply {status}"
        );
    }
}

/// Physical damage inflicts nothing.
#[test]
fn test_physical_has_no_status() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    hit(&engine, &mut run, 6, Element::Physical);
    assert!(combat(&mut run).enemies[0].powers.is_empty());
}

/// Fire on an oiled target doubles and consumes the oil, leaving no burn.
#[test]
fn test_explosion() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    afflict(&engine, &mut run, "oiled", 2);

    let visuals = hit(&engine, &mut run, 8, Element::Fire);

    let cultist = &combat(&mut run).enemies[0];
    assert_eq!(cultist.current_health, 32);
    assert!(!cultist.powers.contains("oiled"));
    assert!(!cultist.powers.contains("burning"));
    assert_eq!(combos(&visuals), vec!["Explosion"]);
    assert!(visuals.contains(&VisualEvent::PowerRemoved {
        target: EntityId::new(1),
        power: PowerId::from("oiled"),
    }));
}

/// Lightning on a wet target spills half again its damage onto every other enemy.
#[test]
fn test_conduction() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST, starter::SLIME]);
    afflict(&engine, &mut run, "wet", 2);

    let visuals = hit(&engine, &mut run, 4, Element::Lightning);

    let enemies = &combat(&mut run).enemies;
    assert_eq!(enemies[0].current_health, 44);
    assert_eq!(enemies[1].current_health, 14);
    assert!(!enemies[0].powers.contains("charged"));
    assert_eq!(combos(&visuals), vec!["Conduction"]);
}

/// A physical hit on a frozen target executes it below 30% health.
#[test]
fn test_shatter_executes() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    afflict(&engine, &mut run, "frozen", 1);
    combat(&mut run).enemies[0].current_health = 16;

    let visuals = hit(&engine, &mut run, 6, Element::Physical);

    assert!(combat(&mut run).enemies.is_empty());
    assert!(visuals.contains(&VisualEvent::Execute { target: EntityId::new(1) }));
    assert!(visuals.contains(&VisualEvent::Death { target: EntityId::new(1) }));
    assert_eq!(run.stats.enemies_killed, 1);
}

/// Shatter above the threshold only consumes the frost.
#[test]
fn test_shatter_above_threshold() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    afflict(&engine, &mut run, "frozen", 1);

    hit(&engine, &mut run, 6, Element::Physical);

    let cultist = &combat(&mut run).enemies[0];
    assert_eq!(cultist.current_health, 42);
    assert!(!cultist.powers.contains("frozen"));
}

/// Fire melts frost for half again as much.
#[test]
fn test_thaw() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    afflict(&engine, &mut run, "frozen", 1);

    let visuals = hit(&engine, &mut run, 7, Element::Fire);

    assert_eq!(combat(&mut run).enemies[0].current_health, 38);
    assert_eq!(combos(&visuals), vec!["Thaw"]);
}

/// Oil outranks frost when both react to fire.
#[test]
fn test_first_combo_in_table_wins() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    afflict(&engine, &mut run, "frozen", 1);
    afflict(&engine, &mut run, "oiled", 2);

    let visuals = hit(&engine, &mut run, 5, Element::Fire);

    let cultist = &combat(&mut run).enemies[0];
    assert_eq!(combos(&visuals), vec!["Explosion"]);
    assert!(cultist.powers.contains("frozen"));
    assert_eq!(cultist.current_health, 38);
}

/// Ice puts out a burn and leaves the target wet instead of frozen.
#[test]
fn test_extinguish() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    afflict(&engine, &mut run, "burning", 3);

    hit(&engine, &mut run, 5, Element::Ice);

    let cultist = &combat(&mut run).enemies[0];
    assert_eq!(cultist.current_health, 43);
    assert!(!cultist.powers.contains("burning"));
    assert!(!cultist.powers.contains("frozen"));
    assert_eq!(cultist.powers.amount("wet"), 2);
}

/// Charge adds to incoming damage, then overload adds its flat bonus.
#[test]
fn test_overload() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::CULTIST]);
    afflict(&engine, &mut run, "charged", 2);

    hit(&engine, &mut run, 4, Element::Lightning);

    let cultist = &combat(&mut run).enemies[0];
    assert_eq!(cultist.current_health, 36);
    assert!(!cultist.powers.contains("charged"));
}

/// Affinities scale damage before combos, flooring the result.
#[test]
fn test_affinities() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::FIRE_IMP]);

    hit(&engine, &mut run, 5, Element::Ice);
    assert_eq!(combat(&mut run).enemies[0].current_health, 17);

    execute(
        &engine,
        &mut run,
        &Effect::RemovePower {
            power: PowerId::from("frozen"),
            amount: None,
            target: EntityTarget::Enemy,
        },
    );
    hit(&engine, &mut run, 7, Element::Fire);
    let imp = &combat(&mut run).enemies[0];
    assert_eq!(imp.current_health, 14);
    assert_eq!(imp.powers.amount("burning"), 3);
}

/// Burning ticks at the start of its owner's turn, then loses a stack.
#[test]
fn test_burning_ticks() {
    let engine = engine();
    let mut run = setup(&engine, &[starter::SLIME]);
    hit(&engine, &mut run, 2, Element::Fire);

    engine.end_turn(&mut run).unwrap();

    let slime = &combat(&mut run).enemies[0];
    assert_eq!(slime.current_health, 15);
    assert_eq!(slime.powers.amount("burning"), 2);
}
