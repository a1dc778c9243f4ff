//! Starter content: a small, complete set of cards, enemies, a hero and
//! relics.
//!
//! Used by the test suite and as a worked example of authoring content in
//! code. Every card exercises a different corner of the effect vocabulary.
//!
//! ```
//! use deckrun::content::starter;
//!
//! let content = starter::content().unwrap();
//! let knight = content.hero(starter::KNIGHT).unwrap();
//! let run = knight.new_run(42);
//! assert_eq!(run.deck.len(), knight.starting_deck.len());
//! ```

use super::{ContentPack, EnemyMove, EnemyTemplate, HeroTemplate, RelicDefinition};
use crate::cards::{CardCost, CardDefinition, CardKeywords, CardRarity, CardTheme};
use crate::content::Content;
use crate::core::IntentKind;
use crate::effects::{Effect, EntityTarget, ScaleSource, Value};
use crate::elements::Element;
use crate::error::ContentError;
use crate::triggers::PowerEvent;
use crate::zones::Pile;

pub const KNIGHT: &str = "knight";

pub const SLIME: &str = "slime";
pub const CULTIST: &str = "cultist";
pub const FIRE_IMP: &str = "fireImp";
pub const GREMLIN: &str = "gremlin";

/// The starter bundle, validated.
pub fn content() -> Result<Content, ContentError> {
    Content::from_pack(pack())
}

/// The starter bundle as raw data.
#[must_use]
pub fn pack() -> ContentPack {
    ContentPack {
        cards: cards(),
        powers: Vec::new(),
        enemies: enemies(),
        heroes: vec![knight()],
        relics: relics(),
    }
}

fn attack(id: &str, name: &str, cost: i32) -> CardDefinition {
    CardDefinition::new(id, name, CardTheme::Attack, CardCost::Fixed(cost))
}

fn skill(id: &str, name: &str, cost: i32) -> CardDefinition {
    CardDefinition::new(id, name, CardTheme::Skill, CardCost::Fixed(cost))
}

fn cards() -> Vec<CardDefinition> {
    let enemy = EntityTarget::Enemy;
    let me = EntityTarget::SelfTarget;

    vec![
        attack("strike", "Strike", 1)
            .with_rarity(CardRarity::Starter)
            .with_effect(Effect::damage(6, enemy))
            .with_upgrade(None, vec![Effect::damage(9, enemy)]),
        skill("defend", "Defend", 1)
            .with_rarity(CardRarity::Starter)
            .with_effect(Effect::block(5, me))
            .with_upgrade(None, vec![Effect::block(8, me)]),
        attack("bash", "Bash", 2)
            .with_rarity(CardRarity::Starter)
            .with_effect(Effect::damage(8, enemy))
            .with_effect(Effect::apply_power("vulnerable", 2, enemy)),
        attack("fireball", "Fireball", 1).with_effect(Effect::elemental(7, enemy, Element::Fire)),
        attack("frostBolt", "Frost Bolt", 1).with_effect(Effect::elemental(5, enemy, Element::Ice)),
        attack("zap", "Zap", 1).with_effect(Effect::elemental(4, enemy, Element::Lightning)),
        skill("oilFlask", "Oil Flask", 1).with_effect(Effect::elemental(3, enemy, Element::Void)),
        skill("downpour", "Downpour", 1).with_effect(Effect::apply_power("wet", 2, EntityTarget::AllEnemies)),
        CardDefinition::new("whirlwind", "Whirlwind", CardTheme::Attack, CardCost::X).with_effect(Effect::Repeat {
            times: Value::scaled(0, 1.0, ScaleSource::XCost),
            effects: vec![Effect::damage(5, EntityTarget::AllEnemies)],
        }),
        CardDefinition::new("inflame", "Inflame", CardTheme::Power, CardCost::Fixed(1))
            .with_effect(Effect::apply_power("strength", 2, me)),
        skill("shrugItOff", "Shrug It Off", 1)
            .with_effect(Effect::block(8, me))
            .with_effect(Effect::draw(1)),
        skill("battleTrance", "Battle Trance", 0).with_effect(Effect::draw(3)),
        attack("chainLightning", "Chain Lightning", 2).with_effect(Effect::Chain {
            amount: Value::Fixed(8),
            target: enemy,
            element: Element::Lightning,
            bounces: 2,
            falloff_percent: 75,
        }),
        attack("bite", "Bite", 1).with_effect(Effect::Lifesteal {
            amount: Value::Fixed(7),
            target: enemy,
            element: Element::Physical,
            percent: 100,
        }),
        attack("guillotine", "Guillotine", 2)
            .with_effect(Effect::Execute {
                threshold: 25,
                target: enemy,
            })
            .with_keywords(CardKeywords {
                exhaust: true,
                ..CardKeywords::default()
            }),
        skill("ghostlyArmor", "Ghostly Armor", 1)
            .with_effect(Effect::block(10, me))
            .with_keywords(CardKeywords {
                ethereal: true,
                ..CardKeywords::default()
            }),
        CardDefinition::new("wound", "Wound", CardTheme::Status, CardCost::Fixed(0))
            .with_rarity(CardRarity::Special)
            .with_keywords(CardKeywords {
                unplayable: true,
                ..CardKeywords::default()
            }),
    ]
}

fn enemies() -> Vec<EnemyTemplate> {
    let player = EntityTarget::Player;
    let me = EntityTarget::SelfTarget;

    vec![
        EnemyTemplate::new(SLIME, "Slime", 20)
            .with_move(EnemyMove::new("Tackle", IntentKind::Attack, vec![Effect::damage(6, player)]))
            .with_move(EnemyMove::new("Harden", IntentKind::Defend, vec![Effect::block(5, me)])),
        EnemyTemplate::new(CULTIST, "Cultist", 48)
            .with_move(EnemyMove::new(
                "Incantation",
                IntentKind::Buff,
                vec![Effect::apply_power("ritual", 3, me)],
            ))
            .with_move(EnemyMove::new("Dark Strike", IntentKind::Attack, vec![Effect::damage(6, player)]).weighted(2.0)),
        EnemyTemplate::new(FIRE_IMP, "Fire Imp", 24)
            .vulnerable_to(Element::Ice)
            .resistant_to(Element::Fire)
            .with_move(EnemyMove::new(
                "Scorch",
                IntentKind::Attack,
                vec![Effect::elemental(4, player, Element::Fire)],
            )),
        EnemyTemplate::new(GREMLIN, "Gremlin", 15)
            .with_power("thorns", 1)
            .with_move(EnemyMove::new(
                "Smash",
                IntentKind::Attack,
                vec![
                    Effect::damage(4, player),
                    Effect::AddStatusCard {
                        card_id: "wound".into(),
                        destination: Pile::DiscardPile,
                        count: Value::Fixed(1),
                    },
                ],
            ))
            .with_move(EnemyMove::new(
                "Cower",
                IntentKind::Debuff,
                vec![Effect::apply_power("weak", 1, player)],
            )),
    ]
}

fn knight() -> HeroTemplate {
    HeroTemplate::new(KNIGHT, "Knight", 70)
        .with_cards("strike", 5)
        .with_cards("defend", 4)
        .with_cards("bash", 1)
        .with_relic("anchor")
        .with_ability(
            "Rally",
            5,
            vec![Effect::block(8, EntityTarget::SelfTarget), Effect::draw(2)],
        )
}

fn relics() -> Vec<RelicDefinition> {
    vec![
        RelicDefinition::new("anchor", "Anchor").on(
            PowerEvent::CombatStart,
            vec![Effect::block(10, EntityTarget::SelfTarget)],
        ),
        RelicDefinition::new("vajra", "Vajra").on(
            PowerEvent::CombatStart,
            vec![Effect::apply_power("strength", 1, EntityTarget::SelfTarget)],
        ),
        RelicDefinition::new("bloodVial", "Blood Vial").on(
            PowerEvent::Kill,
            vec![Effect::heal(2, EntityTarget::SelfTarget)],
        ),
    ]
}
