//! Effect targeting.
//!
//! Two target vocabularies share the same position in effect content:
//!
//! - `EntityTarget`: combatants (`"self"`, `"enemy"`, `"allEnemies"`, ...)
//! - `CardTarget`: card piles and positions (`"hand"`, `"topOfDraw"`, ...)
//!
//! `AnyTarget` accepts either, classifying a name by which vocabulary it
//! belongs to (entity names are tried first).
//!
//! Resolution never fails: a missing or dead target resolves to an empty
//! list and the effect does nothing. Card resolution returns snapshot
//! copies; handlers act on them by uid.

use serde::{Deserialize, Serialize};

use super::context::EffectContext;
use crate::cards::{CardInstance, CardRegistry, CardTheme};
use crate::core::{CombatState, EntityId, GameRng};
use crate::zones::Pile;

/// Entity target specifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityTarget {
    Player,
    /// The context's source entity.
    #[serde(rename = "self")]
    SelfTarget,
    /// Whoever caused a trigger; the source outside triggers.
    Source,
    /// The chosen target, falling back to the first living enemy.
    #[default]
    Enemy,
    RandomEnemy,
    /// Lowest current health, first encountered on ties.
    WeakestEnemy,
    /// Highest current health, first encountered on ties.
    StrongestEnemy,
    FrontEnemy,
    BackEnemy,
    AllEnemies,
    /// Player, then every living enemy.
    AllEntities,
    /// Every living enemy except the current target.
    OtherEnemies,
}

impl EntityTarget {
    pub(crate) fn self_target() -> Self {
        EntityTarget::SelfTarget
    }

    /// Whether resolution draws from the RNG.
    #[must_use]
    pub fn is_random(self) -> bool {
        matches!(self, EntityTarget::RandomEnemy)
    }
}

/// Card target specifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardTarget {
    Hand,
    DrawPile,
    DiscardPile,
    ExhaustPile,
    LeftmostHand,
    RightmostHand,
    TopOfDraw,
    RandomFrom(Pile),
    /// The card whose effects are running.
    ThisCard,
    LastPlayed,
    /// The card under iteration in a card `forEach`.
    Current,
    Filtered(Box<CardFilter>),
}

impl CardTarget {
    pub(crate) fn hand() -> Self {
        CardTarget::Hand
    }

    pub(crate) fn this_card() -> Self {
        CardTarget::ThisCard
    }

    pub(crate) fn random_in_hand() -> Self {
        CardTarget::RandomFrom(Pile::Hand)
    }

    pub(crate) fn last_played() -> Self {
        CardTarget::LastPlayed
    }
}

/// A base card target narrowed by theme and cost, then limited in count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardFilter {
    pub base: CardTarget,
    #[serde(default)]
    pub count: Option<usize>,
    /// Sample `count` cards at random instead of taking the first ones.
    #[serde(default)]
    pub random: bool,
    #[serde(default)]
    pub theme: Option<CardTheme>,
    #[serde(default)]
    pub max_cost: Option<i32>,
}

/// Either kind of target, as used by `forEach`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnyTarget {
    Entity(EntityTarget),
    Card(CardTarget),
}

impl AnyTarget {
    #[must_use]
    pub fn is_entity(&self) -> bool {
        matches!(self, AnyTarget::Entity(_))
    }
}

impl From<EntityTarget> for AnyTarget {
    fn from(target: EntityTarget) -> Self {
        AnyTarget::Entity(target)
    }
}

impl From<CardTarget> for AnyTarget {
    fn from(target: CardTarget) -> Self {
        AnyTarget::Card(target)
    }
}

/// Resolves target specifiers against combat state.
pub struct TargetResolver;

impl TargetResolver {
    /// Resolve an entity target to ordered ids, drawing from `rng` for
    /// random targets.
    pub fn entities(
        target: EntityTarget,
        combat: &CombatState,
        ctx: &EffectContext,
        rng: &mut GameRng,
    ) -> Vec<EntityId> {
        Self::entities_with(target, combat, ctx, |len| rng.index(len))
    }

    /// Resolve an entity target without randomness.
    ///
    /// Returns `None` for random targets.
    #[must_use]
    pub fn entities_fixed(
        target: EntityTarget,
        combat: &CombatState,
        ctx: &EffectContext,
    ) -> Option<Vec<EntityId>> {
        if target.is_random() {
            return None;
        }
        Some(Self::entities_with(target, combat, ctx, |_| None))
    }

    fn entities_with(
        target: EntityTarget,
        combat: &CombatState,
        ctx: &EffectContext,
        mut pick: impl FnMut(usize) -> Option<usize>,
    ) -> Vec<EntityId> {
        let alive = |id: EntityId| combat.entity(id).is_some_and(|e| e.is_alive());
        let living = || combat.living_enemies();

        match target {
            EntityTarget::Player => alive(EntityId::PLAYER)
                .then_some(EntityId::PLAYER)
                .into_iter()
                .collect(),
            EntityTarget::SelfTarget => alive(ctx.source).then_some(ctx.source).into_iter().collect(),
            EntityTarget::Source => {
                let id = if ctx.triggered { ctx.current_target } else { Some(ctx.source) };
                id.filter(|&id| alive(id)).into_iter().collect()
            }
            EntityTarget::Enemy => [ctx.current_target, ctx.target]
                .into_iter()
                .flatten()
                .find(|&id| combat.is_living_enemy(id))
                .or_else(|| living().next().map(|e| e.id))
                .into_iter()
                .collect(),
            EntityTarget::RandomEnemy => {
                let ids = combat.living_enemy_ids();
                pick(ids.len()).and_then(|i| ids.get(i).copied()).into_iter().collect()
            }
            EntityTarget::WeakestEnemy => living()
                .fold(None, |best: Option<(EntityId, i32)>, e| match best {
                    Some((_, hp)) if hp <= e.current_health => best,
                    _ => Some((e.id, e.current_health)),
                })
                .map(|(id, _)| id)
                .into_iter()
                .collect(),
            EntityTarget::StrongestEnemy => living()
                .fold(None, |best: Option<(EntityId, i32)>, e| match best {
                    Some((_, hp)) if hp >= e.current_health => best,
                    _ => Some((e.id, e.current_health)),
                })
                .map(|(id, _)| id)
                .into_iter()
                .collect(),
            EntityTarget::FrontEnemy => living().next().map(|e| e.id).into_iter().collect(),
            EntityTarget::BackEnemy => living().last().map(|e| e.id).into_iter().collect(),
            EntityTarget::AllEnemies => combat.living_enemy_ids(),
            EntityTarget::AllEntities => {
                let mut ids: Vec<EntityId> =
                    alive(EntityId::PLAYER).then_some(EntityId::PLAYER).into_iter().collect();
                ids.extend(combat.living_enemy_ids());
                ids
            }
            EntityTarget::OtherEnemies => {
                let excluded = ctx.current_target.or(ctx.target);
                living()
                    .map(|e| e.id)
                    .filter(|&id| Some(id) != excluded)
                    .collect()
            }
        }
    }

    /// Resolve a card target to snapshot copies.
    ///
    /// `limit` caps the result; random targets sample up to `limit` distinct
    /// cards (one when unlimited).
    pub fn cards(
        target: &CardTarget,
        limit: Option<usize>,
        combat: &CombatState,
        registry: &CardRegistry,
        ctx: &EffectContext,
        rng: &mut GameRng,
    ) -> Vec<CardInstance> {
        let piles = &combat.piles;
        let mut cards: Vec<CardInstance> = match target {
            CardTarget::Hand => piles.hand.iter().cloned().collect(),
            CardTarget::DrawPile => piles.draw_pile.iter().cloned().collect(),
            CardTarget::DiscardPile => piles.discard_pile.iter().cloned().collect(),
            CardTarget::ExhaustPile => piles.exhaust_pile.iter().cloned().collect(),
            CardTarget::LeftmostHand => piles.hand.front().cloned().into_iter().collect(),
            CardTarget::RightmostHand => piles.hand.back().cloned().into_iter().collect(),
            CardTarget::TopOfDraw => piles.draw_pile.front().cloned().into_iter().collect(),
            CardTarget::RandomFrom(pile) => {
                let pool: Vec<CardInstance> = piles.get(*pile).iter().cloned().collect();
                return rng.sample(&pool, limit.unwrap_or(1));
            }
            CardTarget::ThisCard => Self::this_card(combat, ctx).into_iter().collect(),
            CardTarget::LastPlayed => combat.last_played.clone().into_iter().collect(),
            CardTarget::Current => ctx.current_card.clone().into_iter().collect(),
            CardTarget::Filtered(filter) => {
                let base = Self::cards(&filter.base, None, combat, registry, ctx, rng);
                let mut matching: Vec<CardInstance> = base
                    .into_iter()
                    .filter(|card| Self::matches(filter, card, combat, registry))
                    .collect();
                let count = match (filter.count, limit) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (a, b) => a.or(b),
                };
                if filter.random {
                    return rng.sample(&matching, count.unwrap_or(matching.len()));
                }
                if let Some(count) = count {
                    matching.truncate(count);
                }
                matching
            }
        };
        if let Some(limit) = limit {
            cards.truncate(limit);
        }
        cards
    }

    fn this_card(combat: &CombatState, ctx: &EffectContext) -> Option<CardInstance> {
        let uid = ctx.card?;
        combat
            .in_play
            .iter()
            .rev()
            .map(|p| &p.card)
            .find(|c| c.uid == uid)
            .or_else(|| combat.piles.find(uid))
            .cloned()
    }

    fn matches(
        filter: &CardFilter,
        card: &CardInstance,
        combat: &CombatState,
        registry: &CardRegistry,
    ) -> bool {
        if filter.theme.is_none() && filter.max_cost.is_none() {
            return true;
        }
        let Some(def) = registry.get(&card.definition_id) else {
            return false;
        };
        let theme_ok = filter.theme.map_or(true, |t| def.theme == t);
        let cost_ok = filter
            .max_cost
            .map_or(true, |max| card.effective_cost(def, combat.resources.energy) <= max);
        theme_ok && cost_ok
    }
}
