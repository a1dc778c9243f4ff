//! Numeric values in effect content.
//!
//! A `Value` is either a bare integer literal or a dynamic spec resolved at
//! execution time against combat state:
//!
//! ```json
//! 6
//! { "type": "range", "min": 4, "max": 8 }
//! { "type": "scaled", "base": 2, "perUnit": 1.5, "source": "cardsInHand", "max": 10 }
//! { "type": "powerAmount" }
//! ```
//!
//! Resolution floors at every multiplication step and never rounds.

use serde::{Deserialize, Serialize};

use super::context::EffectContext;
use crate::core::CombatState;
use crate::zones::Pile;

/// A numeric value: a literal or a dynamic spec.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Fixed(i32),
    Dynamic(DynamicValue),
}

impl Value {
    /// The triggering power's stack amount.
    #[must_use]
    pub fn power_amount() -> Self {
        Value::Dynamic(DynamicValue::PowerAmount)
    }

    #[must_use]
    pub fn scaled(base: i32, per_unit: f64, source: ScaleSource) -> Self {
        Value::Dynamic(DynamicValue::Scaled {
            base,
            per_unit,
            source,
            max: None,
        })
    }

    pub(crate) fn one() -> Self {
        Value::Fixed(1)
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Fixed(0)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Fixed(value)
    }
}

/// Values computed from game state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DynamicValue {
    /// Meant to be rolled at content-generation time; at execution time it
    /// collapses to the floor of the midpoint.
    Range { min: i32, max: i32 },
    /// `base + per_unit * source`, floored, optionally capped.
    Scaled {
        #[serde(default)]
        base: i32,
        per_unit: f64,
        source: ScaleSource,
        #[serde(default)]
        max: Option<i32>,
    },
    /// Stack amount of the triggering power (0 outside power triggers).
    PowerAmount,
}

/// Game-state probes a scaled value can read.
///
/// Entity-based probes read the context's source entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScaleSource {
    Energy,
    MaxEnergy,
    CardsInHand,
    CardsPlayedThisTurn,
    Block,
    MissingHealth,
    /// Current health as a 0-1 fraction.
    HealthPercent,
    EnemyCount,
    Turn,
    PowerStacks,
    /// Energy spent on the X-cost card being played.
    XCost,
}

/// Resolves `Value`s to integers.
pub struct ValueResolver;

impl ValueResolver {
    /// Resolve a value against the current combat.
    #[must_use]
    pub fn resolve(value: &Value, combat: &CombatState, ctx: &EffectContext) -> i32 {
        match value {
            Value::Fixed(n) => *n,
            Value::Dynamic(DynamicValue::Range { min, max }) => (min + max).div_euclid(2),
            Value::Dynamic(DynamicValue::Scaled {
                base,
                per_unit,
                source,
                max,
            }) => {
                let units = Self::probe(*source, combat, ctx);
                let scaled = f64::from(*base) + (per_unit * units).floor();
                let resolved = scaled.floor() as i32;
                max.map_or(resolved, |cap| resolved.min(cap))
            }
            Value::Dynamic(DynamicValue::PowerAmount) => ctx.power_stacks.unwrap_or(0),
        }
    }

    fn probe(source: ScaleSource, combat: &CombatState, ctx: &EffectContext) -> f64 {
        let entity = combat.entity(ctx.source);
        match source {
            ScaleSource::Energy => f64::from(combat.resources.energy),
            ScaleSource::MaxEnergy => f64::from(combat.resources.max_energy),
            ScaleSource::CardsInHand => combat.piles.len(Pile::Hand) as f64,
            ScaleSource::CardsPlayedThisTurn => f64::from(combat.cards_played_this_turn),
            ScaleSource::Block => entity.map_or(0.0, |e| f64::from(e.block)),
            ScaleSource::MissingHealth => entity.map_or(0.0, |e| f64::from(e.missing_health())),
            ScaleSource::HealthPercent => entity.map_or(0.0, |e| e.health_fraction()),
            ScaleSource::EnemyCount => combat.living_enemies().count() as f64,
            ScaleSource::Turn => f64::from(combat.turn),
            ScaleSource::PowerStacks => f64::from(ctx.power_stacks.unwrap_or(0)),
            ScaleSource::XCost => f64::from(ctx.x_cost),
        }
    }
}
