//! Effect conditions.
//!
//! Boolean predicates over combat state used by `conditional` effects.
//! Leaf conditions compare a resolved quantity against a literal; `and`,
//! `or` and `not` compose them.
//!
//! Evaluation is pure: no RNG, no mutation. A condition that refers to an
//! absent entity (or a random target, which cannot be evaluated without
//! side effects) is `false`.

use serde::{Deserialize, Serialize};

use crate::core::{CombatState, EntityId};
use crate::effects::{EffectContext, EntityTarget, TargetResolver};
use crate::powers::PowerId;
use crate::zones::Pile;

/// Comparison operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "=", alias = "==")]
    Eq,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "!=")]
    Ne,
}

impl Comparison {
    #[must_use]
    pub fn compare(self, lhs: i32, rhs: i32) -> bool {
        match self {
            Comparison::Lt => lhs < rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Eq => lhs == rhs,
            Comparison::Ge => lhs >= rhs,
            Comparison::Gt => lhs > rhs,
            Comparison::Ne => lhs != rhs,
        }
    }
}

/// Which health quantity to read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HealthForm {
    #[default]
    Current,
    Max,
    /// 0-100 integer scale.
    Percent,
    Missing,
}

/// A named player resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    Energy,
    MaxEnergy,
    Gold,
    Block,
    Barrier,
    CardsPlayedThisTurn,
    AbilityCharge,
}

/// A condition tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Condition {
    Health {
        #[serde(default = "EntityTarget::self_target")]
        target: EntityTarget,
        #[serde(default)]
        form: HealthForm,
        op: Comparison,
        value: i32,
    },
    Resource {
        resource: Resource,
        op: Comparison,
        value: i32,
    },
    PileCount {
        pile: Pile,
        op: Comparison,
        value: i32,
    },
    Turn {
        op: Comparison,
        value: i32,
    },
    EnemyCount {
        op: Comparison,
        value: i32,
    },
    HasPower {
        #[serde(default = "EntityTarget::self_target")]
        target: EntityTarget,
        power: PowerId,
        #[serde(default = "one")]
        min: i32,
    },
    And {
        conditions: Vec<Condition>,
    },
    Or {
        conditions: Vec<Condition>,
    },
    Not {
        condition: Box<Condition>,
    },
}

fn one() -> i32 {
    1
}

impl Condition {
    /// All of the given conditions.
    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self::And {
            conditions: conditions.into_iter().collect(),
        }
    }

    /// Any of the given conditions.
    pub fn any(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self::Or {
            conditions: conditions.into_iter().collect(),
        }
    }

    /// Negate this condition.
    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not {
            condition: Box::new(self),
        }
    }
}

/// Evaluates conditions against combat state.
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// Evaluate a condition. `gold` comes from the run, outside combat state.
    #[must_use]
    pub fn evaluate(condition: &Condition, combat: &CombatState, gold: i32, ctx: &EffectContext) -> bool {
        match condition {
            Condition::Health {
                target,
                form,
                op,
                value,
            } => Self::for_targets(*target, combat, ctx, |id| {
                combat.entity(id).is_some_and(|e| {
                    let quantity = match form {
                        HealthForm::Current => e.current_health,
                        HealthForm::Max => e.max_health,
                        HealthForm::Percent => e.health_percent(),
                        HealthForm::Missing => e.missing_health(),
                    };
                    op.compare(quantity, *value)
                })
            }),
            Condition::Resource { resource, op, value } => {
                let quantity = match resource {
                    Resource::Energy => combat.resources.energy,
                    Resource::MaxEnergy => combat.resources.max_energy,
                    Resource::Gold => gold,
                    Resource::Block => combat.player.block,
                    Resource::Barrier => combat.player.barrier,
                    Resource::CardsPlayedThisTurn => combat.cards_played_this_turn as i32,
                    Resource::AbilityCharge => combat.resources.ability_charge as i32,
                };
                op.compare(quantity, *value)
            }
            Condition::PileCount { pile, op, value } => {
                op.compare(combat.piles.len(*pile) as i32, *value)
            }
            Condition::Turn { op, value } => op.compare(combat.turn as i32, *value),
            Condition::EnemyCount { op, value } => {
                op.compare(combat.living_enemies().count() as i32, *value)
            }
            Condition::HasPower { target, power, min } => {
                Self::for_targets(*target, combat, ctx, |id| {
                    combat.entity(id).is_some_and(|e| {
                        e.powers
                            .get(power.as_str())
                            .is_some_and(|p| !p.is_silenced() && p.amount >= *min)
                    })
                })
            }
            Condition::And { conditions } => conditions
                .iter()
                .all(|c| Self::evaluate(c, combat, gold, ctx)),
            Condition::Or { conditions } => conditions
                .iter()
                .any(|c| Self::evaluate(c, combat, gold, ctx)),
            Condition::Not { condition } => !Self::evaluate(condition, combat, gold, ctx),
        }
    }

    /// True when the target resolves to at least one entity and every one
    /// of them satisfies `check`.
    fn for_targets(
        target: EntityTarget,
        combat: &CombatState,
        ctx: &EffectContext,
        check: impl Fn(EntityId) -> bool,
    ) -> bool {
        match TargetResolver::entities_fixed(target, combat, ctx) {
            Some(ids) if !ids.is_empty() => ids.into_iter().all(check),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EnemyState, Entity, PlayerResources};
    use smallvec::SmallVec;

    fn combat() -> CombatState {
        let resources = PlayerResources {
            energy: 2,
            max_energy: 3,
            ..PlayerResources::default()
        };
        let mut combat = CombatState::new(Entity::player("Hero", 20, 80), resources, 1);
        let id = combat.alloc_enemy_id();
        let state = EnemyState {
            template_id: "slime".into(),
            vulnerabilities: SmallVec::new(),
            resistances: SmallVec::new(),
            intent: None,
            last_move: None,
        };
        combat.enemies.push(Entity::enemy(id, "Slime", 12, state));
        combat
    }

    fn ctx() -> EffectContext {
        EffectContext::new(EntityId::PLAYER)
    }

    #[test]
    fn test_health_forms() {
        let combat = combat();
        let low = Condition::Health {
            target: EntityTarget::SelfTarget,
            form: HealthForm::Percent,
            op: Comparison::Le,
            value: 25,
        };
        assert!(ConditionEvaluator::evaluate(&low, &combat, 0, &ctx()));

        let missing = Condition::Health {
            target: EntityTarget::Player,
            form: HealthForm::Missing,
            op: Comparison::Eq,
            value: 60,
        };
        assert!(ConditionEvaluator::evaluate(&missing, &combat, 0, &ctx()));
    }

    #[test]
    fn test_absent_target_is_false() {
        let mut combat = combat();
        combat.enemies.clear();
        let cond = Condition::Health {
            target: EntityTarget::Enemy,
            form: HealthForm::Current,
            op: Comparison::Ge,
            value: 0,
        };
        assert!(!ConditionEvaluator::evaluate(&cond, &combat, 0, &ctx()));
        // Negating an unresolvable condition is true.
        assert!(ConditionEvaluator::evaluate(&cond.negate(), &combat, 0, &ctx()));
    }

    #[test]
    fn test_random_target_is_false() {
        let combat = combat();
        let cond = Condition::Health {
            target: EntityTarget::RandomEnemy,
            form: HealthForm::Current,
            op: Comparison::Gt,
            value: 0,
        };
        assert!(!ConditionEvaluator::evaluate(&cond, &combat, 0, &ctx()));
    }

    #[test]
    fn test_resources_and_combinators() {
        let combat = combat();
        let energy = Condition::Resource {
            resource: Resource::Energy,
            op: Comparison::Eq,
            value: 2,
        };
        let rich = Condition::Resource {
            resource: Resource::Gold,
            op: Comparison::Ge,
            value: 100,
        };
        let turn = Condition::Turn {
            op: Comparison::Eq,
            value: 1,
        };

        assert!(ConditionEvaluator::evaluate(&Condition::all([energy.clone(), turn.clone()]), &combat, 50, &ctx()));
        assert!(!ConditionEvaluator::evaluate(&Condition::all([energy.clone(), rich.clone()]), &combat, 50, &ctx()));
        assert!(ConditionEvaluator::evaluate(&Condition::any([rich.clone(), turn]), &combat, 50, &ctx()));
        assert!(ConditionEvaluator::evaluate(&rich, &combat, 150, &ctx()));
    }

    #[test]
    fn test_has_power_threshold() {
        let mut combat = combat();
        combat
            .player
            .powers
            .insert(crate::powers::Power::new(PowerId::from("strength"), 2, None));

        let has = |min| Condition::HasPower {
            target: EntityTarget::SelfTarget,
            power: PowerId::from("strength"),
            min,
        };
        assert!(ConditionEvaluator::evaluate(&has(1), &combat, 0, &ctx()));
        assert!(ConditionEvaluator::evaluate(&has(2), &combat, 0, &ctx()));
        assert!(!ConditionEvaluator::evaluate(&has(3), &combat, 0, &ctx()));
    }

    #[test]
    fn test_condition_json() {
        let json = r#"{
            "type": "or",
            "conditions": [
                { "type": "pileCount", "pile": "hand", "op": "<", "value": 3 },
                { "type": "hasPower", "target": "enemy", "power": "vulnerable" }
            ]
        }"#;
        let cond: Condition = serde_json::from_str(json).unwrap();
        let combat = combat();
        // Empty hand.
        assert!(ConditionEvaluator::evaluate(&cond, &combat, 0, &ctx()));
    }
}
