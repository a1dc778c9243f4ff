//! Per-dispatch execution context.

use crate::cards::{CardInstance, CardUid};
use crate::core::EntityId;
use crate::powers::PowerId;

/// Ephemeral context threaded through one effect dispatch.
///
/// Children inherit `source` unless explicitly overridden, and every child
/// is one level deeper than its parent.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectContext {
    /// Entity the effect acts on behalf of.
    pub source: EntityId,
    /// Card being played, if any.
    pub card: Option<CardUid>,
    /// Target chosen for the card or intent.
    pub target: Option<EntityId>,
    /// Entity under iteration (`forEach`, on-hit) or the cause of a trigger.
    pub current_target: Option<EntityId>,
    /// Card under iteration in a card `forEach`.
    pub current_card: Option<CardInstance>,
    /// Power whose trigger is running.
    pub power_id: Option<PowerId>,
    pub power_stacks: Option<i32>,
    /// Energy spent on an X-cost card.
    pub x_cost: i32,
    /// Flat per-hit reduction (weakened enemy intents).
    pub damage_penalty: i32,
    /// Running inside a power or relic trigger.
    pub triggered: bool,
    pub depth: u32,
}

impl EffectContext {
    #[must_use]
    pub fn new(source: EntityId) -> Self {
        Self {
            source,
            card: None,
            target: None,
            current_target: None,
            current_card: None,
            power_id: None,
            power_stacks: None,
            x_cost: 0,
            damage_penalty: 0,
            triggered: false,
            depth: 0,
        }
    }

    #[must_use]
    pub fn with_card(mut self, card: CardUid) -> Self {
        self.card = Some(card);
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: Option<EntityId>) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub fn with_x_cost(mut self, x_cost: i32) -> Self {
        self.x_cost = x_cost;
        self
    }

    #[must_use]
    pub fn with_damage_penalty(mut self, penalty: i32) -> Self {
        self.damage_penalty = penalty;
        self
    }

    #[must_use]
    pub fn for_power(mut self, power: PowerId, stacks: i32) -> Self {
        self.power_id = Some(power);
        self.power_stacks = Some(stacks);
        self
    }

    /// A nested context one level deeper.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self.clone()
        }
    }

    /// Child context iterating over an entity.
    #[must_use]
    pub fn with_current_target(&self, target: EntityId) -> Self {
        Self {
            current_target: Some(target),
            ..self.child()
        }
    }

    /// Child context iterating over a card.
    #[must_use]
    pub fn with_current_card(&self, card: CardInstance) -> Self {
        Self {
            current_card: Some(card),
            ..self.child()
        }
    }

    /// Context for a trigger fired on `owner`, caused by `cause`.
    ///
    /// The owner becomes the source; the cause becomes the current target.
    #[must_use]
    pub fn for_trigger(&self, owner: EntityId, cause: Option<EntityId>) -> Self {
        Self {
            source: owner,
            card: None,
            target: None,
            current_target: cause,
            current_card: None,
            power_id: None,
            power_stacks: None,
            x_cost: 0,
            damage_penalty: 0,
            triggered: true,
            depth: self.depth + 1,
        }
    }

    /// Fresh context for replaying a card's effect list inline.
    #[must_use]
    pub fn for_replay(&self, card: CardUid) -> Self {
        Self {
            card: Some(card),
            target: self.target,
            ..Self::new(self.source)
        }
        .at_depth(self.depth + 1)
    }

    fn at_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_inherits_source() {
        let ctx = EffectContext::new(EntityId::PLAYER).with_target(Some(EntityId::new(2)));
        let child = ctx.with_current_target(EntityId::new(3));
        assert_eq!(child.source, EntityId::PLAYER);
        assert_eq!(child.target, Some(EntityId::new(2)));
        assert_eq!(child.current_target, Some(EntityId::new(3)));
        assert_eq!(child.depth, 1);
    }

    #[test]
    fn test_trigger_context() {
        let ctx = EffectContext::new(EntityId::PLAYER).with_card(CardUid(4));
        let trig = ctx.for_trigger(EntityId::new(1), Some(EntityId::PLAYER));
        assert_eq!(trig.source, EntityId::new(1));
        assert_eq!(trig.current_target, Some(EntityId::PLAYER));
        assert_eq!(trig.card, None);
        assert!(trig.triggered);
        assert_eq!(trig.depth, 1);
    }

    #[test]
    fn test_replay_is_fresh() {
        let ctx = EffectContext::new(EntityId::PLAYER)
            .with_target(Some(EntityId::new(1)))
            .with_x_cost(3)
            .for_power("rage".into(), 2);
        let replay = ctx.for_replay(CardUid(9));
        assert_eq!(replay.card, Some(CardUid(9)));
        assert_eq!(replay.target, Some(EntityId::new(1)));
        assert_eq!(replay.power_id, None);
        assert_eq!(replay.x_cost, 0);
        assert_eq!(replay.depth, 1);
    }
}
