//! Event and condition vocabulary for reactive effects.
//!
//! ## Key Components
//!
//! - [`PowerEvent`]: lifecycle moments powers and relics react to
//! - [`Condition`]: boolean predicates used by `conditional` effects
//! - [`ConditionEvaluator`]: pure evaluation of a condition tree
//!
//! ## Example Usage
//!
//! ```
//! use deckrun::core::{CombatState, Entity, EntityId, PlayerResources};
//! use deckrun::effects::{EffectContext, EntityTarget};
//! use deckrun::triggers::{Comparison, Condition, ConditionEvaluator, HealthForm};
//!
//! let combat = CombatState::new(Entity::player("Hero", 10, 40), PlayerResources::default(), 1);
//! let low_health = Condition::Health {
//!     target: EntityTarget::SelfTarget,
//!     form: HealthForm::Percent,
//!     op: Comparison::Lt,
//!     value: 50,
//! };
//!
//! let ctx = EffectContext::new(EntityId::PLAYER);
//! assert!(ConditionEvaluator::evaluate(&low_health, &combat, 0, &ctx));
//! ```

mod condition;
mod event;

pub use condition::{Comparison, Condition, ConditionEvaluator, HealthForm, Resource};
pub use event::PowerEvent;
