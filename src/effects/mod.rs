//! Effect system: declarative effect data and its interpreter.
//!
//! - `Effect`: tagged effect variants, grouped by family
//! - `Value`: fixed or dynamic integer quantities
//! - `EntityTarget` / `CardTarget`: target specifiers
//! - `EffectContext`: per-dispatch context (source, target, depth)
//! - `EffectExecutor`: the interpreter
//! - `VisualEvent`: notifications appended for the presentation layer
//!
//! ## Design
//!
//! Effects are data, not closures. Content (cards, powers, relics, enemy
//! moves, hero abilities) is JSON-loadable, and everything that reacts to
//! an event does so by handing an effect list back to the executor.

mod context;
mod effect;
mod executor;
pub(crate) mod handlers;
mod targeting;
mod value;
mod visual;

pub use context::EffectContext;
pub use effect::{CardFlag, Effect, ResourceOp, WeightedEffects};
pub use executor::EffectExecutor;
pub use targeting::{AnyTarget, CardFilter, CardTarget, EntityTarget, TargetResolver};
pub use value::{DynamicValue, ScaleSource, Value, ValueResolver};
pub use visual::VisualEvent;
