//! Combat rules: the turn lifecycle around the effect executor.
//!
//! `CombatEngine` validates player actions, runs the enemy turn and moves
//! the combat through its phases. Everything a card, power or relic does
//! is delegated to `effects::EffectExecutor`.

pub mod engine;

pub use engine::CombatEngine;
