//! Core engine types: entity IDs, RNG, configuration, combat and run state.
//!
//! These are the data the rest of the engine reads and mutates. Nothing in
//! here knows about specific cards, powers or effects.

pub mod config;
pub mod entity;
pub mod rng;
pub mod state;

pub use config::CombatConfig;
pub use entity::EntityId;
pub use rng::{GameRng, GameRngState};
pub use state::{
    CombatDraft, CombatPhase, CombatState, DamageOutcome, EnemyState, Entity, InPlay, Intent,
    IntentKind, PendingSelection, PlayRoute, PlayerResources, RunState, RunStats, SelectionKind,
};
