//! # deckrun
//!
//! Rules engine for a turn-based deck-building combat game.
//!
//! ## Design Principles
//!
//! 1. **Effects Are Data**: cards, powers, relics and enemy moves are lists
//!    of declarative `Effect` values, serialisable and author-editable. One
//!    flat `match` interprets them.
//!
//! 2. **Never Fail Inside**: a missing card, power or entity skips one
//!    step. Only player actions and content loading return errors.
//!
//! 3. **Suspension Is Data**: an effect that needs a player choice leaves a
//!    `PendingSelection` in the combat state and returns. A later top-level
//!    call resolves it.
//!
//! ## Architecture
//!
//! - **Explicit Content**: no global registries. `Content` is owned by the
//!   `CombatEngine` and lent to the executor.
//!
//! - **Persistent Piles**: card piles are `im::Vector`, so target
//!   resolution can snapshot them cheaply.
//!
//! - **Seeded RNG**: every random choice draws from the run's `GameRng`.
//!
//! ## Modules
//!
//! - `core`: entity IDs, RNG, configuration, combat and run state
//! - `zones`: hand, draw, discard and exhaust piles
//! - `cards`: card definitions, instances and the card registry
//! - `rules`: `CombatEngine`, the turn lifecycle
//! - `effects`: the effect vocabulary, resolvers and executor
//! - `triggers`: lifecycle events and conditions
//! - `powers`: status definitions, stacking, modifiers and decay
//! - `elements`: elemental statuses and combos
//! - `content`: content bundles, JSON loading and the starter set
//! - `error`: action and content errors

pub mod core;
pub mod zones;
pub mod cards;
pub mod rules;
pub mod effects;
pub mod triggers;
pub mod powers;
pub mod elements;
pub mod content;
pub mod error;

// Re-export commonly used types
pub use crate::core::{
    CombatConfig, CombatPhase, CombatState, Entity, EntityId, GameRng, GameRngState, PendingSelection,
    RunState, SelectionKind,
};

pub use crate::zones::{Pile, PilePosition, Piles};

pub use crate::cards::{CardCost, CardDefinition, CardId, CardInstance, CardRegistry, CardTheme, CardUid};

pub use crate::rules::CombatEngine;

pub use crate::effects::{
    AnyTarget, CardTarget, Effect, EffectContext, EffectExecutor, EntityTarget, Value, VisualEvent,
};

pub use crate::triggers::{Condition, PowerEvent};

pub use crate::powers::{PowerDefinition, PowerId, PowerRegistry};

pub use crate::elements::Element;

pub use crate::content::{Content, ContentPack, EnemyTemplate, HeroTemplate, RelicDefinition};

pub use crate::error::{ActionError, ContentError};
