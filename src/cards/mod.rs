//! Card system: definitions, instances, and registry.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `CardDefinition`: Immutable content (cost, theme, keywords, effects)
//! - `CardUid`: Identity of one physical copy
//! - `CardInstance`: A copy plus its instance-local overlays
//! - `CardRegistry`: Definition lookup

pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{CardCost, CardDefinition, CardId, CardKeywords, CardRarity, CardTheme};
pub use instance::{CardInstance, CardUid};
pub use registry::CardRegistry;
