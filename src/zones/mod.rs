//! Card locations.
//!
//! ## Key Types
//!
//! - `Pile`: Hand, draw, discard or exhaust
//! - `PilePosition`: Where an inserted card lands
//! - `Piles`: The four piles of a combat and movement between them

pub mod piles;

pub use piles::{Pile, PilePosition, Piles};
