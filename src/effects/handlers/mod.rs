//! Effect handlers, one module per family.
//!
//! Handlers are free functions taking the executor, the mutable draft and
//! the dispatch context. They resolve their own targets and values, mutate
//! state, and emit visuals. None of them fail.

pub(crate) mod card;
pub(crate) mod combat;
pub(crate) mod meta;
pub(crate) mod power;
pub(crate) mod resource;
