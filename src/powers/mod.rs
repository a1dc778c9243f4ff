//! Power system: stacking status effects on entities.
//!
//! - `definition`: power content (`PowerDefinition`) and instances (`Power`, `PowerSet`)
//! - `registry`: `PowerRegistry` with the built-in status table
//! - `system`: apply/remove/decay and the damage and block modifier functions

pub mod definition;
pub mod registry;
pub mod system;

pub use definition::{
    Decay, DecayOn, Power, PowerDefinition, PowerId, PowerKind, PowerModifiers, PowerSet,
    PowerTrigger, StackBehavior,
};
pub use registry::PowerRegistry;
pub use system::{
    apply_power_to_entity, decay_powers, incoming_damage, outgoing_block, outgoing_damage,
    power_triggers, remove_power_from_entity, tick_silence, DecayTick, TriggeredPower,
};
