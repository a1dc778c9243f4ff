//! Elemental system.
//!
//! Pure lookup tables, no mutable state:
//!
//! - each non-physical element inflicts a signature status when it deals damage
//! - a fixed, ordered table of combos maps (existing status, incoming element)
//!   to a special outcome that replaces the signature status for that hit
//!
//! Only the first matching combo in table order triggers per damage instance.

use serde::{Deserialize, Serialize};

use crate::powers::PowerId;

/// Damage element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Element {
    #[default]
    Physical,
    Fire,
    Ice,
    Lightning,
    Void,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Physical,
        Element::Fire,
        Element::Ice,
        Element::Lightning,
        Element::Void,
    ];

    /// Status inflicted by a hit of this element, with its stack amount.
    #[must_use]
    pub fn signature_status(self) -> Option<(PowerId, i32)> {
        match self {
            Element::Physical => None,
            Element::Fire => Some((PowerId::from(PowerId::BURNING), 3)),
            Element::Ice => Some((PowerId::from(PowerId::FROZEN), 1)),
            Element::Lightning => Some((PowerId::from(PowerId::CHARGED), 2)),
            Element::Void => Some((PowerId::from(PowerId::OILED), 2)),
        }
    }
}

/// An elemental combo definition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Combo {
    pub name: &'static str,
    /// Status that must already be on the target.
    pub existing: &'static str,
    /// Element of the incoming hit.
    pub element: Element,
    /// Damage multiplier (floored).
    pub multiplier: f64,
    /// Flat damage added after the multiplier.
    pub bonus: i32,
    /// Percentage of the final damage dealt to every other living enemy.
    pub chain_percent: Option<i32>,
    /// Status force-applied to the target instead of the signature status.
    pub apply: Option<(&'static str, i32)>,
    /// Execute the target if its health percent is below this after the hit.
    pub execute_below_percent: Option<i32>,
}

impl Combo {
    const fn new(name: &'static str, existing: &'static str, element: Element) -> Self {
        Self {
            name,
            existing,
            element,
            multiplier: 1.0,
            bonus: 0,
            chain_percent: None,
            apply: None,
            execute_below_percent: None,
        }
    }

    /// Apply the multiplier and flat bonus to a damage amount.
    #[must_use]
    pub fn scale(&self, damage: i32) -> i32 {
        (f64::from(damage) * self.multiplier).floor() as i32 + self.bonus
    }
}

/// Combo table, in priority order.
pub static COMBOS: [Combo; 6] = [
    Combo {
        multiplier: 2.0,
        ..Combo::new("Explosion", PowerId::OILED, Element::Fire)
    },
    Combo {
        chain_percent: Some(150),
        ..Combo::new("Conduction", PowerId::WET, Element::Lightning)
    },
    Combo {
        execute_below_percent: Some(30),
        ..Combo::new("Shatter", PowerId::FROZEN, Element::Physical)
    },
    Combo {
        multiplier: 1.5,
        ..Combo::new("Thaw", PowerId::FROZEN, Element::Fire)
    },
    Combo {
        apply: Some((PowerId::WET, 2)),
        ..Combo::new("Extinguish", PowerId::BURNING, Element::Ice)
    },
    Combo {
        bonus: 6,
        ..Combo::new("Overload", PowerId::CHARGED, Element::Lightning)
    },
];

/// First combo triggered by `element` hitting a target with the given statuses.
pub fn find_combo(element: Element, has_status: impl Fn(&str) -> bool) -> Option<&'static Combo> {
    COMBOS
        .iter()
        .find(|combo| combo.element == element && has_status(combo.existing))
}

/// Damage multiplier from enemy elemental affinities.
#[must_use]
pub fn affinity_multiplier(vulnerable: bool, resistant: bool) -> f64 {
    match (vulnerable, resistant) {
        (true, false) => 1.5,
        (false, true) => 0.5,
        _ => 1.0,
    }
}
