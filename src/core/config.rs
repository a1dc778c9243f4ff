//! Combat configuration.
//!
//! Tunable rules constants live here rather than being scattered through
//! handlers. `CombatEngine` owns one `CombatConfig`; effect handlers read
//! it through the executor.

use serde::{Deserialize, Serialize};

/// Rules constants for a combat.
///
/// ```
/// use deckrun::core::CombatConfig;
///
/// let config = CombatConfig::new().with_draw_per_turn(6).with_hand_limit(12);
/// assert_eq!(config.draw_per_turn, 6);
/// assert_eq!(config.hand_limit, 12);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatConfig {
    /// Cards drawn at the start of each player turn.
    pub draw_per_turn: usize,

    /// Maximum hand size. Draws and generated cards stop at this limit.
    pub hand_limit: usize,

    /// Maximum nesting of effect dispatch (triggers, replays, meta effects).
    pub max_effect_depth: u32,

    /// Number of candidates offered by a discover effect without an explicit count.
    pub discover_choices: usize,

    /// Hero ability charge gained per card played.
    pub charge_per_card: u32,
}

impl CombatConfig {
    /// Create a configuration with the default rules.
    #[must_use]
    pub fn new() -> Self {
        Self {
            draw_per_turn: 5,
            hand_limit: 10,
            max_effect_depth: 32,
            discover_choices: 3,
            charge_per_card: 1,
        }
    }

    /// Set cards drawn per turn.
    #[must_use]
    pub fn with_draw_per_turn(mut self, count: usize) -> Self {
        self.draw_per_turn = count;
        self
    }

    /// Set the hand size limit.
    #[must_use]
    pub fn with_hand_limit(mut self, limit: usize) -> Self {
        self.hand_limit = limit;
        self
    }

    /// Set the maximum effect recursion depth.
    #[must_use]
    pub fn with_max_effect_depth(mut self, depth: u32) -> Self {
        self.max_effect_depth = depth;
        self
    }

    /// Set the default discover candidate count.
    #[must_use]
    pub fn with_discover_choices(mut self, count: usize) -> Self {
        self.discover_choices = count;
        self
    }

    /// Set hero ability charge gained per card played.
    #[must_use]
    pub fn with_charge_per_card(mut self, charge: u32) -> Self {
        self.charge_per_card = charge;
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CombatConfig::default();
        assert_eq!(config.draw_per_turn, 5);
        assert_eq!(config.hand_limit, 10);
        assert_eq!(config.max_effect_depth, 32);
        assert_eq!(config.discover_choices, 3);
    }

    #[test]
    fn test_builder() {
        let config = CombatConfig::new()
            .with_max_effect_depth(4)
            .with_discover_choices(2)
            .with_charge_per_card(3);

        assert_eq!(config.max_effect_depth, 4);
        assert_eq!(config.discover_choices, 2);
        assert_eq!(config.charge_per_card, 3);
    }

    #[test]
    fn test_serialization() {
        let config = CombatConfig::new().with_hand_limit(8);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("handLimit"));
        let back: CombatConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
