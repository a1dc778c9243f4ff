//! Enemy templates and intent selection.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{EnemyState, Entity, EntityId, GameRng, Intent, IntentKind};
use crate::effects::Effect;
use crate::elements::Element;
use crate::powers::{apply_power_to_entity, PowerId, PowerRegistry};

fn unit_weight() -> f32 {
    1.0
}

/// One move an enemy may declare as its intent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyMove {
    pub name: String,
    pub kind: IntentKind,
    #[serde(default = "unit_weight")]
    pub weight: f32,
    pub effects: Vec<Effect>,
}

impl EnemyMove {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: IntentKind, effects: Vec<Effect>) -> Self {
        Self {
            name: name.into(),
            kind,
            weight: 1.0,
            effects,
        }
    }

    #[must_use]
    pub fn weighted(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }
}

/// Stacks of a power an enemy spawns with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartingPower {
    pub power: PowerId,
    pub amount: i32,
}

/// Static enemy content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyTemplate {
    pub id: String,
    pub name: String,
    pub max_health: i32,
    pub moves: Vec<EnemyMove>,
    #[serde(default)]
    pub vulnerabilities: Vec<Element>,
    #[serde(default)]
    pub resistances: Vec<Element>,
    #[serde(default)]
    pub starting_powers: Vec<StartingPower>,
}

impl EnemyTemplate {
    #[must_use]
    pub fn new(id: &str, name: impl Into<String>, max_health: i32) -> Self {
        Self {
            id: id.to_string(),
            name: name.into(),
            max_health,
            moves: Vec::new(),
            vulnerabilities: Vec::new(),
            resistances: Vec::new(),
            starting_powers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_move(mut self, enemy_move: EnemyMove) -> Self {
        self.moves.push(enemy_move);
        self
    }

    #[must_use]
    pub fn vulnerable_to(mut self, element: Element) -> Self {
        self.vulnerabilities.push(element);
        self
    }

    #[must_use]
    pub fn resistant_to(mut self, element: Element) -> Self {
        self.resistances.push(element);
        self
    }

    #[must_use]
    pub fn with_power(mut self, power: &str, amount: i32) -> Self {
        self.starting_powers.push(StartingPower {
            power: PowerId::from(power),
            amount,
        });
        self
    }

    /// Create a combat entity from this template.
    #[must_use]
    pub fn spawn(&self, id: EntityId, powers: &PowerRegistry) -> Entity {
        let state = EnemyState {
            template_id: self.id.clone(),
            vulnerabilities: SmallVec::from_slice(&self.vulnerabilities),
            resistances: SmallVec::from_slice(&self.resistances),
            intent: None,
            last_move: None,
        };
        let mut entity = Entity::enemy(id, self.name.clone(), self.max_health, state);
        for start in &self.starting_powers {
            apply_power_to_entity(&mut entity, powers, &start.power, start.amount, None);
        }
        entity
    }

    /// Pick the next move by weight.
    ///
    /// The previous move is excluded whenever another move has positive
    /// weight.
    pub fn choose_move(&self, last: Option<usize>, rng: &mut GameRng) -> Option<usize> {
        let mut weights: Vec<f32> = self.moves.iter().map(|m| m.weight.max(0.0)).collect();
        if let Some(last) = last {
            let has_alternative = weights
                .iter()
                .enumerate()
                .any(|(i, &w)| i != last && w > 0.0);
            if has_alternative {
                if let Some(w) = weights.get_mut(last) {
                    *w = 0.0;
                }
            }
        }
        rng.choose_weighted(&weights)
    }

    /// Build the intent for a move.
    #[must_use]
    pub fn intent(&self, move_index: usize) -> Option<Intent> {
        let chosen = self.moves.get(move_index)?;
        Some(Intent {
            move_index,
            name: chosen.name.clone(),
            kind: chosen.kind,
            effects: chosen.effects.clone(),
            weakened: 0,
        })
    }
}
