//! Relics: passive run items that react to lifecycle events.

use serde::{Deserialize, Serialize};

use crate::effects::Effect;
use crate::powers::PowerTrigger;
use crate::triggers::PowerEvent;

/// Relic identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelicId(pub String);

impl RelicId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RelicId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for RelicId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Static relic content.
///
/// Triggers fire with the player as owner, alongside the player's power
/// triggers for the same event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelicDefinition {
    pub id: RelicId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub triggers: Vec<PowerTrigger>,
}

impl RelicDefinition {
    #[must_use]
    pub fn new(id: &str, name: impl Into<String>) -> Self {
        Self {
            id: RelicId::from(id),
            name: name.into(),
            description: String::new(),
            triggers: Vec::new(),
        }
    }

    #[must_use]
    pub fn on(mut self, event: PowerEvent, effects: Vec<Effect>) -> Self {
        self.triggers.push(PowerTrigger { event, effects });
        self
    }

    pub fn triggers_for(&self, event: PowerEvent) -> impl Iterator<Item = &[Effect]> {
        self.triggers
            .iter()
            .filter(move |t| t.event == event)
            .map(|t| t.effects.as_slice())
    }
}
