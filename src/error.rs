//! Error types.
//!
//! Effects never fail; only the outer action surface and content loading
//! return errors.

use crate::cards::{CardId, CardUid};
use crate::core::CombatPhase;

/// A rejected player action. The state is left untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("no combat in progress")]
    NotInCombat,

    #[error("action not allowed during {0:?}")]
    WrongPhase(CombatPhase),

    #[error("combat is locked")]
    Locked,

    #[error("a card selection is pending")]
    SelectionPending,

    #[error("card {0} is not in hand")]
    CardNotInHand(CardUid),

    #[error("unknown card definition `{0}`")]
    UnknownCard(CardId),

    #[error("card {0} cannot be played")]
    Unplayable(CardUid),

    #[error("not enough energy: need {needed}, have {available}")]
    InsufficientEnergy { needed: i32, available: i32 },

    #[error("no selection is pending")]
    NoPendingSelection,

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("hero ability is not ready")]
    AbilityNotReady,
}

/// A problem with loaded content.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("malformed content: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate card `{0}`")]
    DuplicateCard(String),

    #[error("duplicate power `{0}`")]
    DuplicatePower(String),

    #[error("`{owner}` references unknown card `{card}`")]
    UnknownCard { owner: String, card: String },

    #[error("`{owner}` references unknown power `{power}`")]
    UnknownPower { owner: String, power: String },

    #[error("`{owner}` references unknown relic `{relic}`")]
    UnknownRelic { owner: String, relic: String },

    #[error("unknown enemy `{0}`")]
    UnknownEnemy(String),

    #[error("unknown hero `{0}`")]
    UnknownHero(String),
}
