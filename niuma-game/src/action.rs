//! Player actions and the reasons they can be turned away.
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::resources::ResourceKind;
use crate::state::Phase;

/// Everything a player can ask the controller to do.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Begin the day: draw the event and schedule the morning resolution.
    StartDay,
    /// Play a card from the current phase's pool.
    PlayCard { card_id: String },
    /// Leave the office for the night.
    EndWork,
    /// Close the day and schedule settlement.
    GoToSleep,
    /// Discard the run and start over.
    ResetGame,
    /// Pick a talent before the first day begins.
    SelectTalent { talent_id: String },
}

impl Action {
    #[must_use]
    pub fn play(card_id: impl Into<String>) -> Self {
        Self::PlayCard {
            card_id: card_id.into(),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::StartDay => "start_day",
            Self::PlayCard { .. } => "play_card",
            Self::EndWork => "end_work",
            Self::GoToSleep => "go_to_sleep",
            Self::ResetGame => "reset_game",
            Self::SelectTalent { .. } => "select_talent",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlayCard { card_id } => write!(f, "play_card({card_id})"),
            Self::SelectTalent { talent_id } => write!(f, "select_talent({talent_id})"),
            _ => f.write_str(self.name()),
        }
    }
}

/// Why `dispatch` refused an action. The state is left as it was, except that
/// an insufficiency is recorded in the journal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionRejected {
    #[error("the run has ended; only a reset is accepted")]
    Defeated,
    #[error("a phase transition is still pending")]
    TransitionPending,
    #[error("{action} is not legal during {phase}")]
    WrongPhase { action: &'static str, phase: Phase },
    #[error("card `{card_id}` is not in the {phase} pool")]
    UnknownCard { card_id: String, phase: Phase },
    #[error("unknown talent `{talent_id}`")]
    UnknownTalent { talent_id: String },
    #[error("talents can only be chosen before the first day")]
    TalentLocked,
    #[error("`{card_id}` needs {need} {resource}, have {have}")]
    InsufficientResources {
        card_id: String,
        resource: ResourceKind,
        need: i32,
        have: i32,
    },
}
