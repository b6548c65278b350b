//! Utterance decisions

use serde::{Deserialize, Serialize};

/// What the speech collaborator should do this cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "text", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UtteranceAction {
    /// Cancel any in-progress utterance and announce this text
    Speak(String),
    /// Repeat of the last announcement, do nothing
    Suppress,
    /// Halt any in-progress utterance
    Stop,
}

impl UtteranceAction {
    /// Text to announce, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            UtteranceAction::Speak(text) => Some(text),
            _ => None,
        }
    }

    /// Does this action reach the speech collaborator?
    pub fn is_audible_change(&self) -> bool {
        !matches!(self, UtteranceAction::Suppress)
    }
}

impl std::fmt::Display for UtteranceAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UtteranceAction::Speak(text) => write!(f, "SPEAK \"{}\"", text),
            UtteranceAction::Suppress => write!(f, "SUPPRESS"),
            UtteranceAction::Stop => write!(f, "STOP"),
        }
    }
}
