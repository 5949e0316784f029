//! Engine error type

use thiserror::Error;

use crate::board::Colour;
use crate::game::Action;

/// Errors surfaced by board and state operations.
///
/// Search itself never produces these: expansion only applies generated actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid cell ({q}, {r}): outside the radius-3 board")]
    InvalidCell { q: i8, r: i8 },

    #[error("cell ({q}, {r}) is listed more than once")]
    DuplicateCell { q: i8, r: i8 },

    #[error("illegal action {action}: {reason}")]
    IllegalAction { action: Action, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("decision requested for {requested}, but this strategy plays {own}")]
    ColourMismatch { own: Colour, requested: Colour },
}

impl EngineError {
    pub(crate) fn illegal(action: Action, reason: impl Into<String>) -> Self {
        EngineError::IllegalAction {
            action,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
