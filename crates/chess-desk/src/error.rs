//! Errors raised by board-session operations.

use crate::rules::RulesError;
use chess_core::{FenError, ParseSquareError};
use thiserror::Error;

/// Why a session operation was refused.
///
/// Gestures that simply do not apply (dropping from an empty square, clicking
/// an empty square, adding to a full board) are not errors; they report
/// "not applied" instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeskError {
    /// The operation is only allowed during setup.
    #[error("game already started")]
    GameStarted,

    /// The operation needs a position the rules engine accepts.
    #[error("position is not playable: {0}")]
    Unplayable(RulesError),

    #[error(transparent)]
    InvalidFen(#[from] FenError),

    #[error(transparent)]
    InvalidSquare(#[from] ParseSquareError),

    #[error("invalid piece letter '{0}'")]
    InvalidPiece(String),

    #[error("unknown engine '{0}'")]
    UnknownEngine(String),
}
