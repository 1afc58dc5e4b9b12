//! Rules engine abstraction.
//!
//! The desk never decides legality itself. Everything that depends on the
//! rules of chess (move legality, check, mate, draws) goes through the
//! [`RulesEngine`] trait, and [`StandardChess`] is the implementation used in
//! production.

mod standard;

pub use standard::StandardChess;

use chess_core::{Color, Grid, Move, Occupant, Square};
use std::fmt;
use thiserror::Error;

/// Why a position string could not be loaded.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RulesError {
    /// The string is not a position string at all.
    #[error("invalid FEN: {0}")]
    InvalidFen(String),
    /// The string parses but does not describe a playable position
    /// (missing kings, side not to move in check, ...).
    #[error("illegal position: {0}")]
    IllegalPosition(String),
}

/// A move the engine accepted and played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayedMove {
    /// The move as played, with the promotion piece filled in when one applied.
    pub mov: Move,
    /// Standard algebraic notation, including a check or mate suffix.
    pub san: String,
}

/// Reason for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    /// No legal moves but not in check.
    Stalemate,
    /// The same position occurred three times.
    ThreefoldRepetition,
    /// Neither side can possibly mate.
    InsufficientMaterial,
    /// 100 half-moves without a pawn move or capture.
    FiftyMoveRule,
}

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Checkmate { winner: Color },
    Draw(DrawReason),
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::Checkmate { winner } => write!(f, "Checkmate! {} wins.", winner),
            GameResult::Draw(DrawReason::Stalemate) => write!(f, "Stalemate!"),
            GameResult::Draw(DrawReason::ThreefoldRepetition) => {
                write!(f, "Draw by threefold repetition!")
            }
            GameResult::Draw(DrawReason::InsufficientMaterial) => {
                write!(f, "Draw by insufficient material!")
            }
            GameResult::Draw(DrawReason::FiftyMoveRule) => write!(f, "Draw!"),
        }
    }
}

/// Capabilities the desk needs from a chess rules library.
///
/// # Example
///
/// ```
/// use chess_core::{Move, Square};
/// use chess_desk::rules::{RulesEngine, StandardChess};
///
/// let mut engine = StandardChess::load(chess_core::STARTPOS).unwrap();
/// let e2 = Square::from_algebraic("e2").unwrap();
/// let e4 = Square::from_algebraic("e4").unwrap();
/// let played = engine.apply_move(Move::new(e2, e4)).unwrap();
/// assert_eq!(played.san, "e4");
/// ```
pub trait RulesEngine: Sized {
    /// Loads a position string.
    fn load(fen: &str) -> Result<Self, RulesError>;

    /// Returns the current position as a full FEN string.
    fn fen(&self) -> String;

    /// Returns an 8x8 snapshot of the board, rank 8 first.
    fn board(&self) -> Grid;

    /// Returns the occupant of a single square.
    fn get(&self, square: Square) -> Option<Occupant> {
        let (rank_index, file_index) = square.grid_coords();
        self.board()[rank_index][file_index]
    }

    /// Returns the side to move.
    fn turn(&self) -> Color;

    /// Plays `mov` if it is legal, returning `None` otherwise.
    ///
    /// A promotion piece on a move that does not promote is ignored, and a
    /// promoting move without one promotes to a queen.
    fn apply_move(&mut self, mov: Move) -> Option<PlayedMove>;

    fn is_check(&self) -> bool;

    fn is_checkmate(&self) -> bool;

    fn is_stalemate(&self) -> bool;

    fn is_insufficient_material(&self) -> bool;

    fn is_threefold_repetition(&self) -> bool;

    /// True once 100 half-moves have passed without a pawn move or capture.
    fn is_fifty_moves(&self) -> bool;

    /// True for any drawn position.
    fn is_draw(&self) -> bool {
        self.is_stalemate()
            || self.is_insufficient_material()
            || self.is_threefold_repetition()
            || self.is_fifty_moves()
    }

    /// Returns the game result if the game is over, otherwise `None`.
    ///
    /// The most specific reason wins: checkmate, then stalemate, repetition,
    /// insufficient material and finally any other draw.
    fn game_result(&self) -> Option<GameResult> {
        if self.is_checkmate() {
            Some(GameResult::Checkmate {
                winner: self.turn().opposite(),
            })
        } else if self.is_stalemate() {
            Some(GameResult::Draw(DrawReason::Stalemate))
        } else if self.is_threefold_repetition() {
            Some(GameResult::Draw(DrawReason::ThreefoldRepetition))
        } else if self.is_insufficient_material() {
            Some(GameResult::Draw(DrawReason::InsufficientMaterial))
        } else if self.is_draw() {
            Some(GameResult::Draw(DrawReason::FiftyMoveRule))
        } else {
            None
        }
    }
}
