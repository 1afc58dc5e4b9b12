//! Move representation.

use crate::{Piece, Square};
use std::fmt;

/// A move request: source, destination and an optional promotion piece.
///
/// This is a coordinate move only. Whether it is legal, and whether it is a
/// castle or an en passant capture, is for the rules engine to decide.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Piece>,
}

impl Move {
    /// Creates a move without promotion.
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: None,
        }
    }

    /// Returns the same move promoting to `piece`.
    #[inline]
    pub const fn with_promotion(self, piece: Piece) -> Self {
        Move {
            promotion: Some(piece),
            ..self
        }
    }

    /// Returns the UCI notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(self) -> String {
        match self.promotion {
            Some(piece) => format!("{}{}{}", self.from, self.to, piece.letter()),
            None => format!("{}{}", self.from, self.to),
        }
    }

    /// Parses a move from UCI notation.
    ///
    /// Only knight, bishop, rook and queen are accepted as promotion pieces.
    pub fn from_uci(s: &str) -> Option<Self> {
        if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
            return None;
        }

        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        let mov = Move::new(from, to);

        match s[4..].chars().next() {
            None => Some(mov),
            Some(c) => match Piece::from_letter(c)? {
                Piece::Pawn | Piece::King => None,
                piece => Some(mov.with_promotion(piece)),
            },
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_uci())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}
