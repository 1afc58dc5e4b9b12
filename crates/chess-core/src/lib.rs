//! Core types for chess.
//!
//! This crate provides the fundamental types used across the desk:
//! - [`Piece`], [`Color`] and [`Occupant`] for what stands on a square
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] for coordinate moves
//! - [`Placement`], the sparse position that free placement edits, with
//!   extraction from a board [`Grid`] and serialization to a position string
//! - FEN parsing and serialization

mod color;
mod fen;
mod mov;
mod piece;
mod placement;
mod square;

pub use color::Color;
pub use fen::{Fen, FenError, FREE_PLACEMENT_SUFFIX, STARTPOS};
pub use mov::Move;
pub use piece::{Occupant, Piece};
pub use placement::{Grid, Placement, PlacementError};
pub use square::{File, ParseSquareError, Rank, Square};
