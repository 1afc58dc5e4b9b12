//! Sparse board positions used by free placement.
//!
//! A [`Placement`] maps occupied squares to their occupants and nothing else:
//! no side to move, no castling rights, no history. It is the value that board
//! editing works on. [`Placement::from_grid`] reads it out of an 8x8 board
//! snapshot and [`Placement::to_fen`] writes it back as a position string.

use crate::fen::{parse_board_field, write_board_field, FREE_PLACEMENT_SUFFIX};
use crate::{FenError, Occupant, Square};
use std::collections::BTreeMap;
use thiserror::Error;

/// An 8x8 board snapshot indexed `[rank_index][file_index]`.
///
/// Rank index 0 is the eighth rank and file index 0 is the a-file, matching
/// the order in which a position string lists squares.
pub type Grid = [[Option<Occupant>; 8]; 8];

/// Errors raised while building a placement from external data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error("malformed board grid: expected 8 rows, got {0}")]
    WrongRowCount(usize),

    #[error("malformed board grid: row {row} has {cells} cells, expected 8")]
    WrongRowLength { row: usize, cells: usize },

    #[error(transparent)]
    Fen(#[from] FenError),
}

/// A sparse position: occupied squares and what stands on them.
///
/// Absent squares are empty. At most 64 entries by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Placement {
    squares: BTreeMap<Square, Occupant>,
}

impl Placement {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extracts the occupied squares of a board snapshot.
    pub fn from_grid(grid: &Grid) -> Self {
        let mut placement = Placement::new();
        for (rank_index, row) in grid.iter().enumerate() {
            for (file_index, cell) in row.iter().enumerate() {
                if let (Some(occupant), Some(square)) =
                    (cell, Square::from_grid(rank_index, file_index))
                {
                    placement.squares.insert(square, *occupant);
                }
            }
        }
        placement
    }

    /// Extracts the occupied squares of a board given as rows of cells.
    ///
    /// The rows must form an exact 8x8 board; anything else is rejected
    /// instead of being truncated or padded.
    pub fn from_rows<R: AsRef<[Option<Occupant>]>>(rows: &[R]) -> Result<Self, PlacementError> {
        if rows.len() != 8 {
            return Err(PlacementError::WrongRowCount(rows.len()));
        }
        if let Some((row, cells)) = rows
            .iter()
            .map(|r| r.as_ref().len())
            .enumerate()
            .find(|(_, cells)| *cells != 8)
        {
            return Err(PlacementError::WrongRowLength { row, cells });
        }

        let mut grid: Grid = [[None; 8]; 8];
        for (target, row) in grid.iter_mut().zip(rows) {
            target.copy_from_slice(row.as_ref());
        }
        Ok(Self::from_grid(&grid))
    }

    /// Parses the piece placement field of a position string.
    ///
    /// Only the first whitespace-separated field is read; side to move and
    /// the remaining fields are ignored.
    pub fn from_fen(fen: &str) -> Result<Self, PlacementError> {
        let field = fen.split_whitespace().next().unwrap_or("");
        Ok(parse_board_field(field)?)
    }

    /// Returns the placement as an 8x8 board snapshot.
    pub fn to_grid(&self) -> Grid {
        let mut grid: Grid = [[None; 8]; 8];
        for (square, occupant) in &self.squares {
            let (rank_index, file_index) = square.grid_coords();
            grid[rank_index][file_index] = Some(*occupant);
        }
        grid
    }

    /// Returns the piece placement field alone (e.g. "8/8/8/8/4K3/8/8/8").
    pub fn board_fen(&self) -> String {
        write_board_field(self)
    }

    /// Serializes the placement as a free-placement position string, with
    /// white to move, no castling, no en passant and reset clocks.
    pub fn to_fen(&self) -> String {
        format!("{}{}", self.board_fen(), FREE_PLACEMENT_SUFFIX)
    }

    /// Returns the occupant of `square`, if any.
    pub fn get(&self, square: Square) -> Option<Occupant> {
        self.squares.get(&square).copied()
    }

    /// Returns true if `square` is occupied.
    pub fn contains(&self, square: Square) -> bool {
        self.squares.contains_key(&square)
    }

    /// Puts `occupant` on `square`, returning whatever stood there before.
    pub fn insert(&mut self, square: Square, occupant: Occupant) -> Option<Occupant> {
        self.squares.insert(square, occupant)
    }

    /// Clears `square`, returning the occupant that was removed.
    pub fn remove(&mut self, square: Square) -> Option<Occupant> {
        self.squares.remove(&square)
    }

    /// Number of occupied squares.
    pub fn len(&self) -> usize {
        self.squares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    /// True when all 64 squares are occupied.
    pub fn is_full(&self) -> bool {
        self.squares.len() == 64
    }

    /// First empty square in reading order (rank 8 to 1, file a to h).
    pub fn first_empty(&self) -> Option<Square> {
        Square::reading_order().find(|sq| !self.contains(*sq))
    }

    /// Iterates over occupied squares in index order (a1 first).
    pub fn iter(&self) -> impl Iterator<Item = (Square, Occupant)> + '_ {
        self.squares.iter().map(|(sq, occupant)| (*sq, *occupant))
    }
}

impl FromIterator<(Square, Occupant)> for Placement {
    fn from_iter<I: IntoIterator<Item = (Square, Occupant)>>(iter: I) -> Self {
        Placement {
            squares: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::STARTPOS;
    use crate::{Color, Piece};
    use proptest::prelude::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn white_king() -> Occupant {
        Occupant::new(Piece::King, Color::White)
    }

    /// Tallies one rank segment: letters count one, digits count their value.
    fn segment_width(segment: &str) -> u32 {
        segment
            .chars()
            .map(|c| c.to_digit(10).unwrap_or(1))
            .sum()
    }

    #[test]
    fn empty_board_serializes() {
        assert_eq!(Placement::new().to_fen(), "8/8/8/8/8/8/8/8 w - - 0 1");
    }

    #[test]
    fn single_king_serializes() {
        let mut placement = Placement::new();
        placement.insert(sq("e4"), white_king());
        assert_eq!(placement.to_fen(), "8/8/8/8/4K3/8/8/8 w - - 0 1");
    }

    #[test]
    fn startpos_board_field() {
        let placement = Placement::from_fen(STARTPOS).unwrap();
        assert_eq!(
            placement.to_fen(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1"
        );
    }

    #[test]
    fn runs_flush_before_pieces_and_at_rank_end() {
        let mut placement = Placement::new();
        placement.insert(sq("a8"), Occupant::new(Piece::Rook, Color::Black));
        placement.insert(sq("d8"), Occupant::new(Piece::King, Color::Black));
        placement.insert(sq("h1"), white_king());
        assert_eq!(placement.board_fen(), "r2k4/8/8/8/8/8/8/7K");
    }

    #[test]
    fn extraction_uses_rank_index_zero_as_rank_eight() {
        let mut grid: Grid = [[None; 8]; 8];
        grid[0][0] = Some(Occupant::new(Piece::Rook, Color::Black));
        grid[7][4] = Some(white_king());
        grid[4][4] = Some(Occupant::new(Piece::Pawn, Color::White));

        let placement = Placement::from_grid(&grid);

        assert_eq!(placement.len(), 3);
        assert_eq!(
            placement.get(sq("a8")),
            Some(Occupant::new(Piece::Rook, Color::Black))
        );
        assert_eq!(placement.get(sq("e1")), Some(white_king()));
        assert_eq!(
            placement.get(sq("e4")),
            Some(Occupant::new(Piece::Pawn, Color::White))
        );
    }

    #[test]
    fn grid_roundtrip() {
        let placement = Placement::from_fen(STARTPOS).unwrap();
        assert_eq!(Placement::from_grid(&placement.to_grid()), placement);
    }

    #[test]
    fn from_rows_rejects_wrong_dimensions() {
        let short_row: Vec<Vec<Option<Occupant>>> = (0..8)
            .map(|i| vec![None; if i == 3 { 7 } else { 8 }])
            .collect();
        assert_eq!(
            Placement::from_rows(short_row.as_slice()),
            Err(PlacementError::WrongRowLength { row: 3, cells: 7 })
        );

        let seven_rows: Vec<Vec<Option<Occupant>>> = vec![vec![None; 8]; 7];
        assert_eq!(
            Placement::from_rows(seven_rows.as_slice()),
            Err(PlacementError::WrongRowCount(7))
        );

        let empty: Vec<Vec<Option<Occupant>>> = Vec::new();
        assert!(Placement::from_rows(empty.as_slice()).is_err());
    }

    #[test]
    fn from_rows_accepts_exact_board() {
        let mut rows: Vec<Vec<Option<Occupant>>> = vec![vec![None; 8]; 8];
        rows[7][4] = Some(white_king());
        let placement = Placement::from_rows(rows.as_slice()).unwrap();
        assert_eq!(placement.get(sq("e1")), Some(white_king()));
        assert_eq!(placement.len(), 1);
    }

    #[test]
    fn from_fen_reports_malformed_field() {
        assert!(matches!(
            Placement::from_fen("8/8/8/8/8/8/8 w - - 0 1"),
            Err(PlacementError::Fen(FenError::InvalidPiecePlacement(_)))
        ));
        assert!(Placement::from_fen("").is_err());
    }

    #[test]
    fn first_empty_follows_reading_order() {
        let mut placement = Placement::from_fen(STARTPOS).unwrap();
        placement.remove(sq("e2"));
        assert_eq!(placement.first_empty(), Some(sq("a6")));

        let mut placement = Placement::new();
        assert_eq!(placement.first_empty(), Some(sq("a8")));
        placement.insert(sq("a8"), white_king());
        assert_eq!(placement.first_empty(), Some(sq("b8")));
    }

    #[test]
    fn full_board_has_no_empty_square() {
        let placement: Placement = Square::reading_order()
            .map(|sq| (sq, Occupant::new(Piece::Pawn, Color::Black)))
            .collect();
        assert!(placement.is_full());
        assert_eq!(placement.first_empty(), None);
        assert_eq!(placement.board_fen(), ["pppppppp"; 8].join("/"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_keys_are_square_labels() {
        let mut placement = Placement::new();
        placement.insert(sq("e4"), white_king());
        let json = serde_json::to_string(&placement).unwrap();
        assert_eq!(json, r#"{"e4":{"kind":"king","color":"white"}}"#);

        let back: Placement = serde_json::from_str(r#"{"e4":{"kind":"king","color":"w"}}"#).unwrap();
        assert_eq!(back, placement);
        assert!(serde_json::from_str::<Placement>(r#"{"e9":{"kind":"king","color":"w"}}"#).is_err());
    }

    fn arb_occupant() -> impl Strategy<Value = Occupant> {
        (0usize..6, any::<bool>()).prop_map(|(kind, white)| {
            let color = if white { Color::White } else { Color::Black };
            Occupant::new(Piece::ALL[kind], color)
        })
    }

    fn arb_placement() -> impl Strategy<Value = Placement> {
        prop::collection::vec(prop::option::of(arb_occupant()), 64).prop_map(|cells| {
            Square::reading_order()
                .zip(cells)
                .filter_map(|(sq, cell)| cell.map(|occupant| (sq, occupant)))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn serialize_then_extract_is_identity(placement in arb_placement()) {
            let fen = Placement::from_grid(&placement.to_grid()).to_fen();
            prop_assert_eq!(Placement::from_fen(&fen).unwrap(), placement);
        }

        #[test]
        fn every_rank_segment_spans_eight_squares(placement in arb_placement()) {
            let fen = placement.to_fen();
            let board = fen.split(' ').next().unwrap();
            let segments: Vec<&str> = board.split('/').collect();
            prop_assert_eq!(segments.len(), 8);
            for segment in segments {
                prop_assert_eq!(segment_width(segment), 8);
            }
            prop_assert!(fen.ends_with(" w - - 0 1"));
        }
    }
}
