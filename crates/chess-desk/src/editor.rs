//! Free-placement edits.
//!
//! Each edit takes a [`Placement`] by value and returns the edited placement,
//! or `None` when the gesture does not apply (nothing to move, nothing to
//! remove, no room left). No legality checks happen here: free placement is
//! for setting up arbitrary positions.

use chess_core::{Occupant, Placement, Square};

/// Moves whatever stands on `from` to `to`.
///
/// An occupant already on `to` is replaced. Returns `None` when `from` is
/// empty or when the piece is dropped back onto its own square; such a drop
/// keeps the piece rather than deleting it.
pub fn move_piece(mut placement: Placement, from: Square, to: Square) -> Option<Placement> {
    if from == to {
        return None;
    }
    let occupant = placement.remove(from)?;
    placement.insert(to, occupant);
    Some(placement)
}

/// Puts `occupant` on the first empty square, scanning rank 8 down to rank 1
/// and files a to h. Returns `None` when the board is full.
pub fn add_piece(mut placement: Placement, occupant: Occupant) -> Option<Placement> {
    let square = placement.first_empty()?;
    placement.insert(square, occupant);
    Some(placement)
}

/// Clears `square`. Returns `None` when it is already empty.
pub fn remove_piece(mut placement: Placement, square: Square) -> Option<Placement> {
    placement.remove(square)?;
    Some(placement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{Color, Piece, STARTPOS};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn start() -> Placement {
        Placement::from_fen(STARTPOS).unwrap()
    }

    fn black_pawn() -> Occupant {
        Occupant::new(Piece::Pawn, Color::Black)
    }

    #[test]
    fn move_relocates_occupant() {
        let edited = move_piece(start(), sq("e2"), sq("e4")).unwrap();
        assert_eq!(edited.get(sq("e2")), None);
        assert_eq!(
            edited.get(sq("e4")),
            Some(Occupant::new(Piece::Pawn, Color::White))
        );
        assert_eq!(edited.len(), 32);
        assert_eq!(
            edited.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR w - - 0 1"
        );
    }

    #[test]
    fn move_onto_occupied_square_overwrites() {
        let edited = move_piece(start(), sq("d1"), sq("d8")).unwrap();
        assert_eq!(
            edited.get(sq("d8")),
            Some(Occupant::new(Piece::Queen, Color::White))
        );
        assert_eq!(edited.len(), 31);
    }

    #[test]
    fn move_from_empty_square_is_rejected() {
        assert_eq!(move_piece(start(), sq("e4"), sq("e5")), None);
        assert_eq!(move_piece(Placement::new(), sq("a1"), sq("a2")), None);
    }

    #[test]
    fn move_onto_same_square_is_rejected() {
        assert_eq!(move_piece(start(), sq("e2"), sq("e2")), None);
    }

    #[test]
    fn add_fills_first_empty_square_in_reading_order() {
        let edited = add_piece(Placement::new(), black_pawn()).unwrap();
        assert_eq!(edited.get(sq("a8")), Some(black_pawn()));

        let edited = add_piece(edited, Occupant::new(Piece::King, Color::White)).unwrap();
        assert_eq!(
            edited.get(sq("b8")),
            Some(Occupant::new(Piece::King, Color::White))
        );
    }

    #[test]
    fn remove_then_add_uses_scan_order_not_removal_order() {
        let removed = remove_piece(start(), sq("e2")).unwrap();
        let edited = add_piece(removed, black_pawn()).unwrap();

        // ranks 8 and 7 are full, so a6 is the first hole
        assert_eq!(edited.get(sq("a6")), Some(black_pawn()));
        assert_eq!(edited.get(sq("e2")), None);
        assert_eq!(edited.get(sq("a8")).map(|o| o.kind), Some(Piece::Rook));
        assert_eq!(
            edited.to_fen(),
            "rnbqkbnr/pppppppp/p7/8/8/8/PPPP1PPP/RNBQKBNR w - - 0 1"
        );
    }

    #[test]
    fn add_to_full_board_is_rejected() {
        let full: Placement = Square::reading_order().map(|sq| (sq, black_pawn())).collect();
        assert_eq!(add_piece(full, Occupant::new(Piece::Queen, Color::White)), None);
    }

    #[test]
    fn remove_clears_square() {
        let edited = remove_piece(start(), sq("e1")).unwrap();
        assert_eq!(edited.get(sq("e1")), None);
        assert_eq!(edited.len(), 31);
    }

    #[test]
    fn remove_empty_square_is_rejected() {
        assert_eq!(remove_piece(start(), sq("e4")), None);
    }
}
