//! Standard chess rules backed by `shakmaty`.

use super::{PlayedMove, RulesEngine, RulesError};
use chess_core::{Color, Grid, Move, Occupant, Piece, Rank, Square};
use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Position, PositionError, Role};
use std::collections::HashMap;

/// Standard chess rules (FIDE).
///
/// Wraps a `shakmaty` position and adds the one thing a single position cannot
/// know: how often each position has occurred since the game was loaded.
#[derive(Debug, Clone)]
pub struct StandardChess {
    position: Chess,
    /// Occurrence counts keyed by the first four FEN fields.
    repetitions: HashMap<String, u32>,
}

impl StandardChess {
    fn record_position(&mut self) {
        let key = repetition_key(&self.fen());
        *self.repetitions.entry(key).or_insert(0) += 1;
    }
}

impl Default for StandardChess {
    fn default() -> Self {
        let mut engine = StandardChess {
            position: Chess::default(),
            repetitions: HashMap::new(),
        };
        engine.record_position();
        engine
    }
}

impl RulesEngine for StandardChess {
    fn load(fen: &str) -> Result<Self, RulesError> {
        let parsed = Fen::from_ascii(fen.trim().as_bytes())
            .map_err(|e| RulesError::InvalidFen(e.to_string()))?;
        let position: Chess = parsed
            .into_position(CastlingMode::Standard)
            .or_else(PositionError::ignore_invalid_castling_rights)
            .map_err(|e| RulesError::IllegalPosition(e.to_string()))?;

        let mut engine = StandardChess {
            position,
            repetitions: HashMap::new(),
        };
        engine.record_position();
        Ok(engine)
    }

    fn fen(&self) -> String {
        Fen::from_setup(self.position.clone().into_setup(EnPassantMode::Legal)).to_string()
    }

    fn board(&self) -> Grid {
        let board = self.position.board();
        let mut grid: Grid = [[None; 8]; 8];
        for square in Square::reading_order() {
            let (rank_index, file_index) = square.grid_coords();
            grid[rank_index][file_index] = board.piece_at(to_shakmaty(square)).map(from_shakmaty);
        }
        grid
    }

    fn get(&self, square: Square) -> Option<Occupant> {
        self.position
            .board()
            .piece_at(to_shakmaty(square))
            .map(from_shakmaty)
    }

    fn turn(&self) -> Color {
        match self.position.turn() {
            shakmaty::Color::White => Color::White,
            shakmaty::Color::Black => Color::Black,
        }
    }

    fn apply_move(&mut self, mov: Move) -> Option<PlayedMove> {
        let from = to_shakmaty(mov.from);
        let to = to_shakmaty(mov.to);

        let promotes = self.position.board().role_at(from) == Some(Role::Pawn)
            && matches!(mov.to.rank(), Rank::R1 | Rank::R8);
        let promotion = promotes.then(|| mov.promotion.unwrap_or(Piece::Queen));

        let uci = UciMove::Normal {
            from,
            to,
            promotion: promotion.map(to_role),
        };
        let legal = uci.to_move(&self.position).ok()?;

        let mut san = San::from_move(&self.position, &legal).to_string();
        self.position.play_unchecked(&legal);
        if self.position.is_checkmate() {
            san.push('#');
        } else if self.position.is_check() {
            san.push('+');
        }
        self.record_position();

        Some(PlayedMove {
            mov: Move {
                from: mov.from,
                to: mov.to,
                promotion,
            },
            san,
        })
    }

    fn is_check(&self) -> bool {
        self.position.is_check()
    }

    fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    fn is_stalemate(&self) -> bool {
        self.position.is_stalemate()
    }

    fn is_insufficient_material(&self) -> bool {
        self.position.is_insufficient_material()
    }

    fn is_threefold_repetition(&self) -> bool {
        let key = repetition_key(&self.fen());
        self.repetitions.get(&key).copied().unwrap_or(0) >= 3
    }

    fn is_fifty_moves(&self) -> bool {
        self.position.halfmoves() >= 100
    }
}

/// Placement, side to move, castling rights and en passant square: the
/// fields that decide whether two positions are the same for repetition.
fn repetition_key(fen: &str) -> String {
    fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
}

fn to_shakmaty(square: Square) -> shakmaty::Square {
    shakmaty::Square::from_coords(
        shakmaty::File::new(u32::from(square.file().index())),
        shakmaty::Rank::new(u32::from(square.rank().index())),
    )
}

fn to_role(piece: Piece) -> Role {
    match piece {
        Piece::Pawn => Role::Pawn,
        Piece::Knight => Role::Knight,
        Piece::Bishop => Role::Bishop,
        Piece::Rook => Role::Rook,
        Piece::Queen => Role::Queen,
        Piece::King => Role::King,
    }
}

fn from_shakmaty(piece: shakmaty::Piece) -> Occupant {
    let kind = match piece.role {
        Role::Pawn => Piece::Pawn,
        Role::Knight => Piece::Knight,
        Role::Bishop => Piece::Bishop,
        Role::Rook => Piece::Rook,
        Role::Queen => Piece::Queen,
        Role::King => Piece::King,
    };
    let color = match piece.color {
        shakmaty::Color::White => Color::White,
        shakmaty::Color::Black => Color::Black,
    };
    Occupant::new(kind, color)
}
