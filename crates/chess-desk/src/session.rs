//! Board sessions.
//!
//! A [`BoardSession`] is one board on the desk: the position string it
//! propagates, the rules engine loaded from that string, and the settings a
//! player picks before starting (orientation, game mode, engine). Every
//! gesture goes through here and ends the same way: a new position string,
//! a fresh engine, a recomputed result.

use crate::config::DeskConfig;
use crate::editor;
use crate::error::DeskError;
use crate::rules::{GameResult, PlayedMove, RulesEngine, RulesError, StandardChess};
use crate::suggest::{MoveRequest, MoveResponse, SuggestError};
use chess_core::{Color, Fen, Move, Occupant, Piece, Placement, Square, STARTPOS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Keyword accepted in place of a position string for the initial position.
pub const START_KEYWORD: &str = "start";

/// Who plays the moves once the game has started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Both sides are moved on the board.
    #[default]
    #[serde(rename = "2player")]
    TwoPlayer,
    /// The engine service plays the side opposite the orientation.
    #[serde(rename = "computer")]
    Computer,
}

impl GameMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            GameMode::TwoPlayer => "2player",
            GameMode::Computer => "computer",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2player" => Ok(GameMode::TwoPlayer),
            "computer" => Ok(GameMode::Computer),
            other => Err(format!("unknown game mode '{}'", other)),
        }
    }
}

/// One board and its game phase.
#[derive(Debug, Clone)]
pub struct BoardSession<E: RulesEngine = StandardChess> {
    fen: String,
    /// The engine loaded from `fen`, or why it could not be loaded.
    engine: Result<E, RulesError>,
    orientation: Color,
    started: bool,
    mode: GameMode,
    engine_name: String,
    engine_choices: Vec<String>,
    depth: Option<u32>,
    /// The suggestion request currently outstanding, if any.
    pending: Option<MoveRequest>,
    result: Option<GameResult>,
}

impl<E: RulesEngine> BoardSession<E> {
    /// Creates a session on the initial position with the configured engine.
    pub fn new(config: &DeskConfig) -> Self {
        let mut session = BoardSession {
            fen: STARTPOS.to_string(),
            engine: E::load(STARTPOS),
            orientation: Color::White,
            started: false,
            mode: GameMode::TwoPlayer,
            engine_name: config.default_engine.clone(),
            engine_choices: config.engines.clone(),
            depth: config.depth,
            pending: None,
            result: None,
        };
        session.refresh_result();
        session
    }

    /// Creates a session on `fen` (or [`START_KEYWORD`]).
    pub fn with_fen(config: &DeskConfig, fen: &str) -> Result<Self, DeskError> {
        let mut session = Self::new(config);
        session.set_fen(fen)?;
        Ok(session)
    }

    /// The position string this session propagates.
    pub fn fen(&self) -> &str {
        &self.fen
    }

    pub fn orientation(&self) -> Color {
        self.orientation
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn engine_name(&self) -> &str {
        &self.engine_name
    }

    pub fn engine_choices(&self) -> &[String] {
        &self.engine_choices
    }

    pub fn is_awaiting_engine(&self) -> bool {
        self.pending.is_some()
    }

    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    /// The result message shown under the board, if the game is over.
    pub fn result_message(&self) -> Option<String> {
        self.result.map(|r| r.to_string())
    }

    /// True when the rules engine accepted the current position.
    pub fn is_playable(&self) -> bool {
        self.engine.is_ok()
    }

    /// The loaded rules engine, if the position is playable.
    pub fn rules(&self) -> Option<&E> {
        self.engine.as_ref().ok()
    }

    /// Why the current position is not playable.
    pub fn unplayable_reason(&self) -> Option<&RulesError> {
        self.engine.as_ref().err()
    }

    /// Side to move.
    pub fn turn(&self) -> Color {
        match &self.engine {
            Ok(engine) => engine.turn(),
            Err(_) => self
                .fen
                .split_whitespace()
                .nth(1)
                .and_then(|field| field.chars().next())
                .and_then(Color::from_char)
                .unwrap_or(Color::White),
        }
    }

    /// The color the engine service plays, if any.
    pub fn engine_color(&self) -> Option<Color> {
        match self.mode {
            GameMode::Computer => Some(self.orientation.opposite()),
            GameMode::TwoPlayer => None,
        }
    }

    /// Sparse view of the current board.
    ///
    /// Read from the rules engine when the position is playable, otherwise
    /// from the session's own position string.
    pub fn placement(&self) -> Placement {
        match &self.engine {
            Ok(engine) => Placement::from_grid(&engine.board()),
            Err(_) => Placement::from_fen(&self.fen).unwrap_or_default(),
        }
    }

    /// Resets to the initial position, white at the bottom, not started.
    /// Mode and engine selection are kept.
    pub fn new_game(&mut self) {
        self.orientation = Color::White;
        self.started = false;
        self.pending = None;
        self.reload(STARTPOS.to_string());
        tracing::info!("New game");
    }

    /// Replaces the position with a typed position string.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), DeskError> {
        self.ensure_setup()?;
        let fen = fen.trim();
        let fen = if fen == START_KEYWORD { STARTPOS } else { fen };
        let parsed = Fen::parse(fen)?;
        self.reload(parsed.to_string());
        Ok(())
    }

    pub fn set_orientation(&mut self, orientation: Color) -> Result<(), DeskError> {
        self.ensure_setup()?;
        self.orientation = orientation;
        Ok(())
    }

    pub fn set_mode(&mut self, mode: GameMode) -> Result<(), DeskError> {
        self.ensure_setup()?;
        self.mode = mode;
        Ok(())
    }

    pub fn set_engine(&mut self, name: &str) -> Result<(), DeskError> {
        self.ensure_setup()?;
        if !self.engine_choices.iter().any(|e| e == name) {
            return Err(DeskError::UnknownEngine(name.to_string()));
        }
        self.engine_name = name.to_string();
        Ok(())
    }

    /// Sets the side to move by rewriting the second field of the position
    /// string.
    pub fn set_turn(&mut self, turn: Color) -> Result<(), DeskError> {
        self.ensure_setup()?;
        let side = turn.to_char().to_string();
        let mut fields: Vec<&str> = self.fen.split_whitespace().collect();
        if fields.len() < 2 {
            return Ok(());
        }
        fields[1] = &side;
        let fen = fields.join(" ");
        self.reload(fen);
        Ok(())
    }

    /// Leaves setup and starts play from the current position.
    pub fn start(&mut self) -> Result<(), DeskError> {
        self.ensure_setup()?;
        if let Err(reason) = &self.engine {
            return Err(DeskError::Unplayable(reason.clone()));
        }
        self.started = true;
        tracing::info!(fen = %self.fen, mode = %self.mode, "Game started");
        Ok(())
    }

    /// Handles a piece dropped from `from` onto `to`.
    ///
    /// During setup this is a free-placement move; once started it is a
    /// rules-checked move that promotes to a queen.
    pub fn drop_piece(&mut self, from: Square, to: Square) -> bool {
        if !self.started {
            return self.apply_edit(|placement| editor::move_piece(placement, from, to));
        }
        if self.engine_color() == Some(self.turn()) {
            tracing::debug!(from = %from, to = %to, "Ignoring drop on the engine's turn");
            return false;
        }
        self.play_move(Move::new(from, to).with_promotion(Piece::Queen))
            .is_some()
    }

    /// Puts the palette piece `letter` on the first empty square.
    ///
    /// The letter is validated even when the edit cannot apply.
    pub fn add_piece(&mut self, letter: &str) -> Result<bool, DeskError> {
        let occupant = single_char(letter)
            .and_then(Occupant::from_fen_char)
            .ok_or_else(|| DeskError::InvalidPiece(letter.to_string()))?;
        Ok(self.apply_edit(|placement| editor::add_piece(placement, occupant)))
    }

    /// Removes whatever stands on `square`.
    pub fn click_square(&mut self, square: Square) -> bool {
        self.apply_edit(|placement| editor::remove_piece(placement, square))
    }

    /// Builds the suggestion request for the engine's move and marks it
    /// outstanding. Returns `None` unless the engine is to move and no other
    /// request is in flight.
    pub fn begin_engine_request(&mut self) -> Option<MoveRequest> {
        if self.pending.is_some() || !self.is_engine_turn() {
            return None;
        }
        let request = MoveRequest {
            engine: self.engine_name.clone(),
            position: self.fen.clone(),
            depth: self.depth,
        };
        self.pending = Some(request.clone());
        Some(request)
    }

    /// Resolves a request made by [`begin_engine_request`](Self::begin_engine_request).
    ///
    /// A failure means no move this turn. A response to a request that is no
    /// longer outstanding, or that arrives after the position changed or the
    /// game ended, is dropped.
    pub fn finish_engine_request(
        &mut self,
        request: &MoveRequest,
        outcome: Result<MoveResponse, SuggestError>,
    ) -> Option<PlayedMove> {
        if self.pending.as_ref() != Some(request) {
            tracing::debug!(position = %request.position, "Dropping stale engine response");
            return None;
        }
        self.pending = None;

        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, "No engine move this turn");
                return None;
            }
        };

        if !self.started || self.result.is_some() || self.fen != request.position {
            tracing::debug!(best_move = %response.best_move, "Ignoring late engine move");
            return None;
        }

        let Some(mov) = response.to_move() else {
            tracing::warn!(best_move = %response.best_move, "Engine suggested an unreadable move");
            return None;
        };
        let played = self.play_move(mov);
        if played.is_none() {
            tracing::warn!(mov = %mov, "Engine suggested an illegal move");
        }
        played
    }

    fn is_engine_turn(&self) -> bool {
        self.started
            && self.result.is_none()
            && self.engine.is_ok()
            && self.engine_color() == Some(self.turn())
    }

    fn play_move(&mut self, mov: Move) -> Option<PlayedMove> {
        if !self.started || self.result.is_some() {
            return None;
        }
        let engine = self.engine.as_mut().ok()?;
        let played = engine.apply_move(mov)?;
        self.fen = engine.fen();
        self.refresh_result();
        tracing::debug!(san = %played.san, fen = %self.fen, "Move played");
        Some(played)
    }

    /// Runs a free-placement edit: extract, edit, serialize, reload.
    fn apply_edit(&mut self, edit: impl FnOnce(Placement) -> Option<Placement>) -> bool {
        if self.started {
            return false;
        }
        match edit(self.placement()) {
            Some(placement) => {
                self.reload(placement.to_fen());
                true
            }
            None => false,
        }
    }

    fn reload(&mut self, fen: String) {
        self.engine = E::load(&fen);
        if let Err(err) = &self.engine {
            tracing::debug!(fen = %fen, error = %err, "Position is not playable");
        }
        self.fen = fen;
        self.refresh_result();
    }

    fn refresh_result(&mut self) {
        self.result = self.engine.as_ref().ok().and_then(|engine| engine.game_result());
        if let Some(result) = self.result {
            if self.started {
                tracing::info!(result = %result, "Game over");
            }
        }
    }

    fn ensure_setup(&self) -> Result<(), DeskError> {
        if self.started {
            Err(DeskError::GameStarted)
        } else {
            Ok(())
        }
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
