//! API models for serialization.

use chess_core::{Color, Occupant, Placement};
use chess_desk::{BoardSession, GameMode, PlayedMove};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything a renderer needs to draw one board session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    /// Session identifier.
    pub id: String,
    /// Position string the board shows.
    pub fen: String,
    /// Side at the bottom of the board, `"w"` or `"b"`.
    pub orientation: String,
    pub started: bool,
    pub mode: GameMode,
    /// Selected engine name.
    pub engine: String,
    /// Side to move, `"w"` or `"b"`.
    pub turn: String,
    /// Whether the rules engine accepts the position.
    pub playable: bool,
    /// Whether a move suggestion is outstanding.
    pub awaiting_engine: bool,
    /// Result message once the game is over.
    pub result: Option<String>,
}

impl SessionView {
    pub fn new(id: &str, session: &BoardSession) -> Self {
        SessionView {
            id: id.to_string(),
            fen: session.fen().to_string(),
            orientation: session.orientation().to_char().to_string(),
            started: session.is_started(),
            mode: session.mode(),
            engine: session.engine_name().to_string(),
            turn: session.turn().to_char().to_string(),
            playable: session.is_playable(),
            awaiting_engine: session.is_awaiting_engine(),
            result: session.result_message(),
        }
    }
}

/// Outcome of a board gesture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditOutcome {
    /// False when the gesture did not apply (nothing to move, nothing to
    /// remove, board full, illegal move, game already started).
    pub applied: bool,
    pub session: SessionView,
}

/// Body of `POST /api/sessions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Initial position; the initial chess position when absent.
    #[serde(default)]
    pub fen: Option<String>,
}

/// Body of `PUT /api/sessions/:id/fen`.
#[derive(Debug, Clone, Deserialize)]
pub struct FenRequest {
    pub fen: String,
}

/// Body of `PUT /api/sessions/:id/settings`. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsRequest {
    #[serde(default)]
    pub orientation: Option<Color>,
    #[serde(default)]
    pub mode: Option<GameMode>,
    #[serde(default)]
    pub engine: Option<String>,
    #[serde(default)]
    pub turn: Option<Color>,
}

/// Body of `POST /api/sessions/:id/drop`.
#[derive(Debug, Clone, Deserialize)]
pub struct DropRequest {
    pub from: String,
    pub to: String,
}

/// Body of `POST /api/sessions/:id/add`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddRequest {
    /// Palette letter, uppercase for white.
    pub piece: String,
}

/// Body of `POST /api/sessions/:id/click`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClickRequest {
    pub square: String,
}

/// A move the engine played, as reported by `POST /api/sessions/:id/engine-move`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveView {
    pub uci: String,
    pub san: String,
}

impl From<&PlayedMove> for MoveView {
    fn from(played: &PlayedMove) -> Self {
        MoveView {
            uci: played.mov.to_uci(),
            san: played.san.clone(),
        }
    }
}

/// Response of `POST /api/sessions/:id/engine-move`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineMoveResponse {
    /// The move played, or `None` when there was no move this turn.
    pub played: Option<MoveView>,
    /// Why the engine service gave no move, if it failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub session: SessionView,
}

/// Body of `POST /api/position/serialize`.
///
/// Square labels are kept as strings so a bad label is reported as a bad
/// request rather than a decoding failure.
#[derive(Debug, Clone, Deserialize)]
pub struct SerializeRequest {
    pub position: BTreeMap<String, Occupant>,
}

/// A position string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FenResponse {
    pub fen: String,
}

/// Body of `POST /api/position/extract`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractRequest {
    pub fen: String,
}

/// A sparse position keyed by square label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionResponse {
    pub position: Placement,
}

/// One palette button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    /// Letter sent to `POST /api/sessions/:id/add`.
    pub letter: String,
    pub glyph: String,
    #[serde(flatten)]
    pub occupant: Occupant,
}

impl From<Occupant> for PaletteEntry {
    fn from(occupant: Occupant) -> Self {
        PaletteEntry {
            letter: occupant.to_fen_char().to_string(),
            glyph: occupant.glyph().to_string(),
            occupant,
        }
    }
}
