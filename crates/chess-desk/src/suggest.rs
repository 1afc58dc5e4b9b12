//! Move suggestions from a remote engine service.
//!
//! The desk never searches for moves itself. It posts the current position to
//! an engine service and plays whatever comes back. The same wire types are
//! used by the server's proxy endpoint.

use chess_core::{Move, Piece, Square};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Message used when the engine service fails without saying why.
pub const DEFAULT_UPSTREAM_ERROR: &str = "Failed to fetch best move";

/// A request for the best move in a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Engine name, e.g. `"stockfish"` or `"0.3.0"`.
    pub engine: String,
    /// Full FEN of the position to search.
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
}

/// The engine service's answer.
///
/// Fields the desk does not interpret are kept in `extra` so the proxy can
/// hand the body back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveResponse {
    /// The move in UCI notation.
    pub best_move: String,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<String>,
    /// Search log lines, passed through untouched.
    #[serde(default)]
    pub log: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MoveResponse {
    /// Interprets the suggestion as a move.
    ///
    /// `from`/`to`/`promotion` are preferred; `best_move` is the fallback when
    /// they do not name squares.
    pub fn to_move(&self) -> Option<Move> {
        let from = Square::from_algebraic(&self.from);
        let to = Square::from_algebraic(&self.to);
        match (from, to) {
            (Some(from), Some(to)) => {
                let promotion = self
                    .promotion
                    .as_deref()
                    .and_then(|p| p.chars().next())
                    .and_then(Piece::from_letter);
                Some(Move {
                    from,
                    to,
                    promotion,
                })
            }
            _ => Move::from_uci(&self.best_move),
        }
    }
}

/// Error body returned by the proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        ErrorBody {
            error: error.into(),
        }
    }
}

/// Why a suggestion could not be obtained.
#[derive(Debug, Error)]
pub enum SuggestError {
    /// The engine service answered with a non-success status.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// The engine service could not be reached.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The engine service answered with a body that is not a move.
    #[error("{0}")]
    Decode(#[from] serde_json::Error),
}

impl SuggestError {
    /// Status the proxy should answer with: the upstream status when there
    /// was one, otherwise 500.
    pub fn status(&self) -> u16 {
        match self {
            SuggestError::Upstream { status, .. } => *status,
            _ => 500,
        }
    }

    /// Error body for the proxy response.
    pub fn to_body(&self) -> ErrorBody {
        let message = self.to_string();
        if message.is_empty() {
            ErrorBody::new("Internal Server Error")
        } else {
            ErrorBody::new(message)
        }
    }
}

/// Extracts the `detail` string from an engine error body, falling back to
/// [`DEFAULT_UPSTREAM_ERROR`] when the body is not JSON or has no detail.
pub fn upstream_error_message(body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("detail")
                .and_then(Value::as_str)
                .filter(|d| !d.is_empty())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| DEFAULT_UPSTREAM_ERROR.to_string())
}

/// HTTP client for the engine service.
///
/// No retries, no timeout, no caching: a failed request is simply "no move
/// this turn".
#[derive(Debug, Clone)]
pub struct SuggestionClient {
    http: reqwest::Client,
    endpoint: String,
}

impl SuggestionClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        SuggestionClient {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts `request` to the engine service and decodes its answer.
    pub async fn best_move(&self, request: &MoveRequest) -> Result<MoveResponse, SuggestError> {
        tracing::debug!(
            engine = %request.engine,
            position = %request.position,
            depth = ?request.depth,
            "Requesting best move"
        );

        let response = self.http.post(&self.endpoint).json(request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = upstream_error_message(&body);
            tracing::warn!(
                status = status.as_u16(),
                message = %message,
                "Engine service returned an error"
            );
            return Err(SuggestError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let suggestion: MoveResponse = serde_json::from_slice(&body)?;
        tracing::debug!(best_move = %suggestion.best_move, "Received best move");
        Ok(suggestion)
    }
}
