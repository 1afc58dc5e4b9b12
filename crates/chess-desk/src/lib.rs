//! The chess desk.
//!
//! Everything between the value types in `chess_core` and the HTTP server:
//! - [`rules`]: the rules-engine capability trait and its standard backend
//! - [`editor`]: free-placement edits on a [`chess_core::Placement`]
//! - [`BoardSession`]: one board with its settings and game phase
//! - [`SuggestionClient`]: move suggestions from a remote engine service
//! - [`DeskConfig`]: `desk.toml` settings

pub mod config;
pub mod editor;
pub mod error;
pub mod rules;
pub mod session;
pub mod suggest;

pub use config::{ConfigError, DeskConfig};
pub use error::DeskError;
pub use rules::{DrawReason, GameResult, PlayedMove, RulesEngine, RulesError, StandardChess};
pub use session::{BoardSession, GameMode, START_KEYWORD};
pub use suggest::{
    upstream_error_message, ErrorBody, MoveRequest, MoveResponse, SuggestError, SuggestionClient,
    DEFAULT_UPSTREAM_ERROR,
};
