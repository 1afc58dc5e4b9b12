//! Chess desk server library.
//!
//! Board sessions live in memory behind a single lock; the move-suggestion
//! proxy forwards to the configured engine service.

pub mod api;
pub mod middleware;
pub mod models;

use axum::{
    routing::{get, post, put},
    Router,
};
use chess_desk::{BoardSession, DeskConfig, SuggestionClient};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

/// Board sessions keyed by id.
pub type SessionStore = Arc<RwLock<HashMap<String, BoardSession>>>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Client for the engine service, shared by the proxy and engine moves.
    pub suggestions: SuggestionClient,
    pub config: Arc<DeskConfig>,
}

impl AppState {
    pub fn new(config: DeskConfig) -> Self {
        AppState {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            suggestions: SuggestionClient::new(config.upstream_url.clone()),
            config: Arc::new(config),
        }
    }
}

/// Health check endpoint.
///
/// Returns "ok" to indicate the server is running.
pub async fn health() -> &'static str {
    "ok"
}

/// Builds the full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/palette", get(api::position::palette))
        .route("/api/position/serialize", post(api::position::serialize))
        .route("/api/position/extract", post(api::position::extract))
        .route("/api/bestmove", post(api::bestmove::best_move))
        .route("/api/sessions", post(api::sessions::create_session))
        .route(
            "/api/sessions/:id",
            get(api::sessions::get_session).delete(api::sessions::delete_session),
        )
        .route("/api/sessions/:id/new-game", post(api::sessions::new_game))
        .route("/api/sessions/:id/start", post(api::sessions::start))
        .route("/api/sessions/:id/engine-move", post(api::sessions::engine_move))
        .route("/api/sessions/:id/fen", put(api::sessions::set_fen))
        .route("/api/sessions/:id/settings", put(api::sessions::update_settings))
        .route("/api/sessions/:id/drop", post(api::sessions::drop_piece))
        .route("/api/sessions/:id/add", post(api::sessions::add_piece))
        .route("/api/sessions/:id/click", post(api::sessions::click_square))
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::timing_layer))
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_returns_ok() {
        assert_eq!(health().await, "ok");
    }

    #[test]
    fn test_state_uses_configured_upstream() {
        let config = DeskConfig {
            upstream_url: "http://engine.local/bestmove".to_string(),
            ..DeskConfig::default()
        };
        let state = AppState::new(config);
        assert_eq!(state.suggestions.endpoint(), "http://engine.local/bestmove");
        assert_eq!(state.config.default_engine, "stockfish");
    }
}
