//! Move-suggestion proxy.
//!
//! Forwards a position to the configured engine service and returns its
//! answer. Errors are normalized to `{error}`: the engine service's status is
//! kept when it answered, anything else is a 500.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chess_desk::MoveRequest;

use crate::AppState;

/// Ask the engine service for the best move.
///
/// # Endpoint
///
/// `POST /api/bestmove`
///
/// # Request Body
///
/// `{engine, position, depth?}`
///
/// # Response
///
/// - `200 OK`: the engine's `{best_move, from, to, promotion?, log}`
/// - upstream status: `{error}` with the engine's `detail`, or
///   "Failed to fetch best move"
/// - `500 Internal Server Error`: engine service unreachable or answered
///   with something that is not a move
pub async fn best_move(State(state): State<AppState>, Json(request): Json<MoveRequest>) -> Response {
    match state.suggestions.best_move(&request).await {
        Ok(suggestion) => Json(suggestion).into_response(),
        Err(err) => {
            let status =
                StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            tracing::warn!(
                engine = %request.engine,
                status = status.as_u16(),
                error = %err,
                "Best move request failed"
            );
            (status, Json(err.to_body())).into_response()
        }
    }
}
