//! Board session API handlers.
//!
//! Each handler locks the session store, runs one session operation to
//! completion and answers with the session's new view. The engine-move
//! handler is the exception: it releases the lock while the engine service
//! is thinking.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chess_core::Square;
use chess_desk::{BoardSession, DeskError, MoveRequest};

use super::ApiError;
use crate::models::{
    AddRequest, ClickRequest, CreateSessionRequest, DropRequest, EditOutcome, EngineMoveResponse,
    FenRequest, MoveView, SessionView, SettingsRequest,
};
use crate::AppState;

fn parse_square(label: &str) -> Result<Square, ApiError> {
    label
        .parse::<Square>()
        .map_err(|e| ApiError::from(DeskError::from(e)))
}

/// Runs `op` on session `id` under the write lock.
async fn with_session<T>(
    state: &AppState,
    id: &str,
    op: impl FnOnce(&mut BoardSession) -> Result<T, DeskError>,
) -> Result<(T, SessionView), ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(id)
        .ok_or_else(|| ApiError::session_not_found(id))?;
    let value = op(session)?;
    Ok((value, SessionView::new(id, session)))
}

/// Create a board session.
///
/// # Endpoint
///
/// `POST /api/sessions`
///
/// # Request Body
///
/// Optional `{fen}`; the initial position when the body or the field is
/// absent. `start` is accepted.
///
/// # Response
///
/// - `201 Created`: session view
/// - `400 Bad Request`: undecodable body or malformed position string
pub async fn create_session(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let request: CreateSessionRequest = if body.iter().all(u8::is_ascii_whitespace) {
        CreateSessionRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::bad_request(format!("invalid request body: {}", e)))?
    };
    let session: BoardSession = match request.fen.as_deref() {
        Some(fen) => BoardSession::with_fen(&state.config, fen)?,
        None => BoardSession::new(&state.config),
    };

    let id = uuid::Uuid::new_v4().to_string();
    let view = SessionView::new(&id, &session);
    state.sessions.write().await.insert(id.clone(), session);
    tracing::info!(session = %id, fen = %view.fen, "Session created");

    Ok((StatusCode::CREATED, Json(view)))
}

/// Get a session.
///
/// # Endpoint
///
/// `GET /api/sessions/:id`
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&id)
        .ok_or_else(|| ApiError::session_not_found(&id))?;
    Ok(Json(SessionView::new(&id, session)))
}

/// Delete a session.
///
/// # Endpoint
///
/// `DELETE /api/sessions/:id`
///
/// # Response
///
/// - `204 No Content`
/// - `404 Not Found`
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    match state.sessions.write().await.remove(&id) {
        Some(_) => {
            tracing::info!(session = %id, "Session deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ApiError::session_not_found(&id)),
    }
}

/// Reset to the initial position.
///
/// # Endpoint
///
/// `POST /api/sessions/:id/new-game`
pub async fn new_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let ((), view) = with_session(&state, &id, |s| {
        s.new_game();
        Ok(())
    })
    .await?;
    Ok(Json(view))
}

/// Start play from the current position.
///
/// # Endpoint
///
/// `POST /api/sessions/:id/start`
///
/// # Response
///
/// - `200 OK`: session view
/// - `409 Conflict`: already started, or position not playable
pub async fn start(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let ((), view) = with_session(&state, &id, |s| s.start()).await?;
    Ok(Json(view))
}

/// Replace the position with a typed position string.
///
/// # Endpoint
///
/// `PUT /api/sessions/:id/fen`
///
/// # Response
///
/// - `200 OK`: session view
/// - `400 Bad Request`: malformed position string
/// - `409 Conflict`: game already started
pub async fn set_fen(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<FenRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let ((), view) = with_session(&state, &id, |s| s.set_fen(&request.fen)).await?;
    Ok(Json(view))
}

/// Change orientation, game mode, engine or side to move.
///
/// # Endpoint
///
/// `PUT /api/sessions/:id/settings`
///
/// # Response
///
/// - `200 OK`: session view
/// - `400 Bad Request`: unknown engine
/// - `409 Conflict`: game already started
pub async fn update_settings(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SettingsRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let ((), view) = with_session(&state, &id, |s| {
        // engine first: it is the only setting that can be rejected on its own
        if let Some(engine) = &request.engine {
            s.set_engine(engine)?;
        }
        if let Some(orientation) = request.orientation {
            s.set_orientation(orientation)?;
        }
        if let Some(mode) = request.mode {
            s.set_mode(mode)?;
        }
        if let Some(turn) = request.turn {
            s.set_turn(turn)?;
        }
        Ok(())
    })
    .await?;
    Ok(Json(view))
}

/// Drop a piece from one square onto another.
///
/// Before the game starts this moves the piece freely; afterwards it is a
/// move checked by the rules, promoting to a queen.
///
/// # Endpoint
///
/// `POST /api/sessions/:id/drop`
pub async fn drop_piece(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<DropRequest>,
) -> Result<Json<EditOutcome>, ApiError> {
    let from = parse_square(&request.from)?;
    let to = parse_square(&request.to)?;
    let (applied, session) = with_session(&state, &id, |s| Ok(s.drop_piece(from, to))).await?;
    Ok(Json(EditOutcome { applied, session }))
}

/// Add a palette piece on the first empty square.
///
/// # Endpoint
///
/// `POST /api/sessions/:id/add`
///
/// # Response
///
/// - `200 OK`: `{applied, session}`; not applied when the board is full or
///   the game has started
/// - `400 Bad Request`: not a piece letter
pub async fn add_piece(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AddRequest>,
) -> Result<Json<EditOutcome>, ApiError> {
    let (applied, session) = with_session(&state, &id, |s| s.add_piece(&request.piece)).await?;
    Ok(Json(EditOutcome { applied, session }))
}

/// Remove the piece on a square.
///
/// # Endpoint
///
/// `POST /api/sessions/:id/click`
pub async fn click_square(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ClickRequest>,
) -> Result<Json<EditOutcome>, ApiError> {
    let square = parse_square(&request.square)?;
    let (applied, session) = with_session(&state, &id, |s| Ok(s.click_square(square))).await?;
    Ok(Json(EditOutcome { applied, session }))
}

/// Let the engine service play its move.
///
/// # Endpoint
///
/// `POST /api/sessions/:id/engine-move`
///
/// # Response
///
/// - `200 OK`: `{played, error?, session}`; `played` is null when the engine
///   service failed or the position moved on while it was thinking
/// - `409 Conflict`: the engine is not to move, or a request is already
///   outstanding
pub async fn engine_move(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EngineMoveResponse>, ApiError> {
    let request = {
        let mut sessions = state.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| ApiError::session_not_found(&id))?;
        if session.is_awaiting_engine() {
            return Err(ApiError::conflict("engine move already requested"));
        }
        session
            .begin_engine_request()
            .ok_or_else(|| ApiError::conflict("engine is not to move"))?
    };

    tracing::debug!(session = %id, engine = %request.engine, "Asking engine for a move");
    // Resolved in its own task: the pending request is cleared even if this
    // handler is dropped while the engine is thinking.
    tokio::spawn(resolve_engine_request(state, id, request))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Engine move task failed");
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "engine move failed")
        })?
}

async fn resolve_engine_request(
    state: AppState,
    id: String,
    request: MoveRequest,
) -> Result<Json<EngineMoveResponse>, ApiError> {
    let outcome = state.suggestions.best_move(&request).await;
    let error = outcome.as_ref().err().map(|e| e.to_body().error);

    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&id)
        .ok_or_else(|| ApiError::session_not_found(&id))?;
    let played = session.finish_engine_request(&request, outcome);
    if let Some(played) = &played {
        tracing::info!(session = %id, san = %played.san, "Engine moved");
    }

    Ok(Json(EngineMoveResponse {
        played: played.as_ref().map(MoveView::from),
        error,
        session: SessionView::new(&id, session),
    }))
}
