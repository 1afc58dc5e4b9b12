//! API handlers for the desk server.

pub mod bestmove;
pub mod position;
pub mod sessions;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chess_desk::{DeskError, ErrorBody};

/// An error response: a status and an `{error}` body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            body: ErrorBody::new(message),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn session_not_found(id: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("session '{}' not found", id))
    }
}

impl From<DeskError> for ApiError {
    fn from(err: DeskError) -> Self {
        let status = match err {
            DeskError::GameStarted | DeskError::Unplayable(_) => StatusCode::CONFLICT,
            DeskError::InvalidFen(_)
            | DeskError::InvalidSquare(_)
            | DeskError::InvalidPiece(_)
            | DeskError::UnknownEngine(_) => StatusCode::BAD_REQUEST,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::FenError;
    use chess_desk::RulesError;

    #[test]
    fn test_desk_errors_map_to_statuses() {
        let cases = [
            (DeskError::GameStarted, StatusCode::CONFLICT),
            (
                DeskError::Unplayable(RulesError::IllegalPosition("no kings".into())),
                StatusCode::CONFLICT,
            ),
            (
                DeskError::InvalidFen(FenError::InvalidPartCount(1)),
                StatusCode::BAD_REQUEST,
            ),
            (DeskError::InvalidPiece("x".into()), StatusCode::BAD_REQUEST),
            (DeskError::UnknownEngine("x".into()), StatusCode::BAD_REQUEST),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn test_not_found_names_the_session() {
        let err = ApiError::session_not_found("abc");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(err.body.error.contains("abc"));
    }
}
