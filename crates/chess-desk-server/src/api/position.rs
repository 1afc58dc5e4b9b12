//! Stateless position conversions.
//!
//! These endpoints expose board extraction and position serialization
//! without a session, plus the palette used for free placement.

use axum::Json;
use chess_core::{Occupant, Placement, Square, STARTPOS};
use chess_desk::START_KEYWORD;

use super::ApiError;
use crate::models::{ExtractRequest, FenResponse, PaletteEntry, PositionResponse, SerializeRequest};

/// List the free-placement palette.
///
/// # Endpoint
///
/// `GET /api/palette`
///
/// # Response
///
/// - `200 OK`: twelve entries, white pieces first (P R N B Q K), then black
pub async fn palette() -> Json<Vec<PaletteEntry>> {
    let entries = Occupant::PALETTE
        .iter()
        .filter_map(|&c| Occupant::from_fen_char(c))
        .map(PaletteEntry::from)
        .collect();
    Json(entries)
}

/// Serialize a sparse position into a free-placement position string.
///
/// # Endpoint
///
/// `POST /api/position/serialize`
///
/// # Response
///
/// - `200 OK`: `{fen}` ending in ` w - - 0 1`
/// - `400 Bad Request`: a key is not a square label
pub async fn serialize(Json(request): Json<SerializeRequest>) -> Result<Json<FenResponse>, ApiError> {
    let placement = request
        .position
        .into_iter()
        .map(|(label, occupant)| -> Result<(Square, Occupant), ApiError> {
            let square = label
                .parse::<Square>()
                .map_err(|e| ApiError::bad_request(e.to_string()))?;
            Ok((square, occupant))
        })
        .collect::<Result<Placement, ApiError>>()?;

    Ok(Json(FenResponse {
        fen: placement.to_fen(),
    }))
}

/// Extract the sparse position from a position string.
///
/// Only the placement field is read; `start` stands for the initial position.
///
/// # Endpoint
///
/// `POST /api/position/extract`
///
/// # Response
///
/// - `200 OK`: `{position: {square: {kind, color}}}`
/// - `400 Bad Request`: malformed placement field
pub async fn extract(Json(request): Json<ExtractRequest>) -> Result<Json<PositionResponse>, ApiError> {
    let fen = request.fen.trim();
    let fen = if fen == START_KEYWORD { STARTPOS } else { fen };
    let position = Placement::from_fen(fen).map_err(|e| ApiError::bad_request(e.to_string()))?;
    Ok(Json(PositionResponse { position }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chess_core::{Color, Piece};
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_palette_order() {
        let Json(entries) = palette().await;
        let letters: String = entries.iter().map(|e| e.letter.as_str()).collect();
        assert_eq!(letters, "PRNBQKprnbqk");
        assert_eq!(entries[0].glyph, "\u{2659}");
        assert_eq!(entries[11].glyph, "\u{265A}");
    }

    #[tokio::test]
    async fn test_serialize_empty_board() {
        let request = SerializeRequest {
            position: BTreeMap::new(),
        };
        let Json(response) = serialize(Json(request)).await.unwrap();
        assert_eq!(response.fen, "8/8/8/8/8/8/8/8 w - - 0 1");
    }

    #[tokio::test]
    async fn test_serialize_single_king() {
        let mut position = BTreeMap::new();
        position.insert("e4".to_string(), Occupant::new(Piece::King, Color::White));
        let Json(response) = serialize(Json(SerializeRequest { position })).await.unwrap();
        assert_eq!(response.fen, "8/8/8/8/4K3/8/8/8 w - - 0 1");
    }

    #[tokio::test]
    async fn test_serialize_rejects_bad_label() {
        let mut position = BTreeMap::new();
        position.insert("e9".to_string(), Occupant::new(Piece::King, Color::White));
        let err = serialize(Json(SerializeRequest { position }))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_extract_start_keyword() {
        let request = ExtractRequest {
            fen: "start".to_string(),
        };
        let Json(response) = extract(Json(request)).await.unwrap();
        assert_eq!(response.position.len(), 32);
        assert_eq!(
            response.position.get(Square::E1),
            Some(Occupant::new(Piece::King, Color::White))
        );
    }

    #[tokio::test]
    async fn test_extract_rejects_bad_rank() {
        let request = ExtractRequest {
            fen: "8/8/8/8/8/8/8/9 w - - 0 1".to_string(),
        };
        let err = extract(Json(request)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
