//! HTTP API endpoint handlers.
//!
//! Read-only views of room state. Unknown rooms answer with empty lists.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use noriai_shared::time::timestamp_to_jst_rfc3339;

use crate::{
    domain::RoomId,
    infrastructure::dto::{
        http::{HistoryDto, HistoryEntryDto, ParticipantsDto, RoomSummaryDto},
        websocket::ChatMessageDto,
    },
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms: Vec<RoomSummaryDto> = state
        .chat_service
        .list_rooms()
        .into_iter()
        .map(|room| RoomSummaryDto {
            id: room.id.into_string(),
            participants: room
                .participants
                .into_iter()
                .map(|id| id.into_string())
                .collect(),
            message_count: room.message_count,
        })
        .collect();

    Json(rooms)
}

/// Get current participants of a room
pub async fn get_participants(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<ParticipantsDto>, StatusCode> {
    let room_id = parse_room_id(room_id)?;

    let participants = state
        .chat_service
        .participants(&room_id)
        .into_iter()
        .map(|id| id.into_string())
        .collect();

    Ok(Json(ParticipantsDto {
        room_id: room_id.into_string(),
        participants,
    }))
}

/// Get message history of a room
pub async fn get_messages(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<HistoryDto>, StatusCode> {
    let room_id = parse_room_id(room_id)?;

    let messages = state
        .chat_service
        .history(&room_id)
        .iter()
        .map(|message| HistoryEntryDto {
            message: ChatMessageDto::from(message),
            sent_at: timestamp_to_jst_rfc3339(message.timestamp.value()),
        })
        .collect();

    Ok(Json(HistoryDto {
        room_id: room_id.into_string(),
        messages,
    }))
}

fn parse_room_id(raw: String) -> Result<RoomId, StatusCode> {
    RoomId::try_from(raw).map_err(|e| {
        tracing::warn!("Invalid room_id: {}", e);
        StatusCode::BAD_REQUEST
    })
}
