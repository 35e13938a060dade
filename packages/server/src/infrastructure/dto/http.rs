//! HTTP API response DTOs for the chat application.

use serde::{Deserialize, Serialize};

use super::websocket::ChatMessageDto;

/// Room summary for list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub participants: Vec<String>,
    pub message_count: usize,
}

/// Participant list of a room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantsDto {
    pub room_id: String,
    pub participants: Vec<String>,
}

/// History entry: the published message plus a readable send time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntryDto {
    #[serde(flatten)]
    pub message: ChatMessageDto,
    pub sent_at: String, // ISO 8601
}

/// Message history of a room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryDto {
    pub room_id: String,
    pub messages: Vec<HistoryEntryDto>,
}
