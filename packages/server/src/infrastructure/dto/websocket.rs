//! WebSocket message DTOs for the chat application.

use serde::{Deserialize, Serialize};

use crate::domain::{ChatMessage, MessageType};

/// Action sent by a client over its room socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ClientAction {
    Enter,
    Send { content: String },
    Leave,
}

/// Chat message published to every subscriber of a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub room_id: String,
    /// Client id, or "SYSTEM"
    pub sender: String,
    pub content: String,
    pub r#type: MessageType,
    /// Unix timestamp (milliseconds since epoch) in JST
    pub timestamp: i64,
}

impl From<&ChatMessage> for ChatMessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            room_id: message.room_id.as_str().to_string(),
            sender: message.sender.as_str().to_string(),
            content: message.content.clone(),
            r#type: message.message_type,
            timestamp: message.timestamp.value(),
        }
    }
}
