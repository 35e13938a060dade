//! Domain factories for creating domain entities.

use super::{
    entity::{ChatMessage, EntryNotices},
    value_object::{ClientId, MessageContent, MessageSender, MessageType, RoomId, Timestamp},
};

/// Notice sent back when a message targets a room nobody ever entered.
pub const ROOM_NOT_FOUND_NOTICE: &str = "message delivery failed: room not found";

/// Factory for the messages the chat service records and publishes.
///
/// Enter, leave and error notices are attributed to the system sender;
/// talk messages to the client who sent them.
pub struct ChatMessageFactory;

impl ChatMessageFactory {
    /// `<client> has entered the room`
    pub fn entered(room_id: RoomId, client_id: &ClientId, timestamp: Timestamp) -> ChatMessage {
        ChatMessage::new(
            room_id,
            MessageSender::System,
            format!("{client_id} has entered the room"),
            MessageType::Enter,
            timestamp,
        )
    }

    /// `<client> has left the room`
    pub fn left(room_id: RoomId, client_id: &ClientId, timestamp: Timestamp) -> ChatMessage {
        ChatMessage::new(
            room_id,
            MessageSender::System,
            format!("{client_id} has left the room"),
            MessageType::Leave,
            timestamp,
        )
    }

    /// `<client>, the room is full.`
    pub fn room_full(room_id: RoomId, client_id: &ClientId, timestamp: Timestamp) -> ChatMessage {
        ChatMessage::new(
            room_id,
            MessageSender::System,
            format!("{client_id}, the room is full."),
            MessageType::Error,
            timestamp,
        )
    }

    /// Both notices an enter attempt may record, sharing one timestamp
    pub fn entry_notices(
        room_id: RoomId,
        client_id: &ClientId,
        timestamp: Timestamp,
    ) -> EntryNotices {
        EntryNotices {
            entered: Self::entered(room_id.clone(), client_id, timestamp),
            room_full: Self::room_full(room_id, client_id, timestamp),
        }
    }

    pub fn room_not_found(room_id: RoomId, timestamp: Timestamp) -> ChatMessage {
        ChatMessage::new(
            room_id,
            MessageSender::System,
            ROOM_NOT_FOUND_NOTICE,
            MessageType::Error,
            timestamp,
        )
    }

    pub fn talk(
        room_id: RoomId,
        client_id: ClientId,
        content: MessageContent,
        timestamp: Timestamp,
    ) -> ChatMessage {
        ChatMessage::new(
            room_id,
            MessageSender::Client(client_id),
            content.into_string(),
            MessageType::Talk,
            timestamp,
        )
    }
}
