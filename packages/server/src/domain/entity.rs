//! Core domain models for the chat application.

use std::collections::BTreeSet;

use super::{
    error::RoomError,
    value_object::{ClientId, MessageSender, MessageType, RoomId, Timestamp},
};

/// Maximum number of participants allowed in a room
pub const MAX_PARTICIPANTS: usize = 4;

/// A chat room: a bounded participant set and an append-only message history
#[derive(Debug, Clone)]
pub struct Room {
    /// Room identifier
    pub id: RoomId,
    /// Clients currently counted as members
    participants: BTreeSet<ClientId>,
    /// Message history in insertion order
    messages: Vec<ChatMessage>,
}

/// Notices prepared for an enter attempt; the room records the one that applies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryNotices {
    /// Recorded when the client is added
    pub entered: ChatMessage,
    /// Recorded when the room is at capacity
    pub room_full: ChatMessage,
}

/// Result of an enter attempt together with the notice recorded for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub outcome: Result<(), RoomError>,
    /// The notice appended to history in the same step, if any
    pub recorded: Option<ChatMessage>,
}

impl Room {
    /// Create a new empty room
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            participants: BTreeSet::new(),
            messages: Vec::new(),
        }
    }

    /// Add a client and record the matching notice as one step.
    ///
    /// A duplicate enter records nothing.
    pub fn enter(&mut self, client_id: ClientId, notices: EntryNotices) -> Admission {
        match self.add_participant(client_id) {
            Ok(()) => Admission {
                outcome: Ok(()),
                recorded: Some(self.record(notices.entered)),
            },
            Err(error @ RoomError::CapacityExceeded { .. }) => Admission {
                outcome: Err(error),
                recorded: Some(self.record(notices.room_full)),
            },
            Err(error) => Admission {
                outcome: Err(error),
                recorded: None,
            },
        }
    }

    /// Remove a client and record `notice` as one step.
    ///
    /// Returns the recorded notice, or `None` when the client was not a member.
    pub fn leave(&mut self, client_id: &ClientId, notice: ChatMessage) -> Option<ChatMessage> {
        if !self.participants.remove(client_id) {
            return None;
        }
        Some(self.record(notice))
    }

    /// Append a message to the room history
    pub fn add_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= MAX_PARTICIPANTS
    }

    /// Participants sorted by client id
    pub fn participants(&self) -> Vec<ClientId> {
        self.participants.iter().cloned().collect()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn add_participant(&mut self, client_id: ClientId) -> Result<(), RoomError> {
        if self.participants.contains(&client_id) {
            return Err(RoomError::AlreadyParticipating(client_id.into_string()));
        }
        if self.is_full() {
            return Err(self.capacity_error());
        }
        self.participants.insert(client_id);
        Ok(())
    }

    fn capacity_error(&self) -> RoomError {
        RoomError::CapacityExceeded {
            capacity: MAX_PARTICIPANTS,
            current: self.participants.len(),
        }
    }

    fn record(&mut self, message: ChatMessage) -> ChatMessage {
        self.messages.push(message.clone());
        message
    }
}

/// An immutable chat message, as recorded in history and handed to the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Room the message belongs to
    pub room_id: RoomId,
    /// Client who sent it, or the system
    pub sender: MessageSender,
    /// Message text
    pub content: String,
    /// Kind of message
    pub message_type: MessageType,
    /// When the service recorded the message
    pub timestamp: Timestamp,
}

impl ChatMessage {
    /// Create a new chat message
    pub fn new(
        room_id: RoomId,
        sender: MessageSender,
        content: impl Into<String>,
        message_type: MessageType,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            room_id,
            sender,
            content: content.into(),
            message_type,
            timestamp,
        }
    }
}
